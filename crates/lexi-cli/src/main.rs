//! Lexi CLI - Command-line interface
//!
//! Usage:
//!   lexi extract <path> [--domain D] [--cross-domain] [--custom FILE] [--format json|summary]
//!   lexi domains
//!   lexi dictionary <domain>
//!   lexi evaluate <path> --gold FILE [--domain D]

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use lexi_core::{
    AppConfig, ConceptDefinition, ConceptGraph, DictionaryProvider, ExtractionPhase, Importance,
    LexiError, LoggingConfig, NoProgress, ProgressSink,
};
use lexi_dictionary::{BuiltinDictionaries, FileDictionaryProvider};
use lexi_extractor::{
    validate_text, AggregateMetrics, ConceptPipeline, Evaluator, ExtractionRequest, GoldStandard,
};

#[derive(Parser)]
#[command(name = "lexi")]
#[command(about = "Domain concept extraction for instructional text")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory of JSON/TOML dictionaries, replacing the built-ins
    #[arg(long, global = true)]
    dictionary_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the concept graph of a chapter
    Extract {
        /// Chapter text file
        path: PathBuf,
        /// Dictionary domain (defaults to the configured domain)
        #[arg(long)]
        domain: Option<String>,
        /// Also match cross-domain concepts
        #[arg(long)]
        cross_domain: bool,
        /// JSON file with extra concept definitions
        #[arg(long)]
        custom: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Print phase progress to stderr
        #[arg(long)]
        progress: bool,
    },
    /// List available dictionary domains
    Domains,
    /// Print a domain dictionary as JSON
    Dictionary { domain: String },
    /// Score an extraction against a gold standard
    Evaluate {
        /// Chapter text file
        path: PathBuf,
        /// Gold standard JSON (`concepts`, `relationships`)
        #[arg(long)]
        gold: PathBuf,
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        cross_domain: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Summary,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(dir) = cli.dictionary_dir {
        config.dictionary.directory = Some(dir);
    }
    init_tracing(&config.logging);

    let provider = open_provider(&config)?;

    match cli.command {
        Commands::Extract {
            path,
            domain,
            cross_domain,
            custom,
            format,
            progress,
        } => {
            let custom = match custom {
                Some(file) => read_custom_concepts(&file)?,
                None => Vec::new(),
            };
            let options = RunOptions {
                domain: domain.unwrap_or_else(|| config.dictionary.default_domain.clone()),
                cross_domain: cross_domain || config.dictionary.include_cross_domain,
                custom,
                progress,
            };
            let graph = run_extraction(provider, &config, &path, &options)?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&graph)?),
                OutputFormat::Summary => print_summary(&graph),
            }
        }
        Commands::Domains => {
            for domain in provider.domains() {
                match provider.dictionary_for_domain(&domain) {
                    Some(dictionary) => println!(
                        "{}\tv{}\t{} concepts",
                        dictionary.domain_name,
                        dictionary.version,
                        dictionary.len()
                    ),
                    None => println!("{domain}"),
                }
            }
            let cross = provider.cross_domain_concepts();
            if !cross.is_empty() {
                println!("(cross-domain)\t\t{} concepts", cross.len());
            }
        }
        Commands::Dictionary { domain } => {
            let dictionary = provider
                .dictionary_for_domain(&domain)
                .ok_or_else(|| LexiError::UnknownDomain(domain.clone()))?;
            println!("{}", serde_json::to_string_pretty(&dictionary)?);
        }
        Commands::Evaluate {
            path,
            gold,
            domain,
            cross_domain,
        } => {
            let content = std::fs::read_to_string(&gold)
                .with_context(|| format!("Failed to read gold standard {}", gold.display()))?;
            let gold: GoldStandard = serde_json::from_str(&content)
                .with_context(|| format!("Invalid gold standard {}", gold.display()))?;

            let options = RunOptions {
                domain: domain.unwrap_or_else(|| config.dictionary.default_domain.clone()),
                cross_domain: cross_domain || config.dictionary.include_cross_domain,
                custom: Vec::new(),
                progress: false,
            };
            let graph = run_extraction(provider, &config, &path, &options)?;

            let mut aggregate = AggregateMetrics::default();
            aggregate.add_chapter(&Evaluator::new().evaluate(&graph, &gold));
            print!("{}", aggregate.report());
        }
    }

    Ok(())
}

// ============================================================================
// Setup
// ============================================================================

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

/// `RUST_LOG` wins over the configured level; logs go to stderr
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(logging.include_location)
        .with_line_number(logging.include_location);

    if logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn open_provider(config: &AppConfig) -> anyhow::Result<Box<dyn DictionaryProvider>> {
    match &config.dictionary.directory {
        Some(dir) => {
            let provider = FileDictionaryProvider::from_dir(dir)
                .with_context(|| format!("Failed to load dictionaries from {}", dir.display()))?;
            tracing::info!("Loaded {} dictionaries from {}", provider.len(), dir.display());
            Ok(Box::new(provider))
        }
        None => Ok(Box::new(BuiltinDictionaries::new())),
    }
}

fn read_custom_concepts(path: &Path) -> anyhow::Result<Vec<ConceptDefinition>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read custom concepts {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid custom concepts {}", path.display()))
}

// ============================================================================
// Commands
// ============================================================================

struct RunOptions {
    domain: String,
    cross_domain: bool,
    custom: Vec<ConceptDefinition>,
    progress: bool,
}

fn run_extraction(
    provider: Box<dyn DictionaryProvider>,
    config: &AppConfig,
    path: &Path,
    options: &RunOptions,
) -> anyhow::Result<ConceptGraph> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let text = validate_text(&bytes).with_context(|| path.display().to_string())?;

    let pipeline = ConceptPipeline::with_config(provider, config.extractor.clone())?;
    let request = ExtractionRequest::new(text, &options.domain)
        .with_cross_domain(options.cross_domain)
        .with_custom_concepts(options.custom.clone());

    let report = |phase: ExtractionPhase, detail: &str| eprintln!("[{phase}] {detail}");
    let sink: &dyn ProgressSink = if options.progress {
        &report
    } else {
        &NoProgress
    };

    Ok(pipeline.extract_with_progress(&request, sink))
}

fn print_summary(graph: &ConceptGraph) {
    println!(
        "{} concepts, {} relationships",
        graph.concepts.len(),
        graph.relationships.len()
    );

    for tier in Importance::ALL {
        let concepts: Vec<String> = graph
            .concepts_in_tier(tier)
            .map(|c| format!("{} ({})", c.name, c.mentions.len()))
            .collect();
        if !concepts.is_empty() {
            println!("\n{}:\n  {}", tier, concepts.join(", "));
        }
    }

    if !graph.relationships.is_empty() {
        println!("\nRelationships:");
        for rel in &graph.relationships {
            let name = |id: &str| graph.concept(id).map_or(id.to_string(), |c| c.name.clone());
            println!(
                "  {} -> {} [{}, {:.2}]",
                name(&rel.source),
                name(&rel.target),
                rel.relationship_type,
                rel.strength
            );
        }
    }

    let sequence: Vec<&str> = graph
        .sequence
        .iter()
        .filter_map(|id| graph.concept(id))
        .map(|c| c.name.as_str())
        .collect();
    if !sequence.is_empty() {
        println!("\nSequence:\n  {}", sequence.join(" -> "));
    }
}
