use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use bibmerge::config::{find_config_file, Config, ConfigFile, StrategyKind};
use bibmerge::io::{
    read_publications, read_thesaurus, write_publications, write_publications_json,
    write_thesaurus, write_thesaurus_json,
};
use bibmerge::resolver::{build_thesaurus, collect_author_labels, Direction};
use bibmerge::utils::{dedup_publications, dedup_publications_with};

/// Bibmerge - resolve author identities and deduplicate scraped publication records
#[derive(Parser, Debug)]
#[command(name = "bibmerge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Author-identity resolution and publication deduplication", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the canonical-name thesaurus from a publications CSV
    #[command(alias = "t")]
    Thesaurus {
        /// Publications CSV as produced by the extractor
        input: PathBuf,

        /// Output path for the Label / Replace by table (tab-separated)
        #[arg(long, short)]
        output: PathBuf,

        /// Artifact format
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Deduplicate a publications CSV, annotating each record with its year
    #[command(alias = "d")]
    Dedup {
        /// Publications CSV as produced by the extractor
        input: PathBuf,

        /// Output path for the deduplicated CSV
        #[arg(long, short)]
        output: PathBuf,

        /// Rewrite author labels through this thesaurus before keying
        #[arg(long)]
        thesaurus: Option<PathBuf>,

        /// Artifact format
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },

    /// Build the thesaurus and the deduplicated CSV in one pass
    #[command(alias = "r")]
    Run {
        /// Publications CSV as produced by the extractor
        input: PathBuf,

        /// Output path for the deduplicated CSV
        #[arg(long)]
        publications: PathBuf,

        /// Output path for the thesaurus table
        #[arg(long)]
        thesaurus: PathBuf,

        /// Canonicalize author labels before deduplicating
        #[arg(long, default_value_t = false)]
        apply_thesaurus: bool,

        /// Format for both artifacts
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

/// Artifact output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// CSV/TSV tables compatible with the extractor's schema
    #[default]
    Csv,

    /// Pretty-printed JSON
    Json,
}

/// Flags overriding the pipeline configuration
#[derive(clap::Args, Debug)]
struct PipelineArgs {
    /// Surname similarity strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyKind>,

    /// Similarity threshold in [0, 1]; defaults to the strategy's own
    #[arg(long)]
    threshold: Option<f64>,

    /// Canonical script for normalized names
    #[arg(long, value_enum)]
    direction: Option<Direction>,

    /// Flatten merge chains to one representative per equivalence class
    #[arg(long, default_value_t = false)]
    transitive: bool,
}

impl PipelineArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(strategy) = self.strategy {
            config.similarity.strategy = strategy;
        }
        if let Some(threshold) = self.threshold {
            config.similarity.threshold = Some(threshold);
        }
        if let Some(direction) = self.direction {
            config.normalizer.direction = direction;
        }
        if self.transitive {
            config.resolver.transitive = true;
        }
    }
}

/// Default tracing filter directive.
///
/// `-q`/`-v` flags win, then the config file's logging level, then the
/// "info" default baked into [`bibmerge::config::LoggingConfig`]. A set
/// `RUST_LOG` bypasses this entirely.
fn log_directive(quiet: bool, verbose: u8, config_level: &str) -> String {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => config_level,
            1 => "debug",
            _ => "trace",
        }
    };
    format!("bibmerge={}", level)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Resolve the config file before tracing init so its logging level can
    // seed the filter
    let (mut config_file, config_source) = match &cli.config {
        Some(path) => (
            ConfigFile::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            Some(path.clone()),
        ),
        None => match find_config_file() {
            Some(path) => (
                ConfigFile::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                Some(path),
            ),
            None => (ConfigFile::default(), None),
        },
    };
    config_file.apply_env_overrides();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                log_directive(cli.quiet, cli.verbose, &config_file.logging.level)
            }),
        ))
        .init();

    if let Some(path) = &config_source {
        tracing::info!("Using config file: {}", path.display());
    }
    let mut config = config_file.into_config();

    match cli.command {
        Commands::Thesaurus {
            input,
            output,
            format,
            pipeline,
        } => {
            pipeline.apply(&mut config);

            let records = read_publications(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let labels = collect_author_labels(&records);
            let thesaurus = build_thesaurus(&labels, &config);

            match format {
                OutputFormat::Csv => write_thesaurus(&output, &thesaurus),
                OutputFormat::Json => write_thesaurus_json(&output, &thesaurus),
            }
            .with_context(|| format!("writing {}", output.display()))?;
            println!(
                "{} labels resolved into {} thesaurus entries",
                labels.len(),
                thesaurus.len()
            );
        }

        Commands::Dedup {
            input,
            output,
            thesaurus,
            format,
        } => {
            let records = read_publications(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let total = records.len();

            let unique = match thesaurus {
                Some(path) => {
                    let thesaurus = read_thesaurus(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    dedup_publications_with(records, &thesaurus)
                }
                None => dedup_publications(records),
            };

            match format {
                OutputFormat::Csv => write_publications(&output, &unique),
                OutputFormat::Json => write_publications_json(&output, &unique),
            }
            .with_context(|| format!("writing {}", output.display()))?;
            println!("{} records in, {} unique records out", total, unique.len());
        }

        Commands::Run {
            input,
            publications,
            thesaurus,
            apply_thesaurus,
            format,
            pipeline,
        } => {
            pipeline.apply(&mut config);

            let records = read_publications(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let total = records.len();

            let labels = collect_author_labels(&records);
            let mapping = build_thesaurus(&labels, &config);
            match format {
                OutputFormat::Csv => write_thesaurus(&thesaurus, &mapping),
                OutputFormat::Json => write_thesaurus_json(&thesaurus, &mapping),
            }
            .with_context(|| format!("writing {}", thesaurus.display()))?;

            let unique = if apply_thesaurus {
                dedup_publications_with(records, &mapping)
            } else {
                dedup_publications(records)
            };
            match format {
                OutputFormat::Csv => write_publications(&publications, &unique),
                OutputFormat::Json => write_publications_json(&publications, &unique),
            }
            .with_context(|| format!("writing {}", publications.display()))?;

            println!(
                "{} records in, {} unique records out, {} thesaurus entries",
                total,
                unique.len(),
                mapping.len()
            );
        }
    }

    Ok(())
}
