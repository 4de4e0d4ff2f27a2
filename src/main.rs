//! scisample CLI - Generate parameter samples from a sampler specification.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use scisample::{AnySampler, OutputFormat, Sampler, sampler_from_file, sampler_types, write_samples};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "scisample")]
#[command(version)]
#[command(about = "Generate parameter samples from declarative sampler specifications")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate samples and write them as JSON
    Sample {
        /// Path to the sampler specification (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: Format,
    },

    /// List the parameters a specification produces
    Parameters {
        /// Path to the sampler specification (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,
    },

    /// Validate a sampler specification
    Validate {
        /// Path to the sampler specification (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,
    },

    /// Show an example specification
    Example,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Jsonl,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => OutputFormat::Json,
            Format::Jsonl => OutputFormat::Jsonl,
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");
}

fn print_example_spec() {
    let example = r#"# scisample specification
#
# Registered types: column_list, list, cross_product, csv, random, custom

sampler:
    type: column_list
    constants:
        X1: 20
    parameters: |
        X2       X3
        5        5
        10       10
"#;
    println!("{example}");
}

fn load(spec: &Path) -> Result<AnySampler> {
    match sampler_from_file(spec) {
        Ok(sampler) => Ok(sampler),
        Err(e) if e.is_dispatch_error() => Err(e).with_context(|| {
            format!(
                "No usable sampler type in {spec:?} (known types: {})",
                sampler_types().collect::<Vec<_>>().join(", ")
            )
        }),
        Err(e) => Err(e).with_context(|| format!("Failed to load sampler from {spec:?}")),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Example => {
            print_example_spec();
        }

        Commands::Validate { spec } => {
            let sampler = load(&spec)?;
            info!("Specification is valid");
            info!("  Type: {}", sampler.kind());
            info!("  Parameters: {}", sampler.parameters().join(", "));
        }

        Commands::Parameters { spec } => {
            let sampler = load(&spec)?;
            for name in sampler.parameters() {
                println!("{name}");
            }
        }

        Commands::Sample {
            spec,
            output,
            format,
        } => {
            let sampler = load(&spec)?;
            let samples = sampler.get_samples().context("Failed to generate samples")?;

            match &output {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("Failed to create output file {path:?}"))?;
                    write_samples(samples, format.into(), BufWriter::new(file))?;
                    info!(count = samples.len(), output = ?path, "Samples written");
                }
                None => write_samples(samples, format.into(), io::stdout().lock())?,
            }
        }
    }

    Ok(())
}
