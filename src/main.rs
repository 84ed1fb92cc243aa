use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use ballast::loader::{self, Format};

#[derive(Parser)]
#[command(
    name = "ballast",
    about = "Validates deployment manifests with source-accurate diagnostics",
    version,
    author,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (use -vv for debug output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a manifest file
    Validate {
        /// Path to the manifest (.json, .yml or .yaml)
        file: PathBuf,

        /// Override the format inferred from the file extension
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Emit the report as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum FormatArg {
    Json,
    Yaml,
}

impl From<FormatArg> for Format {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => Format::Json,
            FormatArg::Yaml => Format::Yaml,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Validate { file, format, json } => {
            validate_command(&file, format.map(Into::into), json)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbose {
        0 => EnvFilter::new("ballast=warn"), // Default: warnings and errors only
        1 => EnvFilter::new("ballast=info"), // -v: info messages
        _ => EnvFilter::new("ballast=debug"), // -vv or more: full debug
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn validate_command(file: &Path, format: Option<Format>, json: bool) -> Result<()> {
    let loaded = loader::load_manifest(file, format)
        .with_context(|| format!("failed to load manifest from {file:?}"))?;

    let report = loaded.validate();

    if json {
        println!("{}", serde_json::to_string_pretty(report.entries())?);
    } else if !report.is_empty() {
        eprint!("{report}");
    }

    // The report never decides the exit code; that happens here.
    if report.is_fatal() {
        anyhow::bail!("validation failed for {file:?} (see errors above)");
    }

    if !json {
        println!("✅ Manifest is valid: {}", file.display());
    }
    Ok(())
}
