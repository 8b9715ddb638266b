//! mdispatch-explain binary
//!
//! Run with: `mdispatch-explain [OPTIONS] <COMMAND>`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use mdispatch::{DispatchConfig, LiftingRule};
use mdispatch_explain::{explain, find_conflicts, Catalog};

#[derive(Parser)]
#[command(name = "mdispatch-explain")]
#[command(about = "Explain multiple-dispatch resolution over a method table file")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override the lifting rule from the table file
    #[arg(long, global = true, value_enum)]
    lifting: Option<Lifting>,

    /// Disable colored diagnostics
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one call and explain the outcome
    Resolve {
        /// Method table file
        #[arg(value_name = "TABLE")]
        table: PathBuf,

        /// Generic function to call
        #[arg(short, long)]
        function: String,

        /// Argument types, comma separated; omit for a zero-argument call
        #[arg(short, long, value_delimiter = ',')]
        call: Vec<String>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Report method pairs that some call leaves ambiguous
    Check {
        /// Method table file
        #[arg(value_name = "TABLE")]
        table: PathBuf,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the default configuration
    Config,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum Lifting {
    Pareto,
    Lexicographic,
}

impl From<Lifting> for LiftingRule {
    fn from(lifting: Lifting) -> Self {
        match lifting {
            Lifting::Pareto => LiftingRule::Pareto,
            Lifting::Lexicographic => LiftingRule::Lexicographic,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let color = !cli.no_color;

    match &cli.command {
        Commands::Config => {
            let mut config = DispatchConfig::default();
            if let Some(lifting) = cli.lifting {
                config = config.with_lifting(lifting.into());
            }
            print!("{}", config.to_toml_string()?);
        }
        Commands::Resolve {
            table,
            function,
            call,
            format,
        } => {
            let catalog = load_catalog(table, &cli)?;
            let explanation = explain(&catalog, function, call)
                .with_context(|| format!("Failed to resolve call to `{}`", function))?;

            match format {
                Format::Text => print!("{}", explanation.render_text(&catalog)),
                Format::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&explanation.to_json(&catalog)?)?
                ),
            }

            if !explanation.is_selected() {
                if *format == Format::Text {
                    explanation.write_diagnostic(&catalog, color, io::stderr())?;
                }
                std::process::exit(1);
            }
        }
        Commands::Check { table, format } => {
            let catalog = load_catalog(table, &cli)?;
            let conflicts = find_conflicts(&catalog)?;

            match format {
                Format::Text => {
                    for conflict in &conflicts {
                        conflict.write_diagnostic(&catalog, color, io::stderr())?;
                    }
                    info!(
                        "Checked {} functions, {} conflicts",
                        catalog.functions().len(),
                        conflicts.len()
                    );
                }
                Format::Json => println!("{}", serde_json::to_string_pretty(&conflicts)?),
            }

            if !conflicts.is_empty() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Read a table file, reporting parse errors against its source.
fn load_catalog(path: &Path, cli: &Cli) -> Result<Catalog> {
    debug!("Loading: {}", path.display());

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read table file: {}", path.display()))?;
    let origin = path.display().to_string();

    let mut catalog = match Catalog::parse(origin.clone(), source.clone()) {
        Ok(catalog) => catalog,
        Err(err) => {
            err.write_diagnostic(&origin, &source, !cli.no_color, io::stderr())?;
            bail!("Failed to load table file: {}", path.display());
        }
    };

    if let Some(lifting) = cli.lifting {
        let rule = LiftingRule::from(lifting);
        if rule != catalog.config.lifting {
            debug!("Overriding lifting rule {} with {}", catalog.config.lifting, rule);
        }
        catalog.config.lifting = rule;
    }

    Ok(catalog)
}
