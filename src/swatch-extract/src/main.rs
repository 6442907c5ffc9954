//! swatch-extract - collect referenced car textures and survey model materials

use anyhow::{bail, Result};
use clap::Parser;
use swatch_extract::{Config, CopyMode, RunSummary};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::{Args, Commands};

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "swatch_extract=debug"
    } else {
        "swatch_extract=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::detect(args.tool_dir.as_deref())?;
    tracing::debug!("{:?}", config);

    let mode = if args.list {
        CopyMode::List
    } else {
        CopyMode::Copy
    };

    let mut summary = RunSummary::new();
    match args.command.unwrap_or(Commands::All) {
        Commands::All => {
            summary.run_textures(&config, mode);
            summary.run_materials(&config);
        }
        Commands::Textures => {
            summary.run_textures(&config, mode);
        }
        Commands::Materials => {
            summary.run_materials(&config);
        }
    }

    eprint!("\n{}", summary);

    let failures = summary.failures().len();
    if failures > 0 {
        bail!("{} pipeline(s) failed", failures);
    }

    Ok(())
}
