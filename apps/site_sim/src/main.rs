use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod config;
mod script;

use script::{Pace, Script, Simulation};

/// Headless driver for the showcase site's interaction logic.
#[derive(Parser, Debug)]
#[command(name = "site-sim")]
struct Cli {
    /// TOML configuration; defaults to ./site.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replays a JSON script and prints the final state.
    Run {
        script: PathBuf,
        /// Sleep through waits instead of jumping the virtual clock.
        #[arg(long)]
        realtime: bool,
        /// Also print every surface mutation as a JSON line.
        #[arg(long)]
        journal: bool,
    },
    /// Prints the configured product catalog.
    Catalog,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = config::load_settings(cli.config.as_deref())?;

    match cli.command {
        Command::Run {
            script,
            realtime,
            journal,
        } => {
            let raw = fs::read_to_string(&script)
                .with_context(|| format!("reading {}", script.display()))?;
            let script = Script::from_json(&raw)?;
            let pace = if realtime { Pace::Realtime } else { Pace::Virtual };

            let mut sim = Simulation::mount(&script, settings)?;
            sim.run(&script.steps, pace).await;

            if journal {
                for entry in sim.journal() {
                    println!("{}", serde_json::to_string(entry)?);
                }
            }
            println!("{}", serde_json::to_string_pretty(&sim.report())?);
        }
        Command::Catalog => {
            for (index, product) in settings.products.iter().enumerate() {
                println!(
                    "{}: {} [{}] {}",
                    index + 1,
                    product.title,
                    product.image,
                    product.description
                );
            }
        }
    }

    Ok(())
}
