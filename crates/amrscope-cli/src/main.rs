//! amrscope CLI - MDR classification and carbapenem association.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match cli.command {
        Commands::Analyze {
            input,
            output,
            confidence,
            json,
        } => commands::analyze::run(input, output, confidence, json, cli.verbose),

        Commands::Classify { input, output } => {
            commands::classify::run(input, output, cli.verbose)
        }

        Commands::Fisher {
            a,
            b,
            c,
            d,
            confidence,
            json,
        } => commands::fisher::run([a, b, c, d], confidence, json),

        Commands::Categories { file, json } => commands::categories::run(file, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
