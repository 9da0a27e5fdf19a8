//! Sifter CLI - contact email enrichment.

mod cli;
mod commands;
mod console;
mod logger;
mod server;
mod web;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args, cli.verbose),

        Commands::Providers => commands::providers::run(cli.verbose),

        Commands::Serve {
            port,
            no_open,
            config,
        } => commands::serve::run(port, no_open, config, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
