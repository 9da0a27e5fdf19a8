//! Serve command - local web UI for interactive runs.

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use sifter::{HttpFetcher, SifterConfig};

use crate::server::{app, state::AppState};

pub fn run(
    port: u16,
    no_open: bool,
    config: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = match &config {
        Some(path) => SifterConfig::load(path)?,
        None => SifterConfig::default(),
    };
    // Fail early on bad timeout overrides rather than on the first run
    settings.registry()?;

    let fetcher = Arc::new(HttpFetcher::new()?);
    let state = AppState::new(settings, fetcher);

    // Print server info
    let url = format!("http://localhost:{}", port);
    println!();
    println!(
        "{} {}",
        "Starting sifter at".cyan().bold(),
        url.white().bold()
    );
    println!();
    if verbose {
        if let Some(path) = &config {
            println!("  Config: {}", path.display());
        }
        println!();
    }
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    // Open browser if requested
    if !no_open {
        if let Err(e) = open::that(&url) {
            eprintln!(
                "{} Could not open browser: {}",
                "Warning:".yellow(),
                e
            );
        }
    }

    // Run the server
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        // Set up Ctrl+C handler
        let state_clone = state.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            println!();
            println!("{}", "Shutting down...".yellow());
            state_clone.cancel_active().await;
            std::process::exit(0);
        });

        if let Err(e) = app::run_server(state, port).await {
            eprintln!("Server error: {}", e);
        }
    });

    Ok(())
}
