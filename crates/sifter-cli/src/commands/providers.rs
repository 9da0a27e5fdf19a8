//! Providers command - list the search provider catalog.

use colored::Colorize;
use sifter::provider::{DEFAULT_FALLBACK_ORDER, DEFAULT_PRIMARY};
use sifter::ProviderRegistry;

pub fn run(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let registry = ProviderRegistry::builtin();

    println!("{}", "Search providers:".yellow().bold());
    println!();
    for spec in registry.iter() {
        let marker = if spec.id == DEFAULT_PRIMARY {
            "primary".green().to_string()
        } else if let Some(pos) = DEFAULT_FALLBACK_ORDER.iter().position(|id| *id == spec.id) {
            format!("fallback #{}", pos + 1).cyan().to_string()
        } else {
            String::new()
        };

        println!(
            "  {} {:12} {:>4}s  {:32} {}",
            format!("{:12}", spec.id).white().bold(),
            spec.label,
            spec.timeout.as_secs(),
            spec.rule.container,
            marker
        );
        if verbose {
            println!("  {:12} {}", "", spec.endpoint.dimmed());
        }
    }

    println!();
    println!(
        "Default order: {}",
        std::iter::once(DEFAULT_PRIMARY)
            .chain(DEFAULT_FALLBACK_ORDER.iter().copied())
            .collect::<Vec<_>>()
            .join(" → ")
    );

    Ok(())
}
