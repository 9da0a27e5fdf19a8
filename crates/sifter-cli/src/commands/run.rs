//! Run command - enrich a contact list in the foreground.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use log::{error, warn};
use sifter::extract::DEFAULT_DEBUG_DUMP;
use sifter::{
    CancelToken, HttpFetcher, InputFormat, ProviderOrder, RowWindow, SifterConfig, run_batch,
};

use crate::cli::RunArgs;
use crate::console::ConsoleSink;

pub fn run(args: RunArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Validate input file exists
    if !args.input_file.exists() {
        return Err(format!("Input file '{}' not found", args.input_file.display()).into());
    }

    // Unsupported containers end the run without output
    if let Err(e) = InputFormat::from_path(&args.input_file) {
        error!("{}", e);
        return Ok(());
    }

    let settings = match &args.config {
        Some(path) => SifterConfig::load(path)?,
        None => SifterConfig::default(),
    };

    let primary = args.engine.id();
    let window = RowWindow::new(args.start_index, args.end_index);
    let mut config = settings.run_config(
        args.input_file.clone(),
        args.output_file.clone(),
        args.schema,
        window,
        primary,
    )?;

    if let Some(list) = &args.providers {
        let listed = ProviderOrder::parse_list(list);
        config.order = ProviderOrder::new(listed.iter().map(str::to_string), Some(primary));
    }
    if let Err(e) = config.order.validate(&config.registry) {
        warn!("{} (unknown providers will be skipped)", e);
    }

    if let Some(path) = args.debug_html {
        config.debug_dump = Some(path.unwrap_or_else(|| PathBuf::from(DEFAULT_DEBUG_DUMP)));
    }
    if args.include_provider {
        config.include_provider = true;
    }
    if let Some(ms) = args.provider_delay_ms {
        config.provider_delay = Duration::from_millis(ms);
    }

    println!(
        "{} {} {}",
        "Enriching".cyan().bold(),
        config.input.display().to_string().white(),
        format!(
            "(rows {}..{})",
            window.start,
            window.end.map_or("end".to_string(), |e| e.to_string())
        )
        .dimmed()
    );
    if verbose {
        println!("  Schema: {}", config.schema);
        println!("  Query: {}", config.query_template());
        if let Some(dump) = &config.debug_dump {
            println!("  Debug dump: {}", dump.display());
        }
    }

    // Ctrl+C stops after the record in flight
    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        if !handler_token.is_cancelled() {
            eprintln!("{}", "Stopping after the current record...".yellow());
        }
        handler_token.cancel();
    })?;

    let fetcher = Arc::new(HttpFetcher::new()?);
    let mut sink = ConsoleSink::new(verbose);
    run_batch(&config, fetcher, &mut sink, &cancel)?;

    Ok(())
}
