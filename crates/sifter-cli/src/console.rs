//! Colored console output for run progress.

use colored::Colorize;
use sifter::{AttemptOutcome, ProgressEvent, ProgressSink};

/// Prints progress events as they arrive.
pub struct ConsoleSink {
    verbose: bool,
}

impl ConsoleSink {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressSink for ConsoleSink {
    fn emit(&mut self, event: ProgressEvent) {
        match &event {
            ProgressEvent::RunStarted { total, providers } => {
                println!(
                    "{} {} records",
                    "Processing".cyan().bold(),
                    total.to_string().white().bold()
                );
                println!("  Providers: {}", providers.join(" → "));
                println!();
            }
            ProgressEvent::RecordStarted { .. } => {
                println!("{}", event.to_string().white().bold());
            }
            ProgressEvent::Attempt(attempt) => {
                let line = event.to_string();
                match &attempt.outcome {
                    AttemptOutcome::Found { .. } => println!("{}", line.green()),
                    AttemptOutcome::NoEmail => {
                        if self.verbose {
                            println!("{}", line.dimmed());
                        }
                    }
                    _ => println!("{}", line.yellow()),
                }
            }
            ProgressEvent::RecordFinished { email, .. } => {
                if email.is_empty() {
                    println!("{}", event.to_string().dimmed());
                }
            }
            ProgressEvent::Message { text } => println!("{}", text),
            ProgressEvent::RunFinished(summary) => {
                println!();
                let headline = if summary.cancelled {
                    "Cancelled".yellow().bold()
                } else {
                    "Done".green().bold()
                };
                println!(
                    "{} {} of {} records processed, {} emails found",
                    headline,
                    summary.records_processed.to_string().white().bold(),
                    summary.records_loaded,
                    summary.emails_found.to_string().green()
                );
                println!(
                    "{} {}",
                    "Saved to".green().bold(),
                    summary.output.display().to_string().white()
                );
            }
        }
    }
}
