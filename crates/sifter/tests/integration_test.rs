//! End-to-end tests for batch runs.
//!
//! Runs use `ScriptedFetcher`, so nothing here touches the network.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use sifter::{
    AttemptOutcome, CancelToken, CollectingSink, EnrichmentTask, FetchOutcome, InputSchema,
    ProgressEvent, ProviderOrder, RowWindow, RunConfig, ScriptedFetcher, SifterError, run_batch,
};

const CONTACTS_CSV: &str = "First Name,Last Name,Phone\n\
                            Jane,Doe,555-0100\n\
                            John,Roe,555-0101\n\
                            ,Nobody,555-0102\n\
                            Mary,Major,555-0103\n\
                            Paul,Minor,555-0104\n";

const YAHOO_HIT: &str = r#"<html><body>
    <div class="Sr"><a href="https://realty.example/jane">Jane Doe</a>
    <p>Reach Jane at jane@realty.example.com</p></div>
</body></html>"#;

fn write_input(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write input");
    path
}

fn config(input: &Path, output: &Path, order: &[&str]) -> RunConfig {
    let mut config = RunConfig::new(input, output);
    config.order = ProviderOrder::new(order.iter().copied(), None);
    config
}

fn output_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("Failed to read output")
        .lines()
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Fallback
// =============================================================================

#[test]
fn test_first_provider_with_email_wins() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "contacts.csv", "h,h,h\nJane,Doe,555-0100\n");
    let output = dir.path().join("out.csv");

    let fetcher = Arc::new(
        ScriptedFetcher::new()
            .with_outcome("bing", FetchOutcome::ChallengeDetected)
            .with_body("yahoo", YAHOO_HIT)
            .with_body("ask", "<p>late@other.com</p>"),
    );
    let mut cfg = config(&input, &output, &["bing", "yahoo", "ask"]);
    cfg.include_provider = true;

    let mut sink = CollectingSink::new();
    let summary = run_batch(&cfg, fetcher.clone(), &mut sink, &CancelToken::new()).unwrap();

    assert_eq!(summary.records_processed, 1);
    assert_eq!(summary.emails_found, 1);
    assert_eq!(fetcher.called_providers(), vec!["bing", "yahoo"]);
    assert_eq!(
        output_lines(&output),
        vec![
            "First Name,Last Name,Phone,Full Name,Email,Source Link,Provider",
            "Jane,Doe,555-0100,Jane Doe,jane@realty.example.com,https://realty.example/jane,yahoo",
        ]
    );
}

#[test]
fn test_primary_is_queried_first() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "contacts.csv", "h,h,h\nJane,Doe,555\n");
    let output = dir.path().join("out.csv");

    let fetcher = Arc::new(ScriptedFetcher::new());
    let mut cfg = RunConfig::new(&input, &output);
    cfg.order = ProviderOrder::with_primary("bing");

    run_batch(&cfg, fetcher.clone(), &mut CollectingSink::new(), &CancelToken::new()).unwrap();

    assert_eq!(
        fetcher.called_providers(),
        vec!["bing", "yahoo", "searx", "startpage", "ask", "yandex"]
    );
}

#[test]
fn test_all_transport_errors_still_complete() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "contacts.csv", CONTACTS_CSV);
    let output = dir.path().join("out.csv");

    let fetcher = Arc::new(ScriptedFetcher::new());
    let cfg = config(&input, &output, &["duckduckgo", "bing"]);

    let mut sink = CollectingSink::new();
    let summary = run_batch(&cfg, fetcher, &mut sink, &CancelToken::new()).unwrap();

    assert_eq!(summary.records_loaded, 4);
    assert_eq!(summary.records_processed, 4);
    assert_eq!(summary.emails_found, 0);
    assert!(!summary.cancelled);

    let lines = output_lines(&output);
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[1], "Jane,Doe,555-0100,Jane Doe,,");
    assert_eq!(lines[4], "Paul,Minor,555-0104,Paul Minor,,");

    let attempts = sink.attempts();
    assert_eq!(attempts.len(), 8);
    assert!(
        attempts
            .iter()
            .all(|a| matches!(a.outcome, AttemptOutcome::TransportError { .. }))
    );
    assert!(matches!(sink.events.last(), Some(ProgressEvent::RunFinished(_))));
}

#[test]
fn test_name_phone_schema() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "contacts.csv",
        "Name,Office,City,State,Phone\nJane Doe,Acme,Austin,TX,555-0100\n",
    );
    let output = dir.path().join("out.csv");

    let fetcher = Arc::new(ScriptedFetcher::new().with_body("yahoo", YAHOO_HIT));
    let mut cfg = config(&input, &output, &["yahoo"]);
    cfg.schema = InputSchema::NamePhone;

    run_batch(&cfg, fetcher.clone(), &mut CollectingSink::new(), &CancelToken::new()).unwrap();

    assert_eq!(fetcher.calls()[0].1, "Realtor Email for: Jane Doe 555-0100");
    assert_eq!(
        output_lines(&output),
        vec![
            "name,number,email,page",
            "Jane Doe,555-0100,jane@realty.example.com,https://realty.example/jane",
        ]
    );
}

// =============================================================================
// Windowing and resume
// =============================================================================

#[test]
fn test_window_limits_processed_rows() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "contacts.csv", CONTACTS_CSV);
    let output = dir.path().join("out.csv");

    let mut cfg = config(&input, &output, &["bing"]);
    cfg.window = RowWindow::new(2, Some(5));

    let summary = run_batch(
        &cfg,
        Arc::new(ScriptedFetcher::new()),
        &mut CollectingSink::new(),
        &CancelToken::new(),
    )
    .unwrap();

    // Rows 2 (John) and 4 (Mary); row 3 has no first name.
    assert_eq!(summary.records_processed, 2);
    let lines = output_lines(&output);
    assert!(lines[1].starts_with("John,"));
    assert!(lines[2].starts_with("Mary,"));
}

#[test]
fn test_resume_appends_without_touching_existing_rows() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "contacts.csv", CONTACTS_CSV);
    let output = dir.path().join("out.csv");

    let mut first = config(&input, &output, &["bing"]);
    first.window = RowWindow::new(1, Some(3));
    run_batch(
        &first,
        Arc::new(ScriptedFetcher::new()),
        &mut CollectingSink::new(),
        &CancelToken::new(),
    )
    .unwrap();
    let before = fs::read(&output).unwrap();

    let mut second = config(&input, &output, &["bing"]);
    second.window = RowWindow::from_start(3);
    run_batch(
        &second,
        Arc::new(ScriptedFetcher::new()),
        &mut CollectingSink::new(),
        &CancelToken::new(),
    )
    .unwrap();
    let after = fs::read(&output).unwrap();

    assert!(after.starts_with(&before));
    let lines = output_lines(&output);
    assert_eq!(lines.iter().filter(|l| l.starts_with("First Name")).count(), 1);
    assert_eq!(lines.len(), 5);
}

// =============================================================================
// Failures and cancellation
// =============================================================================

#[test]
fn test_unsupported_format_creates_no_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "contacts.ods", "irrelevant");
    let output = dir.path().join("out.csv");

    let result = run_batch(
        &config(&input, &output, &["bing"]),
        Arc::new(ScriptedFetcher::new()),
        &mut CollectingSink::new(),
        &CancelToken::new(),
    );

    assert!(matches!(result, Err(SifterError::UnsupportedFormat(_))));
    assert!(!output.exists());
}

#[test]
fn test_background_task_reports_events() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "contacts.csv", CONTACTS_CSV);
    let output = dir.path().join("out.csv");

    let task = EnrichmentTask::spawn(
        config(&input, &output, &["bing"]),
        Arc::new(ScriptedFetcher::new()),
    );
    let events: Vec<ProgressEvent> = task.events().iter().collect();
    let summary = task.join().unwrap();

    assert_eq!(summary.records_processed, 4);
    assert!(matches!(events.first(), Some(ProgressEvent::RunStarted { total: 4, .. })));
    assert!(matches!(events.last(), Some(ProgressEvent::RunFinished(_))));
}
