//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use sifter::InputSchema;
use std::path::PathBuf;

/// Sifter: find contact emails by querying search providers in turn
#[derive(Parser)]
#[command(name = "sifter")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enrich a contact list with emails
    Run(RunArgs),

    /// List the supported search providers
    Providers,

    /// Open the local web UI for interactive runs
    Serve {
        /// Port for web server
        #[arg(short, long, default_value = "3142")]
        port: u16,

        /// Don't automatically open browser
        #[arg(long)]
        no_open: bool,

        /// JSON settings file applied to every run
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Input file (xlsx, xls or csv)
    #[arg(short, long, default_value = "phone_data.xlsx")]
    pub input_file: PathBuf,

    /// First row to process (0 is the header row)
    #[arg(short, long, default_value = "1")]
    pub start_index: usize,

    /// Row to stop before (default: end of file)
    #[arg(short, long)]
    pub end_index: Option<usize>,

    /// Output CSV, appended to when it exists
    #[arg(short, long, default_value = "phone_email_output.csv")]
    pub output_file: PathBuf,

    /// Primary search provider
    #[arg(long, default_value = "duckduckgo")]
    pub engine: EngineChoice,

    /// Column layout of the input file
    #[arg(long, default_value = "first-last-phone")]
    pub schema: InputSchema,

    /// Comma-separated fallback order (e.g. "bing,yahoo")
    #[arg(long, value_name = "IDS")]
    pub providers: Option<String>,

    /// JSON settings file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Save each fetched page for inspection (default: search_result_debug.html)
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub debug_html: Option<Option<PathBuf>>,

    /// Add a Provider column to the output
    #[arg(long)]
    pub include_provider: bool,

    /// Pause between providers for the same record, in milliseconds
    #[arg(long, value_name = "MS")]
    pub provider_delay_ms: Option<u64>,
}

/// Search provider choice
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EngineChoice {
    #[default]
    DuckDuckGo,
    Bing,
    Google,
    Yahoo,
    Ask,
    Yandex,
    Ecosia,
    Startpage,
    Searx,
}

impl EngineChoice {
    /// Registry id of this provider.
    pub fn id(&self) -> &'static str {
        match self {
            EngineChoice::DuckDuckGo => "duckduckgo",
            EngineChoice::Bing => "bing",
            EngineChoice::Google => "google",
            EngineChoice::Yahoo => "yahoo",
            EngineChoice::Ask => "ask",
            EngineChoice::Yandex => "yandex",
            EngineChoice::Ecosia => "ecosia",
            EngineChoice::Startpage => "startpage",
            EngineChoice::Searx => "searx",
        }
    }
}

impl std::str::FromStr for EngineChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "duckduckgo" | "ddg" => Ok(EngineChoice::DuckDuckGo),
            "bing" => Ok(EngineChoice::Bing),
            "google" => Ok(EngineChoice::Google),
            "yahoo" => Ok(EngineChoice::Yahoo),
            "ask" => Ok(EngineChoice::Ask),
            "yandex" => Ok(EngineChoice::Yandex),
            "ecosia" => Ok(EngineChoice::Ecosia),
            "startpage" => Ok(EngineChoice::Startpage),
            "searx" | "searxng" => Ok(EngineChoice::Searx),
            _ => Err(format!(
                "Unknown engine: {}. Use: duckduckgo, bing, google, yahoo, ask, yandex, ecosia, startpage, or searx.",
                s
            )),
        }
    }
}

impl std::fmt::Display for EngineChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use sifter::ProviderRegistry;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_every_engine_is_registered() {
        let registry = ProviderRegistry::builtin();
        for id in registry.ids() {
            let engine: EngineChoice = id.parse().unwrap();
            assert_eq!(engine.id(), id);
        }
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::parse_from(["sifter", "run"]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.input_file, PathBuf::from("phone_data.xlsx"));
        assert_eq!(args.output_file, PathBuf::from("phone_email_output.csv"));
        assert_eq!(args.start_index, 1);
        assert_eq!(args.end_index, None);
        assert_eq!(args.engine, EngineChoice::DuckDuckGo);
        assert_eq!(args.schema, InputSchema::FirstLastPhone);
        assert!(args.debug_html.is_none());
    }

    #[test]
    fn test_run_flags() {
        let cli = Cli::parse_from([
            "sifter", "run", "-i", "in.csv", "-s", "5", "-e", "9", "--engine", "Bing", "--schema",
            "name-phone", "--debug-html", "-v",
        ]);
        assert!(cli.verbose);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.start_index, 5);
        assert_eq!(args.end_index, Some(9));
        assert_eq!(args.engine, EngineChoice::Bing);
        assert_eq!(args.schema, InputSchema::NamePhone);
        assert_eq!(args.debug_html, Some(None));
    }
}
