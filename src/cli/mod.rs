//! CLI definitions for `newsbrief`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_dotenv, BriefConfig};
use crate::error::Result;

/// URLs briefed when none are given on the command line.
pub const DEFAULT_URLS: [&str; 2] = [
    "https://codenow.wiki",
    "https://www.producthunt.com/products/instruct-2",
];

/// newsbrief CLI
#[derive(Parser, Debug)]
#[command(name = "newsbrief", version, about = "Drive a news briefing session")]
pub struct Cli {
    /// TOML config file layered under env vars and flags
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging and delta throttling diagnostics
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Resolve the effective config: file, then `.env` files and process env, then flags.
    pub fn load_config(&self) -> Result<BriefConfig> {
        load_dotenv();
        self.resolve_config(|key| std::env::var(key).ok())
    }

    /// Same layering as [`Cli::load_config`] with an explicit variable lookup.
    pub fn resolve_config(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<BriefConfig> {
        let base = match &self.config {
            Some(path) => BriefConfig::from_toml_file(path)?,
            None => BriefConfig::default(),
        };
        let mut config = base.apply_vars(lookup)?;
        if self.debug {
            config.debug = true;
        }
        if let Commands::Run(RunArgs {
            target_dir: Some(dir),
            ..
        }) = &self.command
        {
            config.target_dir = Some(dir.clone());
        }
        Ok(config)
    }
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a briefing session
    Run(RunArgs),
    /// Fetch one page through the reader tool and print the result
    Fetch(FetchArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// NDJSON transcript of session events to replay
    #[arg(short, long)]
    pub transcript: PathBuf,

    /// Working directory handed to the runtime
    #[arg(long)]
    pub target_dir: Option<PathBuf>,

    /// URLs to brief (positional)
    pub urls: Vec<String>,
}

impl RunArgs {
    /// The given URLs, or [`DEFAULT_URLS`] when none were passed.
    pub fn urls_or_default(&self) -> Vec<String> {
        if self.urls.is_empty() {
            DEFAULT_URLS.iter().map(|url| url.to_string()).collect()
        } else {
            self.urls.clone()
        }
    }
}

/// Log the briefing sources, numbered from 1 like the prompt lists them.
pub fn log_sources(urls: &[String]) {
    for (i, url) in urls.iter().enumerate() {
        tracing::info!(n = i + 1, url = %url, "briefing source");
    }
}

/// Arguments for the `fetch` subcommand.
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Page to fetch
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_run_with_defaults() {
        let cli = Cli::try_parse_from(["newsbrief", "run", "--transcript", "s.ndjson"]).unwrap();
        assert!(!cli.debug);
        assert!(cli.config.is_none());
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.transcript, PathBuf::from("s.ndjson"));
                assert!(args.target_dir.is_none());
                assert_eq!(args.urls_or_default(), DEFAULT_URLS);
            }
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn parse_run_with_urls_and_flags() {
        let cli = Cli::try_parse_from([
            "newsbrief",
            "run",
            "-t",
            "s.ndjson",
            "--debug",
            "--target-dir",
            "/tmp/out",
            "https://a.test",
            "https://b.test",
        ])
        .unwrap();
        assert!(cli.debug);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.target_dir, Some(PathBuf::from("/tmp/out")));
                assert_eq!(args.urls_or_default(), ["https://a.test", "https://b.test"]);
            }
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn parse_fetch() {
        let cli = Cli::try_parse_from(["newsbrief", "fetch", "https://a.test"]).unwrap();
        match cli.command {
            Commands::Fetch(args) => assert_eq!(args.url, "https://a.test"),
            other => panic!("expected Fetch, got {other:?}"),
        }
    }

    #[test]
    fn debug_flag_raises_log_filter() {
        let cli = Cli::try_parse_from(["newsbrief", "-d", "run", "-t", "s.ndjson"]).unwrap();
        let config = cli.resolve_config(|_| None).unwrap();
        assert!(config.debug);
        assert_eq!(config.log_filter(), "debug");
    }

    #[test]
    fn target_dir_flag_beats_env() {
        let cli = Cli::try_parse_from([
            "newsbrief",
            "run",
            "-t",
            "s.ndjson",
            "--target-dir",
            "/tmp/flag",
        ])
        .unwrap();
        let config = cli
            .resolve_config(|key| (key == "TARGET_DIR").then(|| "/tmp/env".to_string()))
            .unwrap();
        assert_eq!(config.target_dir, Some(PathBuf::from("/tmp/flag")));
    }

    #[test]
    fn run_requires_transcript() {
        assert!(Cli::try_parse_from(["newsbrief", "run"]).is_err());
    }
}
