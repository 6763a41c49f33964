pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::fetcher::parallel::DEFAULT_WORKERS;

#[derive(Parser)]
#[command(name = "briefing")]
#[command(about = "RSS/Atom and iCal briefing dashboard", long_about = None)]
pub struct Cli {
    /// Path to the config file (default: ~/.config/briefing/feeds.json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of parallel workers for fetching sources
    #[arg(short, long, default_value_t = DEFAULT_WORKERS, global = true)]
    pub workers: usize,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the HTTP API and dashboard
    Serve {
        /// Port to listen on (default: settings.port from the config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory of static files served outside /api
        #[arg(long, default_value = "public")]
        public: PathBuf,
    },
    /// Print aggregated articles
    Feeds {
        /// Print the API response body instead of a listing
        #[arg(long)]
        json: bool,
    },
    /// Print today's calendar events
    Calendar {
        /// Print the API response body instead of a listing
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["briefing", "serve"]).unwrap();

        assert_eq!(cli.workers, DEFAULT_WORKERS);
        assert!(cli.config.is_none());
        match cli.command {
            Commands::Serve { port, public } => {
                assert!(port.is_none());
                assert_eq!(public, PathBuf::from("public"));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "briefing",
            "feeds",
            "--json",
            "--config",
            "/tmp/feeds.json",
            "-w",
            "4",
        ])
        .unwrap();

        assert_eq!(cli.workers, 4);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/feeds.json")));
        assert!(matches!(cli.command, Commands::Feeds { json: true }));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["briefing"]).is_err());
    }
}
