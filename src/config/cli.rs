use crate::config::LeagueConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "league")]
#[command(about = "Record match results and compute league standings")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,

        #[arg(long)]
        database_url: Option<String>,
    },

    /// Import games from a CSV file in one batch
    Import {
        file: PathBuf,

        #[arg(long)]
        database_url: Option<String>,
    },

    /// Print the league table
    Standings {
        #[arg(long, default_value = "basic")]
        ranking_strategy: String,

        #[arg(long)]
        database_url: Option<String>,
    },
}

impl CliConfig {
    /// Loads the configuration file (or defaults) and applies command-line
    /// overrides on top of it.
    pub fn resolve(&self) -> Result<LeagueConfig> {
        let mut config = match &self.config {
            Some(path) => LeagueConfig::from_file(path)?,
            None => LeagueConfig::default(),
        };

        if self.json_logs {
            config.logging.json = true;
        }

        match &self.command {
            Command::Serve {
                host,
                port,
                database_url,
            } => {
                if let Some(host) = host {
                    config.server.host = host.clone();
                }
                if let Some(port) = port {
                    config.server.port = *port;
                }
                if let Some(url) = database_url {
                    config.database.url = url.clone();
                }
            }
            Command::Import { database_url, .. } | Command::Standings { database_url, .. } => {
                if let Some(url) = database_url {
                    config.database.url = url.clone();
                }
            }
        }

        Ok(config)
    }
}
