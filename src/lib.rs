pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{MemoryRepository, SqliteRepository};
pub use config::LeagueConfig;
pub use core::{etl::EtlEngine, import::CsvImportPipeline, league::LeagueService};
pub use domain::model::{Game, ImportReport, NewGame, Outcome, Standing, Team};
pub use domain::ranking::{PointTable, RankingStrategy};
pub use utils::error::{LeagueError, Result};
