pub mod etl;
pub mod import;
pub mod league;

pub use crate::domain::model::{Game, ImportReport, NewGame, Standing, Team};
pub use crate::domain::ports::{ConfigProvider, LeagueRepository, Pipeline};
pub use crate::utils::error::Result;
