use crate::domain::model::{Game, GameId, ImportReport, NewGame, Team};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Persistence seam for teams and games.
#[async_trait]
pub trait LeagueRepository: Send + Sync {
    /// All teams ordered by name.
    async fn list_teams(&self) -> Result<Vec<Team>>;

    /// Looks a team up by name, creating it when absent. The flag tells
    /// whether the team was created by this call.
    async fn get_or_create_team(&self, name: &str) -> Result<(Team, bool)>;

    /// All games ordered by id.
    async fn list_games(&self) -> Result<Vec<Game>>;

    async fn get_game(&self, id: GameId) -> Result<Option<Game>>;

    async fn create_game(&self, game: NewGame) -> Result<Game>;

    /// Returns `None` when no game has the given id.
    async fn update_game_scores(
        &self,
        id: GameId,
        home_team_score: u32,
        away_team_score: u32,
    ) -> Result<Option<Game>>;

    /// Returns `false` when no game has the given id.
    async fn delete_game(&self, id: GameId) -> Result<bool>;

    /// Persists the whole batch or nothing.
    async fn import_games(&self, games: Vec<NewGame>) -> Result<ImportReport>;
}

/// Three-phase batch job driven by [`crate::core::etl::EtlEngine`].
#[async_trait]
pub trait Pipeline: Send + Sync {
    type Record: Send;
    type Output: Send;

    async fn extract(&self) -> Result<Vec<Self::Record>>;
    async fn transform(&self, records: Vec<Self::Record>) -> Result<Vec<NewGame>>;
    async fn load(&self, games: Vec<NewGame>) -> Result<Self::Output>;
}

/// Runtime settings the server and CLI need, independent of where they come from.
pub trait ConfigProvider: Send + Sync {
    fn bind_address(&self) -> String;
    fn database_url(&self) -> &str;
    fn max_connections(&self) -> u32;
}
