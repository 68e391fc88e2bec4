use crate::domain::model::{Game, GameId, ImportReport, NewGame, Team, TeamId};
use crate::domain::ports::LeagueRepository;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Tables {
    teams: Vec<Team>,
    games: Vec<StoredGame>,
    next_team_id: TeamId,
    next_game_id: GameId,
}

#[derive(Debug, Clone)]
struct StoredGame {
    id: GameId,
    home_team_id: TeamId,
    home_team_score: u32,
    away_team_id: TeamId,
    away_team_score: u32,
}

impl Tables {
    fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|team| team.id == id)
    }

    fn get_or_create_team(&mut self, name: &str) -> (Team, bool) {
        if let Some(team) = self.teams.iter().find(|team| team.name == name) {
            return (team.clone(), false);
        }

        self.next_team_id += 1;
        let team = Team::new(self.next_team_id, name);
        self.teams.push(team.clone());
        (team, true)
    }

    fn insert_game(&mut self, game: NewGame) -> (Game, usize) {
        let (home_team, home_created) = self.get_or_create_team(&game.home_team_name);
        let (away_team, away_created) = self.get_or_create_team(&game.away_team_name);

        self.next_game_id += 1;
        self.games.push(StoredGame {
            id: self.next_game_id,
            home_team_id: home_team.id,
            home_team_score: game.home_team_score,
            away_team_id: away_team.id,
            away_team_score: game.away_team_score,
        });

        let created = usize::from(home_created) + usize::from(away_created);
        let game = Game {
            id: self.next_game_id,
            home_team,
            home_team_score: game.home_team_score,
            away_team,
            away_team_score: game.away_team_score,
        };
        (game, created)
    }

    fn resolve(&self, stored: &StoredGame) -> Option<Game> {
        Some(Game {
            id: stored.id,
            home_team: self.team(stored.home_team_id)?.clone(),
            home_team_score: stored.home_team_score,
            away_team: self.team(stored.away_team_id)?.clone(),
            away_team_score: stored.away_team_score,
        })
    }
}

/// Repository kept entirely in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeagueRepository for MemoryRepository {
    async fn list_teams(&self) -> Result<Vec<Team>> {
        let tables = self.tables.lock().await;
        let mut teams = tables.teams.clone();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(teams)
    }

    async fn get_or_create_team(&self, name: &str) -> Result<(Team, bool)> {
        let mut tables = self.tables.lock().await;
        Ok(tables.get_or_create_team(name))
    }

    async fn list_games(&self) -> Result<Vec<Game>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .games
            .iter()
            .filter_map(|stored| tables.resolve(stored))
            .collect())
    }

    async fn get_game(&self, id: GameId) -> Result<Option<Game>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .games
            .iter()
            .find(|stored| stored.id == id)
            .and_then(|stored| tables.resolve(stored)))
    }

    async fn create_game(&self, game: NewGame) -> Result<Game> {
        let mut tables = self.tables.lock().await;
        let (game, _) = tables.insert_game(game);
        Ok(game)
    }

    async fn update_game_scores(
        &self,
        id: GameId,
        home_team_score: u32,
        away_team_score: u32,
    ) -> Result<Option<Game>> {
        let mut tables = self.tables.lock().await;
        let Some(stored) = tables.games.iter_mut().find(|stored| stored.id == id) else {
            return Ok(None);
        };

        stored.home_team_score = home_team_score;
        stored.away_team_score = away_team_score;
        let stored = stored.clone();
        Ok(tables.resolve(&stored))
    }

    async fn delete_game(&self, id: GameId) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.games.len();
        tables.games.retain(|stored| stored.id != id);
        Ok(tables.games.len() != before)
    }

    async fn import_games(&self, games: Vec<NewGame>) -> Result<ImportReport> {
        // Holding the lock for the whole batch makes it all-or-nothing for readers.
        let mut tables = self.tables.lock().await;
        let mut report = ImportReport::default();

        for game in games {
            let (_, created) = tables.insert_game(game);
            report.games_imported += 1;
            report.teams_created += created;
        }

        Ok(report)
    }
}
