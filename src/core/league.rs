use crate::core::etl::EtlEngine;
use crate::core::import::CsvImportPipeline;
use crate::core::LeagueRepository;
use crate::domain::model::{Game, GameId, ImportReport, NewGame, Standing, Team};
use crate::domain::ranking::RankingStrategy;
use crate::utils::error::{FieldErrors, LeagueError, Result};
use crate::utils::validation::{check_score, check_team_name, REQUIRED};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub const SELF_PLAY: &str = "A team cannot play against itself.";

/// Team reference inside a game payload. Only the name is used; teams are
/// looked up or created by name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamPayload {
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of game create and update requests. Everything is optional and scores
/// stay untyped so that missing or mistyped fields surface as per-field
/// validation errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GamePayload {
    #[serde(default)]
    pub home_team: Option<TeamPayload>,
    #[serde(default)]
    pub home_team_score: Option<Value>,
    #[serde(default)]
    pub away_team: Option<TeamPayload>,
    #[serde(default)]
    pub away_team_score: Option<Value>,
}

impl GamePayload {
    /// Validates a payload for creating a game.
    pub fn into_new_game(self) -> Result<NewGame> {
        let mut errors = FieldErrors::new();

        let home_team_name = team_name(&mut errors, "home_team", self.home_team.as_ref());
        let home_team_score = check_score(&mut errors, "home_team_score", self.home_team_score.as_ref());
        let away_team_name = team_name(&mut errors, "away_team", self.away_team.as_ref());
        let away_team_score = check_score(&mut errors, "away_team_score", self.away_team_score.as_ref());

        if let (Some(home), Some(away)) = (&home_team_name, &away_team_name) {
            if home == away {
                errors.add("non_field_errors", SELF_PLAY);
            }
        }

        let new_game = match (home_team_name, home_team_score, away_team_name, away_team_score) {
            (Some(home_team_name), Some(home_team_score), Some(away_team_name), Some(away_team_score)) => {
                Some(NewGame {
                    home_team_name,
                    home_team_score,
                    away_team_name,
                    away_team_score,
                })
            }
            _ => None,
        };
        errors.into_result(new_game)
    }

    /// Validates the score fields of an update. A full update needs both
    /// scores; a partial one keeps the current value for a missing score.
    /// Team fields are ignored: teams of an existing game cannot change.
    pub fn into_scores(self, current: &Game, partial: bool) -> Result<(u32, u32)> {
        let mut errors = FieldErrors::new();

        let home = match (self.home_team_score, partial) {
            (None, true) => Some(current.home_team_score),
            (value, _) => check_score(&mut errors, "home_team_score", value.as_ref()),
        };
        let away = match (self.away_team_score, partial) {
            (None, true) => Some(current.away_team_score),
            (value, _) => check_score(&mut errors, "away_team_score", value.as_ref()),
        };

        errors.into_result(home.zip(away))
    }
}

fn team_name(errors: &mut FieldErrors, field: &str, team: Option<&TeamPayload>) -> Option<String> {
    match team {
        Some(team) => check_team_name(errors, field, team.name.as_deref()),
        None => {
            errors.add(field, REQUIRED);
            None
        }
    }
}

/// Use cases of the league, independent of transport.
#[derive(Clone)]
pub struct LeagueService {
    repository: Arc<dyn LeagueRepository>,
}

impl std::fmt::Debug for LeagueService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeagueService").finish_non_exhaustive()
    }
}

impl LeagueService {
    pub fn new(repository: Arc<dyn LeagueRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_teams(&self) -> Result<Vec<Team>> {
        self.repository.list_teams().await
    }

    /// Returns the team and whether it was created by this call.
    pub async fn create_team(&self, payload: TeamPayload) -> Result<(Team, bool)> {
        let mut errors = FieldErrors::new();
        let name = check_team_name(&mut errors, "name", payload.name.as_deref());
        let name = errors.into_result(name)?;

        let (team, created) = self.repository.get_or_create_team(&name).await?;
        if created {
            tracing::info!("Created team {} ({})", team.id, team.name);
        }
        Ok((team, created))
    }

    pub async fn list_games(&self) -> Result<Vec<Game>> {
        self.repository.list_games().await
    }

    pub async fn get_game(&self, id: GameId) -> Result<Game> {
        self.repository
            .get_game(id)
            .await?
            .ok_or(LeagueError::NotFound { resource: "Game", id })
    }

    pub async fn create_game(&self, payload: GamePayload) -> Result<Game> {
        let new_game = payload.into_new_game()?;
        let game = self.repository.create_game(new_game).await?;
        tracing::info!("Recorded game {} ({})", game.id, game);
        Ok(game)
    }

    pub async fn update_game(&self, id: GameId, payload: GamePayload, partial: bool) -> Result<Game> {
        let current = self.get_game(id).await?;
        let (home_team_score, away_team_score) = payload.into_scores(&current, partial)?;

        self.repository
            .update_game_scores(id, home_team_score, away_team_score)
            .await?
            .ok_or(LeagueError::NotFound { resource: "Game", id })
    }

    pub async fn delete_game(&self, id: GameId) -> Result<()> {
        if self.repository.delete_game(id).await? {
            tracing::info!("Deleted game {}", id);
            Ok(())
        } else {
            Err(LeagueError::NotFound { resource: "Game", id })
        }
    }

    pub async fn standings(&self, strategy: RankingStrategy) -> Result<Vec<Standing>> {
        let teams = self.repository.list_teams().await?;
        let games = self.repository.list_games().await?;
        Ok(strategy.calculate_rankings(&teams, &games))
    }

    pub async fn import_csv(&self, data: impl Into<Vec<u8>>) -> Result<ImportReport> {
        let pipeline = CsvImportPipeline::new(data, self.repository.clone());
        let report = EtlEngine::new(pipeline).run().await?;
        tracing::info!(
            "Imported {} games, created {} teams",
            report.games_imported,
            report.teams_created
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryRepository;
    use crate::utils::validation::{BLANK, INVALID_INTEGER, NEGATIVE};
    use serde_json::json;

    fn service() -> LeagueService {
        LeagueService::new(Arc::new(MemoryRepository::new()))
    }

    fn payload(value: serde_json::Value) -> GamePayload {
        serde_json::from_value(value).unwrap()
    }

    fn field_errors(err: LeagueError) -> FieldErrors {
        match err {
            LeagueError::ValidationError { errors } => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_game_creates_teams() {
        let service = service();
        let game = service
            .create_game(payload(json!({
                "home_team": {"name": "Barcelona"},
                "home_team_score": 2,
                "away_team": {"name": "Real Madrid"},
                "away_team_score": 1
            })))
            .await
            .unwrap();

        assert_eq!(game.home_team.name, "Barcelona");
        assert_eq!(service.list_teams().await.unwrap().len(), 2);
    }

    #[test]
    fn test_missing_fields_reported_per_field() {
        let errors = field_errors(payload(json!({})).into_new_game().unwrap_err());
        for field in ["home_team", "home_team_score", "away_team", "away_team_score"] {
            assert_eq!(errors.get(field), Some(&[REQUIRED.to_string()][..]), "{field}");
        }
    }

    #[test]
    fn test_negative_score_and_blank_name() {
        let errors = field_errors(
            payload(json!({
                "home_team": {"name": " "},
                "home_team_score": -1,
                "away_team": {"name": "Real Madrid"},
                "away_team_score": 0
            }))
            .into_new_game()
            .unwrap_err(),
        );

        assert_eq!(errors.get("home_team"), Some(&[BLANK.to_string()][..]));
        assert_eq!(errors.get("home_team_score"), Some(&[NEGATIVE.to_string()][..]));
        assert!(errors.get("away_team").is_none());
    }

    #[test]
    fn test_mistyped_scores_reported_per_field() {
        let errors = field_errors(
            payload(json!({
                "home_team": {"name": "Barcelona"},
                "home_team_score": "two",
                "away_team": {"name": "Real Madrid"},
                "away_team_score": 1.5
            }))
            .into_new_game()
            .unwrap_err(),
        );

        assert_eq!(errors.get("home_team_score"), Some(&[INVALID_INTEGER.to_string()][..]));
        assert_eq!(errors.get("away_team_score"), Some(&[INVALID_INTEGER.to_string()][..]));
    }

    #[test]
    fn test_self_play_rejected() {
        let errors = field_errors(
            payload(json!({
                "home_team": {"name": "Barcelona"},
                "home_team_score": 1,
                "away_team": {"name": "Barcelona"},
                "away_team_score": 0
            }))
            .into_new_game()
            .unwrap_err(),
        );
        assert_eq!(errors.get("non_field_errors"), Some(&[SELF_PLAY.to_string()][..]));
    }

    #[tokio::test]
    async fn test_partial_and_full_update() {
        let service = service();
        let game = service
            .create_game(payload(json!({
                "home_team": {"name": "Barcelona"},
                "home_team_score": 2,
                "away_team": {"name": "Real Madrid"},
                "away_team_score": 1
            })))
            .await
            .unwrap();

        let patched = service
            .update_game(game.id, payload(json!({"away_team_score": 5})), true)
            .await
            .unwrap();
        assert_eq!((patched.home_team_score, patched.away_team_score), (2, 5));

        let err = service
            .update_game(game.id, payload(json!({"away_team_score": 5})), false)
            .await
            .unwrap_err();
        assert_eq!(field_errors(err).get("home_team_score"), Some(&[REQUIRED.to_string()][..]));

        // Team changes are ignored on update.
        let put = service
            .update_game(
                game.id,
                payload(json!({
                    "home_team": {"name": "Valencia"},
                    "home_team_score": 0,
                    "away_team_score": 0
                })),
                false,
            )
            .await
            .unwrap();
        assert_eq!(put.home_team.name, "Barcelona");
        assert!(put.is_draw());
    }

    #[tokio::test]
    async fn test_missing_game_is_not_found() {
        let service = service();
        assert!(matches!(
            service.get_game(42).await,
            Err(LeagueError::NotFound { id: 42, .. })
        ));
        assert!(matches!(
            service.delete_game(42).await,
            Err(LeagueError::NotFound { .. })
        ));
        assert!(matches!(
            service.update_game(42, GamePayload::default(), true).await,
            Err(LeagueError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_team_is_idempotent() {
        let service = service();
        let name = |n: &str| TeamPayload {
            name: Some(n.to_string()),
        };

        let (team, created) = service.create_team(name("Sevilla")).await.unwrap();
        assert!(created);
        let (again, created) = service.create_team(name("Sevilla")).await.unwrap();
        assert!(!created);
        assert_eq!(team, again);

        assert!(service.create_team(TeamPayload::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_standings_from_import() {
        let service = service();
        service
            .import_csv("Barcelona,2,Real Madrid,1\nReal Madrid,3,Barcelona,2\n")
            .await
            .unwrap();
        service
            .create_team(TeamPayload {
                    name: Some("Athletic".to_string()),
            })
            .await
            .unwrap();

        let standings = service.standings(RankingStrategy::Alternate).await.unwrap();
        let table: Vec<(&str, u32)> = standings
            .iter()
            .map(|s| (s.team.name.as_str(), s.points))
            .collect();
        assert_eq!(table, vec![("Barcelona", 2), ("Real Madrid", 2), ("Athletic", 0)]);
    }
}
