//! CSV game import.
//!
//! Rows have four columns and no header:
//! `home_team_name, home_team_score, away_team_name, away_team_score`.
//! Every row is parsed and validated before anything is written, and the
//! write itself is a single batch, so a bad row leaves the store untouched.

use crate::core::{LeagueRepository, Pipeline};
use crate::domain::model::{ImportReport, NewGame};
use crate::utils::error::{LeagueError, Result};
use async_trait::async_trait;
use std::sync::Arc;

const COLUMNS: usize = 4;

/// One raw CSV row, fields trimmed but not interpreted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    /// 1-based line number in the uploaded file.
    pub row: usize,
    pub home_team_name: String,
    pub home_team_score: String,
    pub away_team_name: String,
    pub away_team_score: String,
}

pub struct CsvImportPipeline {
    data: Vec<u8>,
    repository: Arc<dyn LeagueRepository>,
}

impl CsvImportPipeline {
    pub fn new(data: impl Into<Vec<u8>>, repository: Arc<dyn LeagueRepository>) -> Self {
        Self {
            data: data.into(),
            repository,
        }
    }
}

fn parse_score(row: usize, field: &str, value: &str) -> Result<u32> {
    value.parse::<u32>().map_err(|_| LeagueError::ImportError {
        row,
        message: format!("{} '{}' is not a non-negative integer", field, value),
    })
}

fn require_name(row: usize, field: &str, value: String) -> Result<String> {
    if value.is_empty() {
        return Err(LeagueError::ImportError {
            row,
            message: format!("{} is empty", field),
        });
    }
    Ok(value)
}

impl TryFrom<GameRecord> for NewGame {
    type Error = LeagueError;

    fn try_from(record: GameRecord) -> Result<Self> {
        let row = record.row;
        let game = NewGame {
            home_team_score: parse_score(row, "home_team_score", &record.home_team_score)?,
            away_team_score: parse_score(row, "away_team_score", &record.away_team_score)?,
            home_team_name: require_name(row, "home_team_name", record.home_team_name)?,
            away_team_name: require_name(row, "away_team_name", record.away_team_name)?,
        };

        if game.home_team_name == game.away_team_name {
            return Err(LeagueError::ImportError {
                row,
                message: format!("'{}' cannot play against itself", game.home_team_name),
            });
        }

        Ok(game)
    }
}

#[async_trait]
impl Pipeline for CsvImportPipeline {
    type Record = GameRecord;
    type Output = ImportReport;

    async fn extract(&self) -> Result<Vec<GameRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(self.data.as_slice());

        let mut records = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result?;
            let row = record
                .position()
                .map(|position| position.line() as usize)
                .unwrap_or(index + 1);

            if record.iter().all(str::is_empty) {
                continue;
            }

            if record.len() != COLUMNS {
                return Err(LeagueError::ImportError {
                    row,
                    message: format!("expected {} columns, found {}", COLUMNS, record.len()),
                });
            }

            records.push(GameRecord {
                row,
                home_team_name: record[0].to_string(),
                home_team_score: record[1].to_string(),
                away_team_name: record[2].to_string(),
                away_team_score: record[3].to_string(),
            });
        }

        tracing::debug!("Parsed {} CSV rows", records.len());
        Ok(records)
    }

    async fn transform(&self, records: Vec<GameRecord>) -> Result<Vec<NewGame>> {
        records.into_iter().map(NewGame::try_from).collect()
    }

    async fn load(&self, games: Vec<NewGame>) -> Result<ImportReport> {
        if games.is_empty() {
            tracing::warn!("CSV contained no games, nothing to import");
            return Ok(ImportReport::default());
        }

        self.repository.import_games(games).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryRepository;
    use crate::core::etl::EtlEngine;

    fn pipeline(csv: &str) -> (CsvImportPipeline, Arc<MemoryRepository>) {
        let repository = Arc::new(MemoryRepository::new());
        (
            CsvImportPipeline::new(csv.as_bytes(), repository.clone()),
            repository,
        )
    }

    #[tokio::test]
    async fn test_extract_trims_fields_and_skips_blank_lines() {
        let (pipeline, _) =
            pipeline("Team A, 2 ,Team B,1\n\n  Team C,0,Team A,0\n   \n\t\nTeam B,1,Team C,1\n");
        let records = pipeline.extract().await.unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].home_team_name, "Team A");
        assert_eq!(records[0].home_team_score, "2");
        assert_eq!(records[1].row, 3);
        assert_eq!(records[1].home_team_name, "Team C");
        assert_eq!(records[2].row, 6);
        assert_eq!(records[2].home_team_name, "Team B");
    }

    #[tokio::test]
    async fn test_extract_rejects_wrong_arity() {
        let (pipeline, _) = pipeline("Team A,2,Team B,1\nTeam A,2,Team B\n");
        let err = pipeline.extract().await.unwrap_err();

        match err {
            LeagueError::ImportError { row, message } => {
                assert_eq!(row, 2);
                assert!(message.contains("expected 4 columns, found 3"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transform_rejects_bad_scores() {
        for bad in ["Team A,two,Team B,1", "Team A,2,Team B,-1", "Team A,2,Team B,"] {
            let (pipeline, _) = pipeline(bad);
            let records = pipeline.extract().await.unwrap();
            let err = pipeline.transform(records).await.unwrap_err();
            assert!(matches!(err, LeagueError::ImportError { row: 1, .. }), "{bad}: {err:?}");
        }
    }

    #[tokio::test]
    async fn test_transform_rejects_self_play_and_blank_names() {
        for bad in ["Team A,2,Team A,1", ",2,Team B,1"] {
            let (pipeline, _) = pipeline(bad);
            let records = pipeline.extract().await.unwrap();
            assert!(pipeline.transform(records).await.is_err(), "{bad}");
        }
    }

    #[tokio::test]
    async fn test_single_row_round_trip() {
        let (pipeline, repository) = pipeline("Team A,2,Team B,1");
        let report = EtlEngine::new(pipeline).run().await.unwrap();

        assert_eq!(report.games_imported, 1);
        assert_eq!(report.teams_created, 2);

        let games = repository.list_games().await.unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].home_team.name, "Team A");
        assert_eq!(games[0].home_team_score, 2);
        assert_eq!(games[0].away_team.name, "Team B");
        assert_eq!(games[0].away_team_score, 1);
    }

    #[tokio::test]
    async fn test_bad_row_commits_nothing() {
        let (pipeline, repository) = pipeline("Team A,2,Team B,1\nTeam C,x,Team D,0\n");
        assert!(EtlEngine::new(pipeline).run().await.is_err());

        assert!(repository.list_games().await.unwrap().is_empty());
        assert!(repository.list_teams().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_upload_imports_nothing() {
        let (pipeline, _) = pipeline("");
        assert_eq!(
            EtlEngine::new(pipeline).run().await.unwrap(),
            ImportReport::default()
        );
    }
}
