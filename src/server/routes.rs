use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, PathRejection},
        Multipart, Path, Query, State,
    },
    http::StatusCode,
    Form, Json,
};
use serde::{Deserialize, Serialize};

use super::state::AppState;
use crate::core::league::{GamePayload, TeamPayload};
use crate::domain::model::{Game, GameId, ImportReport, Standing, Team};
use crate::domain::ranking::RankingStrategy;
use crate::utils::error::{LeagueError, Result};

pub const UPLOAD_FIELD: &str = "csv_file";

type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;
type GamePath = std::result::Result<Path<GameId>, PathRejection>;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct RankingQuery {
    #[serde(default)]
    pub ranking_strategy: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RankedTeam {
    pub rank: usize,
    pub team: Team,
    pub points: u32,
}

#[derive(Debug, Serialize)]
pub struct RankingTable {
    pub ranking_strategy: RankingStrategy,
    pub standings: Vec<RankedTeam>,
}

impl RankingTable {
    fn new(ranking_strategy: RankingStrategy, standings: Vec<Standing>) -> Self {
        let standings = standings
            .into_iter()
            .enumerate()
            .map(|(index, standing)| RankedTeam {
                rank: index + 1,
                team: standing.team,
                points: standing.points,
            })
            .collect();

        Self {
            ranking_strategy,
            standings,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub report: ImportReport,
}

impl From<ImportReport> for UploadResponse {
    fn from(report: ImportReport) -> Self {
        Self {
            message: "Games uploaded successfully.",
            report,
        }
    }
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: "league-table",
    })
}

pub async fn list_teams_handler(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Team>>> {
    Ok(Json(state.league.list_teams().await?))
}

pub async fn create_team_handler(
    State(state): State<Arc<AppState>>,
    payload: JsonBody<TeamPayload>,
) -> Result<(StatusCode, Json<Team>)> {
    let Json(payload) = payload?;
    let (team, created) = state.league.create_team(payload).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(team)))
}

pub async fn list_games_handler(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Game>>> {
    Ok(Json(state.league.list_games().await?))
}

pub async fn create_game_handler(
    State(state): State<Arc<AppState>>,
    payload: JsonBody<GamePayload>,
) -> Result<(StatusCode, Json<Game>)> {
    let Json(payload) = payload?;
    let game = state.league.create_game(payload).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

pub async fn get_game_handler(
    State(state): State<Arc<AppState>>,
    id: GamePath,
) -> Result<Json<Game>> {
    let Path(id) = id?;
    Ok(Json(state.league.get_game(id).await?))
}

pub async fn put_game_handler(
    State(state): State<Arc<AppState>>,
    id: GamePath,
    payload: JsonBody<GamePayload>,
) -> Result<Json<Game>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    Ok(Json(state.league.update_game(id, payload, false).await?))
}

pub async fn patch_game_handler(
    State(state): State<Arc<AppState>>,
    id: GamePath,
    payload: JsonBody<GamePayload>,
) -> Result<Json<Game>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    Ok(Json(state.league.update_game(id, payload, true).await?))
}

pub async fn delete_game_handler(
    State(state): State<Arc<AppState>>,
    id: GamePath,
) -> Result<StatusCode> {
    let Path(id) = id?;
    state.league.delete_game(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Imports a raw CSV request body.
pub async fn import_games_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<UploadResponse>> {
    let report = state.league.import_csv(body.to_vec()).await?;
    Ok(Json(report.into()))
}

/// Imports the CSV sent as the `csv_file` field of a multipart form.
pub async fn upload_game_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| LeagueError::MalformedPayload {
            message: e.to_string(),
        })?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let data = field.bytes().await.map_err(|e| LeagueError::MalformedPayload {
            message: e.to_string(),
        })?;
        let report = state.league.import_csv(data.to_vec()).await?;
        return Ok(Json(report.into()));
    }

    Err(LeagueError::MalformedPayload {
        message: format!("missing file field '{}'", UPLOAD_FIELD),
    })
}

pub async fn ranking_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<RankingTable>> {
    ranking_table(&state, query).await
}

pub async fn ranking_form_handler(
    State(state): State<Arc<AppState>>,
    Form(query): Form<RankingQuery>,
) -> Result<Json<RankingTable>> {
    ranking_table(&state, query).await
}

async fn ranking_table(state: &AppState, query: RankingQuery) -> Result<Json<RankingTable>> {
    let strategy = RankingStrategy::from_param(query.ranking_strategy.as_deref());
    let standings = state.league.standings(strategy).await?;
    Ok(Json(RankingTable::new(strategy, standings)))
}
