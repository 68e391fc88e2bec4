//! SQLite persistence through sqlx.
//!
//! The schema is created idempotently on connect. Team names are unique, and
//! games reference teams with `ON DELETE CASCADE`.

use crate::domain::model::{Game, GameId, ImportReport, NewGame, Team, TeamId};
use crate::domain::ports::LeagueRepository;
use crate::utils::error::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::str::FromStr;

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS teams (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS games (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        home_team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
        home_team_score INTEGER NOT NULL CHECK (home_team_score >= 0),
        away_team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
        away_team_score INTEGER NOT NULL CHECK (away_team_score >= 0)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS games_home_team_idx ON games (home_team_id)",
    "CREATE INDEX IF NOT EXISTS games_away_team_idx ON games (away_team_id)",
];

const SELECT_GAMES: &str = r#"
    SELECT
        g.id,
        h.id AS home_team_id,
        h.name AS home_team_name,
        g.home_team_score,
        a.id AS away_team_id,
        a.name AS away_team_name,
        g.away_team_score
    FROM games g
    JOIN teams h ON h.id = g.home_team_id
    JOIN teams a ON a.id = g.away_team_id
"#;

#[derive(Debug, FromRow)]
struct TeamRow {
    id: TeamId,
    name: String,
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Team::new(row.id, row.name)
    }
}

#[derive(Debug, FromRow)]
struct GameRow {
    id: GameId,
    home_team_id: TeamId,
    home_team_name: String,
    home_team_score: u32,
    away_team_id: TeamId,
    away_team_name: String,
    away_team_score: u32,
}

impl From<GameRow> for Game {
    fn from(row: GameRow) -> Self {
        Game {
            id: row.id,
            home_team: Team::new(row.home_team_id, row.home_team_name),
            home_team_score: row.home_team_score,
            away_team: Team::new(row.away_team_id, row.away_team_name),
            away_team_score: row.away_team_score,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Opens (creating if needed) the database at `database_url` and makes
    /// sure the tables exist.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        tracing::debug!("Connected to {}", database_url);

        let repository = Self { pool };
        repository.ensure_schema().await?;
        Ok(repository)
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

async fn get_or_create_team(conn: &mut SqliteConnection, name: &str) -> Result<(Team, bool)> {
    let inserted = sqlx::query("INSERT INTO teams (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
        .bind(name)
        .execute(&mut *conn)
        .await?;

    let team = sqlx::query_as::<_, TeamRow>("SELECT id, name FROM teams WHERE name = ?")
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;

    Ok((team.into(), inserted.rows_affected() == 1))
}

async fn fetch_game(conn: &mut SqliteConnection, id: GameId) -> Result<Option<Game>> {
    let row = sqlx::query_as::<_, GameRow>(&format!("{} WHERE g.id = ?", SELECT_GAMES))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.map(Game::from))
}

/// Inserts one game, creating its teams as needed. Returns the number of
/// teams created along with the game.
async fn insert_game(conn: &mut SqliteConnection, game: NewGame) -> Result<(Game, usize)> {
    let (home_team, home_created) = get_or_create_team(conn, &game.home_team_name).await?;
    let (away_team, away_created) = get_or_create_team(conn, &game.away_team_name).await?;

    let result = sqlx::query(
        r#"
        INSERT INTO games (home_team_id, home_team_score, away_team_id, away_team_score)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(home_team.id)
    .bind(game.home_team_score)
    .bind(away_team.id)
    .bind(game.away_team_score)
    .execute(&mut *conn)
    .await?;

    let created = usize::from(home_created) + usize::from(away_created);
    let game = Game {
        id: result.last_insert_rowid(),
        home_team,
        home_team_score: game.home_team_score,
        away_team,
        away_team_score: game.away_team_score,
    };
    Ok((game, created))
}

#[async_trait]
impl LeagueRepository for SqliteRepository {
    async fn list_teams(&self) -> Result<Vec<Team>> {
        let rows = sqlx::query_as::<_, TeamRow>("SELECT id, name FROM teams ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Team::from).collect())
    }

    async fn get_or_create_team(&self, name: &str) -> Result<(Team, bool)> {
        let mut conn = self.pool.acquire().await?;
        get_or_create_team(&mut conn, name).await
    }

    async fn list_games(&self) -> Result<Vec<Game>> {
        let rows = sqlx::query_as::<_, GameRow>(&format!("{} ORDER BY g.id", SELECT_GAMES))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Game::from).collect())
    }

    async fn get_game(&self, id: GameId) -> Result<Option<Game>> {
        let mut conn = self.pool.acquire().await?;
        fetch_game(&mut conn, id).await
    }

    async fn create_game(&self, game: NewGame) -> Result<Game> {
        let mut tx = self.pool.begin().await?;
        let (game, _) = insert_game(&mut tx, game).await?;
        tx.commit().await?;
        Ok(game)
    }

    async fn update_game_scores(
        &self,
        id: GameId,
        home_team_score: u32,
        away_team_score: u32,
    ) -> Result<Option<Game>> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE games SET home_team_score = ?, away_team_score = ? WHERE id = ?",
        )
        .bind(home_team_score)
        .bind(away_team_score)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        let game = fetch_game(&mut tx, id).await?;
        tx.commit().await?;
        Ok(game)
    }

    async fn delete_game(&self, id: GameId) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM games WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(deleted.rows_affected() > 0)
    }

    async fn import_games(&self, games: Vec<NewGame>) -> Result<ImportReport> {
        let mut tx = self.pool.begin().await?;
        let mut report = ImportReport::default();

        for game in games {
            // Any failure drops `tx`, which rolls the whole batch back.
            let (_, created) = insert_game(&mut tx, game).await?;
            report.games_imported += 1;
            report.teams_created += created;
        }

        tx.commit().await?;
        tracing::debug!(
            "Committed {} games ({} new teams)",
            report.games_imported,
            report.teams_created
        );
        Ok(report)
    }
}
