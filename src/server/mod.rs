//! HTTP surface of the league.
//!
//! JSON API for teams and games, CSV upload (raw body or multipart form with a
//! `csv_file` field) and the ranking table, which takes a `ranking_strategy`
//! of `basic` or `alternate` and falls back to `basic` for anything else.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub mod routes;
pub mod state;

use crate::adapters::SqliteRepository;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use routes::{
    create_game_handler, create_team_handler, delete_game_handler, get_game_handler,
    health_handler, import_games_handler, list_games_handler, list_teams_handler,
    patch_game_handler, put_game_handler, ranking_form_handler, ranking_handler,
    upload_game_handler,
};
pub use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/teams/", get(list_teams_handler).post(create_team_handler))
        .route("/api/games/", get(list_games_handler).post(create_game_handler))
        .route("/api/games/import", post(import_games_handler))
        .route(
            "/api/games/{id}/",
            get(get_game_handler)
                .put(put_game_handler)
                .patch(patch_game_handler)
                .delete(delete_game_handler),
        )
        .route("/upload-game", post(upload_game_handler))
        .route("/ranking-table", get(ranking_handler).post(ranking_form_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server<C: ConfigProvider>(config: &C) -> Result<()> {
    info!("Opening database...");
    let repository =
        SqliteRepository::connect(config.database_url(), config.max_connections()).await?;
    let state = AppState::new(Arc::new(repository.clone()));

    let address = config.bind_address();
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    repository.close().await;
    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal as unix_signal, SignalKind};

        match unix_signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
