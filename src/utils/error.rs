use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeagueError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Import failed at row {row}: {message}")]
    ImportError { row: usize, message: String },

    #[error("Validation failed: {errors}")]
    ValidationError { errors: FieldErrors },

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },

    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },
}

pub type Result<T> = std::result::Result<T, LeagueError>;

impl LeagueError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LeagueError::ValidationError { .. }
            | LeagueError::ImportError { .. }
            | LeagueError::CsvError(_)
            | LeagueError::MalformedPayload { .. } => StatusCode::BAD_REQUEST,
            LeagueError::NotFound { .. } | LeagueError::InvalidPath { .. } => StatusCode::NOT_FOUND,
            LeagueError::IoError(_)
            | LeagueError::DatabaseError(_)
            | LeagueError::ConfigError { .. }
            | LeagueError::InvalidConfigValueError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to an end user.
    pub fn user_friendly_message(&self) -> String {
        match self {
            LeagueError::NotFound { .. } | LeagueError::InvalidPath { .. } => {
                "Not found.".to_string()
            }
            LeagueError::IoError(_)
            | LeagueError::DatabaseError(_)
            | LeagueError::ConfigError { .. }
            | LeagueError::InvalidConfigValueError { .. } => "Internal server error.".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for LeagueError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }

        match self {
            LeagueError::ValidationError { errors } => (status, Json(errors)).into_response(),
            other => (status, Json(ErrorBody::new(&other.user_friendly_message()))).into_response(),
        }
    }
}

impl From<JsonRejection> for LeagueError {
    fn from(rejection: JsonRejection) -> Self {
        LeagueError::MalformedPayload {
            message: rejection.body_text(),
        }
    }
}

/// A path parameter that does not parse cannot name an existing resource.
impl From<PathRejection> for LeagueError {
    fn from(rejection: PathRejection) -> Self {
        LeagueError::InvalidPath {
            message: rejection.body_text(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl ErrorBody {
    fn new(detail: &str) -> Self {
        Self {
            detail: detail.to_string(),
        }
    }
}

/// Validation messages keyed by the JSON field they belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Yields `value` when nothing was recorded, otherwise a
    /// [`LeagueError::ValidationError`] carrying the collected messages.
    pub fn into_result<T>(self, value: Option<T>) -> Result<T> {
        match value {
            Some(value) if self.is_empty() => Ok(value),
            _ => Err(LeagueError::ValidationError { errors: self }),
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_collect_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("home_team", "This field is required.");
        errors.add("home_team_score", "Ensure this value is greater than or equal to 0.");
        errors.add("home_team", "Second message.");

        assert_eq!(errors.get("home_team").map(<[String]>::len), Some(2));
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({
                "home_team": ["This field is required.", "Second message."],
                "home_team_score": ["Ensure this value is greater than or equal to 0."]
            })
        );
        assert!(errors.into_result(Some(1)).is_err());
        assert_eq!(FieldErrors::new().into_result(Some(1)).ok(), Some(1));
        assert!(FieldErrors::new().into_result::<u32>(None).is_err());
    }

    #[test]
    fn test_status_codes() {
        let not_found = LeagueError::NotFound {
            resource: "Game",
            id: 9,
        };
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "Game 9 not found");

        let import = LeagueError::ImportError {
            row: 2,
            message: "expected 4 columns, found 3".to_string(),
        };
        assert_eq!(import.status_code(), StatusCode::BAD_REQUEST);

        let path = LeagueError::InvalidPath {
            message: "Cannot parse `abc` to a `i64`".to_string(),
        };
        assert_eq!(path.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(path.user_friendly_message(), "Not found.");

        let config = LeagueError::ConfigError {
            message: "bad".to_string(),
        };
        assert_eq!(config.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
