use crate::utils::error::{FieldErrors, LeagueError, Result};
use serde_json::Value;
use url::Url;

pub const REQUIRED: &str = "This field is required.";
pub const NULL: &str = "This field may not be null.";
pub const INVALID_INTEGER: &str = "A valid integer is required.";
pub const BLANK: &str = "This field may not be blank.";
pub const NEGATIVE: &str = "Ensure this value is greater than or equal to 0.";
pub const TOO_LARGE: &str = "Ensure this value is less than or equal to 4294967295.";

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_database_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(LeagueError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "sqlite" => Ok(()),
            scheme => Err(LeagueError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported database scheme: {}", scheme),
            }),
        },
        Err(e) => Err(LeagueError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(LeagueError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LeagueError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(LeagueError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Valid values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

/// Checks a submitted score, recording a message under `field` when it is
/// missing, not an integer, negative or does not fit a `u32`. Integral
/// numbers and numeric strings are accepted.
pub fn check_score(errors: &mut FieldErrors, field: &str, value: Option<&Value>) -> Option<u32> {
    let value = match value {
        None => {
            errors.add(field, REQUIRED);
            return None;
        }
        Some(Value::Null) => {
            errors.add(field, NULL);
            return None;
        }
        Some(value) => value,
    };

    let Some(value) = integer_value(value) else {
        errors.add(field, INVALID_INTEGER);
        return None;
    };

    if value < 0 {
        errors.add(field, NEGATIVE);
        return None;
    }

    match u32::try_from(value) {
        Ok(score) => Some(score),
        Err(_) => {
            errors.add(field, TOO_LARGE);
            None
        }
    }
}

fn integer_value(value: &Value) -> Option<i128> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .map(i128::from)
            .or_else(|| number.as_u64().map(i128::from))
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i128)
            }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Checks a submitted team name, returning it trimmed.
pub fn check_team_name(errors: &mut FieldErrors, field: &str, name: Option<&str>) -> Option<String> {
    let Some(name) = name else {
        errors.add(field, REQUIRED);
        return None;
    };

    let name = name.trim();
    if name.is_empty() {
        errors.add(field, BLANK);
        return None;
    }

    Some(name.to_string())
}
