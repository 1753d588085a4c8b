use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use super::calories::UnknownValue;

#[derive(Debug, Error)]
pub enum DietError {
    #[error("{0}")]
    Validation(String),

    #[error("No suitable diet plan found. Please contact support.")]
    NoSuitablePlan,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl From<UnknownValue> for DietError {
    fn from(e: UnknownValue) -> Self {
        DietError::Validation(e.to_string())
    }
}

impl From<JsonRejection> for DietError {
    fn from(e: JsonRejection) -> Self {
        DietError::Validation(e.body_text())
    }
}

impl IntoResponse for DietError {
    fn into_response(self) -> Response {
        let status = match &self {
            DietError::Validation(_) => StatusCode::BAD_REQUEST,
            DietError::NoSuitablePlan | DietError::NotFound(_) => StatusCode::NOT_FOUND,
            DietError::Conflict(_) => StatusCode::CONFLICT,
            DietError::Store(e) => {
                error!(error = %format!("{e:#}"), "diet store failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let message = match &self {
            DietError::Store(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        let cases = [
            (DietError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (DietError::NoSuitablePlan, StatusCode::NOT_FOUND),
            (DietError::NotFound("Assignment"), StatusCode::NOT_FOUND),
            (DietError::Conflict("in use".into()), StatusCode::CONFLICT),
            (
                DietError::Store(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn unknown_value_becomes_validation() {
        let err: DietError = "extreme"
            .parse::<crate::diet::calories::ActivityLevel>()
            .unwrap_err()
            .into();
        assert!(matches!(err, DietError::Validation(ref m) if m.contains("extreme")));
    }
}
