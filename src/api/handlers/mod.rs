use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::api::models::ErrorBody;
use crate::config::settings::AppConfig;
use crate::database::{DbConn, DbPool};
use crate::errors::{LadderError, LadderResult};
use crate::services::ladder::LadderService;

pub mod admin;
pub mod challenges;
pub mod matches;
pub mod players;
pub mod teams;

pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        Self { pool, config }
    }

    pub fn service(&self) -> LadderService {
        LadderService::new(self.config.clone())
    }

    pub fn connection(&self) -> LadderResult<DbConn> {
        Ok(self.pool.get()?)
    }
}

impl IntoResponse for LadderError {
    fn into_response(self) -> Response {
        let status = match &self {
            LadderError::NotFound(_) => StatusCode::NOT_FOUND,
            LadderError::Validation(_) => StatusCode::BAD_REQUEST,
            LadderError::RuleViolation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            LadderError::Conflict(_) => StatusCode::CONFLICT,
            LadderError::Database(_) | LadderError::Pool(_) | LadderError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = if self.is_internal() {
            log::error!("Request failed: {:?}", self);
            "internal server error".to_string()
        } else {
            match &self {
                LadderError::NotFound(what) => format!("{what} not found"),
                LadderError::Validation(reason)
                | LadderError::RuleViolation(reason)
                | LadderError::Conflict(reason) => reason.clone(),
                _ => self.to_string(),
            }
        };

        let body = ErrorBody {
            error: self.kind().to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

/// Serializes a service result, or maps its error onto the HTTP taxonomy.
pub(crate) fn respond<T: Serialize>(status: StatusCode, result: LadderResult<T>) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Malformed JSON bodies are validation failures rather than axum's default 422.
pub(crate) fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> LadderResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| LadderError::validation(rejection.body_text()))
}
