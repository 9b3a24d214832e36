use crate::ladder::ScoreError;

pub type LadderResult<T> = Result<T, LadderError>;

#[derive(Debug, thiserror::Error)]
pub enum LadderError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("challenge rule violated: {0}")]
    RuleViolation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Pool(#[from] r2d2::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl LadderError {
    pub fn not_found(what: impl Into<String>) -> Self {
        LadderError::NotFound(what.into())
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        LadderError::Validation(reason.into())
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        LadderError::Conflict(reason.into())
    }

    /// Short machine-readable kind used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            LadderError::NotFound(_) => "not_found",
            LadderError::Validation(_) => "validation_error",
            LadderError::RuleViolation(_) => "rule_violation",
            LadderError::Conflict(_) => "conflict",
            LadderError::Database(_) | LadderError::Pool(_) | LadderError::Internal(_) => {
                "internal"
            }
        }
    }

    pub fn is_internal(&self) -> bool {
        self.kind() == "internal"
    }
}

impl From<ScoreError> for LadderError {
    fn from(e: ScoreError) -> Self {
        LadderError::Validation(e.to_string())
    }
}
