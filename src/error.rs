//! Error types for the Policy Framework model layer.
//!

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// HTTP-style status carried by model errors so that REST layers above the
/// DAO can map failures without inspecting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseStatus {
    BadRequest,
    NotFound,
    NotAcceptable,
    Conflict,
    InternalServerError,
}

impl ResponseStatus {
    pub fn code(self) -> u16 {
        match self {
            ResponseStatus::BadRequest => 400,
            ResponseStatus::NotFound => 404,
            ResponseStatus::NotAcceptable => 406,
            ResponseStatus::Conflict => 409,
            ResponseStatus::InternalServerError => 500,
        }
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            ResponseStatus::BadRequest => "Bad Request",
            ResponseStatus::NotFound => "Not Found",
            ResponseStatus::NotAcceptable => "Not Acceptable",
            ResponseStatus::Conflict => "Conflict",
            ResponseStatus::InternalServerError => "Internal Server Error",
        };
        write!(f, "{} {}", self.code(), reason)
    }
}

/// Failure of an entity's defensive copy
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Could not copy object of entity \"{entity}\": {reason}")]
pub struct CopyError {
    pub entity: String,
    pub reason: String,
}

impl CopyError {
    pub fn new(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PfModelError {
    #[error("{message}")]
    Model {
        status: ResponseStatus,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    #[error("Policy Framework DAO has not been initialized")]
    NotInitialized,
    #[error("More than one result was returned in query on {entity} with filter {filter}")]
    MultipleResults { entity: String, filter: String },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Copy(#[from] CopyError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl PfModelError {
    pub fn model(status: ResponseStatus, message: impl Into<String>) -> Self {
        PfModelError::Model {
            status,
            message: message.into(),
            source: None,
        }
    }

    pub fn model_with_source<E>(status: ResponseStatus, message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PfModelError::Model {
            status,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Status reported to callers for this error
    pub fn status(&self) -> ResponseStatus {
        match self {
            PfModelError::Model { status, .. } => *status,
            PfModelError::InvalidArgument(_) | PfModelError::MultipleResults { .. } => {
                ResponseStatus::BadRequest
            }
            PfModelError::NotInitialized
            | PfModelError::Copy(_)
            | PfModelError::Database(_)
            | PfModelError::Serialization(_)
            | PfModelError::Configuration(_) => ResponseStatus::InternalServerError,
        }
    }
}

pub type PfModelResult<T> = std::result::Result<T, PfModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ResponseStatus::BadRequest.code(), 400);
        assert_eq!(ResponseStatus::InternalServerError.code(), 500);
        assert_eq!(
            ResponseStatus::InternalServerError.to_string(),
            "500 Internal Server Error"
        );
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            PfModelError::NotInitialized.status(),
            ResponseStatus::InternalServerError
        );
        assert_eq!(
            PfModelError::InvalidArgument("bad".to_string()).status(),
            ResponseStatus::BadRequest
        );
        let err = PfModelError::model(ResponseStatus::Conflict, "already exists");
        assert_eq!(err.status().code(), 409);
        assert_eq!(err.to_string(), "already exists");
    }

    #[test]
    fn test_copy_error_converts() {
        let err: PfModelError = CopyError::new("ToscaPolicyType", "null key").into();
        assert!(matches!(err, PfModelError::Copy(_)));
        assert!(err.to_string().contains("ToscaPolicyType"));
    }
}
