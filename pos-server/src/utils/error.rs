//! Unified error handling
//!
//! One application error enum covers the whole station backend:
//!
//! | Variant | Recovery |
//! |---------|----------|
//! | `Connection`, `Schema` | fatal, abort startup |
//! | `Persist` | transaction rolled back, prior state unchanged |
//! | `NotFound`, `Validation`, `InvalidTransition` | rejected before mutation |
//! | `Print` | non-fatal, caller offers a manual fallback |

use pos_printer::PrintError;
use thiserror::Error;

/// Application error enum
#[derive(Debug, Error)]
pub enum AppError {
    // ========== Startup errors (fatal) ==========
    /// Neither the primary nor the fallback store is reachable
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Fallback schema bootstrap failed
    #[error("Schema bootstrap failed: {0}")]
    Schema(String),

    // ========== Store errors (recovered by rollback) ==========
    /// A write failed; the enclosing transaction was rolled back
    #[error("Persist failed: {0}")]
    Persist(String),

    // ========== Business errors (rejected before any write) ==========
    /// Referenced order/table/item does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input rejected before any write
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Status change not permitted by the lifecycle graph
    #[error("Illegal status transition: {0}")]
    InvalidTransition(String),

    // ========== Boundary errors ==========
    /// Ticket dispatch failed (non-fatal)
    #[error("Print failed: {0}")]
    Print(#[from] PrintError),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for application operations
pub type AppResult<T> = Result<T, AppError>;

// ========== Helper Constructors ==========

impl AppError {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn persist(msg: impl Into<String>) -> Self {
        Self::Persist(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidTransition(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("row not found".to_string()),
            other => AppError::Persist(other.to_string()),
        }
    }
}
