//! Engine lifecycle, sessions, and the DuckDB backend.
//!
//! This module provides the database abstraction layer for the facade:
//! - Engine lifecycle (`EngineHandle`) guarded by an explicit state machine
//! - Scoped sessions (`Session`, `with_session`) over engine connections
//! - A narrow backend seam (`EngineFactory`, `Engine`, `Connection`)
//! - Backend-neutral result values (`QueryResult`, `CellValue`)
//!
//! # Architecture
//!
//! DuckDB does all query execution and storage. The facade never holds a
//! long-lived connection for callers: every high-level action opens a session,
//! runs inside it, and closes it before returning. Session creation goes
//! through one lock on the handle, which is the only serialization point.
//!
//! # Type Decisions
//!
//! **Why a trait seam instead of calling `duckdb` directly?**
//! The facade's guarantees (no engine call on invalid input, state checks
//! before every operation) are tested against a recording fake engine.
//! The seam is exactly the set of calls the facade makes.
//!
//! **Why `CellValue` instead of exposing `duckdb::types::Value`?**
//! Callers render values; they do not need DuckDB's full type lattice.
//! Types with no direct Rust mapping are carried as their textual form.

mod backend;
mod config;
mod connection;
mod escape;
mod handle;
mod session;
mod value;

pub use backend::{Connection, Engine, EngineFactory, QueryResult};
pub use config::{
    persistent_path, validate_storage_name, EngineConfig, StorageMode, DEFAULT_DATABASE_NAME,
    DEFAULT_STORAGE_ROOT,
};
pub use connection::DuckDbFactory;
pub use escape::{escape_string_for_quote, quote_identifier, quote_literal, validate_identifier};
pub use handle::{EngineHandle, EngineState};
pub use session::{with_session, Session, SessionState};
pub use value::CellValue;

use thiserror::Error;

/// Facade error types.
///
/// Every failure is terminal for the operation that raised it; nothing here is
/// retried automatically.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Engine failed to initialize: {cause}")]
    InitFailed { cause: String },

    #[error("Engine initialization is already in progress")]
    AlreadyInitializing,

    #[error("Engine has not been initialized")]
    NotInitialized,

    #[error("Engine is not ready")]
    EngineNotReady,

    #[error("Engine has been shut down")]
    EngineClosed,

    #[error("Session is closed")]
    SessionClosed,

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Unsupported file format '{extension}' (expected csv, parquet or json)")]
    UnsupportedFormat { extension: String },

    /// Engine diagnostic, passed through untouched.
    #[error("{message}")]
    QueryFailed { message: String },

    #[error("Table '{name}' does not exist")]
    TableNotFound { name: String },

    #[error("Export failed: {message}")]
    ExportFailed { message: String },

    #[error("Import failed: {message}")]
    ImportFailed { message: String },

    #[error("Invalid database image: {message}")]
    InvalidImage { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DbError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn query_failed(message: impl ToString) -> Self {
        Self::QueryFailed {
            message: message.to_string(),
        }
    }
}
