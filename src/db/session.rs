//! Scoped sessions over engine connections.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::backend::{Connection, QueryResult};
use super::handle::EngineHandle;
use super::DbError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Open,
    Closed,
}

/// A connection owned by one caller for one logical operation.
///
/// Dropping an open session closes it.
pub struct Session {
    id: u64,
    handle: Arc<EngineHandle>,
    conn: Option<Box<dyn Connection>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish()
    }
}

impl Session {
    /// Open a session on a Ready handle.
    pub fn open(handle: &Arc<EngineHandle>) -> Result<Self, DbError> {
        let (id, conn) = handle.connect()?;
        debug!(session = id, "session opened");
        Ok(Self {
            id,
            handle: Arc::clone(handle),
            conn: Some(conn),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> SessionState {
        if self.conn.is_some() {
            SessionState::Open
        } else {
            SessionState::Closed
        }
    }

    fn live(&mut self) -> Result<&mut (dyn Connection + 'static), DbError> {
        if self.handle.is_closed() {
            return Err(DbError::EngineClosed);
        }
        self.conn.as_deref_mut().ok_or(DbError::SessionClosed)
    }

    /// Run one statement. Engine errors come back as `QueryFailed` carrying
    /// the engine's message unchanged.
    #[instrument(skip(self), fields(session = self.id))]
    pub fn execute(&mut self, sql: &str) -> Result<QueryResult, DbError> {
        let result = self.live()?.query(sql)?;
        debug!(
            columns = result.headers.len(),
            rows = result.row_count(),
            "statement finished"
        );
        Ok(result)
    }

    /// Run a multi-statement script.
    #[instrument(skip(self, sql), fields(session = self.id, len = sql.len()))]
    pub fn execute_batch(&mut self, sql: &str) -> Result<(), DbError> {
        self.live()?.execute_batch(sql)
    }

    /// Expose `bytes` to SQL readers; returns the path to reference in SQL.
    pub fn register_buffer(&mut self, virtual_path: &str, bytes: &[u8]) -> Result<String, DbError> {
        self.live()?.register_buffer(virtual_path, bytes)
    }

    pub fn drop_buffer(&mut self, virtual_path: &str) -> Result<(), DbError> {
        self.live()?.drop_buffer(virtual_path)
    }

    /// Release the connection. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<(), DbError> {
        if let Some(conn) = self.conn.take() {
            conn.close()?;
            debug!(session = self.id, "session closed");
        }
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(session = self.id, error = %e, "failed to close session on drop");
        }
    }
}

/// Run `op` inside a fresh session that is closed on every exit path.
///
/// When `op` fails its error wins over any error from closing.
pub fn with_session<T>(
    handle: &Arc<EngineHandle>,
    op: impl FnOnce(&mut Session) -> Result<T, DbError>,
) -> Result<T, DbError> {
    let mut session = Session::open(handle)?;
    let outcome = op(&mut session);
    let closed = session.close();
    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), closed) => {
            if let Err(close_err) = closed {
                warn!(session = session.id(), error = %close_err, "failed to close session after error");
            }
            Err(e)
        }
    }
}
