//! Engine lifecycle.
//!
//! `EngineHandle` owns at most one engine instance and moves it through
//! Uninitialized → Initializing → Ready | Failed, with Closed as a terminal
//! state reached through `shutdown`. Handles are shared as
//! `Arc<EngineHandle>`; nothing about the lifecycle is global.

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::backend::{Connection, Engine, EngineFactory};
use super::config::{validate_storage_name, EngineConfig, DEFAULT_STORAGE_ROOT};
use super::connection::DuckDbFactory;
use super::DbError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
    Closed,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineState::Uninitialized => "uninitialized",
            EngineState::Initializing => "initializing",
            EngineState::Ready => "ready",
            EngineState::Failed => "failed",
            EngineState::Closed => "closed",
        };
        f.write_str(name)
    }
}

struct Lifecycle {
    state: EngineState,
    engine: Option<Arc<dyn Engine>>,
    config: Option<EngineConfig>,
}

pub struct EngineHandle {
    factory: Box<dyn EngineFactory>,
    lifecycle: Mutex<Lifecycle>,
    /// Held while a session connection is being created.
    open_gate: Mutex<()>,
    next_session_id: AtomicU64,
}

impl Default for EngineHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineHandle")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl EngineHandle {
    /// A handle backed by DuckDB.
    pub fn new() -> Self {
        Self::with_factory(DuckDbFactory)
    }

    pub fn with_factory(factory: impl EngineFactory + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            lifecycle: Mutex::new(Lifecycle {
                state: EngineState::Uninitialized,
                engine: None,
                config: None,
            }),
            open_gate: Mutex::new(()),
            next_session_id: AtomicU64::new(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> EngineState {
        self.lock().state
    }

    pub fn is_closed(&self) -> bool {
        self.state() == EngineState::Closed
    }

    /// Config of the last initialization attempt.
    pub fn config(&self) -> Option<EngineConfig> {
        self.lock().config.clone()
    }

    /// Load the engine and open its storage.
    ///
    /// Calling this on a Ready handle returns immediately. The engine is
    /// loaded outside the lifecycle lock; concurrent callers observe
    /// `Initializing` and get `AlreadyInitializing`.
    #[instrument(skip_all, fields(storage = ?config.storage))]
    pub fn initialize(&self, config: EngineConfig) -> Result<(), DbError> {
        {
            let mut lifecycle = self.lock();
            match lifecycle.state {
                EngineState::Ready => {
                    debug!("engine already ready");
                    return Ok(());
                }
                EngineState::Initializing => return Err(DbError::AlreadyInitializing),
                EngineState::Closed => return Err(DbError::EngineClosed),
                EngineState::Uninitialized | EngineState::Failed => {}
            }
            config.validate()?;
            lifecycle.state = EngineState::Initializing;
            lifecycle.config = Some(config.clone());
        }

        let loaded = self.factory.open(&config);

        let mut lifecycle = self.lock();
        match loaded {
            Ok(engine) if lifecycle.state == EngineState::Closed => {
                // Shut down while loading; the fresh instance is discarded.
                drop(lifecycle);
                if let Err(e) = engine.close() {
                    warn!(error = %e, "failed to close engine loaded during shutdown");
                }
                Err(DbError::EngineClosed)
            }
            Ok(engine) => {
                info!(backend = engine.backend_name(), "engine ready");
                lifecycle.engine = Some(Arc::from(engine));
                lifecycle.state = EngineState::Ready;
                Ok(())
            }
            Err(e) => {
                let cause = match e {
                    DbError::InitFailed { cause } => cause,
                    other => other.to_string(),
                };
                warn!(cause = %cause, "engine failed to initialize");
                if lifecycle.state != EngineState::Closed {
                    lifecycle.state = EngineState::Failed;
                }
                Err(DbError::InitFailed { cause })
            }
        }
    }

    /// Close any open instance, delete persistent storage `persistent_name`,
    /// and return to Uninitialized.
    #[instrument(skip(self))]
    pub fn reset(&self, persistent_name: &str) -> Result<(), DbError> {
        validate_storage_name(persistent_name)?;
        let (engine, root) = {
            let mut lifecycle = self.lock();
            match lifecycle.state {
                EngineState::Uninitialized => return Err(DbError::NotInitialized),
                EngineState::Initializing => return Err(DbError::AlreadyInitializing),
                EngineState::Closed => return Err(DbError::EngineClosed),
                EngineState::Ready | EngineState::Failed => {}
            }
            lifecycle.state = EngineState::Uninitialized;
            let root = storage_root(lifecycle.config.take());
            (lifecycle.engine.take(), root)
        };

        if let Some(engine) = engine {
            engine.close()?;
        }
        let removed = self.factory.delete_persistent(&root, persistent_name)?;
        info!(removed, "engine reset");
        Ok(())
    }

    /// Close the engine for good.
    #[instrument(skip(self))]
    pub fn shutdown(&self) -> Result<(), DbError> {
        let engine = {
            let mut lifecycle = self.lock();
            if lifecycle.state == EngineState::Closed {
                return Ok(());
            }
            lifecycle.state = EngineState::Closed;
            lifecycle.engine.take()
        };
        if let Some(engine) = engine {
            engine.close()?;
        }
        info!("engine shut down");
        Ok(())
    }

    /// The Ready engine, or the lifecycle error explaining why there is none.
    pub(crate) fn engine(&self) -> Result<Arc<dyn Engine>, DbError> {
        let lifecycle = self.lock();
        match (&lifecycle.state, &lifecycle.engine) {
            (EngineState::Ready, Some(engine)) => Ok(Arc::clone(engine)),
            (EngineState::Closed, _) => Err(DbError::EngineClosed),
            _ => Err(DbError::EngineNotReady),
        }
    }

    /// Open a connection for a new session.
    ///
    /// Creation is serialized: one connection is made at a time.
    pub(crate) fn connect(&self) -> Result<(u64, Box<dyn Connection>), DbError> {
        let _gate = self.open_gate.lock().unwrap_or_else(PoisonError::into_inner);
        let engine = self.engine()?;
        let conn = engine.connect()?;
        let id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        Ok((id, conn))
    }

    /// Delete named persistent storage under the configured root.
    pub(crate) fn delete_storage(&self, name: &str) -> Result<bool, DbError> {
        validate_storage_name(name)?;
        let root = storage_root(self.config());
        self.factory.delete_persistent(&root, name)
    }
}

fn storage_root(config: Option<EngineConfig>) -> PathBuf {
    config
        .map(|c| c.root)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_ROOT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FailingFactory, RecordingFactory};
    use rstest::rstest;

    #[rstest]
    fn test_new_handle_is_uninitialized() {
        let handle = EngineHandle::with_factory(RecordingFactory::default());
        assert_eq!(handle.state(), EngineState::Uninitialized);
        assert!(matches!(handle.engine(), Err(DbError::EngineNotReady)));
    }

    #[rstest]
    fn test_initialize_is_idempotent() {
        let factory = RecordingFactory::default();
        let handle = EngineHandle::with_factory(factory.clone());

        handle.initialize(EngineConfig::memory()).unwrap();
        handle.initialize(EngineConfig::memory()).unwrap();

        assert_eq!(handle.state(), EngineState::Ready);
        assert_eq!(factory.calls(), vec!["open"]);
    }

    #[rstest]
    fn test_initialize_failure_then_retry() {
        let handle = EngineHandle::with_factory(FailingFactory::new(1));

        let err = handle.initialize(EngineConfig::memory()).unwrap_err();
        assert!(matches!(err, DbError::InitFailed { ref cause } if cause.contains("module")));
        assert_eq!(handle.state(), EngineState::Failed);

        handle.initialize(EngineConfig::memory()).unwrap();
        assert_eq!(handle.state(), EngineState::Ready);
    }

    #[rstest]
    fn test_initialize_rejects_invalid_config_without_loading() {
        let factory = RecordingFactory::default();
        let handle = EngineHandle::with_factory(factory.clone());

        let err = handle.initialize(EngineConfig::persistent("")).unwrap_err();
        assert!(matches!(err, DbError::InvalidArgument { .. }));
        assert_eq!(handle.state(), EngineState::Uninitialized);
        assert!(factory.calls().is_empty());
    }

    #[rstest]
    fn test_initialize_while_initializing_fails() {
        let handle = EngineHandle::with_factory(RecordingFactory::default());
        handle.lock().state = EngineState::Initializing;

        let err = handle.initialize(EngineConfig::memory()).unwrap_err();
        assert!(matches!(err, DbError::AlreadyInitializing));
    }

    #[rstest]
    fn test_reset_requires_initialization() {
        let handle = EngineHandle::with_factory(RecordingFactory::default());
        assert!(matches!(handle.reset("tt"), Err(DbError::NotInitialized)));
    }

    #[rstest]
    fn test_reset_closes_and_deletes() {
        let factory = RecordingFactory::default();
        let handle = EngineHandle::with_factory(factory.clone());
        handle.initialize(EngineConfig::persistent("tt")).unwrap();

        handle.reset("tt").unwrap();

        assert_eq!(handle.state(), EngineState::Uninitialized);
        assert_eq!(factory.calls(), vec!["open", "close", "delete tt"]);
    }

    #[rstest]
    fn test_shutdown_is_terminal() {
        let handle = EngineHandle::with_factory(RecordingFactory::default());
        handle.initialize(EngineConfig::memory()).unwrap();
        handle.shutdown().unwrap();

        assert_eq!(handle.state(), EngineState::Closed);
        assert!(matches!(handle.engine(), Err(DbError::EngineClosed)));
        assert!(matches!(
            handle.initialize(EngineConfig::memory()),
            Err(DbError::EngineClosed)
        ));
        assert!(matches!(handle.reset("tt"), Err(DbError::EngineClosed)));
        handle.shutdown().unwrap();
    }

    #[rstest]
    fn test_session_ids_are_monotonic() {
        let handle = EngineHandle::with_factory(RecordingFactory::default());
        handle.initialize(EngineConfig::memory()).unwrap();

        let (first, _) = handle.connect().unwrap();
        let (second, _) = handle.connect().unwrap();
        assert!(second > first);
    }

    #[rstest]
    fn test_state_display() {
        assert_eq!(EngineState::Ready.to_string(), "ready");
        assert_eq!(EngineState::Closed.to_string(), "closed");
    }
}
