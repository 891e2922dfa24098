use std::error::Error;
use std::sync::Arc;

use serde::Serialize;

use super::ClearCmd;
use crate::commands::Execute;
use crate::db::EngineHandle;
use crate::persistence::clear_persistent;

/// Result of the clear command execution
#[derive(Debug, Clone, Serialize)]
pub struct ClearResult {
    pub name: String,
    pub removed: bool,
}

impl Execute for ClearCmd {
    type Output = ClearResult;

    fn execute(self, handle: &Arc<EngineHandle>) -> Result<Self::Output, Box<dyn Error>> {
        let removed = clear_persistent(handle, &self.storage)?;
        Ok(ClearResult {
            name: self.storage,
            removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandRunner;
    use crate::db::{EngineConfig, StorageMode};
    use crate::test_utils::RecordingFactory;
    use rstest::rstest;

    #[rstest]
    fn test_clear_runs_in_memory() {
        let cmd = ClearCmd {
            storage: "sales".to_string(),
        };
        let config = cmd.engine_config(EngineConfig::persistent("sales").with_root("/data"));
        assert_eq!(config.storage, StorageMode::Memory);
        assert_eq!(config.root, std::path::PathBuf::from("/data"));
    }

    #[rstest]
    fn test_clear_deletes_named_storage() {
        let factory = RecordingFactory::default();
        let handle = Arc::new(EngineHandle::with_factory(factory.clone()));
        handle.initialize(EngineConfig::memory()).unwrap();

        let result = ClearCmd {
            storage: "sales".to_string(),
        }
        .execute(&handle)
        .unwrap();

        assert!(result.removed);
        assert_eq!(factory.calls(), vec!["open", "delete sales"]);
    }
}
