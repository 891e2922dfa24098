use std::error::Error;
use std::sync::Arc;

use serde::Serialize;

use super::SizeCmd;
use crate::commands::Execute;
use crate::db::EngineHandle;
use crate::persistence::size_of;

/// Result of the size command execution
#[derive(Debug, Clone, Serialize)]
pub struct SizeResult {
    pub bytes: u64,
    pub kilobytes: f64,
}

impl SizeResult {
    pub fn from_bytes(bytes: u64) -> Self {
        Self {
            bytes,
            kilobytes: bytes as f64 / 1024.0,
        }
    }
}

impl Execute for SizeCmd {
    type Output = SizeResult;

    fn execute(self, handle: &Arc<EngineHandle>) -> Result<Self::Output, Box<dyn Error>> {
        Ok(SizeResult::from_bytes(size_of(handle)?))
    }
}
