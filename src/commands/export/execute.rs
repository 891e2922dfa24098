use std::error::Error;
use std::fs;
use std::sync::Arc;

use serde::Serialize;

use super::ExportCmd;
use crate::commands::Execute;
use crate::db::EngineHandle;
use crate::persistence::export_image;

/// Result of the export command execution
#[derive(Debug, Clone, Serialize)]
pub struct ExportResult {
    pub path: String,
    pub bytes: u64,
}

impl Execute for ExportCmd {
    type Output = ExportResult;

    fn execute(self, handle: &Arc<EngineHandle>) -> Result<Self::Output, Box<dyn Error>> {
        let image = export_image(handle)?;
        let path = self.output.display().to_string();
        fs::write(&self.output, &image).map_err(|e| format!("Failed to write {}: {}", path, e))?;

        Ok(ExportResult {
            path,
            bytes: image.len() as u64,
        })
    }
}
