//! Persistence manager: database images and named storage.
//!
//! Images are opaque byte buffers produced by the engine. An image exported
//! from one handle can be imported into any other Ready handle, in memory or
//! persistent mode.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::db::{validate_storage_name, DbError, EngineHandle, EngineState};

/// Serialize the whole active database into an image.
#[instrument(skip(handle))]
pub fn export_image(handle: &Arc<EngineHandle>) -> Result<Vec<u8>, DbError> {
    let engine = handle.engine().map_err(|e| DbError::ExportFailed {
        message: e.to_string(),
    })?;

    let image = engine.export_image().map_err(|e| match e {
        DbError::ExportFailed { .. } => e,
        other => DbError::ExportFailed {
            message: other.to_string(),
        },
    })?;
    info!(bytes = image.len(), "database exported");
    Ok(image)
}

/// Replace the active database content with `image`.
///
/// Every table and view in the active database is dropped first; the
/// image's objects take their place.
#[instrument(skip(handle, image), fields(bytes = image.len()))]
pub fn import_image(handle: &Arc<EngineHandle>, image: &[u8]) -> Result<(), DbError> {
    if image.is_empty() {
        return Err(DbError::invalid_argument("database image is empty"));
    }
    let engine = handle.engine()?;
    engine.import_image(image)?;
    info!("database imported");
    Ok(())
}

/// Size in bytes of the image `export_image` would produce right now.
pub fn size_of(handle: &Arc<EngineHandle>) -> Result<u64, DbError> {
    let image = export_image(handle)?;
    Ok(image.len() as u64)
}

/// Delete the named persistent database under the handle's storage root.
///
/// The storage a Ready handle has open cannot be cleared here; use
/// `EngineHandle::reset` for that. Returns whether anything was removed.
#[instrument(skip(handle))]
pub fn clear_persistent(handle: &Arc<EngineHandle>, name: &str) -> Result<bool, DbError> {
    validate_storage_name(name)?;
    if handle.state() == EngineState::Ready {
        let active = handle.config();
        if active.as_ref().and_then(|c| c.persistent_name()) == Some(name) {
            return Err(DbError::invalid_argument(format!(
                "storage '{}' is open; reset the engine to delete it",
                name
            )));
        }
    }

    let removed = handle.delete_storage(name)?;
    if removed {
        info!(name, "persistent storage cleared");
    } else {
        warn!(name, "no persistent storage to clear");
    }
    Ok(removed)
}
