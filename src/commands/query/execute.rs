use std::error::Error;
use std::sync::Arc;

use super::QueryCmd;
use crate::commands::Execute;
use crate::db::{with_session, EngineHandle};
use crate::projector::{project, ProjectedTable};

impl Execute for QueryCmd {
    type Output = ProjectedTable;

    fn execute(self, handle: &Arc<EngineHandle>) -> Result<Self::Output, Box<dyn Error>> {
        let result = with_session(handle, |session| session.execute(&self.sql))?;
        Ok(project(&result))
    }
}
