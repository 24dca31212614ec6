use crate::prelude::{ConnBuilder, DB, StoreError, StoreResult};
use std::sync::Arc;
use tempfile::TempDir;

/// Keeps the directory of a temporary DB alive
pub struct TempDbLifetime {
    _tempdir: TempDir,
}

/// Creates a DB within a temp directory, deleted once the returned lifetime is dropped
pub fn create_temp_db() -> StoreResult<(TempDbLifetime, Arc<DB>)> {
    let tempdir = tempfile::tempdir().map_err(|err| StoreError::DataInconsistency(format!("temp dir: {err}")))?;
    let db = ConnBuilder::new(tempdir.path().to_path_buf()).with_files_limit(10).build()?;
    Ok((TempDbLifetime { _tempdir: tempdir }, db))
}
