use crate::errors::StoreResult;
use rocksdb::{DBWithThreadMode, MultiThreaded};
use std::{path::PathBuf, sync::Arc};

/// The DB type used for tonsub stores
pub type DB = DBWithThreadMode<MultiThreaded>;

const MB: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ConnBuilder {
    db_path: PathBuf,
    mem_budget: usize,
    files_limit: i32,
}

impl ConnBuilder {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path, mem_budget: 16 * MB, files_limit: 128 }
    }

    pub fn with_files_limit(self, files_limit: impl Into<i32>) -> Self {
        Self { files_limit: files_limit.into(), ..self }
    }

    pub fn build(self) -> StoreResult<Arc<DB>> {
        let mut opts = rocksdb::Options::default();
        opts.optimize_level_style_compaction(self.mem_budget);
        opts.set_max_open_files(self.files_limit);
        opts.create_if_missing(true);
        Ok(Arc::new(DB::open(&opts, &self.db_path)?))
    }
}

