use crate::{
    errors::{StoreError, StoreResult},
    prelude::{DB, DbKey, DbWriter},
};
use rocksdb::{Direction, IterateBounds, IteratorMode, ReadOptions};
use std::borrow::Borrow;

/// A key (stripped of its prefix) and its raw value
pub type KeyValueResult = StoreResult<(Box<[u8]>, Box<[u8]>)>;

/// Raw byte access to prefixed key spaces of the DB
pub trait DbAccess {
    fn has(&self, db_key: &DbKey) -> StoreResult<bool>;

    /// Iterates all entries of a prefix in key order, or in reverse key order
    fn iterator(&self, prefix: &[u8], direction: Direction) -> impl Iterator<Item = KeyValueResult> + '_;

    /// The entry with the highest key under `prefix`
    fn last(&self, prefix: &[u8]) -> StoreResult<Option<(Box<[u8]>, Box<[u8]>)>> {
        self.iterator(prefix, Direction::Reverse).next().transpose()
    }

    /// The entry with the lowest key under `prefix`
    fn first(&self, prefix: &[u8]) -> StoreResult<Option<(Box<[u8]>, Box<[u8]>)>> {
        self.iterator(prefix, Direction::Forward).next().transpose()
    }

    fn write(&self, writer: &mut impl DbWriter, db_key: DbKey, data: impl AsRef<[u8]>) -> StoreResult<()> {
        Ok(writer.put(db_key, data)?)
    }

    fn delete(&self, writer: &mut impl DbWriter, db_key: DbKey) -> StoreResult<()> {
        Ok(writer.delete(db_key)?)
    }

    /// Deletes all entries of a prefix using the underlying rocksdb `delete_range` operation
    fn delete_range_by_prefix(&self, writer: &mut impl DbWriter, prefix: &[u8]) -> StoreResult<()> {
        match rocksdb::PrefixRange(prefix).into_bounds() {
            (Some(from), Some(to)) => Ok(writer.delete_range(from, to)?),
            _ => Err(StoreError::DataInconsistency(format!("prefix {} has no upper bound", hex::encode(prefix)))),
        }
    }
}

impl<T: Borrow<DB>> DbAccess for T {
    fn has(&self, db_key: &DbKey) -> StoreResult<bool> {
        Ok(self.borrow().get_pinned(db_key)?.is_some())
    }

    fn iterator(&self, prefix: &[u8], direction: Direction) -> impl Iterator<Item = KeyValueResult> + '_ {
        let prefix_len = prefix.len();
        let mut read_opts = ReadOptions::default();
        read_opts.set_iterate_range(rocksdb::PrefixRange(prefix.to_vec()));
        let mode = match direction {
            Direction::Forward => IteratorMode::Start,
            Direction::Reverse => IteratorMode::End,
        };
        self.borrow().iterator_opt(mode, read_opts).map(move |item| match item {
            Ok((key, value)) => Ok((key[prefix_len..].into(), value)),
            Err(err) => Err(err.into()),
        })
    }
}
