use crate::registry::DatabaseStorePrefixes;
use std::fmt::{Debug, Display};

/// A prefixed database key
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DbKey {
    path: Vec<u8>,
    prefix_len: usize,
}

impl DbKey {
    pub fn new<TKey>(prefix: &[u8], key: TKey) -> Self
    where
        TKey: AsRef<[u8]>,
    {
        Self { path: prefix.iter().chain(key.as_ref().iter()).copied().collect(), prefix_len: prefix.len() }
    }

    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }
}

impl AsRef<[u8]> for DbKey {
    fn as_ref(&self) -> &[u8] {
        &self.path
    }
}

impl Display for DbKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (prefix, suffix) = self.path.split_at(self.prefix_len);
        match prefix.first().and_then(|x| DatabaseStorePrefixes::try_from(*x).ok()) {
            Some(store) if prefix.len() == 1 => write!(f, "{store:?}/{}", hex::encode(suffix)),
            _ => write!(f, "{}/{}", hex::encode(prefix), hex::encode(suffix)),
        }
    }
}

impl Debug for DbKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
