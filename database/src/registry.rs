/// We use `u8::MAX` which is never a valid store prefix. Also note that through
/// the [`DatabaseStorePrefixes`] enum we make sure it is not used as a prefix as well
pub const SEPARATOR: u8 = u8::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DatabaseStorePrefixes {
    // ---- Frontier ----
    MasterchainHeights = 1,
    ShardchainBlocks = 2,
    ShardchainPending = 3,

    // ---- Separator ----
    /// Reserved as a separator
    Separator = SEPARATOR,
}

impl TryFrom<u8> for DatabaseStorePrefixes {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::MasterchainHeights),
            2 => Ok(Self::ShardchainBlocks),
            3 => Ok(Self::ShardchainPending),
            SEPARATOR => Ok(Self::Separator),
            _ => Err(value),
        }
    }
}

impl From<DatabaseStorePrefixes> for Vec<u8> {
    fn from(value: DatabaseStorePrefixes) -> Self {
        [value as u8].to_vec()
    }
}

impl From<DatabaseStorePrefixes> for u8 {
    fn from(value: DatabaseStorePrefixes) -> Self {
        value as u8
    }
}

impl AsRef<[u8]> for DatabaseStorePrefixes {
    fn as_ref(&self) -> &[u8] {
        // SAFETY: enum has repr(u8)
        std::slice::from_ref(unsafe { &*(self as *const Self as *const u8) })
    }
}
