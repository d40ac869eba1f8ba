use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Generate document ID from file path using CRC32
pub fn get_document_id(path: &str) -> String {
    let mut buff = String::from(path);
    if !path.starts_with("file://") {
        buff = format!("file://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

macro_rules! node_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

node_id!(
    /// Identity of a top-level section
    SectionId
);
node_id!(
    /// Identity of a column inside a row block
    ColumnId
);
node_id!(
    /// Identity of a content block
    BlockId
);

/// Sequential ID generator for page nodes.
///
/// Sections, columns and blocks share one counter so an id is unique across
/// node kinds, not just within one.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String, // Document ID (CRC32)
    count: u64,   // Sequential counter
    taken: BTreeSet<u64>,
}

impl IdGenerator {
    pub fn new(path: &str) -> Self {
        Self::from_seed(get_document_id(path))
    }

    pub fn from_seed(seed: String) -> Self {
        Self {
            seed,
            count: 0,
            taken: BTreeSet::new(),
        }
    }

    /// Continue numbering after the highest id already issued under `seed`.
    ///
    /// Used when a saved page is rehydrated, so ids are never handed out twice.
    pub fn resume<'a>(seed: String, existing: impl IntoIterator<Item = &'a str>) -> Self {
        let prefix = format!("{}-", seed);
        let taken: BTreeSet<u64> = existing
            .into_iter()
            .filter_map(|id| id.strip_prefix(prefix.as_str()))
            .filter_map(|n| n.parse::<u64>().ok())
            .collect();
        let count = taken.last().copied().unwrap_or(0);

        Self { seed, count, taken }
    }

    /// Generate next sequential ID
    ///
    /// Past `u64::MAX` the counter wraps and skips every counter a resumed
    /// page already holds.
    pub fn new_id(&mut self) -> String {
        loop {
            self.count = self.count.wrapping_add(1);
            if !self.taken.contains(&self.count) {
                break;
            }
        }
        format!("{}-{}", self.seed, self.count)
    }

    pub fn section_id(&mut self) -> SectionId {
        SectionId(self.new_id())
    }

    pub fn column_id(&mut self) -> ColumnId {
        ColumnId(self.new_id())
    }

    pub fn block_id(&mut self) -> BlockId {
        BlockId(self.new_id())
    }

    /// Get document ID seed
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Counter of the last id issued
    pub fn count(&self) -> u64 {
        self.count
    }
}
