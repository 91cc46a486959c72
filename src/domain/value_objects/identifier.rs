use serde::{Deserialize, Serialize};

/// Human-facing sequential number of a record (tracking number or contact number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(u64);

impl Identifier {
    /// First identifier handed out in an empty collection
    pub const FIRST: Identifier = Identifier(1);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Identifier following this one
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Identifier that follows the current maximum, if any
    pub fn after(max: Option<Identifier>) -> Self {
        max.map_or(Self::FIRST, |m| m.next())
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A contiguous run of reserved identifiers, `start..start + len`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierBlock {
    start: Identifier,
    len: usize,
}

impl IdentifierBlock {
    pub fn new(start: Identifier, len: usize) -> Self {
        Self { start, len }
    }

    pub fn start(&self) -> Identifier {
        self.start
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Last identifier in the block
    pub fn end(&self) -> Option<Identifier> {
        if self.len == 0 {
            None
        } else {
            Some(Identifier(self.start.0 + self.len as u64 - 1))
        }
    }

    /// Identifiers in ascending order
    pub fn iter(&self) -> impl Iterator<Item = Identifier> {
        let start = self.start.0;
        (start..start + self.len as u64).map(Identifier)
    }
}
