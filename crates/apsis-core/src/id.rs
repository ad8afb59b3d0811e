//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a body within an environment.
///
/// Bodies are registered at environment construction and assigned
/// sequential ids. `BodyId(n)` corresponds to the n-th registered body.
/// Ids are dense and stable for the lifetime of the environment, so they
/// double as indices into per-body scratch buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

impl BodyId {
    /// The id as a buffer index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for BodyId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
