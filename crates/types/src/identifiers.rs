//! Domain-specific identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Commit identifier.
///
/// Stable for the lifetime of a run; regenerated wholesale on reset.
/// The inner value is the commit's generation index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(pub u32);

impl CommitId {
    /// Get the generation index this id was derived from.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_generation_index() {
        assert_eq!(CommitId(0).to_string(), "c-0");
        assert_eq!(CommitId(42).to_string(), "c-42");
        assert_eq!(CommitId(42).index(), 42);
    }
}
