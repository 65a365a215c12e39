//! Entity identifiers.
//!
//! Every catalog entity (subject, examinee, vigilant, classroom) carries an
//! [`EntityId`]. Ids are handed out by an [`IdAllocator`] owned by whoever
//! builds the catalog; there is no process-wide counter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a catalog entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Raw numeric value.
    #[inline]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Sequential id source for one entity kind.
///
/// # Example
/// ```
/// use exam_sittings::models::IdAllocator;
///
/// let mut ids = IdAllocator::new();
/// assert_eq!(ids.next_id().value(), 0);
/// assert_eq!(ids.next_id().value(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    /// Creates an allocator starting at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocator whose first id is `first`.
    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }

    /// Hands out the next id.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// The id the next call to [`next_id`](Self::next_id) will return.
    pub fn peek(&self) -> EntityId {
        EntityId(self.next)
    }
}
