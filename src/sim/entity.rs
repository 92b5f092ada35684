//! Entity identity shared by pooled objects

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a pooled entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out monotonically increasing entity IDs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdAllocator {
    next_id: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next_id: 1 }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity ID, `None` once the ID space is used up
    pub fn next_id(&mut self) -> Option<EntityId> {
        let id = self.next_id;
        self.next_id = id.checked_add(1)?;
        Some(EntityId(id))
    }

    /// Number of IDs handed out so far
    pub fn allocated(&self) -> u32 {
        self.next_id - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_id(), Some(EntityId(1)));
        assert_eq!(ids.next_id(), Some(EntityId(2)));
        assert_eq!(ids.allocated(), 2);
    }

    #[test]
    fn test_exhausted_allocator() {
        let mut ids = IdAllocator { next_id: u32::MAX };
        assert_eq!(ids.next_id(), None);
        // Stays exhausted
        assert_eq!(ids.next_id(), None);
    }
}
