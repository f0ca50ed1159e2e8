use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Process-unique identifier of a mouse. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MouseId(pub u64);

impl Display for MouseId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for MouseId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Monotonic identifier source, owned by a population (or an isolated experiment).
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    pub fn next_id(&mut self) -> MouseId {
        let id = MouseId(self.next);
        self.next += 1;
        id
    }

    /// Identifier the next call to `next_id()` will hand out.
    #[must_use]
    pub fn peek(&self) -> MouseId {
        MouseId(self.next)
    }
}
