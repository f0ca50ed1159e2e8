use std::{fmt::{self, Display, Formatter}, ops::Deref};

use serde::{Deserialize, Serialize};

use super::MouseId;

/// Pedigree reference of a non-founder: `[parent1, parent2]`, in mating order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parents([MouseId; 2]);

impl Parents {
    #[must_use]
    pub fn new(first: MouseId, second: MouseId) -> Self {
        Self([first, second])
    }

    #[must_use]
    pub fn contains(&self, id: MouseId) -> bool {
        self.0.contains(&id)
    }
}

impl Deref for Parents {
    type Target = [MouseId; 2];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Parents {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.0[0], self.0[1])
    }
}
