use std::{
    collections::BTreeSet,
    fmt::{self, Display, Formatter},
    sync::Arc,
};

use located_error::prelude::*;

use crate::{mouse::{Mouse, MouseId}, registry::Registry};

/// Identifiers of every ancestor of `id`, up to `max_depth` generations back.
/// A `max_depth` of 0, or a founder, yields an empty set.
///
/// # Errors
/// `PopulationError::UnknownMouse` if `id`, or one of its ancestors, is not registered.
pub fn ancestors(registry: &Registry, id: MouseId, max_depth: usize) -> Result<BTreeSet<MouseId>> {
    let ctx = || format!("While tracing the ancestors of {id}");
    let mut found = BTreeSet::new();
    registry.get(id).with_loc(ctx)?;
    let mut frontier = vec![id];
    for _ in 0..max_depth {
        let mut next = Vec::new();
        for current in frontier {
            let Some(parents) = registry.get(current).with_loc(ctx)?.parents() else { continue };
            for parent in parents.iter() {
                registry.get(*parent).with_loc(ctx)?;
                if found.insert(*parent) {
                    next.push(*parent);
                }
            }
        }
        if next.is_empty() {
            break
        }
        frontier = next;
    }
    Ok(found)
}

/// Pedigree of a mouse, `depth` generations back. Parents are listed in mating order.
#[derive(Debug, Clone)]
pub struct PedigreeTree {
    pub mouse  : Arc<Mouse>,
    pub parents: Vec<PedigreeTree>,
}

impl PedigreeTree {
    /// # Errors
    /// `PopulationError::UnknownMouse` if `id`, or one of the traversed ancestors, is not registered.
    pub fn build(registry: &Registry, id: MouseId, depth: usize) -> Result<Self> {
        let mouse = Arc::clone(registry.get(id).with_loc(|| format!("While building the pedigree of {id}"))?);
        let parents = match (depth, mouse.parents()) {
            (0, _) | (_, None) => Vec::new(),
            (_, Some(parents)) => parents.iter()
                .map(|parent| Self::build(registry, *parent, depth - 1))
                .collect::<Result<Vec<_>>>()?,
        };
        Ok(Self{mouse, parents})
    }

    /// Number of generations actually displayed, the root included.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.parents.iter().map(Self::depth).max().unwrap_or(0)
    }

    fn write_indented(&self, f: &mut Formatter<'_>, indent: usize) -> fmt::Result {
        writeln!(f, "{}+- Mouse #{} (Gen {}): {}", "  ".repeat(indent), self.mouse.id(), self.mouse.generation(), self.mouse.phenotype())?;
        self.parents.iter().try_for_each(|parent| parent.write_indented(f, indent + 1))
    }
}

impl Display for PedigreeTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::PopulationError, kinship::tests::Pedigree};

    #[test]
    fn ancestors_of_a_three_generation_pedigree() -> Result<()> {
        let mut ped = Pedigree::new()?;
        let (sire, dam, other) = (ped.founder()?, ped.founder()?, ped.founder()?);
        let sib1 = ped.child(sire, dam)?;
        let sib2 = ped.child(sire, dam)?;
        let outbred = ped.child(sib1, other)?;
        let inbred = ped.child(sib1, sib2)?;
        let reg = &ped.registry;

        assert!(ancestors(reg, sire, 10)?.is_empty());
        assert!(ancestors(reg, inbred, 0)?.is_empty());
        assert_eq!(ancestors(reg, inbred, 1)?, BTreeSet::from([sib1, sib2]));
        assert_eq!(ancestors(reg, inbred, 10)?, BTreeSet::from([sib1, sib2, sire, dam]));
        assert_eq!(ancestors(reg, outbred, 2)?, BTreeSet::from([sib1, other, sire, dam]));

        let err = ancestors(reg, MouseId(404), 3).unwrap_err();
        assert_eq!(err.root_cause().downcast_ref::<PopulationError>(), Some(&PopulationError::UnknownMouse(MouseId(404))));
        Ok(())
    }

    #[test]
    fn pedigree_tree_display() -> Result<()> {
        let mut ped = Pedigree::new()?;
        let (sire, dam) = (ped.founder()?, ped.founder()?);
        let sib1 = ped.child(sire, dam)?;
        let sib2 = ped.child(sire, dam)?;
        let inbred = ped.child(sib1, sib2)?;

        let tree = PedigreeTree::build(&ped.registry, inbred, 3)?;
        assert_eq!(tree.depth(), 3);
        let display = tree.to_string();
        let lines: Vec<&str> = display.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with(&format!("+- Mouse #{inbred} (Gen 2): ")));
        assert!(lines[1].starts_with(&format!("  +- Mouse #{sib1} (Gen 1)")));
        assert!(lines[2].starts_with(&format!("    +- Mouse #{sire} (Gen 0)")));

        assert_eq!(PedigreeTree::build(&ped.registry, inbred, 1)?.depth(), 2);
        assert!(PedigreeTree::build(&ped.registry, MouseId(404), 1).is_err());
        Ok(())
    }
}
