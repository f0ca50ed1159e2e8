use ahash::AHashMap;
use located_error::prelude::*;

use crate::{mouse::MouseId, registry::Registry};

/// Memoized pedigree kinship coefficients.
/// 
/// `φ(i, j)` is the probability that two alleles drawn at random, one from `i` and one from `j`,
/// are identical by descent. Values are cached for every pair visited during recursion, keyed by
/// the ordered pair `(min, max)`. The registry is append-only, so cached values never go stale.
#[derive(Debug, Clone, Default)]
pub struct KinshipCache {
    memo: AHashMap<(MouseId, MouseId), f64>,
}

impl KinshipCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of memoized pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.memo.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }

    /// Kinship coefficient `φ(a, b)`.
    /// - `φ(i, i) = 0.5 (1 + F_i)`
    /// - `φ(i, j) = 0` for two distinct founders.
    /// - otherwise the younger member (higher generation, or the non-founder) is replaced by the
    ///   mean of its two parents: `φ(i, j) = 0.5 (φ(sire_i, j) + φ(dam_i, j))`.
    ///   An ancestor always belongs to an earlier generation than its descendants, so the expanded
    ///   member can never be an ancestor of the other.
    /// 
    /// # Errors
    /// `PopulationError::UnknownMouse` if any identifier met along the pedigree is not registered.
    pub fn kinship(&mut self, registry: &Registry, a: MouseId, b: MouseId) -> Result<f64> {
        let key = if a <= b { (a, b) } else { (b, a) };
        if let Some(phi) = self.memo.get(&key) {
            return Ok(*phi)
        }

        let phi = if a == b {
            0.5 * (1.0 + self.inbreeding(registry, a)?)
        } else {
            let ma = registry.get(a).loc("While computing pedigree kinship")?;
            let mb = registry.get(b).loc("While computing pedigree kinship")?;
            let expand_a = match (ma.parents(), mb.parents()) {
                (None, None)       => None,
                (Some(_), None)    => Some(true),
                (None, Some(_))    => Some(false),
                (Some(_), Some(_)) => Some(ma.generation() > mb.generation() || (ma.generation() == mb.generation() && a > b)),
            };
            match expand_a {
                None => 0.0,
                Some(expand_a) => {
                    let (young, other) = if expand_a { (ma, b) } else { (mb, a) };
                    let parents = *young.parents().loc("Expanded a founder while computing kinship")?;
                    let [p1, p2] = *parents;
                    0.5 * (self.kinship(registry, p1, other)? + self.kinship(registry, p2, other)?)
                }
            }
        };
        self.memo.insert(key, phi);
        Ok(phi)
    }

    /// Pedigree inbreeding coefficient: `F_x = φ(sire, dam)`, 0 for founders.
    pub fn inbreeding(&mut self, registry: &Registry, id: MouseId) -> Result<f64> {
        let mouse = registry.get(id).loc("While computing pedigree inbreeding")?;
        match mouse.parents().copied() {
            None          => Ok(0.0),
            Some(parents) => self.kinship(registry, parents[0], parents[1]),
        }
    }

    /// Additive relationship coefficient: `2 φ(a, b)`.
    pub fn relatedness(&mut self, registry: &Registry, a: MouseId, b: MouseId) -> Result<f64> {
        Ok(2.0 * self.kinship(registry, a, b)?)
    }
}
