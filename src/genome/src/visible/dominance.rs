use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
    ops::Deref,
};

use serde::Serialize;

use super::{Trait, TraitAllele, TraitError, VisibleTraits};

/// Dominance relationship of a single visible trait.
/// # Fields:
/// - `dominant`        : allele whose single copy is sufficient to express `dominant_label`.
/// - `dominant_label`  : phenotype category of carriers.
/// - `recessive_label` : phenotype category of homozygous recessive individuals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DominanceRule {
    dominant       : TraitAllele,
    dominant_label : String,
    recessive_label: String,
}

impl DominanceRule {
    /// # Errors
    /// `TraitError::InvalidSymbol` if `dominant` does not belong to the alphabet of `trait_`
    pub fn new(trait_: Trait, dominant: char, dominant_label: &str, recessive_label: &str) -> Result<Self, TraitError> {
        Ok(Self {
            dominant       : TraitAllele::from_symbol(trait_, dominant)?,
            dominant_label : dominant_label.to_string(),
            recessive_label: recessive_label.to_string(),
        })
    }

    #[must_use]
    pub fn dominant(&self) -> TraitAllele {
        self.dominant
    }

    #[must_use]
    pub fn express(&self, pair: [TraitAllele; 2]) -> &str {
        match pair.contains(&self.dominant) {
            true  => &self.dominant_label,
            false => &self.recessive_label,
        }
    }

    /// Both phenotype categories, dominant first.
    #[must_use]
    pub fn labels(&self) -> [&str; 2] {
        [&self.dominant_label, &self.recessive_label]
    }
}

/// One `DominanceRule` per visible trait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DominanceRules([DominanceRule; Trait::COUNT]);

impl Default for DominanceRules {
    fn default() -> Self {
        // First alphabet symbol is dominant for every trait: B, L, N, F
        let rule = |dominant_label: &str, recessive_label: &str| DominanceRule {
            dominant       : TraitAllele::FIRST,
            dominant_label : dominant_label.to_string(),
            recessive_label: recessive_label.to_string(),
        };
        Self([
            rule("black",    "white"),
            rule("large",    "small"),
            rule("normal",   "dumbo"),
            rule("friendly", "aggressive"),
        ])
    }
}

impl DominanceRules {
    #[must_use]
    pub fn with_rule(mut self, trait_: Trait, rule: DominanceRule) -> Self {
        self.0[trait_.index()] = rule;
        self
    }

    #[must_use]
    pub fn rule(&self, trait_: Trait) -> &DominanceRule {
        &self.0[trait_.index()]
    }

    /// Derive the phenotype of a set of visible traits. Pure function of its inputs.
    #[must_use]
    pub fn express(&self, traits: &VisibleTraits) -> Phenotype {
        Phenotype(traits.iter()
            .map(|(t, pair)| (t, self.rule(t).express(pair).to_string()))
            .collect()
        )
    }
}

/// Expressed category of every visible trait.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Phenotype(BTreeMap<Trait, String>);

impl Deref for Phenotype {
    type Target = BTreeMap<Trait, String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Phenotype {
    #[must_use]
    pub fn label(&self, trait_: Trait) -> Option<&str> {
        self.0.get(&trait_).map(String::as_str)
    }
}

impl Display for Phenotype {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self.0.iter().map(|(t, label)| format!("{t}={label}")).collect();
        write!(f, "{}", fields.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_dominant_copy_is_enough() -> Result<(), TraitError> {
        let rules = DominanceRules::default();
        for (genotype, expected) in [("BB", "black"), ("Bb", "black"), ("bB", "black"), ("bb", "white")] {
            let traits = VisibleTraits::default().with(Trait::CoatColor, genotype)?;
            assert_eq!(rules.express(&traits).label(Trait::CoatColor), Some(expected));
        }
        Ok(())
    }

    #[test]
    fn custom_rule_overrides_default() -> Result<(), TraitError> {
        let rules = DominanceRules::default()
            .with_rule(Trait::EarShape, DominanceRule::new(Trait::EarShape, 'D', "dumbo", "normal")?);
        let traits = VisibleTraits::default().with(Trait::EarShape, "ND")?;
        assert_eq!(rules.express(&traits).label(Trait::EarShape), Some("dumbo"));
        assert!(DominanceRule::new(Trait::EarShape, 'B', "x", "y").is_err());
        Ok(())
    }

    #[test]
    fn phenotype_covers_every_trait() {
        let phenotype = DominanceRules::default().express(&VisibleTraits::default());
        assert_eq!(phenotype.len(), Trait::COUNT);
        assert_eq!(phenotype.to_string(), "coat_color=black, size=large, ear_shape=normal, temperament=friendly");
    }
}
