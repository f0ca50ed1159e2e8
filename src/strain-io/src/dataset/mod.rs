use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::{self, Display, Formatter},
};

mod error;
pub use error::DatasetError;

/// Identifier of a genotyped locus: either a gene symbol (`Tyr`) or a `chr:pos` coordinate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Locus(String);

impl Locus {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_string())
    }

    #[must_use]
    pub fn coordinate(chr: &str, pos: u64) -> Self {
        Self(format!("{}:{pos}", chr.trim()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Locus {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl Display for Locus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only source of real-strain genotypes (`0/1/2` counts of the alternative allele)
/// and documented phenotypes.
#[cfg_attr(test, mockall::automock)]
pub trait StrainDataset {
    fn genotype_for(&self, strain: &str, locus: &Locus) -> Option<u8>;

    /// Documented phenotype of `strain` for the given trait key (e.g. `coat_color`)
    fn phenotype_for(&self, strain: &str, key: &str) -> Option<String>;

    /// Every known strain, sorted.
    fn strains(&self) -> Vec<String>;

    /// Every genotyped locus, sorted.
    fn loci(&self) -> Vec<Locus>;

    fn contains_strain(&self, strain: &str) -> bool {
        self.strains().iter().any(|s| s == strain)
    }
}

/// `StrainDataset` held in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryDataset {
    genotypes : BTreeMap<String, BTreeMap<Locus, u8>>,
    phenotypes: BTreeMap<String, BTreeMap<String, String>>,
}

impl InMemoryDataset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// `DatasetError::InvalidGenotype` if `genotype` lies outside `{0, 1, 2}`
    pub fn insert_genotype(&mut self, strain: &str, locus: Locus, genotype: i64) -> Result<(), DatasetError> {
        let value = match u8::try_from(genotype) {
            Ok(g) if g <= 2 => g,
            _ => return Err(DatasetError::InvalidGenotype{strain: strain.to_string(), locus, value: genotype})
        };
        self.genotypes.entry(strain.to_string()).or_default().insert(locus, value);
        Ok(())
    }

    pub fn with_genotype(mut self, strain: &str, locus: &str, genotype: i64) -> Result<Self, DatasetError> {
        self.insert_genotype(strain, Locus::new(locus), genotype)?;
        Ok(self)
    }

    pub fn insert_phenotype(&mut self, strain: &str, key: &str, value: &str) {
        self.phenotypes.entry(strain.to_string()).or_default()
            .insert(key.trim().to_lowercase(), value.trim().to_lowercase());
    }

    #[must_use]
    pub fn with_phenotype(mut self, strain: &str, key: &str, value: &str) -> Self {
        self.insert_phenotype(strain, key, value);
        self
    }

    /// Number of recorded `(strain, locus)` genotypes.
    #[must_use]
    pub fn n_genotypes(&self) -> usize {
        self.genotypes.values().map(BTreeMap::len).sum()
    }
}

impl StrainDataset for InMemoryDataset {
    fn genotype_for(&self, strain: &str, locus: &Locus) -> Option<u8> {
        self.genotypes.get(strain).and_then(|loci| loci.get(locus)).copied()
    }

    fn phenotype_for(&self, strain: &str, key: &str) -> Option<String> {
        self.phenotypes.get(strain).and_then(|traits| traits.get(&key.to_lowercase())).cloned()
    }

    fn strains(&self) -> Vec<String> {
        self.genotypes.keys().chain(self.phenotypes.keys())
            .cloned()
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect()
    }

    fn loci(&self) -> Vec<Locus> {
        self.genotypes.values()
            .flat_map(BTreeMap::keys)
            .cloned()
            .collect::<BTreeSet<Locus>>()
            .into_iter()
            .collect()
    }
}
