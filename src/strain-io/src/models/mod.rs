use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::Path,
};

use located_error::prelude::*;
use serde::{Deserialize, Serialize};

mod error;
pub use error::GeneModelError;

/// Key of the fallback model, used for genes lacking a dedicated entry.
pub const DEFAULT_MODEL: &str = "DEFAULT";

/// Phenotype associated with a single genotype class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub phenotype: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenotypeTable {
    /// K: genotype count (`"0"`, `"1"`, `"2"`) | V: expressed outcome
    pub genotypes: BTreeMap<String, Outcome>,
}

/// Genotype-to-phenotype map of a single gene.
/// ```json
/// {"trait": "coat_color", "model": {"genotypes": {"0": {"phenotype": "pigmented"}}}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneModel {
    #[serde(rename = "trait")]
    pub trait_name: String,
    pub model: GenotypeTable,
}

impl GeneModel {
    /// Simple dominant model: the reference allele (`0`) is dominant over the alternative one.
    #[must_use]
    pub fn dominant(trait_name: &str, dominant_label: &str, recessive_label: &str) -> Self {
        let outcome = |label: &str| Outcome { phenotype: label.to_string(), description: String::new() };
        let genotypes = BTreeMap::from([
            ("0".to_string(), outcome(dominant_label)),
            ("1".to_string(), outcome(dominant_label)),
            ("2".to_string(), outcome(recessive_label)),
        ]);
        Self { trait_name: trait_name.to_string(), model: GenotypeTable { genotypes } }
    }

    /// Phenotype of a genotype count. Genotypes missing from the model express as `phenotype_<gt>`.
    #[must_use]
    pub fn express(&self, genotype: u8) -> String {
        self.model.genotypes.get(&genotype.to_string())
            .map_or_else(|| format!("phenotype_{genotype}"), |outcome| outcome.phenotype.clone())
    }
}

/// Collection of gene models, keyed by gene symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneModels {
    genes: BTreeMap<String, GeneModel>,
}

impl GeneModels {
    /// # Errors
    /// - `GeneModelError::Open` if `path` cannot be opened.
    /// - `GeneModelError::Deserialize` if the file is not a valid `{"genes": {...}}` document.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).with_loc(|| GeneModelError::Open(path.to_path_buf()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_loc(|| GeneModelError::Deserialize)
            .with_loc(|| format!("While parsing {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).with_loc(|| GeneModelError::Deserialize)
    }

    #[must_use]
    pub fn with_model(mut self, gene: &str, model: GeneModel) -> Self {
        self.genes.insert(gene.to_string(), model);
        self
    }

    /// Model of `gene`, falling back to the `DEFAULT` entry.
    #[must_use]
    pub fn get(&self, gene: &str) -> Option<&GeneModel> {
        self.genes.get(gene).or_else(|| self.genes.get(DEFAULT_MODEL))
    }

    pub fn genes(&self) -> impl Iterator<Item = &str> {
        self.genes.keys().map(String::as_str)
    }
}
