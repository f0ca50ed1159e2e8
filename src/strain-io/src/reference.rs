//! Documented coat-colour genotypes of classic inbred strains, usable as a built-in dataset.
//!
//! Genotypes are `0/1/2` counts of the mutant allele:
//! - `Tyr`  : albino `c`     (BALB/cJ and A/J are `c/c`)
//! - `Tyrp1`: brown `b`      (BALB/cJ, A/J and DBA/2J are `b/b`)
//! - `Myo5a`: dilute `d`     (DBA/2J is `d/d`)

use crate::{
    dataset::{DatasetError, InMemoryDataset, Locus},
    models::{GeneModel, GeneModels},
};

pub const C57BL6J: &str = "C57BL/6J";
pub const BALBCJ : &str = "BALB/cJ";
pub const AJ     : &str = "A/J";
pub const DBA2J  : &str = "DBA/2J";

const PANEL: [(&str, [i64; 3], &str); 4] = [
    // strain    Tyr Tyrp1 Myo5a   coat colour
    (C57BL6J, [0, 0, 0], "black"),
    (BALBCJ,  [2, 2, 0], "albino"),
    (AJ,      [2, 2, 0], "albino"),
    (DBA2J,   [0, 2, 2], "dilute brown"),
];

const GENES: [&str; 3] = ["Tyr", "Tyrp1", "Myo5a"];

/// F1 outcome of a cross, as documented in the literature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentedCross {
    pub strain_a : &'static str,
    pub strain_b : &'static str,
    pub gene     : &'static str,
    pub expected : &'static str,
}

impl DocumentedCross {
    #[must_use]
    pub fn locus(&self) -> Locus {
        Locus::new(self.gene)
    }
}

pub fn classic_panel() -> Result<InMemoryDataset, DatasetError> {
    let mut dataset = InMemoryDataset::new();
    for (strain, genotypes, coat) in PANEL {
        for (gene, genotype) in GENES.iter().zip(genotypes) {
            dataset.insert_genotype(strain, Locus::new(gene), genotype)?;
        }
        dataset.insert_phenotype(strain, "coat_color", coat);
    }
    Ok(dataset)
}

#[must_use]
pub fn classic_models() -> GeneModels {
    GeneModels::default()
        .with_model("Tyr",   GeneModel::dominant("coat_color", "pigmented", "albino"))
        .with_model("Tyrp1", GeneModel::dominant("coat_color", "black", "brown"))
        .with_model("Myo5a", GeneModel::dominant("coat_color", "non-dilute", "dilute"))
}

#[must_use]
pub fn classic_crosses() -> Vec<DocumentedCross> {
    let cross = |strain_a, strain_b, gene, expected| DocumentedCross { strain_a, strain_b, gene, expected };
    vec![
        cross(C57BL6J, BALBCJ, "Tyr",   "pigmented"),
        cross(C57BL6J, DBA2J,  "Tyrp1", "black"),
        cross(BALBCJ,  AJ,     "Tyr",   "albino"),
        cross(DBA2J,   BALBCJ, "Tyrp1", "brown"),
        cross(C57BL6J, DBA2J,  "Myo5a", "non-dilute"),
        cross(DBA2J,   AJ,     "Myo5a", "non-dilute"),
    ]
}
