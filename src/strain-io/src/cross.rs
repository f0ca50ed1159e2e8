use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
};

use located_error::prelude::*;
use log::debug;

use crate::{
    dataset::{DatasetError, Locus, StrainDataset},
    models::GeneModel,
};

/// Punnett-square outcome of crossing two inbred strains at a single locus.
/// # Fields:
/// - `genotypes` : probability of each offspring genotype count `[P(0), P(1), P(2)]`
/// - `phenotypes`: probability of each expressed phenotype, as given by the gene model.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossPrediction {
    pub strain_a  : String,
    pub strain_b  : String,
    pub locus     : Locus,
    pub genotypes : [f64; 3],
    pub phenotypes: BTreeMap<String, f64>,
}

impl CrossPrediction {
    #[must_use]
    pub fn most_likely_phenotype(&self) -> Option<&str> {
        self.phenotypes.iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(label, _)| label.as_str())
    }
}

impl Display for CrossPrediction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let [hom_ref, het, hom_alt] = self.genotypes;
        write!(f, "{} x {} @ {}: 0/0={hom_ref:.2} 0/1={het:.2} 1/1={hom_alt:.2} |", self.strain_a, self.strain_b, self.locus)?;
        for (phenotype, p) in &self.phenotypes {
            write!(f, " {phenotype}={p:.2}")?;
        }
        Ok(())
    }
}

/// Alleles transmitted by a parent of the given genotype count, each with probability 1/2.
fn gametes(genotype: u8) -> [u8; 2] {
    match genotype {
        0 => [0, 0],
        1 => [0, 1],
        _ => [1, 1],
    }
}

fn genotype_of<D: StrainDataset + ?Sized>(dataset: &D, strain: &str, locus: &Locus) -> Result<u8> {
    if !dataset.contains_strain(strain) {
        return Err(DatasetError::UnknownStrain(strain.to_string())).loc("While predicting a cross")
    }
    dataset.genotype_for(strain, locus)
        .ok_or_else(|| DatasetError::MissingGenotype{strain: strain.to_string(), locus: locus.clone()})
        .loc("While predicting a cross")
}

/// Enumerate the four equiprobable gamete combinations of `strain_a x strain_b` at `locus`.
/// 
/// # Errors
/// - `DatasetError::UnknownStrain` if either strain is absent from `dataset`
/// - `DatasetError::MissingGenotype` if either strain was not genotyped at `locus`
pub fn predict_cross<D: StrainDataset + ?Sized>(
    dataset : &D,
    strain_a: &str,
    strain_b: &str,
    locus   : &Locus,
    model   : &GeneModel
) -> Result<CrossPrediction> {
    let gt_a = genotype_of(dataset, strain_a, locus)?;
    let gt_b = genotype_of(dataset, strain_b, locus)?;

    let mut genotypes = [0.0; 3];
    let mut phenotypes = BTreeMap::new();
    for allele_a in gametes(gt_a) {
        for allele_b in gametes(gt_b) {
            let offspring = allele_a + allele_b;
            genotypes[usize::from(offspring)] += 0.25;
            *phenotypes.entry(model.express(offspring)).or_insert(0.0) += 0.25;
        }
    }
    debug!("{strain_a} x {strain_b} at {locus}: {gt_a} x {gt_b} -> {genotypes:?}");

    Ok(CrossPrediction {
        strain_a: strain_a.to_string(),
        strain_b: strain_b.to_string(),
        locus: locus.clone(),
        genotypes,
        phenotypes
    })
}

/// Loci at which both strains are genotyped and differ, in locus order, up to `max` entries.
/// 
/// # Errors
/// `DatasetError::UnknownStrain` if either strain is absent from `dataset`
pub fn detect_variable_loci<D: StrainDataset + ?Sized>(dataset: &D, strain_a: &str, strain_b: &str, max: usize) -> Result<Vec<Locus>> {
    for strain in [strain_a, strain_b] {
        if !dataset.contains_strain(strain) {
            return Err(DatasetError::UnknownStrain(strain.to_string())).loc("While detecting variable loci")
        }
    }
    Ok(dataset.loci().into_iter()
        .filter(|locus| match (dataset.genotype_for(strain_a, locus), dataset.genotype_for(strain_b, locus)) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        })
        .take(max)
        .collect()
    )
}
