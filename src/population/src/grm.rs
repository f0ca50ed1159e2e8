use std::sync::Arc;

use genome::AlleleFrequencies;
use located_error::prelude::*;
use rayon::prelude::*;

use crate::{error::PopulationError, mouse::{Mouse, MouseId}};

/// VanRaden genomic relationship matrix over a set of mice.
/// 
/// `GRM = Z Zᵗ / Σ_j 2 p_j (1 - p_j)`, where `Z_ij = g_ij - 2 p_j`. Loci fixed in the reference
/// frequencies (`p_j ∈ {0, 1}`) contribute to neither the numerator nor the denominator. The
/// diagonal estimates `1 + F`.
#[derive(Debug, Clone)]
pub struct Grm {
    ids   : Vec<MouseId>,
    matrix: Vec<Vec<f64>>,
}

impl Grm {
    /// Compute the matrix with allele frequencies estimated from the mice themselves.
    /// 
    /// # Errors
    /// - `EmptyPopulation` for an empty input
    /// - `MarkerCountMismatch` if genomes differ in length
    /// - `DegenerateStatistic` if every locus is fixed.
    pub fn compute(mice: &[Arc<Mouse>]) -> Result<Self> {
        let rows = genotype_rows(mice)?;
        let freqs = AlleleFrequencies::from_genotypes(rows.iter().map(Vec::as_slice))
            .loc("While estimating sample allele frequencies")?;
        Self::from_rows(mice, &rows, &freqs)
    }

    /// Compute the matrix against fixed reference (e.g. founder) allele frequencies.
    pub fn compute_with_frequencies(mice: &[Arc<Mouse>], freqs: &AlleleFrequencies) -> Result<Self> {
        let rows = genotype_rows(mice)?;
        if rows[0].len() != freqs.len() {
            return Err(PopulationError::LengthMismatch(rows[0].len(), freqs.len()))
                .loc("Reference allele frequencies do not match the number of markers")
        }
        Self::from_rows(mice, &rows, freqs)
    }

    fn from_rows(mice: &[Arc<Mouse>], rows: &[Vec<u8>], freqs: &AlleleFrequencies) -> Result<Self> {
        let informative: Vec<usize> = (0..freqs.len()).filter(|j| freqs[*j] > 0.0 && freqs[*j] < 1.0).collect();
        let denominator: f64 = informative.iter().map(|j| 2.0 * freqs[*j] * (1.0 - freqs[*j])).sum();
        if denominator <= 0.0 {
            return Err(PopulationError::DegenerateStatistic("every marker locus is fixed"))
                .loc("While computing the genomic relationship matrix")
        }

        let centered: Vec<Vec<f64>> = rows.par_iter()
            .map(|row| informative.iter().map(|j| f64::from(row[*j]) - 2.0 * freqs[*j]).collect())
            .collect();

        let matrix: Vec<Vec<f64>> = (0..centered.len()).into_par_iter()
            .map(|i| centered.iter()
                .map(|other| centered[i].iter().zip(other).map(|(a, b)| a * b).sum::<f64>() / denominator)
                .collect()
            )
            .collect();

        Ok(Self { ids: mice.iter().map(|m| m.id()).collect(), matrix })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn ids(&self) -> &[MouseId] {
        &self.ids
    }

    /// Entry `(i, j)`, by row index. `None` when out of bounds.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.matrix.get(i)?.get(j).copied()
    }

    pub fn get_by_id(&self, a: MouseId, b: MouseId) -> Result<f64> {
        let index = |id| self.ids.iter().position(|x| *x == id).ok_or(PopulationError::UnknownMouse(id));
        let (i, j) = (index(a).loc("While reading the GRM")?, index(b).loc("While reading the GRM")?);
        Ok(self.matrix[i][j])
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.matrix
    }

    #[must_use]
    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.matrix[i][i]).collect()
    }

    /// `diag(GRM) - 1`
    #[must_use]
    pub fn genomic_inbreeding(&self) -> Vec<f64> {
        self.diagonal().into_iter().map(|d| d - 1.0).collect()
    }

    #[must_use]
    pub fn mean_diagonal(&self) -> f64 {
        self.diagonal().iter().sum::<f64>() / self.len() as f64
    }

    /// Mean of the upper triangle. `None` for fewer than two individuals.
    #[must_use]
    pub fn mean_off_diagonal(&self) -> Option<f64> {
        let n = self.len();
        if n < 2 {
            return None
        }
        let sum: f64 = (0..n).flat_map(|i| (i + 1..n).map(move |j| (i, j))).map(|(i, j)| self.matrix[i][j]).sum();
        Some(sum / (n * (n - 1) / 2) as f64)
    }
}

fn genotype_rows(mice: &[Arc<Mouse>]) -> Result<Vec<Vec<u8>>> {
    let first = mice.first().ok_or(PopulationError::EmptyPopulation).loc("While computing the genomic relationship matrix")?;
    let expected = first.genome().n_markers();
    mice.iter().map(|m| {
        let got = m.genome().n_markers();
        if got != expected {
            return Err(PopulationError::MarkerCountMismatch{id: m.id(), expected, got}).loc("While computing the genomic relationship matrix")
        }
        Ok(m.genome().genotypes())
    }).collect()
}
