use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use located_error::prelude::*;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::dataset::{InMemoryDataset, Locus, StrainDataset};

mod error;
pub use error::ReadError;

/// Single line of a genotype table.
/// ### File characteristics:
/// - Comma-separated fields, with a header.
/// - Columns: `strain`, `chr`, `pos`, `genotype_012`
/// - Empty genotype fields are treated as missing data.
#[derive(Debug, Deserialize)]
struct GenotypeRecord {
    strain      : String,
    chr         : String,
    pos         : u64,
    genotype_012: Option<i64>,
}

/// Real-strain dataset parsed from `.csv` tables.
/// ### Fields:
/// - `source` : path of the genotype table.
/// - `inner`  : parsed genotypes and phenotypes.
#[derive(Debug, Clone)]
pub struct CsvDataset {
    source: PathBuf,
    inner : InMemoryDataset,
}

impl CsvDataset {
    /// Load a genotype table, and optionally a phenotype table (`strain,<trait>,<trait>,...`).
    /// 
    /// # Errors
    /// - `ReadError::Open` if either file cannot be opened.
    /// - `ReadError::InvalidRecord` on malformed lines.
    /// - `DatasetError::InvalidGenotype` on genotype values outside `{0, 1, 2}`
    pub fn from_paths(genotypes: &Path, phenotypes: Option<&Path>) -> Result<Self> {
        info!("Parsing strain genotypes from {}", genotypes.display());
        let file = File::open(genotypes).with_loc(|| ReadError::Open(genotypes.to_path_buf()))?;
        let mut inner = InMemoryDataset::new();
        Self::read_genotypes(file, &mut inner)
            .with_loc(|| format!("While parsing {}", genotypes.display()))?;

        if let Some(path) = phenotypes {
            info!("Parsing strain phenotypes from {}", path.display());
            let file = File::open(path).with_loc(|| ReadError::Open(path.to_path_buf()))?;
            Self::read_phenotypes(file, &mut inner)
                .with_loc(|| format!("While parsing {}", path.display()))?;
        }
        Ok(Self { source: genotypes.to_path_buf(), inner })
    }

    /// Parse genotype records into `dataset`. Returns the number of recorded genotypes.
    pub fn read_genotypes<R: Read>(reader: R, dataset: &mut InMemoryDataset) -> Result<usize> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut recorded = 0;
        for (i, record) in rdr.deserialize::<GenotypeRecord>().enumerate() {
            // Line 1 is the header.
            let line = i as u64 + 2;
            let record = record.with_loc(|| ReadError::InvalidRecord{line})?;
            let locus = Locus::coordinate(&record.chr, record.pos);
            match record.genotype_012 {
                Some(genotype) => {
                    dataset.insert_genotype(&record.strain, locus, genotype)
                        .with_loc(|| ReadError::InvalidRecord{line})?;
                    recorded += 1;
                },
                None => warn!("Line {line}: missing genotype for strain '{}' at {locus}. Skipping.", record.strain),
            }
        }
        debug!("Recorded {recorded} genotypes");
        Ok(recorded)
    }

    /// Parse a phenotype table into `dataset`. Returns the number of recorded phenotypes.
    pub fn read_phenotypes<R: Read>(reader: R, dataset: &mut InMemoryDataset) -> Result<usize> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers().loc("While reading phenotype table headers")?.clone();
        let strain_col = headers.iter()
            .position(|h| h.eq_ignore_ascii_case("strain"))
            .loc(ReadError::MissingStrainColumn)?;

        let mut recorded = 0;
        for (i, record) in rdr.records().enumerate() {
            let line = i as u64 + 2;
            let record = record.with_loc(|| ReadError::InvalidRecord{line})?;
            let strain = record.get(strain_col).with_loc(|| ReadError::InvalidRecord{line})?;
            for (key, value) in headers.iter().zip(record.iter()).enumerate()
                .filter(|(col, (_, value))| *col != strain_col && !value.is_empty())
                .map(|(_, field)| field)
            {
                dataset.insert_phenotype(strain, key, value);
                recorded += 1;
            }
        }
        debug!("Recorded {recorded} phenotypes");
        Ok(recorded)
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    #[must_use]
    pub fn inner(&self) -> &InMemoryDataset {
        &self.inner
    }
}

impl StrainDataset for CsvDataset {
    fn genotype_for(&self, strain: &str, locus: &Locus) -> Option<u8> {
        self.inner.genotype_for(strain, locus)
    }

    fn phenotype_for(&self, strain: &str, key: &str) -> Option<String> {
        self.inner.phenotype_for(strain, key)
    }

    fn strains(&self) -> Vec<String> {
        self.inner.strains()
    }

    fn loci(&self) -> Vec<Locus> {
        self.inner.loci()
    }
}
