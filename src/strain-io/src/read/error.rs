use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Failed to open {0}")]
    Open(PathBuf),

    #[error("Invalid record at line {line}")]
    InvalidRecord{line: u64},

    #[error("Phenotype table does not carry a 'strain' column")]
    MissingStrainColumn,
}
