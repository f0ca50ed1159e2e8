use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneModelError {
    #[error("Failed to open gene model file {0}")]
    Open(PathBuf),

    #[error("Failed to deserialize gene models")]
    Deserialize,
}
