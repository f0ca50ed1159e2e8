use thiserror::Error;
use crate::FileEntity;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("{0} {1} does not exist")]
    MissingFileEntity(FileEntity, String),

    #[error("{1} is not a {0}")]
    InvalidFileEntity(FileEntity, String),

    #[error("The provided value must lie between {0} and {1}")]
    ParseRatio(f64, f64),

    #[error("Failed to serialize command line arguments")]
    Serialize,

    #[error("Unable to deserialize arguments from {0}")]
    Deserialize(String),

    #[error("Unable to write arguments into {0}")]
    WriteArgs(String),
}
