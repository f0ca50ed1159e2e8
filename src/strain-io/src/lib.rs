pub mod dataset;
pub use dataset::{DatasetError, InMemoryDataset, Locus, StrainDataset};

pub mod read;
pub use read::CsvDataset;

pub mod models;
pub use models::{GeneModel, GeneModels};

pub mod cross;
pub use cross::{detect_variable_loci, predict_cross, CrossPrediction};

pub mod parse;
pub use parse::gene_name_from_path;

pub mod reference;
