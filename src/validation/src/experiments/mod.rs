mod mendelian;
pub use mendelian::{mendelian, MendelianParams};

mod grm_accuracy;
pub use grm_accuracy::{grm_accuracy, GrmParams};

mod inbreeding;
pub use inbreeding::{inbreeding_correlation, InbreedingParams};

mod heritability;
pub use heritability::{heritability, HeritabilityParams};

mod real_mode;
pub use real_mode::{real_mode_predictions, RealModeParams};
