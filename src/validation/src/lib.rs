mod error;
pub use error::ValidationError;

pub mod chi_square;
pub use chi_square::{chi_square, critical_value};

pub mod outcome;
pub use outcome::{Evidence, Method, ValidationOutcome};

pub mod experiments;
pub use experiments::*;

mod suite;
pub use suite::{SuiteParams, SuiteReport, ValidationSuite};
