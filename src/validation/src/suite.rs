use std::fmt::{self, Display, Formatter};

use located_error::prelude::*;
use log::info;
use serde::Serialize;
use strain_io::{reference, InMemoryDataset};

use crate::{
    experiments::*,
    outcome::{Method, ValidationOutcome},
};

/// Parameters of every experiment of the suite.
#[derive(Debug, Clone)]
pub struct SuiteParams {
    pub mendelian   : MendelianParams,
    pub grm         : GrmParams,
    pub inbreeding  : InbreedingParams,
    pub heritability: HeritabilityParams,
    /// Minimum accuracy of the real-data predictions, evaluated on the classic reference panel.
    pub real_mode_threshold: f64,
}

impl Default for SuiteParams {
    fn default() -> Self {
        Self {
            mendelian          : MendelianParams::default(),
            grm                : GrmParams::default(),
            inbreeding         : InbreedingParams::default(),
            heritability       : HeritabilityParams::default(),
            real_mode_threshold: 0.8,
        }
    }
}

impl SuiteParams {
    /// Default parameters, with every experiment seeded from `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        let mut params = Self::default();
        params.mendelian.seed    = seed;
        params.grm.seed          = seed;
        params.inbreeding.seed   = seed;
        params.heritability.seed = seed;
        params
    }
}

/// Ordered outcomes of a validation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteReport {
    pub outcomes: Vec<ValidationOutcome>,
}

impl SuiteReport {
    #[must_use]
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.passed() == self.outcomes.len()
    }
}

impl Display for SuiteReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            writeln!(f, "{outcome}")?;
        }
        write!(f, "{}/{} validation(s) passed", self.passed(), self.outcomes.len())
    }
}

pub struct ValidationSuite;

impl ValidationSuite {
    /// Run a single experiment.
    pub fn run(method: Method, params: &SuiteParams) -> Result<ValidationOutcome> {
        let outcome = match method {
            Method::Mendelian             => mendelian(&params.mendelian),
            Method::GrmAccuracy           => grm_accuracy(&params.grm),
            Method::InbreedingCorrelation => inbreeding_correlation(&params.inbreeding),
            Method::Heritability          => heritability(&params.heritability),
            Method::RealMode              => {
                let panel: InMemoryDataset = reference::classic_panel()?;
                let real = RealModeParams{threshold: params.real_mode_threshold, ..RealModeParams::classic(&panel)};
                real_mode_predictions(&real)
            },
        }.with_loc(|| format!("While running the {method} validation"))?;
        info!("{outcome}");
        Ok(outcome)
    }

    /// Run the given experiments, in order.
    pub fn run_methods(methods: &[Method], params: &SuiteParams) -> Result<SuiteReport> {
        let outcomes = methods.iter()
            .map(|method| Self::run(*method, params))
            .collect::<Result<Vec<_>>>()?;
        Ok(SuiteReport{outcomes})
    }

    pub fn run_all(params: &SuiteParams) -> Result<SuiteReport> {
        Self::run_methods(&Method::ALL, params)
    }
}
