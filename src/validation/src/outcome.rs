use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use population::HeritabilityEstimate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The five validation experiments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Mendelian,
    GrmAccuracy,
    InbreedingCorrelation,
    Heritability,
    RealMode,
}

impl Method {
    pub const ALL: [Method; 5] = [Self::Mendelian, Self::GrmAccuracy, Self::InbreedingCorrelation, Self::Heritability, Self::RealMode];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Mendelian             => "mendelian",
            Self::GrmAccuracy           => "grm_accuracy",
            Self::InbreedingCorrelation => "inbreeding_correlation",
            Self::Heritability          => "heritability",
            Self::RealMode              => "real_mode",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "mendelian"                             => Ok(Self::Mendelian),
            "grm" | "grm_accuracy"                  => Ok(Self::GrmAccuracy),
            "inbreeding" | "inbreeding_correlation" => Ok(Self::InbreedingCorrelation),
            "heritability"                          => Ok(Self::Heritability),
            "real" | "real_mode"                    => Ok(Self::RealMode),
            other => Err(ValidationError::InvalidParameter(format!("unknown validation method '{other}'"))),
        }
    }
}

/// Numeric proof backing a pass/fail decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Evidence {
    Mendelian {
        /// Offspring genotype counts: homozygous first symbol, heterozygous, homozygous second symbol.
        counts              : [usize; 3],
        chi_square          : f64,
        critical            : f64,
        /// 3:1 dominant/recessive phenotype test, informative only.
        phenotype_chi_square: f64,
    },
    GrmAccuracy {
        mean_absolute_error: f64,
        tolerance          : f64,
        pairs              : usize,
    },
    InbreedingCorrelation {
        r         : Option<f64>,
        threshold : f64,
        mean_f_ped: f64,
        mean_f_grm: f64,
        n         : usize,
    },
    Heritability {
        estimate       : Option<HeritabilityEstimate>,
        midparent_slope: Option<f64>,
        target         : f64,
        tolerance      : f64,
    },
    RealMode {
        correct  : usize,
        total    : usize,
        accuracy : f64,
        threshold: f64,
    },
}

impl Display for Evidence {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let opt = |value: &Option<f64>| value.map_or_else(|| String::from("NA"), |v| format!("{v:.3}"));
        match self {
            Self::Mendelian{counts, chi_square, critical, phenotype_chi_square} => write!(f,
                "chi2 = {chi_square:.3} (critical {critical:.3}) | counts {}/{}/{} | phenotypic chi2 = {phenotype_chi_square:.3}",
                counts[0], counts[1], counts[2]
            ),
            Self::GrmAccuracy{mean_absolute_error, tolerance, pairs} => write!(f,
                "MAE = {mean_absolute_error:.4} (tolerance {tolerance}) over {pairs} pairs"
            ),
            Self::InbreedingCorrelation{r, threshold, mean_f_ped, mean_f_grm, n} => write!(f,
                "r = {} (threshold {threshold}) | mean F_ped {mean_f_ped:.4} | mean F_grm {mean_f_grm:.4} | n = {n}", opt(r)
            ),
            Self::Heritability{estimate, midparent_slope, target, tolerance} => {
                let h2 = estimate.map(|e| e.h2);
                write!(f, "h2 = {} (target {target} ± {tolerance}) | mid-parent slope {}", opt(&h2), opt(midparent_slope))?;
                if let Some(e) = estimate {
                    write!(f, " | S = {:.3} R = {:.3}", e.selection_differential, e.response)?;
                }
                Ok(())
            },
            Self::RealMode{correct, total, accuracy, threshold} => write!(f,
                "{correct}/{total} correct predictions (accuracy {:.1}%, threshold {:.1}%)", accuracy * 100.0, threshold * 100.0
            ),
        }
    }
}

/// Result of a single validation experiment. A failed experiment is a valid outcome, not an error.
/// # Fields:
/// - `note`: reason of a failure caused by an undefined statistic, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutcome {
    pub method  : Method,
    pub passed  : bool,
    pub evidence: Evidence,
    pub note    : Option<String>,
}

impl ValidationOutcome {
    #[must_use]
    pub fn new(method: Method, passed: bool, evidence: Evidence) -> Self {
        Self { method, passed, evidence, note: None }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

impl Display for ValidationOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "PASS" } else { "FAIL" };
        write!(f, "[{status}] {:<22} {}", self.method.name(), self.evidence)?;
        if let Some(note) = &self.note {
            write!(f, " ({note})")?;
        }
        Ok(())
    }
}
