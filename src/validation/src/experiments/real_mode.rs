use located_error::prelude::*;
use log::{debug, info, warn};
use strain_io::{predict_cross, reference::{self, DocumentedCross}, GeneModels, StrainDataset};

use crate::outcome::{Evidence, Method, ValidationOutcome};

/// Parameters of the real-data prediction experiment: documented crosses, evaluated against a
/// dataset and a set of gene models.
pub struct RealModeParams<'a> {
    pub dataset  : &'a dyn StrainDataset,
    pub models   : GeneModels,
    pub crosses  : Vec<DocumentedCross>,
    pub threshold: f64,
}

impl RealModeParams<'_> {
    /// Classic coat colour crosses of C57BL/6J, BALB/cJ, DBA/2J and A/J.
    #[must_use]
    pub fn classic(panel: &dyn StrainDataset) -> RealModeParams<'_> {
        RealModeParams { dataset: panel, models: reference::classic_models(), crosses: reference::classic_crosses(), threshold: 0.8 }
    }
}

/// Predict the most likely F1 phenotype of every documented cross by Punnett enumeration, and
/// compare it with the documented outcome. A cross that cannot be predicted (missing strain,
/// locus or model) counts as a wrong prediction.
pub fn real_mode_predictions(params: &RealModeParams) -> Result<ValidationOutcome> {
    info!("Real-mode predictions: {} documented crosses", params.crosses.len());
    let mut correct = 0;
    for cross in &params.crosses {
        let Some(model) = params.models.get(cross.gene) else {
            warn!("No gene model for {}: counting {} x {} as a failed prediction", cross.gene, cross.strain_a, cross.strain_b);
            continue
        };
        match predict_cross(params.dataset, cross.strain_a, cross.strain_b, &cross.locus(), model) {
            Ok(prediction) => {
                let predicted = prediction.most_likely_phenotype();
                debug!("{} x {} at {}: predicted {predicted:?}, documented {}", cross.strain_a, cross.strain_b, cross.gene, cross.expected);
                correct += usize::from(predicted == Some(cross.expected));
            },
            Err(e) => warn!("{} x {} at {}: {e}", cross.strain_a, cross.strain_b, cross.gene),
        }
    }

    let total = params.crosses.len();
    let accuracy = if total == 0 { 0.0 } else { correct as f64 / total as f64 };
    let evidence = Evidence::RealMode{correct, total, accuracy, threshold: params.threshold};
    Ok(ValidationOutcome::new(Method::RealMode, total > 0 && accuracy >= params.threshold, evidence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strain_io::InMemoryDataset;

    #[test]
    fn classic_crosses_are_predicted() -> Result<()> {
        let panel = reference::classic_panel()?;
        let outcome = real_mode_predictions(&RealModeParams::classic(&panel))?;
        assert!(outcome.passed, "{outcome}");
        assert_eq!(outcome.evidence, Evidence::RealMode{correct: 6, total: 6, accuracy: 1.0, threshold: 0.8});
        Ok(())
    }

    #[test]
    fn missing_data_fails_without_error() -> Result<()> {
        let empty = InMemoryDataset::new();
        let outcome = real_mode_predictions(&RealModeParams::classic(&empty))?;
        assert!(!outcome.passed);
        Ok(())
    }
}
