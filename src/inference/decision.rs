//! Threshold-based decision on the top-ranked prediction.

use crate::inference::normalize::RawPrediction;
use crate::registry::{SpeciesMetadata, SpeciesRegistry};
use serde::{Deserialize, Serialize};

/// Outcome of classifying one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Decision {
    /// The upstream returned no usable predictions.
    NoPredictions,
    /// The top label matches no known species.
    UnrecognizedSpecies,
    /// Known invasive species at or above the threshold.
    AutoFlaggedInvasive,
    /// Known native species at or above the threshold.
    AutoIdentifiedNative,
    /// Known species below the threshold.
    LowConfidence,
}

impl Decision {
    /// Wire name of the decision.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoPredictions => "no-predictions",
            Self::UnrecognizedSpecies => "unrecognized-species",
            Self::AutoFlaggedInvasive => "auto-flagged-invasive",
            Self::AutoIdentifiedNative => "auto-identified-native",
            Self::LowConfidence => "low-confidence",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prediction with its resolved species, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPrediction {
    /// Label as reported by the model.
    pub label: String,
    /// Score as reported by the model.
    pub score: f32,
    /// Matching species, `None` when the label is unknown.
    pub species: Option<SpeciesMetadata>,
}

impl EnrichedPrediction {
    /// Resolve a raw prediction against the registry.
    pub fn resolve(raw: RawPrediction, registry: &SpeciesRegistry) -> Self {
        let species = registry.lookup(&raw.label).map(|record| record.metadata());
        Self {
            label: raw.label,
            score: raw.score,
            species,
        }
    }
}

/// Final, decision-annotated classification of one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Decision derived from the top prediction.
    pub decision: Decision,
    /// Invasive signal; `None` when no signal should be surfaced.
    pub invasive: Option<bool>,
    /// Threshold the decision was made against.
    pub threshold: f32,
    /// First entry of `predictions`, if any.
    pub top_prediction: Option<EnrichedPrediction>,
    /// Ranked predictions, at most `top_k`.
    pub predictions: Vec<EnrichedPrediction>,
}

impl ClassificationResult {
    /// Build the result for already ranked, truncated and enriched predictions.
    pub fn from_predictions(predictions: Vec<EnrichedPrediction>, threshold: f32) -> Self {
        let (decision, invasive) = decide(&predictions, threshold);
        Self {
            decision,
            invasive,
            threshold,
            top_prediction: predictions.first().cloned(),
            predictions,
        }
    }
}

/// Derive the decision and invasive signal from the top prediction.
///
/// The comparison against `threshold` is inclusive. Below the threshold an
/// invasive match still reports `Some(true)` while a native match reports
/// `None`, so a weak invasive signal is never hidden.
pub fn decide(predictions: &[EnrichedPrediction], threshold: f32) -> (Decision, Option<bool>) {
    let Some(top) = predictions.first() else {
        return (Decision::NoPredictions, None);
    };

    let Some(species) = top.species.as_ref() else {
        return (Decision::UnrecognizedSpecies, None);
    };

    if top.score >= threshold {
        let decision = if species.is_invasive {
            Decision::AutoFlaggedInvasive
        } else {
            Decision::AutoIdentifiedNative
        };
        (decision, Some(species.is_invasive))
    } else {
        (
            Decision::LowConfidence,
            species.is_invasive.then_some(true),
        )
    }
}
