//! Classification pipeline: normalize, rank, truncate, enrich, decide.

use crate::config::{ClassificationConfig, Ranking};
use crate::error::Result;
use crate::inference::decision::{ClassificationResult, EnrichedPrediction};
use crate::inference::gateway::InferenceGateway;
use crate::inference::normalize::{RawPayload, RawPrediction, normalize_payload};
use crate::pipeline::ImageUpload;
use crate::registry::SpeciesRegistry;
use std::sync::Arc;
use tracing::debug;

/// Options controlling how predictions become a decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierOptions {
    /// Maximum number of predictions kept.
    pub top_k: usize,
    /// Inclusive confidence threshold.
    pub threshold: f32,
    /// Ordering applied before truncation.
    pub ranking: Ranking,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self::from(&ClassificationConfig::default())
    }
}

impl From<&ClassificationConfig> for ClassifierOptions {
    fn from(config: &ClassificationConfig) -> Self {
        Self {
            top_k: config.top_k,
            threshold: config.threshold,
            ranking: config.ranking,
        }
    }
}

/// Turns upstream replies into classification results.
///
/// Holds only read-only state; one instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct SpeciesClassifier {
    registry: Arc<SpeciesRegistry>,
    options: ClassifierOptions,
}

impl SpeciesClassifier {
    /// Create a classifier over a species registry.
    pub fn new(registry: Arc<SpeciesRegistry>, options: ClassifierOptions) -> Self {
        Self { registry, options }
    }

    /// Species registry in use.
    pub fn registry(&self) -> &SpeciesRegistry {
        &self.registry
    }

    /// Active options.
    pub fn options(&self) -> &ClassifierOptions {
        &self.options
    }

    /// Send an image through the gateway and classify the reply.
    ///
    /// Gateway failures are returned unchanged; nothing is retried.
    pub async fn classify_image<G: InferenceGateway>(
        &self,
        gateway: &G,
        upload: &ImageUpload,
    ) -> Result<ClassificationResult> {
        let response = gateway.infer(upload).await?;
        debug!(
            "Upstream replied for {} (content type: {})",
            upload.path.display(),
            response.mime_type.as_deref().unwrap_or("unknown")
        );
        self.classify_payload(&response.payload)
    }

    /// Classify a gateway reply.
    pub fn classify_payload(&self, payload: &RawPayload) -> Result<ClassificationResult> {
        let predictions = normalize_payload(payload)?;
        Ok(self.classify_predictions(predictions))
    }

    /// Rank, truncate, enrich and decide on normalized predictions.
    pub fn classify_predictions(&self, predictions: Vec<RawPrediction>) -> ClassificationResult {
        let ranked = rank(predictions, self.options.ranking);
        let total = ranked.len();

        let enriched: Vec<EnrichedPrediction> = ranked
            .into_iter()
            .take(self.options.top_k)
            .map(|raw| EnrichedPrediction::resolve(raw, &self.registry))
            .collect();

        debug!(
            "Kept {} of {} predictions (top_k={}, ranking={})",
            enriched.len(),
            total,
            self.options.top_k,
            self.options.ranking
        );

        ClassificationResult::from_predictions(enriched, self.options.threshold)
    }
}

/// Order predictions according to the ranking policy.
pub fn rank(mut predictions: Vec<RawPrediction>, ranking: Ranking) -> Vec<RawPrediction> {
    if ranking == Ranking::Score {
        // Stable: ties keep upstream order.
        predictions.sort_by(|a, b| b.score.total_cmp(&a.score));
    }
    predictions
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::inference::decision::Decision;
    use crate::registry::SpeciesRecord;
    use serde_json::json;

    fn classifier(options: ClassifierOptions) -> SpeciesClassifier {
        SpeciesClassifier::new(Arc::new(SpeciesRegistry::builtin().clone()), options)
    }

    fn labels(result: &ClassificationResult) -> Vec<&str> {
        result.predictions.iter().map(|p| p.label.as_str()).collect()
    }

    #[test]
    fn test_truncates_to_top_k_in_input_order() {
        let classifier = classifier(ClassifierOptions {
            top_k: 2,
            ..ClassifierOptions::default()
        });
        let predictions = vec![
            RawPrediction::new("a", 0.1),
            RawPrediction::new("b", 0.9),
            RawPrediction::new("c", 0.8),
            RawPrediction::new("d", 0.7),
            RawPrediction::new("e", 0.6),
        ];
        let result = classifier.classify_predictions(predictions);
        assert_eq!(labels(&result), vec!["a", "b"]);
    }

    #[test]
    fn test_score_ranking_sorts_before_truncation() {
        let classifier = classifier(ClassifierOptions {
            top_k: 2,
            ranking: Ranking::Score,
            ..ClassifierOptions::default()
        });
        let predictions = vec![
            RawPrediction::new("a", 0.1),
            RawPrediction::new("b", 0.9),
            RawPrediction::new("c", 0.8),
        ];
        let result = classifier.classify_predictions(predictions);
        assert_eq!(labels(&result), vec!["b", "c"]);
    }

    #[test]
    fn test_score_ranking_is_stable_for_ties() {
        let ranked = rank(
            vec![
                RawPrediction::new("first", 0.5),
                RawPrediction::new("second", 0.5),
                RawPrediction::new("top", 0.7),
            ],
            Ranking::Score,
        );
        let labels: Vec<&str> = ranked.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["top", "first", "second"]);
    }

    #[test]
    fn test_upstream_ranking_passes_inversions_through() {
        let ranked = rank(
            vec![RawPrediction::new("low", 0.1), RawPrediction::new("high", 0.9)],
            Ranking::Upstream,
        );
        assert_eq!(ranked[0].label, "low");
    }

    #[test]
    fn test_single_object_scientific_alias_is_flagged() {
        let classifier = classifier(ClassifierOptions::default());
        let payload = RawPayload::Json(json!({"label": "pterois volitans", "score": 0.95}));
        let result = classifier.classify_payload(&payload).unwrap();
        assert_eq!(result.decision, Decision::AutoFlaggedInvasive);
        assert_eq!(result.invasive, Some(true));
        assert_eq!(result.threshold, 0.6);
        let top = result.top_prediction.unwrap();
        assert_eq!(top.species.unwrap().common_name, "Red Lionfish");
    }

    #[test]
    fn test_empty_sequence_has_no_predictions() {
        let classifier = classifier(ClassifierOptions::default());
        let result = classifier
            .classify_payload(&RawPayload::Json(json!([])))
            .unwrap();
        assert_eq!(result.decision, Decision::NoPredictions);
        assert_eq!(result.invasive, None);
        assert!(result.top_prediction.is_none());
    }

    #[test]
    fn test_unrecognized_shape_degrades_to_no_predictions() {
        let classifier = classifier(ClassifierOptions::default());
        let result = classifier
            .classify_payload(&RawPayload::Json(json!(17)))
            .unwrap();
        assert_eq!(result.decision, Decision::NoPredictions);
    }

    #[test]
    fn test_undecodable_text_is_an_error() {
        let classifier = classifier(ClassifierOptions::default());
        let result = classifier.classify_payload(&RawPayload::Text("no idea".into()));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_sole_prediction_is_unrecognized() {
        let classifier = classifier(ClassifierOptions::default());
        let result = classifier.classify_predictions(vec![RawPrediction::new("manatee", 0.99)]);
        assert_eq!(result.decision, Decision::UnrecognizedSpecies);
        assert_eq!(result.invasive, None);
    }

    #[test]
    fn test_low_confidence_native_from_text_reply() {
        let classifier = classifier(ClassifierOptions::default());
        let payload = RawPayload::Text(
            "```json\n[{\"label\": \"Nurse Shark\", \"score\": 0.41}]\n```".to_string(),
        );
        let result = classifier.classify_payload(&payload).unwrap();
        assert_eq!(result.decision, Decision::LowConfidence);
        assert_eq!(result.invasive, None);
    }

    #[test]
    fn test_substitute_registry() {
        let registry = SpeciesRegistry::new(
            [SpeciesRecord {
                key: "cane toad".into(),
                common_name: "Cane Toad".into(),
                scientific_name: "Rhinella marina".into(),
                is_invasive: true,
                notes: None,
            }],
            [("bufo", "cane toad")],
        );
        let classifier = SpeciesClassifier::new(Arc::new(registry), ClassifierOptions::default());
        let result = classifier.classify_predictions(vec![RawPrediction::new("Bufo", 0.3)]);
        assert_eq!(result.decision, Decision::LowConfidence);
        assert_eq!(result.invasive, Some(true));

        let lionfish = classifier.classify_predictions(vec![RawPrediction::new("lionfish", 0.9)]);
        assert_eq!(lionfish.decision, Decision::UnrecognizedSpecies);
    }
}
