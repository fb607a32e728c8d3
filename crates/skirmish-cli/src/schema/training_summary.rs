use std::{collections::BTreeMap, iter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skirmish_evaluator::feature::FeatureKind;
use skirmish_training::controller::Controller;

/// What a training run produced, keyed by feature id.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainingSummary {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub episodes: u32,
    pub seed: u64,
    pub weights: BTreeMap<String, f64>,
    pub evaluation_averages: Vec<f64>,
}

impl TrainingSummary {
    pub fn from_controller(name: &str, controller: &Controller) -> Self {
        let config = controller.config();
        Self {
            name: name.to_owned(),
            trained_at: Utc::now(),
            episodes: config.episodes,
            seed: config.seed,
            weights: iter::zip(FeatureKind::ALL, controller.weights().as_slice())
                .map(|(kind, w)| (kind.id().to_owned(), *w))
                .collect(),
            evaluation_averages: controller.evaluation_averages().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use skirmish_evaluator::q_function::WeightVector;
    use skirmish_training::config::AgentConfig;

    use super::*;

    #[test]
    fn test_weights_are_keyed_by_feature_id() {
        let weights = WeightVector::from([0.5, -1.0, 0.25, 0.0, 2.0]);
        let controller = Controller::with_weights(AgentConfig::default(), weights);
        let summary = TrainingSummary::from_controller("test", &controller);

        assert_eq!(summary.weights.len(), 5);
        assert_eq!(summary.weights["distance"], -1.0);
        assert_eq!(summary.weights["reciprocal"], 2.0);
        assert_eq!(summary.episodes, 10);
        assert!(summary.evaluation_averages.is_empty());

        let json = serde_json::to_string(&summary).unwrap();
        let parsed: TrainingSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.weights, summary.weights);
        assert_eq!(parsed.trained_at, summary.trained_at);
    }
}
