//! Shelf-life prediction engine.
//!
//! Two mutually exclusive strategies: trained-model inference when a loaded
//! bundle is available, and a deterministic mock formula otherwise. Model
//! failures never propagate; they degrade to the mock path.

use crate::model::{ModelBundle, ModelError};
use rand::Rng;

/// Which strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionSource {
    Model,
    Mock,
}

/// One shelf-life estimate in hours, rounded to 2 decimals.
///
/// `final_estimate` is the authoritative value. On the mock path the two
/// component estimates carry cosmetic jitter and are not inputs to the
/// final value.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub rf_estimate: f64,
    pub ann_estimate: f64,
    pub final_estimate: f64,
    pub source: PredictionSource,
}

/// Base shelf life in hours per canonical food type.
const BASE_HOURS: &[(&str, f64)] = &[
    ("pizza", 24.0),
    ("burger", 12.0),
    ("sandwich", 8.0),
    ("salad", 6.0),
    ("pasta", 18.0),
    ("rice", 12.0),
    ("soup", 48.0),
    ("chicken", 24.0),
    ("fish", 12.0),
    ("vegetables", 72.0),
];

/// Base hours for food types without a table entry.
const DEFAULT_BASE_HOURS: f64 = 24.0;

/// Preservation effect of the container material.
const PACKAGING_MULTIPLIERS: &[(&str, f64)] = &[
    ("plastic", 1.0),
    ("paper", 0.7),
    ("aluminum", 1.5),
    ("glass", 1.3),
    ("cardboard", 0.8),
];

/// Predict a shelf life for fully-known parameters.
///
/// Tries the model path first; any model error falls back to the mock
/// formula. The caller is responsible for only invoking this once all four
/// parameters are known.
pub fn predict(
    bundle: &ModelBundle,
    food_type: &str,
    packaging: &str,
    temperature: f64,
    humidity: f64,
) -> PredictionResult {
    match model_prediction(bundle, food_type, packaging, temperature, humidity) {
        Ok(result) => result,
        Err(err) => {
            if !matches!(err, ModelError::NotLoaded) {
                tracing::warn!("model inference failed, using mock formula: {}", err);
            }
            mock_prediction(food_type, packaging, temperature, humidity)
        }
    }
}

fn model_prediction(
    bundle: &ModelBundle,
    food_type: &str,
    packaging: &str,
    temperature: f64,
    humidity: f64,
) -> Result<PredictionResult, ModelError> {
    let (rf, ann) = bundle.infer(food_type, packaging, temperature, humidity)?;
    Ok(PredictionResult {
        rf_estimate: round2(rf),
        ann_estimate: round2(ann),
        final_estimate: round2((rf + ann) / 2.0),
        source: PredictionSource::Model,
    })
}

/// Deterministic estimate from the base-time table and multiplicative
/// factors.
///
/// The component estimates are jittered for realistic variance; the final
/// estimate is exact and reproducible across calls.
pub fn mock_prediction(
    food_type: &str,
    packaging: &str,
    temperature: f64,
    humidity: f64,
) -> PredictionResult {
    let base = lookup(BASE_HOURS, food_type).unwrap_or(DEFAULT_BASE_HOURS);
    let packaging_mult = lookup(PACKAGING_MULTIPLIERS, packaging).unwrap_or(1.0);

    let temp_factor = if temperature > 25.0 {
        0.5
    } else if temperature < 5.0 {
        2.0
    } else {
        1.0
    };

    let humidity_factor = if humidity > 70.0 {
        0.7
    } else if humidity < 30.0 {
        1.2
    } else {
        1.0
    };

    let final_estimate = base * packaging_mult * temp_factor * humidity_factor;

    let mut rng = rand::thread_rng();
    let rf_estimate = final_estimate * rng.gen_range(0.9..1.1);
    let ann_estimate = final_estimate * rng.gen_range(0.85..1.15);

    PredictionResult {
        rf_estimate: round2(rf_estimate),
        ann_estimate: round2(ann_estimate),
        final_estimate: round2(final_estimate),
        source: PredictionSource::Mock,
    }
}

fn lookup(table: &[(&str, f64)], key: &str) -> Option<f64> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Forest, NeuralNet, Preprocessor};
    use serde_json::json;

    #[test]
    fn test_mock_baseline() {
        let result = mock_prediction("pizza", "plastic", 25.0, 60.0);
        assert_eq!(result.final_estimate, 24.0);
        assert_eq!(result.source, PredictionSource::Mock);
    }

    #[test]
    fn test_mock_final_is_reproducible() {
        let first = mock_prediction("soup", "glass", 10.0, 50.0);
        for _ in 0..10 {
            let again = mock_prediction("soup", "glass", 10.0, 50.0);
            assert_eq!(again.final_estimate, first.final_estimate);
        }
    }

    #[test]
    fn test_mock_jitter_bounds() {
        for _ in 0..100 {
            let result = mock_prediction("pizza", "plastic", 25.0, 60.0);
            let rf_ratio = result.rf_estimate / result.final_estimate;
            let ann_ratio = result.ann_estimate / result.final_estimate;
            // Rounding to 2 decimals can nudge a ratio just past the bound.
            assert!(rf_ratio > 0.89 && rf_ratio < 1.11, "rf ratio {}", rf_ratio);
            assert!(ann_ratio > 0.84 && ann_ratio < 1.16, "ann ratio {}", ann_ratio);
        }
    }

    #[test]
    fn test_mock_unknown_food_defaults() {
        let result = mock_prediction("khichdi", "plastic", 25.0, 60.0);
        assert_eq!(result.final_estimate, 24.0);
    }

    #[test]
    fn test_mock_unknown_packaging_defaults() {
        let result = mock_prediction("pizza", "banana leaf", 25.0, 60.0);
        assert_eq!(result.final_estimate, 24.0);
    }

    #[test]
    fn test_mock_packaging_multipliers() {
        assert_eq!(mock_prediction("pizza", "paper", 25.0, 60.0).final_estimate, 16.8);
        assert_eq!(mock_prediction("pizza", "aluminum", 25.0, 60.0).final_estimate, 36.0);
        assert_eq!(mock_prediction("pizza", "glass", 25.0, 60.0).final_estimate, 31.2);
        assert_eq!(mock_prediction("pizza", "cardboard", 25.0, 60.0).final_estimate, 19.2);
    }

    #[test]
    fn test_mock_temperature_boundaries() {
        // 25 is not hot, 25.1 is; 5 is not cold, 4.9 is.
        assert_eq!(mock_prediction("pizza", "plastic", 25.0, 60.0).final_estimate, 24.0);
        assert_eq!(mock_prediction("pizza", "plastic", 25.1, 60.0).final_estimate, 12.0);
        assert_eq!(mock_prediction("pizza", "plastic", 5.0, 60.0).final_estimate, 24.0);
        assert_eq!(mock_prediction("pizza", "plastic", 4.9, 60.0).final_estimate, 48.0);
    }

    #[test]
    fn test_mock_humidity_boundaries() {
        assert_eq!(mock_prediction("pizza", "plastic", 25.0, 70.0).final_estimate, 24.0);
        assert_eq!(mock_prediction("pizza", "plastic", 25.0, 70.1).final_estimate, 16.8);
        assert_eq!(mock_prediction("pizza", "plastic", 25.0, 30.0).final_estimate, 24.0);
        assert_eq!(mock_prediction("pizza", "plastic", 25.0, 29.9).final_estimate, 28.8);
    }

    #[test]
    fn test_predict_falls_back_when_unloaded() {
        let bundle = ModelBundle::unavailable();
        let result = predict(&bundle, "pizza", "plastic", 25.0, 60.0);
        assert_eq!(result.source, PredictionSource::Mock);
        assert_eq!(result.final_estimate, 24.0);
    }

    fn loaded_bundle() -> ModelBundle {
        let preprocessor: Preprocessor = serde_json::from_value(json!({
            "food_categories": ["pizza"],
            "packaging_categories": ["plastic"],
            "numeric_means": [20.0, 50.0],
            "numeric_stds": [10.0, 25.0]
        }))
        .unwrap();
        let forest: Forest = serde_json::from_value(json!({
            "trees": [{"nodes": [{"value": 20.0}]}]
        }))
        .unwrap();
        let network: NeuralNet = serde_json::from_value(json!({
            "layers": [{
                "weights": [[0.0, 0.0, 0.0, 0.0]],
                "biases": [30.0],
                "activation": "linear"
            }]
        }))
        .unwrap();
        ModelBundle::new(Some(forest), Some(network), Some(preprocessor))
    }

    #[test]
    fn test_predict_model_path_averages() {
        let bundle = loaded_bundle();
        let result = predict(&bundle, "pizza", "plastic", 25.0, 60.0);
        assert_eq!(result.source, PredictionSource::Model);
        assert_eq!(result.rf_estimate, 20.0);
        assert_eq!(result.ann_estimate, 30.0);
        assert_eq!(result.final_estimate, 25.0);
    }

    #[test]
    fn test_predict_model_failure_degrades_to_mock() {
        // "khichdi" is outside the preprocessor's training categories.
        let bundle = loaded_bundle();
        let result = predict(&bundle, "khichdi", "plastic", 25.0, 60.0);
        assert_eq!(result.source, PredictionSource::Mock);
        assert_eq!(result.final_estimate, 24.0);
    }
}
