//! Response formatting for the food-storage predictor.
//!
//! Decides whether enough parameters were recovered from a message and
//! renders either a clarification request or the final duration string.

use crate::extract::{extract_parameters, ExtractedParameters};
use crate::model::ModelBundle;
use crate::predict::predict;

/// Keywords that route a message to the predictor instead of the general
/// LLM path. Substring match, any hit counts.
const FOOD_QUERY_KEYWORDS: &[&str] = &[
    "food",
    "consumption",
    "time",
    "how long",
    "duration",
    "eat",
    "eating",
    "fresh",
    "spoilage",
    "expiry",
    "temperature",
    "humidity",
    "packaging",
    "storage",
];

const EXAMPLE_QUERY: &str =
    "How long will pizza in plastic packaging last at 25°C with 60% humidity?";

const PREDICTION_APOLOGY: &str = "Sorry, I couldn't process your food consumption query. \
                                  Please try again with different parameters.";

/// Whether a message looks like a food-storage question.
///
/// This runs at the routing boundary before any extraction and is
/// independent of it.
pub fn is_food_query(text: &str) -> bool {
    let lower = text.to_lowercase();
    FOOD_QUERY_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Produce the predictor's reply for one message.
///
/// Missing parameters yield a clarification listing exactly the absent
/// fields; the prediction engine is only invoked once all four are known.
pub fn respond(bundle: &ModelBundle, text: &str) -> String {
    let params = extract_parameters(text);

    let missing = params.missing_fields();
    if !missing.is_empty() {
        return format!(
            "I can help predict food consumption time! Please provide the following \
             information: {}. For example: '{}'",
            missing.join(", "),
            EXAMPLE_QUERY
        );
    }

    let ExtractedParameters {
        food_type: Some(food_type),
        packaging: Some(packaging),
        temperature: Some(temperature),
        humidity: Some(humidity),
    } = params
    else {
        // missing_fields() was empty, so all four fields are present.
        return PREDICTION_APOLOGY.to_string();
    };

    let prediction = predict(bundle, &food_type, &packaging, temperature, humidity);
    if !prediction.final_estimate.is_finite() {
        return PREDICTION_APOLOGY.to_string();
    }

    format!("consume within {} hours", prediction.final_estimate.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_food_query() {
        assert!(is_food_query("how long will this fish last"));
        assert!(is_food_query("best STORAGE practices"));
        assert!(is_food_query("what's the expiry on milk"));
        assert!(!is_food_query("What's the capital of France?"));
        assert!(!is_food_query("tell me a joke"));
    }

    #[test]
    fn test_end_to_end_complete_query() {
        let bundle = ModelBundle::unavailable();
        let response = respond(
            &bundle,
            "How long will pizza in plastic packaging last at 25°C with 60% humidity?",
        );
        assert_eq!(response, "consume within 24 hours");
    }

    #[test]
    fn test_clarification_lists_all_missing_fields() {
        let bundle = ModelBundle::unavailable();
        let response = respond(&bundle, "hello there");
        // The last-resort fallback recovers a food phrase from almost any
        // sentence, so only the other three fields are missing.
        assert!(response.starts_with("I can help predict food consumption time!"));
        assert!(response.contains("packaging type, temperature, humidity"));
        assert!(!response.contains("food type"));
        assert!(response.contains(EXAMPLE_QUERY));
    }

    #[test]
    fn test_clarification_single_missing_field() {
        let bundle = ModelBundle::unavailable();
        let response = respond(&bundle, "pizza in plastic at 25c");
        assert!(response.contains("information: humidity."));
        assert!(!response.contains("temperature"));
    }

    #[test]
    fn test_clarification_never_predicts() {
        let bundle = ModelBundle::unavailable();
        let response = respond(&bundle, "pizza in plastic at 25c");
        assert!(!response.contains("consume within"));
    }

    #[test]
    fn test_unknown_dish_uses_default_base() {
        let bundle = ModelBundle::unavailable();
        let response = respond(
            &bundle,
            "how long will khichdi in plastic packaging last at 25c with 60% humidity",
        );
        assert_eq!(response, "consume within 24 hours");
    }

    #[test]
    fn test_cold_storage_doubles_duration() {
        let bundle = ModelBundle::unavailable();
        let response = respond(
            &bundle,
            "how long will pizza in plastic packaging last at 2c with 60% humidity",
        );
        assert_eq!(response, "consume within 48 hours");
    }
}
