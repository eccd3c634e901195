//! Parameter extraction from free-form storage questions.
//!
//! Turns a sentence like "how long will rajma chawal in plastic packaging
//! last at 25C with 60% humidity" into structured predictor inputs. Each of
//! the four parameters is resolved independently; a partial result is a
//! normal outcome, reported through the `Option` fields.

use crate::patterns::{self, HUMIDITY_RE, TEMPERATURE_RE};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Structured parameters recovered from one input message.
///
/// Fields are independently optional; none depends on another being present.
/// Constructed fresh per message and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedParameters {
    /// Canonical category from the food table, or a free-text dish phrase
    /// recovered by the fallback chain.
    pub food_type: Option<String>,
    /// One of the packaging categories (plastic, paper, aluminum, glass,
    /// cardboard).
    pub packaging: Option<String>,
    /// Degrees Celsius, normalized from the input unit.
    pub temperature: Option<f64>,
    /// Relative humidity percentage.
    pub humidity: Option<f64>,
}

impl ExtractedParameters {
    /// Display names of the absent fields, in the fixed order used by
    /// clarification messages.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.food_type.is_none() {
            missing.push("food type");
        }
        if self.packaging.is_none() {
            missing.push("packaging type");
        }
        if self.temperature.is_none() {
            missing.push("temperature");
        }
        if self.humidity.is_none() {
            missing.push("humidity");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Shape of a "how long will X ..." question; the lazy group captures the
/// dish phrase up to the first context word.
static QUESTION_SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"how\s+long\s+(?:will|does)\s+(.+?)\s+(?:in|at|with|last|stay|remain)")
        .expect("question shape regex is valid")
});

static ARTICLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(the|a|an)\b\s+").expect("article regex is valid"));

static NON_LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z\s]").expect("non-letter regex is valid"));

static SPLIT_IN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+in\s+").expect("split regex is valid"));

static LEAD_IN_HOW_LONG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"how\s+long\s+(will|does)\s+").expect("lead-in regex is valid"));

static LEAD_IN_TIME_FOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"how\s+much\s+time\s+for\s+").expect("lead-in regex is valid"));

/// Words dropped by the last-resort food fallback.
const STOP_WORDS: &[&str] = &["how", "long", "will", "does", "at", "with", "time", "last"];

/// Extract all four predictor parameters from one message.
///
/// The four resolutions never short-circuit each other: a message can yield
/// a temperature without a food type and vice versa.
pub fn extract_parameters(text: &str) -> ExtractedParameters {
    let lower = text.to_lowercase();

    let food_type = food_from_keywords(&lower)
        .or_else(|| food_from_question_shape(&lower))
        .or_else(|| food_before_in(&lower))
        .or_else(|| food_from_remaining_words(&lower));

    let packaging =
        patterns::match_category(&lower, patterns::PACKAGING_TYPES).map(str::to_string);

    ExtractedParameters {
        food_type,
        packaging,
        temperature: resolve_temperature(&lower),
        humidity: resolve_humidity(&lower),
    }
}

/// Direct keyword scan against the food table.
fn food_from_keywords(lower: &str) -> Option<String> {
    patterns::match_category(lower, patterns::FOOD_TYPES).map(str::to_string)
}

/// Capture the dish phrase from a "how long will X in/at/with ..." question,
/// with leading articles and punctuation stripped.
fn food_from_question_shape(lower: &str) -> Option<String> {
    let captures = QUESTION_SHAPE_RE.captures(lower)?;
    let candidate = captures.get(1)?.as_str().trim();
    let candidate = ARTICLE_RE.replace_all(candidate, "");
    let candidate = NON_LETTER_RE.replace_all(&candidate, "");
    let candidate = candidate.trim();
    (!candidate.is_empty()).then(|| candidate.to_string())
}

/// Take the segment before the first standalone " in ", drop known lead-in
/// phrases, and keep at most the last 3 words.
fn food_before_in(lower: &str) -> Option<String> {
    let mut segments = SPLIT_IN_RE.splitn(lower, 2);
    let left = segments.next().unwrap_or_default();
    segments.next()?;

    let left = LEAD_IN_HOW_LONG_RE.replace_all(left, "");
    let left = LEAD_IN_TIME_FOR_RE.replace_all(left.trim(), "");
    let cleaned = NON_LETTER_RE.replace_all(left.trim(), "");

    let words: Vec<&str> = cleaned.split_whitespace().collect();
    let tail_start = words.len().saturating_sub(3);
    let candidate = words[tail_start..].join(" ");
    (!candidate.is_empty()).then_some(candidate)
}

/// Last resort: the first 3 words of the sentence after dropping stop words.
///
/// This accepts almost any sentence, so it can produce nonsensical dish
/// phrases for queries unrelated to food.
fn food_from_remaining_words(lower: &str) -> Option<String> {
    let cleaned = NON_LETTER_RE.replace_all(lower, "");
    let words: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|word| !STOP_WORDS.contains(word))
        .take(3)
        .collect();
    (!words.is_empty()).then(|| words.join(" "))
}

/// First temperature match in the text, converted to Celsius when the unit
/// token denotes Fahrenheit.
fn resolve_temperature(lower: &str) -> Option<f64> {
    let captures = TEMPERATURE_RE.captures(lower)?;
    let value: f64 = captures.get(1)?.as_str().parse().ok()?;
    let unit = captures.get(2)?.as_str();
    let celsius = match unit {
        "f" | "fahrenheit" | "°f" | "degf" => (value - 32.0) * 5.0 / 9.0,
        _ => value,
    };
    Some(celsius)
}

/// First humidity match in the text, taken as a percentage.
fn resolve_humidity(lower: &str) -> Option<f64> {
    let captures = HUMIDITY_RE.captures(lower)?;
    captures.get(1)?.as_str().parse().ok()
}
