//! Canonical keyword tables and regex matchers for parameter extraction.
//!
//! The category tables are ordered: the first category whose keyword list
//! matches wins, so ties resolve by table position rather than by longest
//! match. Matching is substring-based against lower-cased input.

use regex::Regex;
use std::sync::LazyLock;

/// Food categories and their surface-form keywords, in priority order.
///
/// The table covers common western dishes plus a set of Indian dishes; the
/// extractor also accepts arbitrary dish names through its fallback chain,
/// so this list is a fast path, not a whitelist.
pub const FOOD_TYPES: &[(&str, &[&str])] = &[
    ("pizza", &["pizza", "pizzas"]),
    ("burger", &["burger", "burgers", "hamburger"]),
    ("sandwich", &["sandwich", "sandwiches"]),
    ("salad", &["salad", "salads"]),
    ("pasta", &["pasta", "spaghetti", "noodles", "chowmein"]),
    ("rice", &["rice", "fried rice", "pulao", "biryani"]),
    ("soup", &["soup", "soups"]),
    ("chicken", &["chicken", "fried chicken", "tikka"]),
    ("fish", &["fish", "salmon", "tuna"]),
    ("vegetables", &["vegetables", "veggies", "carrots", "broccoli"]),
    ("rajma", &["rajma"]),
    ("dal", &["dal", "daal"]),
    (
        "paneer",
        &["paneer", "paneer butter masala", "shahi paneer", "kadhai paneer"],
    ),
    ("rasgulla", &["rasgulla", "rosogolla"]),
    ("gulab jamun", &["gulab jamun"]),
    ("jalebi", &["jalebi"]),
    ("kheer", &["kheer", "payasam"]),
    ("poha", &["poha"]),
    ("upma", &["upma"]),
    ("pakora", &["pakora", "bhaji"]),
    ("dosa", &["dosa"]),
    ("idli", &["idli"]),
    ("chole", &["chole", "chana masala"]),
    ("paratha", &["paratha", "aloo paratha"]),
    ("roti", &["roti", "chapati"]),
];

/// Packaging categories and their surface-form keywords, in priority order.
pub const PACKAGING_TYPES: &[(&str, &[&str])] = &[
    ("plastic", &["plastic", "plastic container", "plastic bag"]),
    ("paper", &["paper", "paper bag", "paper box"]),
    ("aluminum", &["aluminum", "aluminum foil", "tin foil"]),
    ("glass", &["glass", "glass container"]),
    ("cardboard", &["cardboard", "cardboard box"]),
];

/// Matches a signed decimal number followed by an optional "degrees" and a
/// temperature unit token (e.g. "28C", "28 C", "-4.5 °F", "28degc").
pub static TEMPERATURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(-?\d+(?:\.\d+)?)\s*(?:degrees?\s*)?(c|f|celsius|fahrenheit|°c|°f|degc|degf)")
        .expect("temperature regex is valid")
});

/// Matches an integer followed by a humidity unit token (e.g. "60%",
/// "60 percent", "60 humidity").
pub static HUMIDITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*(percent|%|humidity)").expect("humidity regex is valid"));

/// Find the first category in `table` with a keyword contained in `lower`.
///
/// The caller is expected to have lower-cased the input already.
pub fn match_category(lower: &str, table: &[(&'static str, &[&str])]) -> Option<&'static str> {
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|(category, _)| *category)
}
