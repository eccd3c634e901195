pub mod extract;
pub mod llm;
pub mod model;
pub mod patterns;
pub mod predict;
pub mod respond;

pub use extract::{extract_parameters, ExtractedParameters};
pub use model::{ModelBundle, ModelError};
pub use predict::{mock_prediction, predict, PredictionResult, PredictionSource};
pub use respond::{is_food_query, respond};
