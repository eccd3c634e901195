//! Trained-model artifacts and inference.
//!
//! The bundle holds three artifacts exported by the training pipeline: a
//! decision-forest regressor, an optional dense feed-forward network, and
//! the feature preprocessor (one-hot category lists plus standardization
//! constants). Artifacts are plain JSON files loaded once at startup; a
//! missing or unparseable required artifact disables the model path without
//! failing startup.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const RF_MODEL_FILE: &str = "rf_model.json";
pub const ANN_MODEL_FILE: &str = "ann_model.json";
pub const PREPROCESS_FILE: &str = "preprocess.json";

/// Default directory for model artifacts, overridable via LARDER_MODEL_DIR.
pub const DEFAULT_MODEL_DIR: &str = "ml_models";

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model bundle is not loaded")]
    NotLoaded,

    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("feature shape mismatch: expected {expected}, got {got}")]
    FeatureShape { expected: usize, got: usize },

    #[error("malformed tree: node index {0} out of range")]
    MalformedTree(usize),

    #[error("forest has no trees")]
    EmptyForest,
}

/// Feature preprocessor: one-hot encodes the two categorical inputs against
/// the category lists seen at training time, then standardizes the numeric
/// inputs.
#[derive(Debug, Clone, Deserialize)]
pub struct Preprocessor {
    pub food_categories: Vec<String>,
    pub packaging_categories: Vec<String>,
    /// Means of (temperature, humidity) in the training set.
    pub numeric_means: [f64; 2],
    /// Standard deviations of (temperature, humidity) in the training set.
    pub numeric_stds: [f64; 2],
}

impl Preprocessor {
    /// Build the single-row feature vector for one prediction.
    ///
    /// A food or packaging value outside the training categories is an
    /// error; the caller falls back to the mock path.
    pub fn transform(
        &self,
        food_type: &str,
        packaging: &str,
        temperature: f64,
        humidity: f64,
    ) -> Result<Vec<f64>, ModelError> {
        let mut features =
            Vec::with_capacity(self.food_categories.len() + self.packaging_categories.len() + 2);
        one_hot(&mut features, &self.food_categories, food_type)?;
        one_hot(&mut features, &self.packaging_categories, packaging)?;
        features.push(standardize(temperature, self.numeric_means[0], self.numeric_stds[0]));
        features.push(standardize(humidity, self.numeric_means[1], self.numeric_stds[1]));
        Ok(features)
    }
}

fn one_hot(features: &mut Vec<f64>, categories: &[String], value: &str) -> Result<(), ModelError> {
    let index = categories
        .iter()
        .position(|category| category == value)
        .ok_or_else(|| ModelError::UnknownCategory(value.to_string()))?;
    features.extend((0..categories.len()).map(|i| if i == index { 1.0 } else { 0.0 }));
    Ok(())
}

fn standardize(value: f64, mean: f64, std: f64) -> f64 {
    if std == 0.0 {
        0.0
    } else {
        (value - mean) / std
    }
}

/// A regression forest: the prediction is the mean of the per-tree walks.
#[derive(Debug, Clone, Deserialize)]
pub struct Forest {
    pub trees: Vec<Tree>,
}

impl Forest {
    pub fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::EmptyForest);
        }
        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.predict(features)?;
        }
        Ok(total / self.trees.len() as f64)
    }
}

/// One decision tree stored as a flat node array; index 0 is the root.
#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl Tree {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        let mut index = 0;
        // A well-formed tree reaches a leaf in at most nodes.len() steps.
        for _ in 0..=self.nodes.len() {
            let node = self.nodes.get(index).ok_or(ModelError::MalformedTree(index))?;
            match node {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let x = features.get(*feature).ok_or(ModelError::FeatureShape {
                        expected: *feature + 1,
                        got: features.len(),
                    })?;
                    index = if *x <= *threshold { *left } else { *right };
                }
            }
        }
        Err(ModelError::MalformedTree(index))
    }
}

/// A dense feed-forward network; the first output of the last layer is the
/// estimate.
#[derive(Debug, Clone, Deserialize)]
pub struct NeuralNet {
    pub layers: Vec<DenseLayer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DenseLayer {
    /// Row-major weights, one row per output unit.
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
    pub activation: Activation,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Linear,
}

impl NeuralNet {
    pub fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        let mut activations = features.to_vec();
        for layer in &self.layers {
            activations = layer.forward(&activations)?;
        }
        activations
            .first()
            .copied()
            .ok_or(ModelError::FeatureShape { expected: 1, got: 0 })
    }
}

impl DenseLayer {
    fn forward(&self, input: &[f64]) -> Result<Vec<f64>, ModelError> {
        if self.weights.len() != self.biases.len() {
            return Err(ModelError::FeatureShape {
                expected: self.weights.len(),
                got: self.biases.len(),
            });
        }
        let mut output = Vec::with_capacity(self.weights.len());
        for (row, bias) in self.weights.iter().zip(&self.biases) {
            if row.len() != input.len() {
                return Err(ModelError::FeatureShape {
                    expected: row.len(),
                    got: input.len(),
                });
            }
            let sum: f64 = row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + bias;
            output.push(match self.activation {
                Activation::Relu => sum.max(0.0),
                Activation::Linear => sum,
            });
        }
        Ok(output)
    }
}

/// The three trained artifacts plus the load outcome.
///
/// Loaded once at startup and shared read-only afterwards; inference only
/// walks immutable arrays, so concurrent use needs no synchronization.
#[derive(Debug)]
pub struct ModelBundle {
    regressor: Option<Forest>,
    neural: Option<NeuralNet>,
    preprocessor: Option<Preprocessor>,
    pub loaded: bool,
}

impl ModelBundle {
    /// Assemble a bundle from already-loaded artifacts.
    ///
    /// The regressor and preprocessor are required for the model path; the
    /// network is optional (its estimate defaults to the regressor's).
    pub fn new(
        regressor: Option<Forest>,
        neural: Option<NeuralNet>,
        preprocessor: Option<Preprocessor>,
    ) -> Self {
        let loaded = regressor.is_some() && preprocessor.is_some();
        Self {
            regressor,
            neural,
            preprocessor,
            loaded,
        }
    }

    /// A bundle with no artifacts; every inference reports `NotLoaded`.
    pub fn unavailable() -> Self {
        Self::new(None, None, None)
    }

    /// Load artifacts from the directory named by LARDER_MODEL_DIR
    /// (default `ml_models`).
    pub fn from_env() -> Self {
        let dir = std::env::var("LARDER_MODEL_DIR")
            .unwrap_or_else(|_| DEFAULT_MODEL_DIR.to_string());
        Self::load(dir)
    }

    /// Load artifacts from `dir`. Never fails: a missing or unparseable
    /// required artifact leaves the bundle unloaded, and a bad network
    /// artifact alone is tolerated.
    pub fn load(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();

        let regressor = match read_artifact::<Forest>(&dir.join(RF_MODEL_FILE)) {
            Ok(forest) => Some(forest),
            Err(err) => {
                tracing::warn!("could not load regressor: {}", err);
                None
            }
        };

        let neural = match read_artifact::<NeuralNet>(&dir.join(ANN_MODEL_FILE)) {
            Ok(net) => Some(net),
            Err(err) => {
                tracing::warn!("could not load neural estimator: {}", err);
                None
            }
        };

        let preprocessor = match read_artifact::<Preprocessor>(&dir.join(PREPROCESS_FILE)) {
            Ok(preprocessor) => Some(preprocessor),
            Err(err) => {
                tracing::warn!("could not load preprocessor: {}", err);
                None
            }
        };

        let bundle = Self::new(regressor, neural, preprocessor);
        if bundle.loaded {
            tracing::info!("model bundle loaded from {}", dir.display());
        } else {
            tracing::warn!(
                "model bundle unavailable in {}, predictions use the mock formula",
                dir.display()
            );
        }
        bundle
    }

    /// Run both estimators on one input row, returning raw
    /// (regressor, network) estimates in hours.
    pub fn infer(
        &self,
        food_type: &str,
        packaging: &str,
        temperature: f64,
        humidity: f64,
    ) -> Result<(f64, f64), ModelError> {
        if !self.loaded {
            return Err(ModelError::NotLoaded);
        }
        let preprocessor = self.preprocessor.as_ref().ok_or(ModelError::NotLoaded)?;
        let forest = self.regressor.as_ref().ok_or(ModelError::NotLoaded)?;

        let features = preprocessor.transform(food_type, packaging, temperature, humidity)?;
        let rf = forest.predict(&features)?;
        let ann = match &self.neural {
            Some(net) => net.predict(&features)?,
            None => rf,
        };
        Ok((rf, ann))
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
