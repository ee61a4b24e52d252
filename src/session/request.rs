use serde::{Serialize, Deserialize};

/// Architecture half of a build request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Architecture {
    /// Layer widths, input first.
    pub network_shape: Vec<usize>,
    /// Hidden-layer activation name (`"relu"`, `"tanh"`, `"sigmoid"`, `"linear"`).
    pub activation: String,
    pub output_activation: String,
    /// `"l1"`, `"l2"` or `"none"`.
    #[serde(default)]
    pub regularisation: String,
    /// Start every weight and bias at 0.
    #[serde(default)]
    pub init_zero: bool,
    /// Bias strategy name (`"he"` or `"zero"`); He when absent.
    #[serde(default)]
    pub bias_init: Option<String>,
}

/// Training half of a build request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Training {
    /// Samples accumulated per update.
    pub batch_size: usize,
    pub learning_rate: f64,
    /// Regularization rate; ignored without a regularisation choice.
    #[serde(default)]
    pub reg_lambda: f64,
    /// Loss function name (`"square"`).
    pub loss_fn: String,
}

/// Everything needed to start a training session.
///
/// Serialized in camelCase so the JSON matches what the service accepts:
///
/// ```json
/// {
///   "architectureParams": { "networkShape": [784, 128, 10], "activation": "relu",
///                           "outputActivation": "sigmoid", "regularisation": "none" },
///   "trainingParams": { "batchSize": 5, "learningRate": 0.8, "lossFn": "square" },
///   "seed": 7
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequest {
    pub architecture_params: Architecture,
    pub training_params: Training,
    /// Seed for weight and bias initialization; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl BuildRequest {
    /// Serializes the request to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a `BuildRequest` from a JSON file.
    pub fn load_json(path: &str) -> std::io::Result<BuildRequest> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
