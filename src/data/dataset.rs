use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

/// Errors from building or loading a dataset.
#[derive(Debug)]
pub enum DatasetError {
    /// The content could not be interpreted (bad cell, ragged rows, ...).
    Parse(String),
    Io(std::io::Error),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Parse(msg) => write!(f, "{msg}"),
            DatasetError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io(e) => Some(e),
            DatasetError::Parse(_) => None,
        }
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(e: std::io::Error) -> Self {
        DatasetError::Io(e)
    }
}

/// Labelled samples: `inputs[i]` is paired with `labels[i]`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub inputs: Vec<Vec<f64>>,
    pub labels: Vec<Vec<f64>>,
}

impl Dataset {
    pub fn new(inputs: Vec<Vec<f64>>, labels: Vec<Vec<f64>>) -> Result<Dataset, DatasetError> {
        if inputs.len() != labels.len() {
            return Err(DatasetError::Parse(format!(
                "{} inputs but {} labels",
                inputs.len(),
                labels.len()
            )));
        }
        Ok(Dataset { inputs, labels })
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[f64], &[f64])> {
        self.inputs.iter().zip(self.labels.iter()).map(|(x, y)| (x.as_slice(), y.as_slice()))
    }

    /// Width of the first input, 0 when empty.
    pub fn feature_count(&self) -> usize {
        self.inputs.first().map_or(0, |x| x.len())
    }

    pub fn label_count(&self) -> usize {
        self.labels.first().map_or(0, |y| y.len())
    }

    /// Shuffles the samples in place, keeping pairs together.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(rng);
        self.inputs = order.iter().map(|&i| std::mem::take(&mut self.inputs[i])).collect();
        self.labels = order.iter().map(|&i| std::mem::take(&mut self.labels[i])).collect();
    }

    /// Splits off the last `fraction` of samples, e.g. `0.2` → 80 / 20.
    pub fn split(mut self, fraction: f64) -> (Dataset, Dataset) {
        let fraction = fraction.clamp(0.0, 1.0);
        let tail = (self.len() as f64 * fraction).round() as usize;
        let at = self.len() - tail;
        let inputs = self.inputs.split_off(at);
        let labels = self.labels.split_off(at);
        (self, Dataset { inputs, labels })
    }

    /// Keeps at most the first `n` samples.
    pub fn truncate(&mut self, n: usize) {
        self.inputs.truncate(n);
        self.labels.truncate(n);
    }
}

/// One-hot encodes a class index into a vector of `n_classes`.
pub fn one_hot(class: usize, n_classes: usize) -> Vec<f64> {
    let mut v = vec![0.0; n_classes];
    if class < n_classes {
        v[class] = 1.0;
    }
    v
}
