use serde::{Serialize, Deserialize};

use crate::layers::dense::LayerSnapshot;

/// State handed to a `TrainObserver` every `log_every` epochs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochSnapshot {
    /// 0-based epoch index.
    pub epoch: usize,
    /// Square root of the epoch's summed squared error.
    pub error: f64,
    /// Input layer first, output layer last.
    pub layers: Vec<LayerSnapshot>,
}
