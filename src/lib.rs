pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod train;
pub mod config;

// Convenience re-exports
pub use error::{NetError, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::{Layer, LayerKind, LayerSnapshot};
pub use network::{Network, NetworkSpec};
pub use train::{
    xor_samples, EpochSnapshot, LogObserver, NoopObserver, Sample, TrainConfig, TrainObserver,
    TrainOutcome, TrainStatus,
};
pub use config::RunConfig;
