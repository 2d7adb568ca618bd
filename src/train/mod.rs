pub mod epoch_snapshot;
pub mod observer;
pub mod sample;
pub mod train_config;
pub mod trainer;

pub use epoch_snapshot::EpochSnapshot;
pub use observer::{LogObserver, NoopObserver, TrainObserver};
pub use sample::{xor_samples, Sample};
pub use train_config::TrainConfig;
pub use trainer::{TrainOutcome, TrainStatus};
