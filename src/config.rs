use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::network::spec::NetworkSpec;
use crate::train::train_config::TrainConfig;

fn default_seed() -> u64 {
    42
}

/// Everything a training run needs: topology, hyperparameters and the RNG
/// seed for weight initialization. Loaded from JSON by the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub network: NetworkSpec,
    #[serde(default)]
    pub training: TrainConfig,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            network: NetworkSpec::xor(),
            training: TrainConfig::default(),
            seed: default_seed(),
        }
    }
}

impl RunConfig {
    /// Serializes the run configuration to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `RunConfig` from a JSON file.
    pub fn load_json(path: &str) -> Result<RunConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::error::NetError;

    #[test]
    fn empty_object_is_the_xor_run() {
        let config: RunConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.network, NetworkSpec::xor());
        assert_eq!(config.training.max_epochs, 100_000);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn json_file_round_trip() {
        let path = std::env::temp_dir().join(format!("xornet-run-{}.json", std::process::id()));
        let path = path.to_str().unwrap();

        let mut config = RunConfig::default();
        config.network.hidden_activation = ActivationFunction::Tanh;
        config.training.log_every = 7;
        config.seed = 1234;
        config.save_json(path).unwrap();

        let loaded = RunConfig::load_json(path).unwrap();
        std::fs::remove_file(path).unwrap();
        assert_eq!(loaded.network.hidden_activation, ActivationFunction::Tanh);
        assert_eq!(loaded.training.log_every, 7);
        assert_eq!(loaded.seed, 1234);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = RunConfig::load_json("/nonexistent/xornet.json").unwrap_err();
        assert!(matches!(err, NetError::Io(_)));
    }
}
