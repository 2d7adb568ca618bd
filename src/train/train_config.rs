use std::sync::{Arc, atomic::AtomicBool};

use serde::{Serialize, Deserialize};

use crate::error::{NetError, Result};

/// Hyperparameters for `Network::train`.
///
/// # Fields
/// - `learning_rate`         — step size `alpha` of the delta rule
/// - `convergence_threshold` — training stops once the epoch's root summed
///                             squared error is `<=` this value
/// - `max_epochs`            — hard cap on full passes over the samples
/// - `log_every`             — the observer sees a snapshot at every epoch
///                             index divisible by this value
/// - `scale_output_by_derivative` — when `true`, the output error is
///                             multiplied by the output activation's
///                             derivative before it is backpropagated and
///                             applied. Off by default: the output layer
///                             uses the plain linear delta rule whatever
///                             activation it has.
/// - `stop_flag`             — optional atomic flag; when set to `true` from
///                             another thread the loop ends after the
///                             current epoch. Never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub learning_rate: f64,
    pub convergence_threshold: f64,
    pub max_epochs: usize,
    pub log_every: usize,
    pub scale_output_by_derivative: bool,
    #[serde(skip)]
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` logging every 1000 epochs and with no stop flag.
    pub fn new(learning_rate: f64, convergence_threshold: f64, max_epochs: usize) -> Self {
        TrainConfig {
            learning_rate,
            convergence_threshold,
            max_epochs,
            ..TrainConfig::default()
        }
    }

    pub fn with_log_every(mut self, log_every: usize) -> Self {
        self.log_every = log_every;
        self
    }

    pub fn with_output_derivative(mut self, enabled: bool) -> Self {
        self.scale_output_by_derivative = enabled;
        self
    }

    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(NetError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !(self.convergence_threshold > 0.0) {
            return Err(NetError::InvalidConfig(format!(
                "convergence_threshold must be positive, got {}",
                self.convergence_threshold
            )));
        }
        if self.max_epochs == 0 {
            return Err(NetError::InvalidConfig("max_epochs must be at least 1".into()));
        }
        if self.log_every == 0 {
            return Err(NetError::InvalidConfig("log_every must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            learning_rate: 0.1,
            convergence_threshold: 1e-7,
            max_epochs: 100_000,
            log_every: 1000,
            scale_output_by_derivative: false,
            stop_flag: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: TrainConfig = serde_json::from_str(r#"{ "max_epochs": 50 }"#).unwrap();
        assert_eq!(config.max_epochs, 50);
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.log_every, 1000);
        assert!(!config.scale_output_by_derivative);
        assert!(config.stop_flag.is_none());
    }

    #[test]
    fn validate_rejects_unusable_values() {
        assert!(TrainConfig::default().validate().is_ok());
        assert!(TrainConfig::new(0.0, 1e-3, 10).validate().is_err());
        assert!(TrainConfig::new(f64::NAN, 1e-3, 10).validate().is_err());
        assert!(TrainConfig::new(0.1, -1.0, 10).validate().is_err());
        assert!(TrainConfig::new(0.1, 1e-3, 0).validate().is_err());
        assert!(TrainConfig::new(0.1, 1e-3, 10).with_log_every(0).validate().is_err());
    }
}
