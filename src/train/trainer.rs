use std::ops::ControlFlow;
use std::sync::atomic::Ordering;

use serde::{Serialize, Deserialize};

use crate::error::{check_len, NetError, Result};
use crate::layers::dense::Layer;
use crate::network::network::Network;
use crate::train::epoch_snapshot::EpochSnapshot;
use crate::train::observer::TrainObserver;
use crate::train::sample::Sample;
use crate::train::train_config::TrainConfig;

/// Why a training run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainStatus {
    /// Epoch error dropped to the convergence threshold.
    Converged,
    /// `max_epochs` reached first.
    Exhausted,
    /// Stop flag raised or the observer asked to break.
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainOutcome {
    /// Root of the summed squared error of the last completed epoch.
    pub error: f64,
    /// Number of completed epochs.
    pub epochs: usize,
    pub status: TrainStatus,
}

impl TrainOutcome {
    pub fn converged(&self) -> bool {
        self.status == TrainStatus::Converged
    }
}

impl Network {
    /// Trains with online gradient descent: every sample's update is applied
    /// before the next sample is fed forward. Samples are replayed in the
    /// given order each epoch.
    ///
    /// Configuration and every sample's shape are checked before any weight
    /// is touched.
    pub fn train<O>(
        &mut self,
        samples: &[Sample],
        config: &TrainConfig,
        observer: &mut O,
    ) -> Result<TrainOutcome>
    where
        O: TrainObserver + ?Sized,
    {
        config.validate()?;
        self.check_samples(samples)?;

        let mut epoch = 0;
        let (error, status) = loop {
            let mut total_squared_error = 0.0;
            for sample in samples {
                total_squared_error += self.train_sample(
                    sample,
                    config.learning_rate,
                    config.scale_output_by_derivative,
                )?;
            }
            let error = total_squared_error.sqrt();

            let mut observer_break = false;
            if epoch % config.log_every == 0 {
                tracing::trace!(epoch, error, "epoch finished");
                let snapshot = EpochSnapshot { epoch, error, layers: self.snapshot() };
                observer_break = observer.on_epoch(&snapshot).is_break();
            }

            epoch += 1;

            if error <= config.convergence_threshold {
                break (error, TrainStatus::Converged);
            }
            if epoch >= config.max_epochs {
                break (error, TrainStatus::Exhausted);
            }
            let flagged = config.stop_flag.as_ref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed));
            if observer_break || flagged {
                break (error, TrainStatus::Stopped);
            }
        };

        match status {
            TrainStatus::Exhausted => tracing::warn!(
                epochs = epoch,
                error,
                threshold = config.convergence_threshold,
                "epoch budget exhausted before convergence"
            ),
            _ => tracing::info!(epochs = epoch, error, ?status, "training finished"),
        }

        Ok(TrainOutcome { error, epochs: epoch, status })
    }

    /// One forward pass, backward delta pass and weight update. Returns the
    /// sample's summed squared error. The output layer takes the raw
    /// `target - output` error unless `scale_output` is set.
    fn train_sample(&mut self, sample: &Sample, learning_rate: f64, scale_output: bool) -> Result<f64> {
        let outputs = self.forward(&sample.input)?;

        let sigma: Vec<f64> = sample.target.iter()
            .zip(outputs.iter())
            .map(|(t, o)| t - o)
            .collect();
        let squared_error = sigma.iter().map(|s| s * s).sum();

        let output_signal: Vec<f64> = if scale_output {
            sigma.iter()
                .zip(self.output_layer.derivative_outputs())
                .map(|(s, d)| s * d)
                .collect()
        } else {
            sigma
        };

        let deltas = self.hidden_deltas(&output_signal)?;

        // Derivatives come from the forward pass, before any weight moves.
        let derivatives: Vec<Vec<f64>> = self.hidden_layers.iter()
            .map(Layer::derivative_outputs)
            .collect();

        for ((layer, delta), derivative) in self.hidden_layers.iter_mut()
            .zip(deltas.iter())
            .zip(derivatives.iter())
        {
            let signal: Vec<f64> = delta.iter().zip(derivative.iter()).map(|(e, d)| e * d).collect();
            layer.apply_delta_rule(&signal, learning_rate)?;
        }

        self.output_layer.apply_delta_rule(&output_signal, learning_rate)?;

        Ok(squared_error)
    }

    /// Error share of every hidden neuron, last hidden layer first, stored in
    /// layer order.
    fn hidden_deltas(&self, output_signal: &[f64]) -> Result<Vec<Vec<f64>>> {
        let count = self.hidden_layers.len();
        let mut deltas = vec![Vec::new(); count];

        deltas[count - 1] = self.hidden_layers[count - 1].errors(&self.output_layer, output_signal)?;
        for l in (0..count - 1).rev() {
            deltas[l] = self.hidden_layers[l].errors(&self.hidden_layers[l + 1], &deltas[l + 1])?;
        }

        Ok(deltas)
    }

    fn check_samples(&self, samples: &[Sample]) -> Result<()> {
        if samples.is_empty() {
            return Err(NetError::InvalidConfig("no training samples".into()));
        }
        for (p, sample) in samples.iter().enumerate() {
            check_len(&format!("sample {p} input"), self.input_size(), sample.input.len())?;
            check_len(&format!("sample {p} target"), self.output_size(), sample.target.len())?;
        }
        Ok(())
    }
}
