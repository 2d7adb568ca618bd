use rand::Rng;

use crate::activation::activation::ActivationFunction;
use crate::error::{check_len, NetError, Result};
use crate::layers::dense::{Layer, LayerKind, LayerSnapshot};
use crate::network::spec::NetworkSpec;

/// Input layer, one or more hidden layers and an output layer, chained so
/// that each layer consumes the previous layer's outputs.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) input_layer: Layer,
    pub(crate) hidden_layers: Vec<Layer>,
    pub(crate) output_layer: Layer,
}

impl Network {
    /// Builds `input_size -> hidden_sizes... -> output_size`. Fails with
    /// `InvalidTopology` when there is no hidden layer or any size is zero.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        hidden_sizes: &[usize],
        hidden_activation: ActivationFunction,
        output_activation: ActivationFunction,
        rng: &mut R,
    ) -> Result<Network> {
        if hidden_sizes.is_empty() {
            return Err(NetError::InvalidTopology("at least one hidden layer is required".into()));
        }
        if input_size == 0 || output_size == 0 {
            return Err(NetError::InvalidTopology(format!(
                "input and output sizes must be positive (got {input_size} and {output_size})"
            )));
        }
        if let Some(pos) = hidden_sizes.iter().position(|&n| n == 0) {
            return Err(NetError::InvalidTopology(format!("hidden layer {pos} has zero neurons")));
        }

        let input_layer = Layer::input(input_size)?;

        let mut hidden_layers = Vec::with_capacity(hidden_sizes.len());
        let mut fan_in = input_size;
        for &size in hidden_sizes {
            hidden_layers.push(Layer::new(LayerKind::Hidden, fan_in, size, hidden_activation, rng)?);
            fan_in = size;
        }

        let output_layer = Layer::new(LayerKind::Output, fan_in, output_size, output_activation, rng)?;

        tracing::debug!(
            input_size,
            ?hidden_sizes,
            output_size,
            %hidden_activation,
            %output_activation,
            "built network"
        );

        Ok(Network { input_layer, hidden_layers, output_layer })
    }

    pub fn from_spec<R: Rng + ?Sized>(spec: &NetworkSpec, rng: &mut R) -> Result<Network> {
        Network::new(
            spec.input_size,
            spec.output_size,
            &spec.hidden_sizes,
            spec.hidden_activation,
            spec.output_activation,
            rng,
        )
    }

    pub fn input_size(&self) -> usize {
        self.input_layer.input_size()
    }

    pub fn output_size(&self) -> usize {
        self.output_layer.output_size()
    }

    pub fn input_layer(&self) -> &Layer {
        &self.input_layer
    }

    pub fn hidden_layers(&self) -> &[Layer] {
        &self.hidden_layers
    }

    pub fn output_layer(&self) -> &Layer {
        &self.output_layer
    }

    /// Forward pass. Each layer keeps the inputs it received so that
    /// backpropagation can read them straight afterwards.
    pub fn forward(&mut self, signals: &[f64]) -> Result<Vec<f64>> {
        check_len("network input", self.input_size(), signals.len())?;

        self.input_layer.set_inputs(signals)?;

        let mut previous = &self.input_layer;
        for layer in &mut self.hidden_layers {
            layer.set_inputs_from(previous)?;
            previous = &*layer;
        }
        self.output_layer.set_inputs_from(previous)?;

        Ok(self.output_layer.outputs())
    }

    /// Same as `forward`; the name callers use after training.
    pub fn inference(&mut self, signals: &[f64]) -> Result<Vec<f64>> {
        self.forward(signals)
    }

    /// Snapshots of every layer in input-to-output order.
    pub fn snapshot(&self) -> Vec<LayerSnapshot> {
        self.layers().map(Layer::snapshot).collect()
    }

    pub(crate) fn layers(&self) -> impl Iterator<Item = &Layer> {
        std::iter::once(&self.input_layer)
            .chain(self.hidden_layers.iter())
            .chain(std::iter::once(&self.output_layer))
    }
}
