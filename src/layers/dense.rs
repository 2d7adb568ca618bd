use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{check_len, NetError, Result};
use crate::math::matrix::Matrix;

/// Half-width of the uniform range trainable weights are drawn from.
pub const INIT_RANGE: f64 = 0.5;

/// Role of a layer inside a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Transparent pass-through that caches the raw network input.
    Input,
    Hidden,
    Output,
}

/// Fully connected layer.
///
/// `weights` has one row per output neuron and one column per input, so
/// entry `(i, j)` connects input `j` to neuron `i`. Outputs are computed on
/// demand from `last_inputs` and the current weights.
#[derive(Debug, Clone)]
pub struct Layer {
    kind: LayerKind,
    input_size: usize,
    output_size: usize,
    weights: Matrix,
    last_inputs: Vec<f64>,
    activator: ActivationFunction,
}

impl Layer {
    /// Builds a trainable hidden or output layer with weights drawn from
    /// `[-0.5, 0.5)`. Input layers come from `Layer::input`.
    pub fn new<R: Rng + ?Sized>(
        kind: LayerKind,
        input_size: usize,
        output_size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Result<Layer> {
        if kind == LayerKind::Input {
            return Err(NetError::InvalidTopology(
                "input layers are built with Layer::input".into(),
            ));
        }
        if input_size == 0 || output_size == 0 {
            return Err(NetError::InvalidTopology(format!(
                "{kind:?} layer sizes must be positive (got {input_size} -> {output_size})"
            )));
        }

        Ok(Layer {
            kind,
            input_size,
            output_size,
            weights: Matrix::uniform(output_size, input_size, -INIT_RANGE, INIT_RANGE, rng),
            last_inputs: vec![0.0; input_size],
            activator: activation,
        })
    }

    /// Square pass-through layer of `size` signals with identity weights.
    pub fn input(size: usize) -> Result<Layer> {
        if size == 0 {
            return Err(NetError::InvalidTopology("input layer size must be positive".into()));
        }
        Ok(Layer {
            kind: LayerKind::Input,
            input_size: size,
            output_size: size,
            weights: Matrix::identity(size),
            last_inputs: vec![0.0; size],
            activator: ActivationFunction::Identity,
        })
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activator
    }

    pub fn last_inputs(&self) -> &[f64] {
        &self.last_inputs
    }

    /// Read-only view of the weight matrix. Mutate through `set_weight`.
    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn set_inputs(&mut self, signals: &[f64]) -> Result<()> {
        check_len("layer inputs", self.input_size, signals.len())?;
        self.last_inputs.clear();
        self.last_inputs.extend_from_slice(signals);
        Ok(())
    }

    /// Feeds this layer with the current outputs of `previous`.
    pub fn set_inputs_from(&mut self, previous: &Layer) -> Result<()> {
        check_len("chained layer inputs", self.input_size, previous.output_size)?;
        self.set_inputs(&previous.outputs())
    }

    /// Weighted input sum of neuron `i`.
    fn net(&self, i: usize) -> f64 {
        self.weights.row_dot(i, &self.last_inputs)
    }

    pub fn output(&self, i: usize) -> f64 {
        match self.kind {
            LayerKind::Input => self.last_inputs[i],
            LayerKind::Hidden | LayerKind::Output => self.activator.function(self.net(i)),
        }
    }

    /// Activation derivative at neuron `i`'s weighted sum. Always 1 for an
    /// input layer.
    pub fn derivative_output(&self, i: usize) -> f64 {
        match self.kind {
            LayerKind::Input => 1.0,
            LayerKind::Hidden | LayerKind::Output => self.activator.derivative(self.net(i)),
        }
    }

    pub fn outputs(&self) -> Vec<f64> {
        (0..self.output_size).map(|i| self.output(i)).collect()
    }

    pub fn derivative_outputs(&self) -> Vec<f64> {
        (0..self.output_size).map(|i| self.derivative_output(i)).collect()
    }

    /// Weight of the connection from `input` to `neuron`.
    pub fn weight(&self, neuron: usize, input: usize) -> f64 {
        self.weights[(neuron, input)]
    }

    /// Overwrites the connection from `input` to `neuron`. Input-layer
    /// weights are fixed; writes to them are dropped.
    pub fn set_weight(&mut self, neuron: usize, input: usize, weight: f64) {
        if self.kind == LayerKind::Input {
            tracing::warn!(neuron, input, "ignoring write to input-layer weight");
            return;
        }
        self.weights[(neuron, input)] = weight;
    }

    /// Delta rule: `w(i, j) += learning_rate * signal[i] * last_inputs[j]`.
    /// `signal` must already carry any activation-derivative factor.
    pub fn apply_delta_rule(&mut self, signal: &[f64], learning_rate: f64) -> Result<()> {
        check_len("layer error signal", self.output_size, signal.len())?;
        if self.kind == LayerKind::Input {
            tracing::warn!("ignoring weight update on input layer");
            return Ok(());
        }

        for (i, s) in signal.iter().enumerate() {
            let scale = learning_rate * s;
            for j in 0..self.input_size {
                self.weights[(i, j)] += scale * self.last_inputs[j];
            }
        }

        Ok(())
    }

    /// Backpropagates `next_errors` through `next`'s weights: output `i` of
    /// this layer receives `Σ_k next_errors[k] * next.weight(k, i)`.
    pub fn errors(&self, next: &Layer, next_errors: &[f64]) -> Result<Vec<f64>> {
        check_len("next layer inputs", self.output_size, next.input_size)?;
        check_len("next layer errors", next.output_size, next_errors.len())?;

        let errors = (0..self.output_size)
            .map(|i| {
                next_errors.iter()
                    .enumerate()
                    .map(|(k, e)| e * next.weight(k, i))
                    .sum()
            })
            .collect();

        Ok(errors)
    }

    /// Owned copy of the layer's current state.
    pub fn snapshot(&self) -> LayerSnapshot {
        LayerSnapshot {
            kind: self.kind,
            activation: self.activator,
            input_size: self.input_size,
            output_size: self.output_size,
            inputs: self.last_inputs.clone(),
            weights: self.weights.to_vec(),
            outputs: self.outputs(),
        }
    }
}

/// Point-in-time copy of a layer, handed to training observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    pub kind: LayerKind,
    pub activation: ActivationFunction,
    pub input_size: usize,
    pub output_size: usize,
    pub inputs: Vec<f64>,
    /// One row per neuron, one column per input.
    pub weights: Vec<Vec<f64>>,
    pub outputs: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hidden(input_size: usize, output_size: usize, activation: ActivationFunction) -> Layer {
        let mut rng = StdRng::seed_from_u64(42);
        Layer::new(LayerKind::Hidden, input_size, output_size, activation, &mut rng).unwrap()
    }

    #[test]
    fn input_layer_is_transparent() {
        let mut layer = Layer::input(3).unwrap();
        layer.set_inputs(&[0.25, -4.0, 9.5]).unwrap();
        assert_eq!(layer.outputs(), vec![0.25, -4.0, 9.5]);
        assert_eq!(layer.weights(), &Matrix::identity(3));
    }

    #[test]
    fn input_layer_weights_are_fixed() {
        let mut layer = Layer::input(2).unwrap();
        layer.set_weight(0, 1, 3.0);
        assert_eq!(layer.weight(0, 1), 0.0);
        layer.set_inputs(&[1.0, 2.0]).unwrap();
        assert_eq!(layer.outputs(), vec![1.0, 2.0]);
    }

    #[test]
    fn input_layers_only_come_from_input() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = Layer::new(LayerKind::Input, 2, 2, ActivationFunction::Identity, &mut rng);
        assert!(matches!(err, Err(NetError::InvalidTopology(_))));
        assert!(matches!(Layer::input(0), Err(NetError::InvalidTopology(_))));

        let layer = Layer::input(2).unwrap();
        assert_eq!(layer.kind(), LayerKind::Input);
        assert_eq!(layer.activation(), ActivationFunction::Identity);
    }

    #[test]
    fn initial_weights_in_range() {
        let layer = hidden(6, 5, ActivationFunction::Sigmoid);
        for i in 0..5 {
            for j in 0..6 {
                assert!((-0.5..0.5).contains(&layer.weight(i, j)));
            }
        }
    }

    #[test]
    fn set_inputs_checks_length() {
        let mut layer = hidden(2, 3, ActivationFunction::Sigmoid);
        let err = layer.set_inputs(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, NetError::ShapeMismatch { expected: 2, actual: 3, .. }));
    }

    #[test]
    fn set_inputs_from_checks_chaining() {
        let mut prev = Layer::input(3).unwrap();
        prev.set_inputs(&[1.0, 1.0, 1.0]).unwrap();
        let mut layer = hidden(2, 1, ActivationFunction::Identity);
        assert!(matches!(layer.set_inputs_from(&prev), Err(NetError::ShapeMismatch { .. })));
    }

    #[test]
    fn output_applies_activation_to_weighted_sum() {
        let mut layer = hidden(2, 2, ActivationFunction::Sigmoid);
        layer.set_weight(0, 0, 0.5);
        layer.set_weight(0, 1, -1.0);
        layer.set_weight(1, 0, 0.0);
        layer.set_weight(1, 1, 0.0);
        layer.set_inputs(&[2.0, 1.0]).unwrap();

        // neuron 0: 0.5 * 2 - 1 * 1 = 0
        assert_abs_diff_eq!(layer.output(0), 0.5);
        assert_abs_diff_eq!(layer.derivative_output(0), 0.25);
        assert_abs_diff_eq!(layer.output(1), 0.5);
    }

    #[test]
    fn errors_follow_next_layer_weights() {
        let this = hidden(2, 2, ActivationFunction::Sigmoid);
        let mut next = hidden(2, 3, ActivationFunction::Identity);
        let w = [[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        for (k, row) in w.iter().enumerate() {
            for (i, v) in row.iter().enumerate() {
                next.set_weight(k, i, *v);
            }
        }

        let errors = this.errors(&next, &[1.0, 0.0, -1.0]).unwrap();
        assert_abs_diff_eq!(errors[0], 1.0 - 5.0);
        assert_abs_diff_eq!(errors[1], 2.0 - 6.0);
    }

    #[test]
    fn errors_are_linear_in_next_errors() {
        let this = hidden(3, 4, ActivationFunction::Tanh);
        let next = hidden(4, 2, ActivationFunction::Sigmoid);
        let base = this.errors(&next, &[0.3, -1.2]).unwrap();
        let scaled = this.errors(&next, &[0.3 * -2.5, -1.2 * -2.5]).unwrap();
        for (b, s) in base.iter().zip(scaled.iter()) {
            assert_abs_diff_eq!(b * -2.5, *s, epsilon = 1e-12);
        }
    }

    #[test]
    fn errors_check_shapes() {
        let this = hidden(3, 4, ActivationFunction::Tanh);
        let next = hidden(4, 2, ActivationFunction::Sigmoid);
        assert!(this.errors(&next, &[1.0]).is_err());
        let unrelated = hidden(5, 2, ActivationFunction::Sigmoid);
        assert!(this.errors(&unrelated, &[1.0, 1.0]).is_err());
    }

    #[test]
    fn delta_rule_scales_by_inputs() {
        let mut layer = hidden(2, 2, ActivationFunction::Identity);
        let before = layer.weights().clone();
        layer.set_inputs(&[1.0, -2.0]).unwrap();
        layer.apply_delta_rule(&[0.5, 0.0], 0.1).unwrap();

        assert_abs_diff_eq!(layer.weight(0, 0), before[(0, 0)] + 0.05, epsilon = 1e-12);
        assert_abs_diff_eq!(layer.weight(0, 1), before[(0, 1)] - 0.1, epsilon = 1e-12);
        assert_eq!(layer.weight(1, 0), before[(1, 0)]);
        assert_eq!(layer.weight(1, 1), before[(1, 1)]);
        assert!(layer.apply_delta_rule(&[1.0], 0.1).is_err());
    }

    #[test]
    fn snapshot_is_an_owned_copy() {
        let mut layer = hidden(2, 1, ActivationFunction::Identity);
        layer.set_inputs(&[1.0, 0.0]).unwrap();
        let snap = layer.snapshot();
        layer.set_weight(0, 0, 100.0);
        assert_ne!(snap.weights[0][0], 100.0);
        assert_eq!(snap.inputs, vec![1.0, 0.0]);
        assert_eq!(snap.kind, LayerKind::Hidden);
    }
}
