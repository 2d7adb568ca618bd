use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::Result;
use crate::network::network::Network;

fn default_output_activation() -> ActivationFunction {
    ActivationFunction::Identity
}

/// Serializable description of a network topology.
///
/// This is architecture only; trained weights are never written out.
///
/// Fields:
/// - `input_size`        — number of raw input signals
/// - `output_size`       — number of output neurons
/// - `hidden_sizes`      — neurons per hidden layer, input side first
/// - `hidden_activation` — activation shared by all hidden layers
/// - `output_activation` — activation of the output layer; defaults to
///                         `identity` so outputs are raw weighted sums
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub input_size: usize,
    pub output_size: usize,
    pub hidden_sizes: Vec<usize>,
    pub hidden_activation: ActivationFunction,
    #[serde(default = "default_output_activation")]
    pub output_activation: ActivationFunction,
}

impl NetworkSpec {
    /// The 2-[4, 2]-1 sigmoid network used for the XOR demo.
    pub fn xor() -> NetworkSpec {
        NetworkSpec {
            input_size: 2,
            output_size: 1,
            hidden_sizes: vec![4, 2],
            hidden_activation: ActivationFunction::Sigmoid,
            output_activation: ActivationFunction::Identity,
        }
    }

    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        Network::from_spec(self, rng)
    }
}

impl Default for NetworkSpec {
    fn default() -> Self {
        NetworkSpec::xor()
    }
}
