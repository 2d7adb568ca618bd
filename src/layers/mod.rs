pub mod dense;

pub use dense::{Layer, LayerKind, LayerSnapshot};
