//! Inference layer: ONNX Runtime validator-selection model and the selection step built on it.

mod selector;
pub use selector::{Inference, select_validator};

#[cfg(feature = "onnx")]
mod engine;
#[cfg(feature = "onnx")]
pub use engine::ValidatorEngine;
