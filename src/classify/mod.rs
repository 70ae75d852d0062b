//! Window classification: the classifier seam and the confidence gate.

pub mod classifier;
pub mod gate;
#[cfg(feature = "onnx")]
pub mod onnx;

pub use classifier::{DisabledClassifier, MockClassifier, SignClassifier};
pub use gate::{ClassificationGate, RecognizedSign};
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
