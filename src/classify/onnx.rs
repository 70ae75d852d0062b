//! ONNX classifier backend.
//!
//! Loads an exported sign model and serves predictions over the
//! `[1, SEQUENCE_LENGTH, FEATURE_LEN]` input tensor. The model's final
//! layer is expected to be softmax, so the output is already a
//! probability vector in vocabulary order.

use crate::classify::classifier::SignClassifier;
use crate::defaults::{FEATURE_LEN, SEQUENCE_LENGTH};
use crate::error::{BisaraError, Result};
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;

/// Sign classifier backed by an ONNX Runtime session.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    model_name: String,
}

impl OnnxClassifier {
    /// Loads a model from disk.
    pub fn load(model_path: &Path) -> Result<Self> {
        if !model_path.exists() {
            return Err(BisaraError::ModelNotFound {
                path: model_path.display().to_string(),
            });
        }

        let session = Session::builder()
            .map_err(load_error)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(load_error)?
            .with_intra_threads(1)
            .map_err(load_error)?
            .commit_from_file(model_path)
            .map_err(load_error)?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| BisaraError::ClassifierLoad {
                message: "model has no inputs".to_string(),
            })?;

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| BisaraError::ClassifierLoad {
                message: "model has no outputs".to_string(),
            })?;

        let model_name = model_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "onnx".to_string());

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            model_name,
        })
    }
}

fn load_error(e: ort::Error) -> BisaraError {
    BisaraError::ClassifierLoad {
        message: e.to_string(),
    }
}

fn inference_error(e: ort::Error) -> BisaraError {
    BisaraError::Inference {
        message: e.to_string(),
    }
}

impl SignClassifier for OnnxClassifier {
    fn predict(&self, window: &[f32]) -> Result<Vec<f32>> {
        if window.len() != SEQUENCE_LENGTH * FEATURE_LEN {
            return Err(BisaraError::Inference {
                message: format!(
                    "expected {} features, got {}",
                    SEQUENCE_LENGTH * FEATURE_LEN,
                    window.len()
                ),
            });
        }

        // The tensor (and the session outputs) are scoped to this call;
        // both are released before returning on every path.
        let input = Tensor::from_array((
            [1i64, SEQUENCE_LENGTH as i64, FEATURE_LEN as i64],
            window.to_vec(),
        ))
        .map_err(inference_error)?;

        let mut session = self.session.lock().map_err(|_| BisaraError::Inference {
            message: "session lock poisoned".to_string(),
        })?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(inference_error)?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| BisaraError::Inference {
                message: "missing model output".to_string(),
            })?;

        let (_shape, data) = output.try_extract_tensor::<f32>().map_err(inference_error)?;
        if data.is_empty() {
            return Err(BisaraError::Inference {
                message: "empty model output".to_string(),
            });
        }

        Ok(data.to_vec())
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn is_ready(&self) -> bool {
        true
    }
}
