//! Sign classifier seam.

use crate::error::{BisaraError, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Trait for sign classification over a flattened feature window.
///
/// This trait allows swapping implementations (real ONNX model vs mock).
pub trait SignClassifier: Send + Sync {
    /// Predict class probabilities for one window.
    ///
    /// # Arguments
    /// * `window` - Flattened `SEQUENCE_LENGTH × FEATURE_LEN` features,
    ///   row-major, oldest frame first
    ///
    /// # Returns
    /// One probability per vocabulary entry, in vocabulary order
    fn predict(&self, window: &[f32]) -> Result<Vec<f32>>;

    /// Get the name of the loaded model
    fn model_name(&self) -> &str;

    /// Check if the classifier is ready
    fn is_ready(&self) -> bool;
}

/// Implement SignClassifier for Arc<T> to allow sharing across sessions.
impl<T: SignClassifier + ?Sized> SignClassifier for Arc<T> {
    fn predict(&self, window: &[f32]) -> Result<Vec<f32>> {
        (**self).predict(window)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

/// Mock classifier for testing.
#[derive(Debug)]
pub struct MockClassifier {
    model_name: String,
    fixed: Vec<f32>,
    script: Mutex<VecDeque<Vec<f32>>>,
    should_fail: bool,
    not_ready: bool,
}

impl MockClassifier {
    /// Create a mock with a uniform low-confidence response.
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            fixed: vec![0.2; 5],
            script: Mutex::new(VecDeque::new()),
            should_fail: false,
            not_ready: false,
        }
    }

    /// Configure a fixed probability vector returned for every window.
    pub fn with_probabilities(mut self, probabilities: Vec<f32>) -> Self {
        self.fixed = probabilities;
        self
    }

    /// Configure per-window responses, consumed one per `predict` call.
    ///
    /// Once the script is exhausted the fixed response is returned.
    pub fn with_script(self, responses: Vec<Vec<f32>>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            *script = responses.into();
        }
        self
    }

    /// Configure the mock to fail on predict.
    ///
    /// The mock still reports ready: a loaded model whose inference
    /// errors is a different failure mode from a model that never
    /// loaded.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Configure the mock to report not-ready.
    pub fn with_not_ready(mut self) -> Self {
        self.not_ready = true;
        self
    }

    /// A probability vector putting the given confidence on one index
    /// and spreading the rest uniformly. Test helper.
    pub fn one_hot(len: usize, index: usize, confidence: f32) -> Vec<f32> {
        let rest = if len > 1 {
            (1.0 - confidence) / (len - 1) as f32
        } else {
            0.0
        };
        (0..len)
            .map(|i| if i == index { confidence } else { rest })
            .collect()
    }
}

impl SignClassifier for MockClassifier {
    fn predict(&self, _window: &[f32]) -> Result<Vec<f32>> {
        if self.should_fail {
            return Err(BisaraError::Inference {
                message: "mock inference failure".to_string(),
            });
        }
        let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
        Ok(scripted.unwrap_or_else(|| self.fixed.clone()))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn is_ready(&self) -> bool {
        !self.not_ready
    }
}

/// Stand-in for a classifier whose model never loaded.
///
/// Keeps the pipeline alive in "no recognition" mode: the gate sees
/// `!is_ready()`, logs once, and emits nothing for the whole session.
#[derive(Debug, Clone, Default)]
pub struct DisabledClassifier;

impl SignClassifier for DisabledClassifier {
    fn predict(&self, _window: &[f32]) -> Result<Vec<f32>> {
        Err(BisaraError::ClassifierLoad {
            message: "no classifier model loaded".to_string(),
        })
    }

    fn model_name(&self) -> &str {
        "disabled"
    }

    fn is_ready(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_classifier_returns_fixed_probabilities() {
        let classifier =
            MockClassifier::new("test-model").with_probabilities(vec![0.1, 0.9, 0.0]);

        let probs = classifier.predict(&[0.0; 10]).unwrap();
        assert_eq!(probs, vec![0.1, 0.9, 0.0]);
    }

    #[test]
    fn test_mock_classifier_script_consumed_in_order() {
        let classifier = MockClassifier::new("test-model")
            .with_probabilities(vec![1.0])
            .with_script(vec![vec![0.5, 0.5], vec![0.9, 0.1]]);

        assert_eq!(classifier.predict(&[]).unwrap(), vec![0.5, 0.5]);
        assert_eq!(classifier.predict(&[]).unwrap(), vec![0.9, 0.1]);
        // Script exhausted → fixed response
        assert_eq!(classifier.predict(&[]).unwrap(), vec![1.0]);
    }

    #[test]
    fn test_mock_classifier_failure() {
        let classifier = MockClassifier::new("test-model").with_failure();

        let result = classifier.predict(&[0.0; 10]);
        match result {
            Err(BisaraError::Inference { message }) => {
                assert_eq!(message, "mock inference failure");
            }
            _ => panic!("Expected Inference error"),
        }
        // Inference failure does not mean the model is unloaded
        assert!(classifier.is_ready());
    }

    #[test]
    fn test_mock_classifier_not_ready() {
        let classifier = MockClassifier::new("test-model").with_not_ready();
        assert!(!classifier.is_ready());
    }

    #[test]
    fn test_mock_classifier_model_name() {
        let classifier = MockClassifier::new("signs-v2");
        assert_eq!(classifier.model_name(), "signs-v2");
        assert!(classifier.is_ready());
    }

    #[test]
    fn test_one_hot_sums_to_one() {
        let probs = MockClassifier::one_hot(5, 2, 0.96);
        assert_eq!(probs.len(), 5);
        assert!((probs[2] - 0.96).abs() < 1e-6);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_disabled_classifier_is_never_ready() {
        let classifier = DisabledClassifier;
        assert!(!classifier.is_ready());
        assert!(classifier.predict(&[0.0; 10]).is_err());
        assert_eq!(classifier.model_name(), "disabled");
    }

    #[test]
    fn test_classifier_trait_is_object_safe() {
        let classifier: Box<dyn SignClassifier> =
            Box::new(MockClassifier::new("boxed").with_probabilities(vec![0.7, 0.3]));

        assert_eq!(classifier.model_name(), "boxed");
        assert_eq!(classifier.predict(&[]).unwrap(), vec![0.7, 0.3]);
    }

    #[test]
    fn test_arc_classifier_delegates() {
        let classifier = Arc::new(MockClassifier::new("shared"));
        let shared: Arc<dyn SignClassifier> = classifier.clone();
        assert_eq!(shared.model_name(), "shared");
        assert!(shared.is_ready());
    }
}
