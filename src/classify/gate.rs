//! Classification gate: window → at most one confident recognition.

use crate::classify::classifier::SignClassifier;
use crate::defaults::{CONFIDENCE_THRESHOLD, SEQUENCE_LENGTH};
use crate::error::{BisaraError, Result};
use crate::feature::FeatureVector;
use crate::vocab::Vocabulary;
use std::sync::Arc;

/// One confident recognition: a vocabulary word and its probability.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedSign {
    pub label: String,
    pub confidence: f32,
}

impl RecognizedSign {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Submits full windows to the classifier and applies the confidence
/// threshold.
///
/// Emits at most one recognition per evaluation; anything at or below
/// the threshold is absence, not a low-confidence result.
pub struct ClassificationGate {
    classifier: Arc<dyn SignClassifier>,
    vocabulary: Arc<Vocabulary>,
    threshold: f32,
    warned_not_ready: bool,
}

impl ClassificationGate {
    /// Creates a gate with the standard confidence threshold.
    pub fn new(classifier: Arc<dyn SignClassifier>, vocabulary: Arc<Vocabulary>) -> Self {
        Self {
            classifier,
            vocabulary,
            threshold: CONFIDENCE_THRESHOLD,
            warned_not_ready: false,
        }
    }

    /// Overrides the confidence threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Evaluates one full window.
    ///
    /// Returns `Ok(Some(..))` only when the best class strictly exceeds
    /// the threshold. A classifier that never loaded disables the gate
    /// for the session (logged once). Inference failures surface as
    /// errors for the caller to report; the next window proceeds
    /// normally.
    pub fn evaluate(&mut self, window: &[FeatureVector]) -> Result<Option<RecognizedSign>> {
        debug_assert_eq!(window.len(), SEQUENCE_LENGTH, "gate called on partial window");
        if window.len() != SEQUENCE_LENGTH {
            return Ok(None);
        }

        if !self.classifier.is_ready() {
            if !self.warned_not_ready {
                self.warned_not_ready = true;
                eprintln!(
                    "bisara: classifier '{}' is not ready — recognition disabled",
                    self.classifier.model_name()
                );
            }
            return Ok(None);
        }

        // Flattened copy lives only for this call.
        let mut flat = Vec::with_capacity(window.len() * window[0].len());
        for vector in window {
            flat.extend_from_slice(vector);
        }

        let probabilities = self.classifier.predict(&flat)?;
        if probabilities.len() != self.vocabulary.len() {
            return Err(BisaraError::Inference {
                message: format!(
                    "probability vector length {}, vocabulary length {}",
                    probabilities.len(),
                    self.vocabulary.len()
                ),
            });
        }

        // First-encountered maximum: ties break toward the lowest index.
        let mut best_index = 0;
        let mut best_prob = probabilities[0];
        for (index, &prob) in probabilities.iter().enumerate().skip(1) {
            if prob > best_prob {
                best_index = index;
                best_prob = prob;
            }
        }

        if best_prob > self.threshold {
            let label = self.vocabulary.get(best_index).unwrap_or_default();
            Ok(Some(RecognizedSign::new(label, best_prob)))
        } else {
            Ok(None)
        }
    }

    /// The confidence threshold in effect.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}
