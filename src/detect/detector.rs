//! Hand landmark detector seam.

use crate::detect::landmarks::HandLandmarks;
use crate::detect::source::FrameImage;
use crate::error::{BisaraError, Result};
use std::collections::VecDeque;

/// Trait for hand-landmark detection.
///
/// Given one frame, produce zero or more detected hands, each a fixed
/// ordered set of 21 points. The detector may report more than two
/// hands; downstream encoding keeps only the first two in reported
/// order.
pub trait HandDetector: Send {
    /// Detect hands in one frame.
    ///
    /// An empty vector is a normal result (no hands in view).
    fn detect(&mut self, frame: &FrameImage) -> Result<Vec<HandLandmarks>>;

    /// Check if the detector is ready to process frames.
    ///
    /// A not-ready detector causes the frame to be skipped; the next
    /// tick retries.
    fn is_ready(&self) -> bool {
        true
    }

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "detector"
    }
}

/// Mock hand detector for testing.
#[derive(Debug, Clone, Default)]
pub struct MockHandDetector {
    fixed: Vec<HandLandmarks>,
    script: VecDeque<Vec<HandLandmarks>>,
    should_fail: bool,
    not_ready: bool,
    detect_count: usize,
}

impl MockHandDetector {
    /// Create a mock that detects no hands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure a fixed response returned for every frame.
    pub fn with_hands(mut self, hands: Vec<HandLandmarks>) -> Self {
        self.fixed = hands;
        self
    }

    /// Configure per-frame responses, consumed one per `detect` call.
    ///
    /// Once the script is exhausted the fixed response (default: no
    /// hands) is returned.
    pub fn with_script(mut self, frames: Vec<Vec<HandLandmarks>>) -> Self {
        self.script = frames.into();
        self
    }

    /// Configure the mock to fail on detect.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Configure the mock to report not-ready.
    pub fn with_not_ready(mut self) -> Self {
        self.not_ready = true;
        self
    }

    /// Number of `detect` calls made so far.
    pub fn detect_count(&self) -> usize {
        self.detect_count
    }
}

impl HandDetector for MockHandDetector {
    fn detect(&mut self, _frame: &FrameImage) -> Result<Vec<HandLandmarks>> {
        self.detect_count += 1;
        if self.should_fail {
            return Err(BisaraError::Detection {
                message: "mock detection failure".to_string(),
            });
        }
        Ok(self.script.pop_front().unwrap_or_else(|| self.fixed.clone()))
    }

    fn is_ready(&self) -> bool {
        !self.not_ready
    }

    fn name(&self) -> &'static str {
        "mock-detector"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_detector_returns_no_hands_by_default() {
        let mut detector = MockHandDetector::new();
        let hands = detector.detect(&FrameImage::empty()).unwrap();
        assert!(hands.is_empty());
    }

    #[test]
    fn test_mock_detector_returns_fixed_hands() {
        let hand = HandLandmarks::uniform(0.5, 0.5, 0.0);
        let mut detector = MockHandDetector::new().with_hands(vec![hand.clone()]);

        let hands = detector.detect(&FrameImage::empty()).unwrap();
        assert_eq!(hands, vec![hand.clone()]);

        // Fixed response repeats
        let hands = detector.detect(&FrameImage::empty()).unwrap();
        assert_eq!(hands, vec![hand]);
    }

    #[test]
    fn test_mock_detector_script_consumed_in_order() {
        let first = HandLandmarks::uniform(0.1, 0.1, 0.0);
        let second = HandLandmarks::uniform(0.9, 0.9, 0.0);
        let mut detector = MockHandDetector::new()
            .with_script(vec![vec![first.clone()], vec![], vec![second.clone()]]);

        assert_eq!(detector.detect(&FrameImage::empty()).unwrap(), vec![first]);
        assert!(detector.detect(&FrameImage::empty()).unwrap().is_empty());
        assert_eq!(detector.detect(&FrameImage::empty()).unwrap(), vec![second]);
        // Script exhausted → fixed response (default: no hands)
        assert!(detector.detect(&FrameImage::empty()).unwrap().is_empty());
    }

    #[test]
    fn test_mock_detector_failure() {
        let mut detector = MockHandDetector::new().with_failure();
        let result = detector.detect(&FrameImage::empty());
        match result {
            Err(BisaraError::Detection { message }) => {
                assert_eq!(message, "mock detection failure");
            }
            _ => panic!("Expected Detection error"),
        }
    }

    #[test]
    fn test_mock_detector_readiness() {
        assert!(MockHandDetector::new().is_ready());
        assert!(!MockHandDetector::new().with_not_ready().is_ready());
    }

    #[test]
    fn test_mock_detector_counts_calls() {
        let mut detector = MockHandDetector::new();
        detector.detect(&FrameImage::empty()).unwrap();
        detector.detect(&FrameImage::empty()).unwrap();
        assert_eq!(detector.detect_count(), 2);
    }

    #[test]
    fn test_detector_trait_is_object_safe() {
        let mut detector: Box<dyn HandDetector> = Box::new(MockHandDetector::new());
        assert!(detector.detect(&FrameImage::empty()).unwrap().is_empty());
        assert_eq!(detector.name(), "mock-detector");
    }
}
