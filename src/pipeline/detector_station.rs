//! Detector station that finds hand landmarks in video frames.

use crate::detect::detector::HandDetector;
use crate::pipeline::error::StationError;
use crate::pipeline::station::Station;
use crate::pipeline::types::{LandmarkFrame, VideoFrame};

/// Station that runs the hand-landmark detector over incoming frames.
///
/// Frames arrive through a bounded(1) channel, so while one detection
/// is in flight newer frames are dropped at the sender — the single
/// in-flight discipline that keeps detections in capture order.
pub struct DetectorStation {
    detector: Box<dyn HandDetector>,
    warned_not_ready: bool,
}

impl DetectorStation {
    /// Creates a new detector station.
    pub fn new(detector: Box<dyn HandDetector>) -> Self {
        Self {
            detector,
            warned_not_ready: false,
        }
    }
}

impl Station for DetectorStation {
    type Input = VideoFrame;
    type Output = LandmarkFrame;

    fn name(&self) -> &'static str {
        "detector"
    }

    fn process(&mut self, frame: VideoFrame) -> Result<Option<LandmarkFrame>, StationError> {
        if !self.detector.is_ready() {
            // Skip this frame; the next tick retries
            if !self.warned_not_ready {
                self.warned_not_ready = true;
                eprintln!("bisara: hand detector '{}' is not ready", self.detector.name());
            }
            return Ok(None);
        }
        self.warned_not_ready = false;

        let hands = self
            .detector
            .detect(&frame.image)
            .map_err(|e| StationError::Recoverable(format!("Detection failed: {}", e)))?;

        // An empty hand list is a real result: it encodes as an
        // all-zero vector and keeps the window advancing.
        Ok(Some(LandmarkFrame::new(hands, frame.timestamp, frame.sequence)))
    }
}
