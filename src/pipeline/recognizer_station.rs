//! Recognizer station: encodes frames, maintains the sliding window,
//! and gates classification.

use crate::classify::gate::ClassificationGate;
use crate::feature::encode;
use crate::pipeline::error::StationError;
use crate::pipeline::station::Station;
use crate::pipeline::types::{AssemblerEvent, LandmarkFrame};
use crate::window::SlidingWindow;

/// Station that turns landmark frames into recognized signs.
///
/// Every frame encodes to one feature vector and pushes into the
/// window. Once the window is warm, every subsequent frame triggers one
/// gate evaluation over the freshly advanced window.
pub struct RecognizerStation {
    window: SlidingWindow,
    gate: ClassificationGate,
    verbosity: u8,
}

impl RecognizerStation {
    /// Creates a new recognizer station.
    pub fn new(gate: ClassificationGate) -> Self {
        Self {
            window: SlidingWindow::new(),
            gate,
            verbosity: 0,
        }
    }

    /// Sets the verbosity level (2+ shows each recognized sign).
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Frames currently buffered (warm-up progress).
    pub fn window_len(&self) -> usize {
        self.window.len()
    }
}

impl Station for RecognizerStation {
    type Input = LandmarkFrame;
    type Output = AssemblerEvent;

    fn name(&self) -> &'static str {
        "recognizer"
    }

    fn process(&mut self, frame: LandmarkFrame) -> Result<Option<AssemblerEvent>, StationError> {
        self.window.push(encode(&frame.hands));

        if !self.window.is_full() {
            // Still warming up
            return Ok(None);
        }

        let snapshot = self.window.snapshot();
        let recognized = self
            .gate
            .evaluate(&snapshot)
            .map_err(|e| StationError::Recoverable(format!("Inference failed: {}", e)))?;

        if self.verbosity >= 2
            && let Some(sign) = &recognized
        {
            crate::output::render_sign(&sign.label, sign.confidence);
        }

        Ok(recognized.map(AssemblerEvent::Sign))
    }
}
