//! Data types flowing between recognition pipeline stations.

use crate::classify::gate::RecognizedSign;
use crate::detect::landmarks::HandLandmarks;
use crate::detect::source::FrameImage;
use std::time::Instant;

/// One captured video frame with timing information.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// The raw image, as handed to the detector.
    pub image: FrameImage,
    /// Timestamp when this frame was captured.
    pub timestamp: Instant,
    /// Sequence number for ordering and gap detection.
    pub sequence: u64,
}

impl VideoFrame {
    /// Creates a new video frame.
    pub fn new(image: FrameImage, timestamp: Instant, sequence: u64) -> Self {
        Self {
            image,
            timestamp,
            sequence,
        }
    }
}

/// One frame's detection result: the hands found in it.
#[derive(Debug, Clone)]
pub struct LandmarkFrame {
    /// Detected hands in detector-reported order. May be empty, may
    /// exceed two; the encoder keeps the first two.
    pub hands: Vec<HandLandmarks>,
    /// Timestamp of the originating video frame.
    pub timestamp: Instant,
    /// Sequence number of the originating video frame.
    pub sequence: u64,
}

impl LandmarkFrame {
    /// Creates a new landmark frame.
    pub fn new(hands: Vec<HandLandmarks>, timestamp: Instant, sequence: u64) -> Self {
        Self {
            hands,
            timestamp,
            sequence,
        }
    }
}

/// Input to the assembler station.
#[derive(Debug, Clone, PartialEq)]
pub enum AssemblerEvent {
    /// A confident recognition from the gate.
    Sign(RecognizedSign),
    /// Manual speech trigger (auto-speak off only).
    SpeakNow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_frame_creation() {
        let image = FrameImage::new(vec![0u8; 12], 2, 2);
        let timestamp = Instant::now();

        let frame = VideoFrame::new(image.clone(), timestamp, 42);

        assert_eq!(frame.image, image);
        assert_eq!(frame.timestamp, timestamp);
        assert_eq!(frame.sequence, 42);
    }

    #[test]
    fn test_landmark_frame_creation() {
        let hands = vec![HandLandmarks::uniform(0.5, 0.5, 0.0)];
        let timestamp = Instant::now();

        let frame = LandmarkFrame::new(hands.clone(), timestamp, 7);

        assert_eq!(frame.hands, hands);
        assert_eq!(frame.sequence, 7);
    }

    #[test]
    fn test_landmark_frame_may_be_empty() {
        let frame = LandmarkFrame::new(vec![], Instant::now(), 0);
        assert!(frame.hands.is_empty());
    }

    #[test]
    fn test_assembler_event_variants() {
        let sign = RecognizedSign::new("halo", 0.99);
        let event = AssemblerEvent::Sign(sign.clone());
        assert_eq!(event, AssemblerEvent::Sign(sign));
        assert_eq!(AssemblerEvent::SpeakNow, AssemblerEvent::SpeakNow);
    }
}
