//! Default configuration constants for bisara.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

/// Number of landmark points reported per detected hand.
///
/// The hand-landmark detector emits a fixed, ordered set of 21 3D points
/// per hand (wrist, finger joints, fingertips).
pub const NUM_LANDMARKS: usize = 21;

/// Maximum number of hands encoded per frame.
///
/// The classifier input has two fixed hand slots. Detections beyond the
/// first two (in detector-reported order) are discarded.
pub const MAX_HANDS: usize = 2;

/// Length of one frame's feature vector.
///
/// Two hand slots, each 21 landmarks × 3 coordinates, laid out as
/// x-block, y-block, z-block per slot.
pub const FEATURE_LEN: usize = MAX_HANDS * NUM_LANDMARKS * 3;

/// Number of consecutive frames in one classifier window.
///
/// The classifier is trained on sequences of exactly 30 frames; the
/// window advances by one frame per tick once warm.
pub const SEQUENCE_LENGTH: usize = 30;

/// Minimum probability for a prediction to count as a recognition.
///
/// Strictly greater-than: a window whose best class scores exactly 0.95
/// produces no recognition.
pub const CONFIDENCE_THRESHOLD: f32 = 0.95;

/// Idle duration in milliseconds before a sentence is finalized.
///
/// 3000ms without a newly accepted sign ends the sentence: trailing
/// punctuation is normalized and, with auto-speak on, the sentence is
/// handed to the speech synthesizer.
pub const IDLE_FINALIZE_MS: u64 = 3000;

/// Default interval between frame polls in milliseconds.
///
/// ~30fps. The detector stage drops frames when it cannot keep up, so
/// this is an upper bound on the processing rate, not a guarantee.
pub const FRAME_INTERVAL_MS: u64 = 33;

/// Sentinel label for the no-sign / rest state.
///
/// Index 0 of every vocabulary. A blank recognition resets duplicate
/// suppression without appending anything.
pub const BLANK_LABEL: &str = "blank";

/// Default voice hint for speech synthesis.
///
/// Matched as a substring against available voice names; the built-in
/// vocabulary is Indonesian, so prefer an Indonesian voice when present.
pub const DEFAULT_VOICE_HINT: &str = "id";
