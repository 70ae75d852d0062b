//! Feature encoding: one frame's detected hands → one fixed-length
//! classifier feature vector.

use crate::defaults::{FEATURE_LEN, MAX_HANDS, NUM_LANDMARKS};
use crate::detect::landmarks::HandLandmarks;

/// One frame's encoded features: two fixed hand slots of 63 values
/// each, laid out per slot as all x, then all y, then all z.
pub type FeatureVector = [f32; FEATURE_LEN];

/// Encodes up to two hands into the fixed feature layout.
///
/// Hands are assigned to slots positionally, in detector-reported order;
/// there is no left/right or cross-frame identity tracking, so a hand
/// may land in a different slot from one frame to the next. The
/// classifier is trained on the same positional convention.
///
/// The camera feed is mirror-view, so every x-coordinate is un-flipped
/// (`x' = 1 - x`) before encoding. Unfilled slots stay all-zero; hands
/// beyond the first two are discarded.
pub fn encode(hands: &[HandLandmarks]) -> FeatureVector {
    let mut features = [0.0f32; FEATURE_LEN];

    for (slot, hand) in hands.iter().take(MAX_HANDS).enumerate() {
        let base = slot * NUM_LANDMARKS * 3;
        for (i, point) in hand.points.iter().enumerate() {
            features[base + i] = 1.0 - point.x;
            features[base + NUM_LANDMARKS + i] = point.y;
            features[base + 2 * NUM_LANDMARKS + i] = point.z;
        }
    }

    features
}
