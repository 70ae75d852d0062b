//! Hand landmark geometry types.

use crate::defaults::NUM_LANDMARKS;
use crate::error::{BisaraError, Result};
use serde::{Deserialize, Serialize};

/// One detected 3D point on a hand.
///
/// Coordinates are detector-normalized: x and y roughly in [0, 1]
/// relative to the frame, z relative depth with the wrist near 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// One detected hand: a fixed, ordered set of 21 landmark points.
///
/// Produced per frame by the detector and consumed immediately by the
/// feature encoder; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandLandmarks {
    pub points: [Point3; NUM_LANDMARKS],
}

impl HandLandmarks {
    /// Wraps a full landmark set.
    pub fn new(points: [Point3; NUM_LANDMARKS]) -> Self {
        Self { points }
    }

    /// Builds a landmark set from a slice, validating the count.
    ///
    /// Replay files arrive as JSON arrays; anything other than exactly
    /// 21 points is a malformed recording.
    pub fn from_slice(points: &[Point3]) -> Result<Self> {
        if points.len() != NUM_LANDMARKS {
            return Err(BisaraError::Replay {
                message: format!("expected {} landmarks, got {}", NUM_LANDMARKS, points.len()),
            });
        }
        let mut fixed = [Point3::default(); NUM_LANDMARKS];
        fixed.copy_from_slice(points);
        Ok(Self { points: fixed })
    }

    /// A hand with every landmark at the same point. Test helper.
    pub fn uniform(x: f32, y: f32, z: f32) -> Self {
        Self {
            points: [Point3::new(x, y, z); NUM_LANDMARKS],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_creation() {
        let p = Point3::new(0.25, 0.5, -0.1);
        assert_eq!(p.x, 0.25);
        assert_eq!(p.y, 0.5);
        assert_eq!(p.z, -0.1);
    }

    #[test]
    fn test_from_slice_accepts_exact_count() {
        let points = vec![Point3::new(0.1, 0.2, 0.3); NUM_LANDMARKS];
        let hand = HandLandmarks::from_slice(&points).unwrap();
        assert_eq!(hand.points.len(), NUM_LANDMARKS);
        assert_eq!(hand.points[20], Point3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_from_slice_rejects_short_count() {
        let points = vec![Point3::default(); NUM_LANDMARKS - 1];
        let result = HandLandmarks::from_slice(&points);
        match result {
            Err(BisaraError::Replay { message }) => {
                assert!(message.contains("expected 21 landmarks, got 20"));
            }
            _ => panic!("Expected Replay error"),
        }
    }

    #[test]
    fn test_from_slice_rejects_long_count() {
        let points = vec![Point3::default(); NUM_LANDMARKS + 3];
        assert!(HandLandmarks::from_slice(&points).is_err());
    }

    #[test]
    fn test_uniform_fills_all_points() {
        let hand = HandLandmarks::uniform(0.4, 0.6, 0.0);
        assert!(hand.points.iter().all(|p| *p == Point3::new(0.4, 0.6, 0.0)));
    }

    #[test]
    fn test_serde_roundtrip() {
        let hand = HandLandmarks::uniform(0.3, 0.7, -0.05);
        let json = serde_json::to_string(&hand).unwrap();
        let back: HandLandmarks = serde_json::from_str(&json).unwrap();
        assert_eq!(hand, back);
    }
}
