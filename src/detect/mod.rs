//! Hand landmark acquisition: frame sources, the detector seam, and
//! recorded-landmark replay.

pub mod detector;
pub mod landmarks;
pub mod replay;
pub mod source;

pub use detector::{HandDetector, MockHandDetector};
pub use landmarks::{HandLandmarks, Point3};
pub use replay::{LandmarkRecord, ReplayDetector, ReplayScript, ReplaySource};
pub use source::{FrameImage, FrameSource, MockFrameSource};
