//! Video frame source seam.

use crate::error::{BisaraError, Result};

/// One raw captured image, as handed to the hand detector.
///
/// The pipeline never interprets pixel data itself; it only carries the
/// image from the source to the detector capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameImage {
    /// Packed RGB bytes, row-major.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl FrameImage {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// A zero-sized placeholder image, used by sources that drive the
    /// pipeline cadence without real pixels (replay, tests).
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            width: 0,
            height: 0,
        }
    }
}

/// Trait for video capture devices.
///
/// This trait allows swapping implementations (real camera vs mock vs
/// landmark replay).
pub trait FrameSource: Send {
    /// Start capturing frames from the source.
    fn start(&mut self) -> Result<()>;

    /// Stop capturing frames from the source.
    fn stop(&mut self) -> Result<()>;

    /// Read the next frame, if one is available.
    ///
    /// `Ok(None)` means no frame is ready yet for a live source, or
    /// end-of-input for a finite source.
    fn read_frame(&mut self) -> Result<Option<FrameImage>>;

    /// True for sources with a fixed amount of input (recordings).
    ///
    /// A finite source returning `Ok(None)` ends the session; a live
    /// source returning `Ok(None)` is polled again next tick.
    fn is_finite(&self) -> bool {
        false
    }
}

/// Mock frame source for testing.
#[derive(Debug, Clone)]
pub struct MockFrameSource {
    is_started: bool,
    frames_remaining: usize,
    frame: FrameImage,
    finite: bool,
    should_fail_start: bool,
    should_fail_read: bool,
    error_message: String,
}

impl MockFrameSource {
    /// Create a new mock source producing the given number of frames.
    pub fn new(frames: usize) -> Self {
        Self {
            is_started: false,
            frames_remaining: frames,
            frame: FrameImage::empty(),
            finite: true,
            should_fail_start: false,
            should_fail_read: false,
            error_message: "mock capture error".to_string(),
        }
    }

    /// Configure the image every frame carries.
    pub fn with_frame(mut self, frame: FrameImage) -> Self {
        self.frame = frame;
        self
    }

    /// Configure the mock to present as a live (infinite) source.
    pub fn with_live(mut self) -> Self {
        self.finite = false;
        self
    }

    /// Configure the mock to fail on start.
    pub fn with_start_failure(mut self) -> Self {
        self.should_fail_start = true;
        self
    }

    /// Configure the mock to fail on read.
    pub fn with_read_failure(mut self) -> Self {
        self.should_fail_read = true;
        self
    }

    /// Check if the source is started.
    pub fn is_started(&self) -> bool {
        self.is_started
    }
}

impl FrameSource for MockFrameSource {
    fn start(&mut self) -> Result<()> {
        if self.should_fail_start {
            Err(BisaraError::FrameCapture {
                message: self.error_message.clone(),
            })
        } else {
            self.is_started = true;
            Ok(())
        }
    }

    fn stop(&mut self) -> Result<()> {
        self.is_started = false;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Option<FrameImage>> {
        if self.should_fail_read {
            return Err(BisaraError::FrameCapture {
                message: self.error_message.clone(),
            });
        }
        if self.frames_remaining == 0 {
            return Ok(None);
        }
        self.frames_remaining -= 1;
        Ok(Some(self.frame.clone()))
    }

    fn is_finite(&self) -> bool {
        self.finite
    }
}
