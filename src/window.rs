//! Sliding window over per-frame feature vectors.

use crate::defaults::SEQUENCE_LENGTH;
use crate::feature::FeatureVector;
use std::collections::VecDeque;

/// Holds the most recent `SEQUENCE_LENGTH` feature vectors in arrival
/// order, evicting from the front once full.
///
/// One push per processed frame, strictly in frame order. After warm-up
/// the window advances by one vector per frame, so consecutive
/// classifier inputs overlap by 29 frames.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    frames: VecDeque<FeatureVector>,
    capacity: usize,
}

impl SlidingWindow {
    /// Creates an empty window with the standard sequence length.
    pub fn new() -> Self {
        Self::with_capacity(SEQUENCE_LENGTH)
    }

    /// Creates an empty window with a custom capacity (tests).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Appends a vector, evicting the oldest if the window would exceed
    /// its capacity.
    pub fn push(&mut self, v: FeatureVector) {
        self.frames.push_back(v);
        while self.frames.len() > self.capacity {
            self.frames.pop_front();
        }
    }

    /// True iff the window holds exactly its capacity.
    pub fn is_full(&self) -> bool {
        self.frames.len() == self.capacity
    }

    /// Number of vectors currently held.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when no vectors are held.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Returns the current contents, oldest first, without mutating the
    /// window. The copy decouples an in-flight inference from pushes
    /// that land while it runs.
    pub fn snapshot(&self) -> Vec<FeatureVector> {
        self.frames.iter().copied().collect()
    }

    /// Drops all held vectors (session reset).
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl Default for SlidingWindow {
    fn default() -> Self {
        Self::new()
    }
}
