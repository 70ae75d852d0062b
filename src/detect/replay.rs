//! Landmark replay: drive the pipeline from a recorded session instead
//! of a camera and detector model.
//!
//! A recording is JSON Lines: one object per frame, `{"hands": [...]}`,
//! each hand an array of 21 `{x, y, z}` points. Blank frames (no hands)
//! are recorded as empty arrays so the replay keeps the recording's
//! frame cadence.

use crate::detect::detector::HandDetector;
use crate::detect::landmarks::HandLandmarks;
use crate::detect::source::{FrameImage, FrameSource};
use crate::error::{BisaraError, Result};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One recorded frame of a landmark session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkRecord {
    /// Detected hands, in detector-reported order. May be empty.
    #[serde(default)]
    pub hands: Vec<HandLandmarks>,
}

/// A full recorded session, loaded into memory.
#[derive(Debug, Clone, Default)]
pub struct ReplayScript {
    records: Vec<LandmarkRecord>,
}

impl ReplayScript {
    /// Loads a JSONL recording from disk.
    ///
    /// Blank lines are skipped; any malformed line fails the whole load
    /// with its line number.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BisaraError::Replay {
                    message: format!("recording not found: {}", path.display()),
                }
            } else {
                BisaraError::Io(e)
            }
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Reads a JSONL recording from any buffered reader (pipe mode).
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut records = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: LandmarkRecord =
                serde_json::from_str(&line).map_err(|e| BisaraError::Replay {
                    message: format!("line {}: {}", line_no + 1, e),
                })?;
            records.push(record);
        }

        Ok(Self { records })
    }

    /// Builds a script directly from records (tests, programmatic use).
    pub fn from_records(records: Vec<LandmarkRecord>) -> Self {
        Self { records }
    }

    /// Number of recorded frames.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the recording holds no frames.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Splits the script into the source/detector pair that feeds a
    /// pipeline: the source paces one placeholder frame per record, the
    /// detector answers each frame with that record's hands.
    pub fn into_pipeline_inputs(self) -> (ReplaySource, ReplayDetector) {
        let frames = self.records.len();
        (ReplaySource::new(frames), ReplayDetector::new(self))
    }
}

/// Finite frame source that emits one placeholder frame per recorded
/// entry. Pacing comes from the pipeline's frame poll interval.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    frames_remaining: usize,
    is_started: bool,
}

impl ReplaySource {
    fn new(frames: usize) -> Self {
        Self {
            frames_remaining: frames,
            is_started: false,
        }
    }
}

impl FrameSource for ReplaySource {
    fn start(&mut self) -> Result<()> {
        self.is_started = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.is_started = false;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Option<FrameImage>> {
        if self.frames_remaining == 0 {
            return Ok(None);
        }
        self.frames_remaining -= 1;
        Ok(Some(FrameImage::empty()))
    }

    fn is_finite(&self) -> bool {
        true
    }
}

/// Detector that answers frames from the recorded script, one record
/// per call, in order.
#[derive(Debug, Clone)]
pub struct ReplayDetector {
    pending: VecDeque<LandmarkRecord>,
}

impl ReplayDetector {
    fn new(script: ReplayScript) -> Self {
        Self {
            pending: script.records.into(),
        }
    }

    /// Frames not yet served.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl HandDetector for ReplayDetector {
    fn detect(&mut self, _frame: &FrameImage) -> Result<Vec<HandLandmarks>> {
        // Past the end of the recording: report no hands. The paired
        // ReplaySource runs out at the same record count, so this only
        // happens if extra frames are injected.
        Ok(self
            .pending
            .pop_front()
            .map(|record| record.hands)
            .unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "replay"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn record_with_hands(count: usize) -> LandmarkRecord {
        LandmarkRecord {
            hands: (0..count)
                .map(|i| HandLandmarks::uniform(0.1 * i as f32, 0.5, 0.0))
                .collect(),
        }
    }

    #[test]
    fn test_load_valid_recording() {
        let mut file = NamedTempFile::new().unwrap();
        for record in [record_with_hands(1), record_with_hands(0)] {
            writeln!(file, "{}", serde_json::to_string(&record).unwrap()).unwrap();
        }

        let script = ReplayScript::load(file.path()).unwrap();
        assert_eq!(script.len(), 2);
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", serde_json::to_string(&record_with_hands(1)).unwrap()).unwrap();
        writeln!(file).unwrap();
        writeln!(file, "{}", serde_json::to_string(&record_with_hands(2)).unwrap()).unwrap();

        let script = ReplayScript::load(file.path()).unwrap();
        assert_eq!(script.len(), 2);
    }

    #[test]
    fn test_load_reports_malformed_line_number() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", serde_json::to_string(&record_with_hands(0)).unwrap()).unwrap();
        writeln!(file, "not json").unwrap();

        let result = ReplayScript::load(file.path());
        match result {
            Err(BisaraError::Replay { message }) => {
                assert!(message.starts_with("line 2:"), "got: {}", message);
            }
            _ => panic!("Expected Replay error"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let result = ReplayScript::load(Path::new("/nonexistent/session.jsonl"));
        match result {
            Err(BisaraError::Replay { message }) => {
                assert!(message.contains("recording not found"));
            }
            _ => panic!("Expected Replay error"),
        }
    }

    #[test]
    fn test_missing_hands_field_reads_as_blank_frame() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{}}").unwrap();

        let script = ReplayScript::load(file.path()).unwrap();
        assert_eq!(script.len(), 1);
        let (_, mut detector) = script.into_pipeline_inputs();
        assert!(detector.detect(&FrameImage::empty()).unwrap().is_empty());
    }

    #[test]
    fn test_pipeline_inputs_stay_in_lockstep() {
        let script = ReplayScript::from_records(vec![
            record_with_hands(1),
            record_with_hands(2),
            record_with_hands(0),
        ]);
        let (mut source, mut detector) = script.into_pipeline_inputs();
        source.start().unwrap();

        let mut served = 0;
        while let Some(frame) = source.read_frame().unwrap() {
            let hands = detector.detect(&frame).unwrap();
            assert_eq!(hands.len(), [1, 2, 0][served]);
            served += 1;
        }
        assert_eq!(served, 3);
        assert_eq!(detector.remaining(), 0);
    }

    #[test]
    fn test_replay_detector_past_end_reports_no_hands() {
        let script = ReplayScript::from_records(vec![record_with_hands(2)]);
        let (_, mut detector) = script.into_pipeline_inputs();

        assert_eq!(detector.detect(&FrameImage::empty()).unwrap().len(), 2);
        assert!(detector.detect(&FrameImage::empty()).unwrap().is_empty());
    }

    #[test]
    fn test_replay_source_is_finite() {
        let (source, _) = ReplayScript::from_records(vec![]).into_pipeline_inputs();
        assert!(source.is_finite());
    }
}
