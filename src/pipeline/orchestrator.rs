//! Recognition pipeline that runs from startup until shutdown.

use crate::assembler::{AssemblyConfig, TextAssembler};
use crate::classify::classifier::SignClassifier;
use crate::classify::gate::ClassificationGate;
use crate::clock::{Clock, SystemClock};
use crate::defaults;
use crate::detect::detector::HandDetector;
use crate::detect::source::FrameSource;
use crate::error::Result;
use crate::pipeline::assembler_station::AssemblerStation;
use crate::pipeline::detector_station::DetectorStation;
use crate::pipeline::error::{ErrorReporter, LogReporter};
use crate::pipeline::recognizer_station::RecognizerStation;
use crate::pipeline::sink::{SinkStation, TextSink};
use crate::pipeline::station::StationRunner;
use crate::pipeline::types::{AssemblerEvent, VideoFrame};
use crate::speech::synthesizer::SpeechSynthesizer;
use crate::vocab::Vocabulary;
use crossbeam_channel::bounded;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Sign vocabulary, in classifier output order.
    pub vocabulary: Arc<Vocabulary>,
    /// Confidence threshold for the classification gate.
    pub threshold: f32,
    /// Text assembly configuration (idle finalize, auto-speak).
    pub assembly: AssemblyConfig,
    /// Interval between frame polls.
    pub frame_interval: Duration,
    /// Verbosity level (0=sentences, 1=live text, 2=full diagnostics).
    pub verbosity: u8,
    /// Suppress output messages.
    pub quiet: bool,
    /// Channel buffer sizes. `frame_buffer` stays at 1 so that a frame
    /// arriving while the detector is busy is dropped, never queued.
    pub frame_buffer: usize,
    pub landmark_buffer: usize,
    pub sign_buffer: usize,
    pub sentence_buffer: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            vocabulary: Arc::new(Vocabulary::default()),
            threshold: defaults::CONFIDENCE_THRESHOLD,
            assembly: AssemblyConfig::default(),
            frame_interval: Duration::from_millis(defaults::FRAME_INTERVAL_MS),
            verbosity: 0,
            quiet: false,
            frame_buffer: 1,
            landmark_buffer: 8,
            sign_buffer: 8,
            sentence_buffer: 8,
        }
    }
}

/// Handle to a running pipeline.
pub struct PipelineHandle {
    /// Flag to signal shutdown
    running: Arc<AtomicBool>,
    /// True once a finite source has emitted its last frame
    source_done: Arc<AtomicBool>,
    /// Join handles for spawned threads
    threads: Vec<JoinHandle<()>>,
    /// Receiver for sink's finish() result
    result_rx: Option<crossbeam_channel::Receiver<Option<String>>>,
    /// Injects manual events into the assembler
    command_tx: Option<crossbeam_channel::Sender<AssemblerEvent>>,
}

impl PipelineHandle {
    /// Requests a manual speak of the current output (auto-speak off
    /// only). Returns false if the pipeline is shutting down.
    pub fn speak_now(&self) -> bool {
        self.command_tx
            .as_ref()
            .is_some_and(|tx| tx.try_send(AssemblerEvent::SpeakNow).is_ok())
    }

    /// Returns true if the pipeline is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// True once a finite frame source has no more frames. Always false
    /// for live sources.
    pub fn source_exhausted(&self) -> bool {
        self.source_done.load(Ordering::SeqCst)
    }

    /// Stops the pipeline gracefully and returns the sink's accumulated
    /// result.
    ///
    /// Waits up to 5s for the result, then 1s for threads to finish.
    /// After the deadline, remaining threads are detached — they die
    /// with the process.
    pub fn stop(mut self) -> Option<String> {
        // Signal shutdown
        self.running.store(false, Ordering::SeqCst);
        // Drop the command sender so the assembler's input disconnects
        // once the upstream stations exit.
        self.command_tx = None;

        // The result may arrive before all threads finish; allow time
        // for an in-flight finalize to land in the sink.
        let result = self
            .result_rx
            .as_ref()
            .and_then(|rx| rx.recv_timeout(Duration::from_secs(5)).ok().flatten());

        let deadline = Instant::now() + Duration::from_secs(1);
        let poll_interval = Duration::from_millis(50);

        loop {
            // Drain finished threads, joining each to catch panics
            let mut remaining = Vec::new();
            for handle in self.threads.drain(..) {
                if handle.is_finished() {
                    if let Err(panic_info) = handle.join() {
                        let msg = panic_info
                            .downcast_ref::<&str>()
                            .copied()
                            .or_else(|| panic_info.downcast_ref::<String>().map(|s| s.as_str()))
                            .unwrap_or("unknown panic");
                        eprintln!("bisara: pipeline thread panicked: {msg}");
                    }
                } else {
                    remaining.push(handle);
                }
            }
            self.threads = remaining;

            if self.threads.is_empty() {
                break;
            }

            if Instant::now() >= deadline {
                eprintln!(
                    "bisara: shutdown timeout — {} thread(s) still running, detaching",
                    self.threads.len()
                );
                // Dropping JoinHandles detaches threads; they die with the process.
                break;
            }

            thread::sleep(poll_interval);
        }

        result
    }
}

/// Recognition pipeline: FrameSource → Detector → Recognizer →
/// Assembler → TextSink.
pub struct Pipeline {
    config: PipelineConfig,
    error_reporter: Arc<dyn ErrorReporter>,
    clock: Arc<dyn Clock>,
}

impl Pipeline {
    /// Creates a new pipeline with default error reporter.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            error_reporter: Arc::new(LogReporter),
            clock: Arc::new(SystemClock),
        }
    }

    /// Sets a custom error reporter.
    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.error_reporter = reporter;
        self
    }

    /// Sets a custom clock (for deterministic testing).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Starts the pipeline.
    ///
    /// # Arguments
    /// * `frame_source` - Video frame capture source
    /// * `detector` - Hand-landmark detector capability
    /// * `classifier` - Sign classifier capability
    /// * `speech` - Speech synthesis capability
    /// * `sink` - Sentence output handler (collector, stdout, etc.)
    ///
    /// # Returns
    /// Handle to control and stop the pipeline
    pub fn start(
        self,
        mut frame_source: Box<dyn FrameSource>,
        detector: Box<dyn HandDetector>,
        classifier: Arc<dyn SignClassifier>,
        speech: Arc<dyn SpeechSynthesizer>,
        sink: Box<dyn TextSink>,
    ) -> Result<PipelineHandle> {
        let running = Arc::new(AtomicBool::new(true));
        let source_done = Arc::new(AtomicBool::new(false));
        let sequence = Arc::new(AtomicU64::new(0));

        // Create channels between stations. The frame channel is the
        // single-in-flight gate: while the detector chews on one frame,
        // newer frames fail try_send and are dropped.
        let (frame_tx, frame_rx) = bounded(self.config.frame_buffer);
        let (landmark_tx, landmark_rx) = bounded(self.config.landmark_buffer);
        let (sign_tx, sign_rx) = bounded(self.config.sign_buffer);
        let (sentence_tx, sentence_rx) = bounded(self.config.sentence_buffer);

        // Create stations
        let detector_station = DetectorStation::new(detector);

        let gate = ClassificationGate::new(classifier, self.config.vocabulary.clone())
            .with_threshold(self.config.threshold);
        let recognizer_station =
            RecognizerStation::new(gate).with_verbosity(self.config.verbosity);

        let assembler = TextAssembler::with_clock(
            self.config.assembly.clone(),
            speech,
            self.clock.clone(),
        );
        let assembler_station = AssemblerStation::new(assembler);

        let (result_tx, result_rx) = bounded(1);
        let sink_station =
            SinkStation::new(sink, self.config.quiet, self.config.verbosity, result_tx);

        // Keep a sender clone for manual speak injection
        let command_tx = sign_tx.clone();

        // Spawn station runners
        let detector_runner = StationRunner::spawn(
            detector_station,
            frame_rx,
            landmark_tx,
            self.error_reporter.clone(),
        );
        let recognizer_runner = StationRunner::spawn(
            recognizer_station,
            landmark_rx,
            sign_tx,
            self.error_reporter.clone(),
        );
        let assembler_runner = StationRunner::spawn(
            assembler_station,
            sign_rx,
            sentence_tx,
            self.error_reporter.clone(),
        );

        // For the terminal station, create a dummy output channel
        let (sink_out_tx, sink_out_rx) = bounded::<()>(self.config.sentence_buffer);
        let sink_runner = StationRunner::spawn(
            sink_station,
            sentence_rx,
            sink_out_tx,
            self.error_reporter.clone(),
        );

        // Drain the sink output in a separate thread
        let drain_running = running.clone();
        let drain_handle = thread::spawn(move || {
            loop {
                match sink_out_rx.recv_timeout(Duration::from_millis(100)) {
                    Ok(()) => {}
                    Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                        if !drain_running.load(Ordering::SeqCst) {
                            break;
                        }
                    }
                    Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        // Start frame capture
        frame_source.start()?;
        let source_is_finite = frame_source.is_finite();

        // Spawn frame polling thread
        let frame_running = running.clone();
        let frame_source_done = source_done.clone();
        let frame_sequence = sequence.clone();
        let frame_interval = self.config.frame_interval;
        let frame_handle = thread::spawn(move || {
            let mut consecutive_errors: u32 = 0;
            const MAX_CONSECUTIVE_ERRORS: u32 = 10;

            while frame_running.load(Ordering::SeqCst) {
                let image = match frame_source.read_frame() {
                    Ok(image) => {
                        consecutive_errors = 0;
                        image
                    }
                    Err(e) => {
                        consecutive_errors += 1;
                        if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                            eprintln!(
                                "bisara: frame capture failed {consecutive_errors} times in a row: {e}"
                            );
                            eprintln!("bisara: check your camera connection and try again");
                            break;
                        }
                        thread::sleep(frame_interval);
                        continue;
                    }
                };

                let Some(image) = image else {
                    if source_is_finite {
                        // Recording exhausted. Keep the channel open so
                        // the assembler can still finalize the trailing
                        // sentence; the handle decides when to stop.
                        frame_source_done.store(true, Ordering::SeqCst);
                        thread::sleep(frame_interval);
                        continue;
                    }
                    // Live source: empty read is normal while the
                    // device warms up. Keep polling.
                    thread::sleep(frame_interval);
                    continue;
                };

                let frame = VideoFrame::new(
                    image,
                    Instant::now(),
                    frame_sequence.fetch_add(1, Ordering::Relaxed),
                );

                // Try to send - if the detector is busy, drop the frame.
                // Dropped frames under load are expected, not an error.
                if frame_tx.try_send(frame).is_err() && !frame_running.load(Ordering::SeqCst) {
                    break;
                }

                thread::sleep(frame_interval);
            }

            // Stop frame capture
            if let Err(e) = frame_source.stop() {
                eprintln!("bisara: failed to stop frame capture: {e}");
            }
        });

        // Collect all thread handles
        let mut threads = vec![frame_handle, drain_handle];

        // Wrap runner join handles
        threads.push(thread::spawn(move || {
            if let Err(msg) = detector_runner.join() {
                eprintln!("bisara: {msg}");
            }
        }));
        threads.push(thread::spawn(move || {
            if let Err(msg) = recognizer_runner.join() {
                eprintln!("bisara: {msg}");
            }
        }));
        threads.push(thread::spawn(move || {
            if let Err(msg) = assembler_runner.join() {
                eprintln!("bisara: {msg}");
            }
        }));
        threads.push(thread::spawn(move || {
            if let Err(msg) = sink_runner.join() {
                eprintln!("bisara: {msg}");
            }
        }));

        Ok(PipelineHandle {
            running,
            source_done,
            threads,
            result_rx: Some(result_rx),
            command_tx: Some(command_tx),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classifier::MockClassifier;
    use crate::detect::detector::MockHandDetector;
    use crate::detect::landmarks::HandLandmarks;
    use crate::detect::source::MockFrameSource;
    use crate::pipeline::sink::CollectorSink;
    use crate::speech::synthesizer::{MockSynthesizer, NullSynthesizer};

    fn fast_config() -> PipelineConfig {
        PipelineConfig {
            assembly: AssemblyConfig {
                idle_finalize: Duration::from_millis(100),
                auto_speak: true,
            },
            frame_interval: Duration::from_millis(1),
            quiet: true,
            ..Default::default()
        }
    }

    fn wait_until(deadline: Duration, mut check: impl FnMut() -> bool) -> bool {
        let end = Instant::now() + deadline;
        while Instant::now() < end {
            if check() {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn test_config_default() {
        let config = PipelineConfig::default();
        assert_eq!(config.frame_buffer, 1);
        assert_eq!(config.landmark_buffer, 8);
        assert_eq!(config.sign_buffer, 8);
        assert_eq!(config.sentence_buffer, 8);
        assert_eq!(config.threshold, 0.95);
        assert_eq!(config.verbosity, 0);
        assert!(!config.quiet);
        assert_eq!(config.frame_interval, Duration::from_millis(33));
        assert!(config.assembly.auto_speak);
    }

    #[test]
    fn test_pipeline_creation() {
        let pipeline = Pipeline::new(PipelineConfig::default());
        drop(pipeline);
    }

    #[test]
    fn test_handle_is_running() {
        let running = Arc::new(AtomicBool::new(true));
        let handle = PipelineHandle {
            running: running.clone(),
            source_done: Arc::new(AtomicBool::new(false)),
            threads: vec![],
            result_rx: None,
            command_tx: None,
        };

        assert!(handle.is_running());
        running.store(false, Ordering::SeqCst);
        assert!(!handle.is_running());
    }

    #[test]
    fn test_handle_stop_returns_none_without_result() {
        let handle = PipelineHandle {
            running: Arc::new(AtomicBool::new(true)),
            source_done: Arc::new(AtomicBool::new(false)),
            threads: vec![],
            result_rx: None,
            command_tx: None,
        };

        assert!(handle.stop().is_none());
    }

    #[test]
    fn test_handle_stop_returns_result_from_channel() {
        let (result_tx, result_rx) = bounded(1);
        result_tx.send(Some("Halo.".to_string())).unwrap();
        drop(result_tx);

        let handle = PipelineHandle {
            running: Arc::new(AtomicBool::new(true)),
            source_done: Arc::new(AtomicBool::new(false)),
            threads: vec![],
            result_rx: Some(result_rx),
            command_tx: None,
        };

        assert_eq!(handle.stop(), Some("Halo.".to_string()));
    }

    #[test]
    fn test_pipeline_start_frame_source_fails() {
        let pipeline = Pipeline::new(fast_config());

        let source = Box::new(MockFrameSource::new(1).with_start_failure());
        let detector = Box::new(MockHandDetector::new());
        let classifier = Arc::new(MockClassifier::new("mock"));
        let speech = Arc::new(NullSynthesizer::new());
        let sink = Box::new(CollectorSink::new());

        let result = pipeline.start(source, detector, classifier, speech, sink);
        assert!(result.is_err());
    }

    #[test]
    fn test_end_to_end_recognition_to_sentence() {
        let pipeline = Pipeline::new(fast_config());

        // 200 frames of a steady hand; the first full window is a
        // confident "halo", every later window is quiet. One sentence.
        let source = Box::new(MockFrameSource::new(200));
        let detector = Box::new(
            MockHandDetector::new().with_hands(vec![HandLandmarks::uniform(0.5, 0.5, 0.0)]),
        );
        let classifier = Arc::new(
            MockClassifier::new("mock").with_script(vec![MockClassifier::one_hot(5, 1, 0.99)]),
        );
        let speech = Arc::new(NullSynthesizer::new());
        let sink = Box::new(CollectorSink::new());

        let handle = pipeline
            .start(source, detector, classifier, speech, sink)
            .unwrap();

        assert!(
            wait_until(Duration::from_secs(5), || handle.source_exhausted()),
            "source should run out of frames"
        );
        // Leave room for the idle finalize to fire
        thread::sleep(Duration::from_millis(500));

        let result = handle.stop();
        assert_eq!(result, Some("Halo.".to_string()));
    }

    #[test]
    fn test_end_to_end_low_confidence_yields_nothing() {
        let pipeline = Pipeline::new(fast_config());

        let source = Box::new(MockFrameSource::new(80));
        let detector = Box::new(
            MockHandDetector::new().with_hands(vec![HandLandmarks::uniform(0.5, 0.5, 0.0)]),
        );
        let classifier = Arc::new(
            MockClassifier::new("mock")
                .with_probabilities(MockClassifier::one_hot(5, 1, 0.5)),
        );
        let speech = Arc::new(NullSynthesizer::new());
        let sink = Box::new(CollectorSink::new());

        let handle = pipeline
            .start(source, detector, classifier, speech, sink)
            .unwrap();

        assert!(wait_until(Duration::from_secs(5), || {
            handle.source_exhausted()
        }));
        thread::sleep(Duration::from_millis(300));

        assert!(handle.stop().is_none());
    }

    #[test]
    fn test_end_to_end_manual_speak() {
        let mut config = fast_config();
        config.assembly.auto_speak = false;
        let pipeline = Pipeline::new(config);

        let source = Box::new(MockFrameSource::new(200));
        let detector = Box::new(
            MockHandDetector::new().with_hands(vec![HandLandmarks::uniform(0.5, 0.5, 0.0)]),
        );
        let classifier = Arc::new(
            MockClassifier::new("mock").with_script(vec![MockClassifier::one_hot(5, 1, 0.99)]),
        );
        let speech = MockSynthesizer::new();
        let sink = Box::new(CollectorSink::new());

        let handle = pipeline
            .start(
                source,
                detector,
                classifier,
                Arc::new(speech.clone()),
                sink,
            )
            .unwrap();

        assert!(wait_until(Duration::from_secs(5), || {
            handle.source_exhausted()
        }));
        // Auto-speak off: finalize happens but nothing is spoken
        thread::sleep(Duration::from_millis(500));
        assert!(speech.spoken().is_empty());

        assert!(handle.speak_now());
        assert!(
            wait_until(Duration::from_secs(2), || !speech.spoken().is_empty()),
            "manual speak should reach the synthesizer"
        );
        assert_eq!(speech.spoken(), vec!["Halo. ".to_string()]);

        let result = handle.stop();
        assert_eq!(result, Some("Halo.".to_string()));
    }

    #[test]
    fn test_end_to_end_detector_failure_is_contained() {
        struct SilentReporter;
        impl ErrorReporter for SilentReporter {
            fn report(&self, _station: &str, _error: &crate::pipeline::error::StationError) {}
        }

        let pipeline =
            Pipeline::new(fast_config()).with_error_reporter(Arc::new(SilentReporter));

        let source = Box::new(MockFrameSource::new(50));
        let detector = Box::new(MockHandDetector::new().with_failure());
        let classifier = Arc::new(MockClassifier::new("mock"));
        let speech = Arc::new(NullSynthesizer::new());
        let sink = Box::new(CollectorSink::new());

        let handle = pipeline
            .start(source, detector, classifier, speech, sink)
            .unwrap();

        assert!(wait_until(Duration::from_secs(5), || {
            handle.source_exhausted()
        }));
        assert!(handle.stop().is_none());
    }
}
