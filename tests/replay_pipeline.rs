//! End-to-end replay test: a recorded landmark session through the full
//! pipeline, from JSONL bytes to assembled sentences.

use bisara::assembler::AssemblyConfig;
use bisara::classify::classifier::MockClassifier;
use bisara::defaults::SEQUENCE_LENGTH;
use bisara::detect::landmarks::HandLandmarks;
use bisara::detect::replay::{LandmarkRecord, ReplayScript};
use bisara::pipeline::orchestrator::{Pipeline, PipelineConfig};
use bisara::pipeline::sink::CollectorSink;
use bisara::speech::synthesizer::NullSynthesizer;
use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;

fn write_recording(frames: usize, hands_per_frame: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    for i in 0..frames {
        let record = LandmarkRecord {
            hands: (0..hands_per_frame)
                .map(|h| HandLandmarks::uniform(0.3 + 0.01 * (i % 7) as f32, 0.5, 0.01 * h as f32))
                .collect(),
        };
        writeln!(file, "{}", serde_json::to_string(&record).expect("serialize"))
            .expect("write line");
    }
    file
}

fn fast_pipeline_config() -> PipelineConfig {
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

#[test]
fn replay_file_drives_the_pipeline_to_a_sentence() {
    let file = write_recording(SEQUENCE_LENGTH * 4, 1);
    let script = ReplayScript::load(file.path()).expect("load recording");
    assert_eq!(script.len(), SEQUENCE_LENGTH * 4);

    // First full window recognizes "selamat", the next "pagi", then quiet.
    let classifier = MockClassifier::new("replay-test").with_script(vec![
        MockClassifier::one_hot(5, 3, 0.99),
        MockClassifier::one_hot(5, 2, 0.99),
    ]);

    let (source, detector) = script.into_pipeline_inputs();
    let handle = Pipeline::new(fast_pipeline_config())
        .start(
            Box::new(source),
            Box::new(detector),
            Arc::new(classifier),
            Arc::new(NullSynthesizer::new()),
            Box::new(CollectorSink::new()),
        )
        .expect("pipeline start");

    let deadline = Instant::now() + Duration::from_secs(5);
    while !handle.source_exhausted() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
    assert!(handle.source_exhausted(), "recording should run out");

    // Room for the idle finalize and delivery
    thread::sleep(Duration::from_millis(500));

    let result = handle.stop();
    assert_eq!(result, Some("Selamat pagi.".to_string()));
}

#[test]
fn replay_with_no_hands_produces_no_sentences() {
    let file = write_recording(SEQUENCE_LENGTH * 2, 0);
    let script = ReplayScript::load(file.path()).expect("load recording");

    // Confident replies would fire if a window ever evaluated above
    // threshold; an all-quiet classifier means silence end to end.
    let classifier = MockClassifier::new("replay-test").with_probabilities(vec![0.2; 5]);

    let (source, detector) = script.into_pipeline_inputs();
    let handle = Pipeline::new(fast_pipeline_config())
        .start(
            Box::new(source),
            Box::new(detector),
            Arc::new(classifier),
            Arc::new(NullSynthesizer::new()),
            Box::new(CollectorSink::new()),
        )
        .expect("pipeline start");

    let deadline = Instant::now() + Duration::from_secs(5);
    while !handle.source_exhausted() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
    thread::sleep(Duration::from_millis(300));

    assert!(handle.stop().is_none());
}
