//! bisara - Live sign language to speech
//!
//! Streams hand-landmark detections through a sliding-window sign
//! classifier and assembles recognized signs into punctuated, spoken
//! sentences.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod assembler;
pub mod classify;
#[cfg(feature = "cli")]
pub mod cli;
pub mod clock;
pub mod config;
pub mod defaults;
pub mod detect;
pub mod error;
pub mod feature;
pub mod output;
pub mod pipeline;
pub mod speech;
pub mod vocab;
pub mod window;

// Core traits (source → detect → classify → assemble → sink)
pub use classify::classifier::SignClassifier;
pub use detect::detector::HandDetector;
pub use detect::source::FrameSource;
pub use pipeline::sink::{CollectorSink, StdoutSink, TextSink};
pub use speech::synthesizer::SpeechSynthesizer;

// Pipeline
pub use pipeline::orchestrator::{Pipeline, PipelineConfig, PipelineHandle};

// Core components
pub use assembler::{AssemblyConfig, AssemblyState, SentenceEvent, TextAssembler};
pub use classify::gate::{ClassificationGate, RecognizedSign};
pub use feature::{FeatureVector, encode};
pub use vocab::Vocabulary;
pub use window::SlidingWindow;

// Error handling
pub use error::{BisaraError, Result};

// Config
pub use config::Config;

// Station framework (for advanced users)
pub use pipeline::error::{ErrorReporter, StationError};
pub use pipeline::station::Station;

/// Build version string with optional git commit hash.
///
/// Returns `"0.2.1+abc1234"` when git hash is available, `"0.2.1"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn version_string_contains_plus_when_git_hash_present() {
        let ver = version_string();
        if option_env!("GIT_HASH").is_some_and(|h| !h.is_empty()) {
            assert!(
                ver.contains('+'),
                "With GIT_HASH set, version should contain '+', got: {}",
                ver
            );
        } else {
            assert_eq!(ver, env!("CARGO_PKG_VERSION"));
        }
    }
}
