//! Speech synthesis seam.

#[cfg(feature = "tts")]
pub mod piper;
pub mod synthesizer;

#[cfg(feature = "tts")]
pub use piper::PiperSynthesizer;
pub use synthesizer::{MockSynthesizer, NullSynthesizer, SpeechEvent, SpeechSynthesizer};
