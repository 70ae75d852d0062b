//! Speech synthesizer seam.

use crate::error::{BisaraError, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Completion notifications from the synthesizer.
///
/// Utterances play asynchronously; the pipeline drains these on its
/// tick instead of blocking on playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// The utterance finished playing.
    Finished,
    /// Synthesis or playback failed mid-utterance.
    Failed(String),
}

/// Trait for text-to-speech rendering.
///
/// This trait allows swapping implementations (real Piper voice vs
/// mock). `speak` must not block on playback.
pub trait SpeechSynthesizer: Send + Sync {
    /// Start speaking the given text.
    ///
    /// A no-op while a previous utterance is still playing — at most
    /// one concurrent utterance.
    fn speak(&self, text: &str) -> Result<()>;

    /// True while an utterance is playing.
    fn is_speaking(&self) -> bool;

    /// Drains the next completion event, if any utterance finished
    /// since the last call.
    fn poll_event(&self) -> Option<SpeechEvent>;

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "speech"
    }
}

/// Implement SpeechSynthesizer for Arc<T> to allow sharing.
impl<T: SpeechSynthesizer + ?Sized> SpeechSynthesizer for Arc<T> {
    fn speak(&self, text: &str) -> Result<()> {
        (**self).speak(text)
    }

    fn is_speaking(&self) -> bool {
        (**self).is_speaking()
    }

    fn poll_event(&self) -> Option<SpeechEvent> {
        (**self).poll_event()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[derive(Debug, Default)]
struct MockSpeechState {
    speaking: bool,
    spoken: Vec<String>,
    events: VecDeque<SpeechEvent>,
}

/// Mock synthesizer for testing.
///
/// Utterances stay "in flight" until the test calls [`complete`] or
/// [`fail_current`], mirroring the asynchronous completion callback of
/// a real engine.
///
/// [`complete`]: MockSynthesizer::complete
/// [`fail_current`]: MockSynthesizer::fail_current
#[derive(Debug, Clone, Default)]
pub struct MockSynthesizer {
    state: Arc<Mutex<MockSpeechState>>,
    should_fail_speak: bool,
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to fail immediately on speak.
    pub fn with_speak_failure(mut self) -> Self {
        self.should_fail_speak = true;
        self
    }

    /// Finishes the in-flight utterance, queuing a Finished event.
    pub fn complete(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.speaking = false;
            state.events.push_back(SpeechEvent::Finished);
        }
    }

    /// Fails the in-flight utterance, queuing a Failed event.
    pub fn fail_current(&self, message: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.speaking = false;
            state.events.push_back(SpeechEvent::Failed(message.to_string()));
        }
    }

    /// Every text passed to `speak` so far, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.spoken.clone())
            .unwrap_or_default()
    }
}

impl SpeechSynthesizer for MockSynthesizer {
    fn speak(&self, text: &str) -> Result<()> {
        if self.should_fail_speak {
            return Err(BisaraError::Speech {
                message: "mock speech failure".to_string(),
            });
        }
        if let Ok(mut state) = self.state.lock() {
            if state.speaking {
                return Ok(());
            }
            state.speaking = true;
            state.spoken.push(text.to_string());
        }
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        self.state.lock().map(|state| state.speaking).unwrap_or(false)
    }

    fn poll_event(&self) -> Option<SpeechEvent> {
        self.state
            .lock()
            .ok()
            .and_then(|mut state| state.events.pop_front())
    }

    fn name(&self) -> &'static str {
        "mock-speech"
    }
}

/// Synthesizer that renders nothing and completes instantly.
///
/// Used for headless runs where sentences are only printed: the
/// pipeline still sees a delivery for every spoken sentence, so the
/// output buffer clears exactly as it would with a real voice.
#[derive(Debug, Clone, Default)]
pub struct NullSynthesizer {
    events: Arc<Mutex<VecDeque<SpeechEvent>>>,
}

impl NullSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpeechSynthesizer for NullSynthesizer {
    fn speak(&self, _text: &str) -> Result<()> {
        if let Ok(mut events) = self.events.lock() {
            events.push_back(SpeechEvent::Finished);
        }
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        false
    }

    fn poll_event(&self) -> Option<SpeechEvent> {
        self.events.lock().ok().and_then(|mut e| e.pop_front())
    }

    fn name(&self) -> &'static str {
        "null"
    }
}
