//! Text assembly: recognized signs → punctuated, spoken sentences.
//!
//! A small state machine fed by the classification gate. Words are
//! appended with sentence-start capitalization and duplicate
//! suppression; a 3-second quiet period finalizes the sentence
//! (debounce, not throttle) and hands it to the speech synthesizer.

use crate::classify::gate::RecognizedSign;
use crate::clock::{Clock, SystemClock};
use crate::defaults::IDLE_FINALIZE_MS;
use crate::error::{BisaraError, Result};
use crate::speech::synthesizer::{SpeechEvent, SpeechSynthesizer};
use crate::vocab::Vocabulary;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Configuration for text assembly.
#[derive(Debug, Clone)]
pub struct AssemblyConfig {
    /// Quiet period after the last accepted sign before the sentence is
    /// finalized.
    pub idle_finalize: Duration,
    /// Speak finalized sentences automatically. When off, speech only
    /// happens through the manual trigger.
    pub auto_speak: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            idle_finalize: Duration::from_millis(IDLE_FINALIZE_MS),
            auto_speak: true,
        }
    }
}

/// Assembly phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyState {
    /// Empty output, no pending deadline.
    Idle,
    /// Words are being collected; the idle deadline is armed.
    Accumulating,
    /// A sentence was finalized; the output stays visible until the
    /// spoken sentence is delivered.
    PendingFinalize,
}

/// Events the assembler emits downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentenceEvent {
    /// A word was appended; carries the full output so far.
    Partial(String),
    /// The idle deadline fired; carries the normalized sentence.
    Finalized(String),
    /// The spoken sentence finished playing and the buffer was cleared.
    Delivered,
}

/// The text-accumulation state machine.
///
/// All mutation happens through `on_sign`, `poll`, and `speak_now`,
/// which the pipeline calls from a single thread. Time comes from the
/// injected clock only.
pub struct TextAssembler<C: Clock = SystemClock> {
    config: AssemblyConfig,
    state: AssemblyState,
    output: String,
    last_appended: String,
    idle_deadline: Option<Instant>,
    speech: Arc<dyn SpeechSynthesizer>,
    clock: C,
}

impl TextAssembler<SystemClock> {
    /// Creates an assembler on the system clock.
    pub fn new(config: AssemblyConfig, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        Self::with_clock(config, speech, SystemClock)
    }
}

impl<C: Clock> TextAssembler<C> {
    /// Creates an assembler with an injectable clock.
    pub fn with_clock(config: AssemblyConfig, speech: Arc<dyn SpeechSynthesizer>, clock: C) -> Self {
        Self {
            config,
            state: AssemblyState::Idle,
            output: String::new(),
            last_appended: String::new(),
            idle_deadline: None,
            speech,
            clock,
        }
    }

    /// The output text as currently accumulated.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// The current assembly phase.
    pub fn state(&self) -> AssemblyState {
        self.state
    }

    /// Consumes one recognized sign.
    ///
    /// Blank resets duplicate suppression so a held sign can repeat
    /// after a rest. A sign equal to the last appended word is ignored —
    /// a sustained gesture recognizes on every frame and must not spam
    /// the output. Any other sign appends and re-arms the idle deadline.
    pub fn on_sign(&mut self, sign: &RecognizedSign) -> Result<Option<SentenceEvent>> {
        if Vocabulary::is_blank(&sign.label) {
            self.last_appended.clear();
            return Ok(None);
        }
        if sign.label == self.last_appended {
            return Ok(None);
        }

        let word = if at_sentence_start(&self.output) {
            capitalize(&sign.label)
        } else {
            sign.label.clone()
        };
        self.output.push_str(&word);
        self.output.push(' ');
        self.last_appended = sign.label.clone();
        self.state = AssemblyState::Accumulating;
        // Cancel-and-restart in one step: the old deadline is replaced
        // wholesale, never left half-cleared.
        self.idle_deadline = Some(self.clock.now() + self.config.idle_finalize);

        Ok(Some(SentenceEvent::Partial(self.output.clone())))
    }

    /// Services time-driven work: speech deliveries and the idle
    /// deadline. Call once per pipeline tick.
    pub fn poll(&mut self) -> Result<Option<SentenceEvent>> {
        // Deliveries first — a finished utterance clears the buffer no
        // matter which state we are in or how speech was triggered.
        if let Some(event) = self.speech.poll_event() {
            match event {
                SpeechEvent::Finished => {
                    self.output.clear();
                    self.last_appended.clear();
                    self.state = AssemblyState::Idle;
                    self.idle_deadline = None;
                    return Ok(Some(SentenceEvent::Delivered));
                }
                SpeechEvent::Failed(message) => {
                    // Buffer stays intact for retry.
                    return Err(BisaraError::Speech { message });
                }
            }
        }

        if self.state == AssemblyState::Accumulating
            && let Some(deadline) = self.idle_deadline
            && self.clock.now() >= deadline
        {
            return self.finalize();
        }

        Ok(None)
    }

    /// Manual speech trigger.
    ///
    /// Only honored when auto-speak is disabled. Speaks the output
    /// verbatim — no punctuation normalization — and cancels the idle
    /// deadline.
    pub fn speak_now(&mut self) -> Result<Option<SentenceEvent>> {
        if self.config.auto_speak {
            return Ok(None);
        }
        self.idle_deadline = None;
        if self.output.is_empty() {
            return Ok(None);
        }
        self.request_speech()?;
        Ok(None)
    }

    fn finalize(&mut self) -> Result<Option<SentenceEvent>> {
        self.idle_deadline = None;
        if self.output.trim().is_empty() {
            self.state = AssemblyState::Idle;
            return Ok(None);
        }

        if self.output.ends_with(", ") {
            self.output.truncate(self.output.len() - 2);
            self.output.push_str(". ");
        } else if !self.output.ends_with(". ") {
            self.output = format!("{}. ", self.output.trim());
        }

        self.last_appended.clear();
        self.state = AssemblyState::PendingFinalize;

        if self.config.auto_speak
            && let Err(e) = self.request_speech()
        {
            // The sentence stays in the buffer; the failure must not
            // swallow the Finalized event.
            eprintln!("bisara: {}", e);
        }

        Ok(Some(SentenceEvent::Finalized(self.output.clone())))
    }

    /// Single funnel for every speak path: nothing is spoken while an
    /// utterance is in flight, and empty text is never spoken.
    fn request_speech(&mut self) -> Result<()> {
        if self.speech.is_speaking() {
            return Ok(());
        }
        if self.output.is_empty() {
            return Ok(());
        }
        self.speech.speak(&self.output)
    }
}

fn at_sentence_start(output: &str) -> bool {
    output.trim().is_empty() || output.ends_with(". ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
