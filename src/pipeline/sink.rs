//! Text output handling for the recognition pipeline.

use crate::assembler::SentenceEvent;
use crate::output;
use crate::pipeline::error::StationError;
use crate::pipeline::station::Station;

/// Pluggable text output handler for the pipeline.
/// Pairs with FrameSource for input - this handles assembled sentences.
pub trait TextSink: Send + 'static {
    /// Handle one sentence event from the assembler.
    fn handle(&mut self, event: &SentenceEvent) -> crate::error::Result<()>;

    /// Called on pipeline shutdown. Return accumulated text if applicable.
    fn finish(&mut self) -> Option<String> {
        None
    }

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "sink"
    }
}

/// Station wrapper for any TextSink implementation.
/// Converts TextSink into a Station for pipeline orchestration.
pub(crate) struct SinkStation {
    sink: Box<dyn TextSink>,
    quiet: bool,
    verbosity: u8,
    result_tx: Option<crossbeam_channel::Sender<Option<String>>>,
}

impl SinkStation {
    pub(crate) fn new(
        sink: Box<dyn TextSink>,
        quiet: bool,
        verbosity: u8,
        result_tx: crossbeam_channel::Sender<Option<String>>,
    ) -> Self {
        Self {
            sink,
            quiet,
            verbosity,
            result_tx: Some(result_tx),
        }
    }
}

impl Station for SinkStation {
    type Input = SentenceEvent;
    type Output = ();

    fn name(&self) -> &'static str {
        self.sink.name()
    }

    fn process(&mut self, event: SentenceEvent) -> Result<Option<()>, StationError> {
        if !self.quiet {
            match &event {
                SentenceEvent::Partial(text) => output::render_partial(text),
                SentenceEvent::Finalized(text) => output::render_sentence(text),
                SentenceEvent::Delivered => {
                    if self.verbosity >= 1 {
                        output::render_delivered();
                    }
                }
            }
        }

        match self.sink.handle(&event) {
            Ok(()) => Ok(Some(())),
            Err(e) => {
                if !self.quiet {
                    output::clear_line();
                    eprintln!("bisara: sink '{}' failed: {}", self.sink.name(), e);
                }
                Ok(None)
            }
        }
    }

    fn shutdown(&mut self) {
        let result = self.sink.finish();
        if let Some(tx) = self.result_tx.take()
            && tx.send(result).is_err()
        {
            eprintln!("bisara: sink shutdown — result receiver already dropped");
        }
    }
}

/// Collects finalized sentences for --once mode and library use.
/// Returns accumulated text on finish().
pub struct CollectorSink {
    collected: Vec<String>,
}

impl CollectorSink {
    pub fn new() -> Self {
        Self {
            collected: Vec::new(),
        }
    }
}

impl Default for CollectorSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSink for CollectorSink {
    fn handle(&mut self, event: &SentenceEvent) -> crate::error::Result<()> {
        if let SentenceEvent::Finalized(text) = event {
            self.collected.push(text.clone());
        }
        Ok(())
    }

    fn finish(&mut self) -> Option<String> {
        if self.collected.is_empty() {
            None
        } else {
            Some(self.collected.concat().trim_end().to_string())
        }
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}

/// Pipe mode sink — writes finalized sentences to stdout.
pub struct StdoutSink;

impl TextSink for StdoutSink {
    fn handle(&mut self, event: &SentenceEvent) -> crate::error::Result<()> {
        if let SentenceEvent::Finalized(text) = event {
            println!("{}", text.trim_end());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdout"
    }
}
