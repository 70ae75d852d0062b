//! Assembler station that wraps the text-assembly state machine.

use crate::assembler::{SentenceEvent, TextAssembler};
use crate::clock::Clock;
use crate::pipeline::error::StationError;
use crate::pipeline::station::Station;
use crate::pipeline::types::AssemblerEvent;

/// Station that drives the [`TextAssembler`].
///
/// Signs arrive as channel input; the idle deadline and speech
/// completions are serviced on the runner's poll tick, so every
/// assembler mutation happens on this one thread.
pub struct AssemblerStation<C: Clock> {
    assembler: TextAssembler<C>,
}

impl<C: Clock + 'static> AssemblerStation<C> {
    /// Creates a new assembler station.
    pub fn new(assembler: TextAssembler<C>) -> Self {
        Self { assembler }
    }

    fn map_result(
        result: crate::error::Result<Option<SentenceEvent>>,
    ) -> Result<Option<SentenceEvent>, StationError> {
        result.map_err(|e| StationError::Recoverable(e.to_string()))
    }
}

impl<C: Clock + 'static> Station for AssemblerStation<C> {
    type Input = AssemblerEvent;
    type Output = SentenceEvent;

    fn name(&self) -> &'static str {
        "assembler"
    }

    fn process(&mut self, event: AssemblerEvent) -> Result<Option<SentenceEvent>, StationError> {
        match event {
            AssemblerEvent::Sign(sign) => Self::map_result(self.assembler.on_sign(&sign)),
            AssemblerEvent::SpeakNow => Self::map_result(self.assembler.speak_now()),
        }
    }

    fn poll(&mut self) -> Result<Option<SentenceEvent>, StationError> {
        Self::map_result(self.assembler.poll())
    }
}
