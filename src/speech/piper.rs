//! Piper speech backend.
//!
//! Synthesizes sentences with a local Piper voice and plays them on the
//! default output device. Synthesis and playback run on a worker thread
//! per utterance; completion is reported through `poll_event`.

use crate::error::{BisaraError, Result};
use crate::speech::synthesizer::{SpeechEvent, SpeechSynthesizer};
use piper_rs::synth::PiperSpeechSynthesizer as PiperSynth;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// Piper voices emit mono PCM at this rate.
const PIPER_SAMPLE_RATE: u32 = 22050;

/// Speech synthesizer backed by a Piper voice model.
pub struct PiperSynthesizer {
    synth: Arc<PiperSynth>,
    voice_name: String,
    speaking: Arc<AtomicBool>,
    events: Arc<Mutex<VecDeque<SpeechEvent>>>,
}

impl PiperSynthesizer {
    /// Loads a Piper voice from its `.onnx.json` config path.
    ///
    /// A bare `.onnx` path is accepted; the sibling config file is
    /// inferred.
    pub fn load(voice_path: &Path) -> Result<Self> {
        let config_path = if voice_path.extension().is_some_and(|e| e == "onnx") {
            voice_path.with_extension("onnx.json")
        } else {
            voice_path.to_path_buf()
        };

        if !config_path.exists() {
            return Err(BisaraError::ModelNotFound {
                path: config_path.display().to_string(),
            });
        }

        let model = piper_rs::from_config_path(&config_path).map_err(|e| BisaraError::Speech {
            message: format!("failed to load Piper voice config: {}", e),
        })?;
        let synth = PiperSynth::new(model).map_err(|e| BisaraError::Speech {
            message: format!("failed to create Piper synthesizer: {}", e),
        })?;

        let voice_name = config_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "piper".to_string());

        Ok(Self {
            synth: Arc::new(synth),
            voice_name,
            speaking: Arc::new(AtomicBool::new(false)),
            events: Arc::new(Mutex::new(VecDeque::new())),
        })
    }

    /// The loaded voice's name (config file stem).
    pub fn voice_name(&self) -> &str {
        &self.voice_name
    }

    fn synthesize_samples(synth: &PiperSynth, text: &str) -> std::result::Result<Vec<f32>, String> {
        let audio_results = synth
            .synthesize_parallel(text.to_string(), None)
            .map_err(|e| format!("failed to synthesize: {}", e))?;

        let mut samples: Vec<f32> = Vec::new();
        for result in audio_results {
            let chunk = result.map_err(|e| format!("failed to get audio chunk: {}", e))?;
            samples.extend(chunk.into_vec());
        }
        Ok(samples)
    }

    fn play_samples(samples: Vec<f32>) -> std::result::Result<(), String> {
        let (_stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| format!("failed to open output device: {}", e))?;
        let sink =
            Sink::try_new(&stream_handle).map_err(|e| format!("failed to create sink: {}", e))?;

        sink.append(SamplesBuffer::new(1, PIPER_SAMPLE_RATE, samples));
        sink.sleep_until_end();
        Ok(())
    }
}

impl SpeechSynthesizer for PiperSynthesizer {
    fn speak(&self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        if self.speaking.swap(true, Ordering::SeqCst) {
            // Already playing — at most one concurrent utterance.
            return Ok(());
        }

        let synth = self.synth.clone();
        let speaking = self.speaking.clone();
        let events = self.events.clone();
        let text = text.to_string();

        thread::spawn(move || {
            let outcome = Self::synthesize_samples(&synth, &text).and_then(Self::play_samples);

            speaking.store(false, Ordering::SeqCst);
            if let Ok(mut events) = events.lock() {
                events.push_back(match outcome {
                    Ok(()) => SpeechEvent::Finished,
                    Err(message) => SpeechEvent::Failed(message),
                });
            }
        });

        Ok(())
    }

    fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }

    fn poll_event(&self) -> Option<SpeechEvent> {
        self.events.lock().ok().and_then(|mut e| e.pop_front())
    }

    fn name(&self) -> &'static str {
        "piper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_voice_reports_path() {
        let result = PiperSynthesizer::load(Path::new("/nonexistent/voice.onnx"));
        match result {
            Err(BisaraError::ModelNotFound { path }) => {
                assert!(path.contains("voice.onnx.json"));
            }
            _ => panic!("Expected ModelNotFound error"),
        }
    }
}
