use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub video: VideoConfig,
    pub classifier: ClassifierConfig,
    pub vocabulary: VocabularyConfig,
    pub speech: SpeechConfig,
    pub assembly: AssemblyTomlConfig,
}

/// Video capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VideoConfig {
    pub device: Option<String>,
    pub frame_interval_ms: u64,
}

/// Sign classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Path to the exported model. None disables recognition.
    pub model: Option<PathBuf>,
    pub confidence_threshold: f32,
}

/// Vocabulary configuration
///
/// Must be kept in lockstep with the classifier's output ordering;
/// index 0 is the blank sentinel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VocabularyConfig {
    pub words: Vec<String>,
}

/// Speech synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeechConfig {
    /// Speak finalized sentences automatically.
    pub auto_speak: bool,
    /// Voice hint, matched as a substring against available voices.
    pub voice: String,
    /// Path to a Piper voice model (feature `tts`).
    pub voice_model: Option<PathBuf>,
}

/// Text assembly configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssemblyTomlConfig {
    pub idle_finalize_ms: u64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            device: None,
            frame_interval_ms: defaults::FRAME_INTERVAL_MS,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: None,
            confidence_threshold: defaults::CONFIDENCE_THRESHOLD,
        }
    }
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            words: ["blank", "halo", "pagi", "selamat", "semua"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            auto_speak: true,
            voice: defaults::DEFAULT_VOICE_HINT.to_string(),
            voice_model: None,
        }
    }
}

impl Default for AssemblyTomlConfig {
    fn default() -> Self {
        Self {
            idle_finalize_ms: defaults::IDLE_FINALIZE_MS,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if the file
    /// doesn't exist.
    ///
    /// Invalid TOML is an error; only a missing file falls back to
    /// defaults.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e.context(format!("failed to load config from {}", path.display())))
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - BISARA_MODEL → classifier.model
    /// - BISARA_VOICE → speech.voice
    /// - BISARA_VIDEO_DEVICE → video.device
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(model) = std::env::var("BISARA_MODEL")
            && !model.is_empty()
        {
            self.classifier.model = Some(PathBuf::from(model));
        }

        if let Ok(voice) = std::env::var("BISARA_VOICE")
            && !voice.is_empty()
        {
            self.speech.voice = voice;
        }

        if let Ok(device) = std::env::var("BISARA_VIDEO_DEVICE")
            && !device.is_empty()
        {
            self.video.device = Some(device);
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/bisara/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bisara")
            .join("config.toml")
    }
}
