//! Command-line interface for bisara
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

/// Live sign language to speech
#[derive(Parser, Debug)]
#[command(name = "bisara", version, about = "Live sign language to speech")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: live text, -vv: recognized signs)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Landmark recording to replay (JSONL, one frame per line)
    #[arg(long, value_name = "PATH")]
    pub landmarks: Option<PathBuf>,

    /// Sign classifier model path (ONNX)
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Confidence threshold for recognitions (strict greater-than)
    #[arg(long, value_name = "PROB")]
    pub threshold: Option<f32>,

    /// Quiet period before a sentence is finalized. Examples: 3s, 1500ms
    #[arg(long, value_name = "DURATION", value_parser = parse_duration_ms)]
    pub idle: Option<u64>,

    /// Do not speak finalized sentences automatically
    #[arg(long)]
    pub no_auto_speak: bool,

    /// Piper voice model for speech synthesis
    #[arg(long, value_name = "PATH")]
    pub voice_model: Option<PathBuf>,
}

/// Parse a duration string into milliseconds.
///
/// Supports any duration format accepted by `humantime`: bare numbers
/// (milliseconds), single-unit (`3s`, `1500ms`), and compound (`1m30s`).
fn parse_duration_ms(s: &str) -> Result<u64, String> {
    let s = s.trim();
    // Bare number → milliseconds
    if let Ok(ms) = s.parse::<u64>() {
        return Ok(ms);
    }
    humantime::parse_duration(s)
        .map(|d| Duration::as_millis(&d) as u64)
        .map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the sign vocabulary in classifier order
    Vocab,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
