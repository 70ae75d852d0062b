//! Shared terminal rendering for recognition output.
//! Used by the sink station and `bisara run` verbose mode.

use std::io::{self, Write};

const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Clear the current terminal line (replaces the live partial line).
pub fn clear_line() {
    eprint!("\r\x1b[2K");
}

/// Render the in-progress sentence on a single overwritten line.
pub fn render_partial(text: &str) {
    eprint!("\r\x1b[2K{DIM}…{RESET} {text}");
    io::stderr().flush().ok();
}

/// Render a finalized sentence on its own line.
pub fn render_sentence(text: &str) {
    clear_line();
    eprintln!("{GREEN}✓{RESET} {}", text.trim_end());
}

/// Note a delivered (spoken) sentence.
pub fn render_delivered() {
    eprintln!("{DIM}  (spoken){RESET}");
}

/// Render one recognized sign with its confidence (verbose mode).
pub fn render_sign(label: &str, confidence: f32) {
    clear_line();
    eprintln!("{DIM}  [{} {:.2}]{RESET}", label, confidence);
}
