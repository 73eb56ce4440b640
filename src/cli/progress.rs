//! Terminal spinners shown while the client waits on the server.
//!
//! `indicatif` draws to stderr and stays silent when stderr is not a
//! terminal, so piped output is unaffected.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Braille dots.
const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars(TICK_CHARS)
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Clear the spinner and leave a check mark line.
pub fn finish_success(pb: &ProgressBar, msg: &str) {
    pb.set_style(plain_style());
    pb.finish_with_message(format!("✓ {}", msg));
}

pub fn finish_error(pb: &ProgressBar, msg: &str) {
    pb.set_style(plain_style());
    pb.finish_with_message(format!("✗ {}", msg));
}

/// Remove the spinner without leaving a line behind.
pub fn finish_clear(pb: &ProgressBar) {
    pb.finish_and_clear();
}

fn plain_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("  {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
