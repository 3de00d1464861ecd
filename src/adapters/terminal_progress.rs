//! Text progress bar written to stderr.

use std::io::Write;

use tracing::info;

use crate::domain::job::ProgressPhase;
use crate::ports::progress_port::ProgressPort;

const BAR_WIDTH: usize = 30;

pub struct TerminalProgress<W: Write + Send + 'static = std::io::Stderr> {
    out: W,
    label: String,
}

impl TerminalProgress {
    pub fn stderr(label: &str) -> Self {
        Self::new(std::io::stderr(), label)
    }
}

impl<W: Write + Send + 'static> TerminalProgress<W> {
    pub fn new(out: W, label: &str) -> Self {
        Self {
            out,
            label: label.to_string(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// `[#########.....] 45% computing correlations`
pub fn render_bar(percent: u8) -> String {
    let filled = BAR_WIDTH * usize::from(percent.min(100)) / 100;
    format!(
        "[{}{}] {:>3}% {}",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        percent,
        ProgressPhase::from_percent(percent)
    )
}

impl<W: Write + Send + 'static> ProgressPort for TerminalProgress<W> {
    fn on_progress(&mut self, percent: u8) {
        // Output failures only affect the display.
        let _ = writeln!(self.out, "{} {}", self.label, render_bar(percent));
    }

    fn on_complete(&mut self) {
        let _ = writeln!(self.out, "{} done", self.label);
        info!(label = %self.label, "optimization finished");
    }
}
