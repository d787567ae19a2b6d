//! Progress reporting
//!
//! Provides a simple API for displaying what a command is doing:
//! - Current phase (Reading, Splitting, Validating, Loading)
//! - Progress (current/total with a label)
//! - Activity log lines

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Command phases shown alongside progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Reading,
    Splitting,
    Transforming,
    Validating,
    Loading,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Reading => write!(f, "Reading tables"),
            Phase::Splitting => write!(f, "Splitting columns"),
            Phase::Transforming => write!(f, "Rewriting columns"),
            Phase::Validating => write!(f, "Validating tables"),
            Phase::Loading => write!(f, "Loading into SQLite"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// Trait for UI implementations - allows both console and silent/test modes
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn clear_progress(&mut self);
    fn log(&mut self, message: impl Into<String>);
}

/// Console UI: one progress bar on stderr plus log lines above it
pub struct ConsoleUi {
    bar: ProgressBar,
    phase: Option<Phase>,
}

impl ConsoleUi {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        let style = ProgressStyle::default_bar()
            .template("{prefix:20} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        bar.set_style(style);

        Self { bar, phase: None }
    }

    /// Finish the UI with a closing summary
    pub fn finish(mut self, summary: &str) {
        self.set_phase(Phase::Complete);
        self.bar.finish_and_clear();
        println!("{}", summary);
    }
}

impl Default for ConsoleUi {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui for ConsoleUi {
    fn set_phase(&mut self, phase: Phase) {
        if self.phase != Some(phase) {
            self.phase = Some(phase);
            self.bar.set_prefix(phase.to_string());
        }
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        self.bar.set_length(total);
        self.bar.set_position(current);
        self.bar.set_message(label.into());
    }

    fn clear_progress(&mut self) {
        self.bar.set_position(0);
        self.bar.set_length(0);
        self.bar.set_message("");
    }

    fn log(&mut self, message: impl Into<String>) {
        self.bar.println(message.into());
    }
}

impl Drop for ConsoleUi {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

/// Silent UI implementation for testing and non-interactive use
#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, _message: impl Into<String>) {}
}

/// Records everything it is told; used by tests to check reporting
#[derive(Debug, Default)]
pub struct RecordingUi {
    pub phases: Vec<Phase>,
    pub logs: Vec<String>,
}

impl Ui for RecordingUi {
    fn set_phase(&mut self, phase: Phase) {
        self.phases.push(phase);
    }
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, message: impl Into<String>) {
        self.logs.push(message.into());
    }
}
