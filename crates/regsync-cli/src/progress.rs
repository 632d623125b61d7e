use std::io::IsTerminal as _;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

enum Sink {
    Hidden,
    Plain,
    Spinner(ProgressBar),
}

/// Human-facing progress lines on stderr.
///
/// A spinner on a terminal, plain lines otherwise, nothing when quiet.
pub struct Progress {
    sink: Sink,
}

impl Progress {
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        if quiet {
            return Self::hidden();
        }
        if !std::io::stderr().is_terminal() {
            return Self { sink: Sink::Plain };
        }

        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Self {
            sink: Sink::Spinner(bar),
        }
    }

    #[must_use]
    pub const fn hidden() -> Self {
        Self { sink: Sink::Hidden }
    }

    /// Show what is happening now.
    pub fn step(&self, message: &str) {
        match &self.sink {
            Sink::Hidden | Sink::Plain => {}
            Sink::Spinner(bar) => bar.set_message(message.to_string()),
        }
    }

    /// Record a completed milestone.
    pub fn done(&self, message: &str) {
        match &self.sink {
            Sink::Hidden => {}
            Sink::Plain => eprintln!("{message}"),
            Sink::Spinner(bar) => bar.println(format!("✓ {message}")),
        }
    }

    pub fn finish_clear(&self) {
        if let Sink::Spinner(bar) = &self.sink {
            bar.finish_and_clear();
        }
    }

    pub fn finish_err(&self, message: &str) {
        match &self.sink {
            Sink::Hidden => {}
            Sink::Plain => eprintln!("{message}"),
            Sink::Spinner(bar) => bar.abandon_with_message(message.to_string()),
        }
    }
}
