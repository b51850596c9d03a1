//! Terminal progress reporting for analysis runs.
//!
//! Pretty mode draws an indicatif frame-progress bar on stderr; plain
//! mode stays quiet and leaves the narration to the log lines the
//! pipeline already emits. Auto picks pretty only on a tty.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::pipeline::SampleSummary;

#[derive(Clone, Copy, Debug)]
pub enum UiMode {
    Auto,
    Plain,
    Pretty,
}

impl UiMode {
    pub fn from_flag(flag: &str) -> Self {
        match flag {
            "plain" => UiMode::Plain,
            "pretty" => UiMode::Pretty,
            _ => UiMode::Auto,
        }
    }
}

/// Frame-progress reporter fed by the sampler's observer callback.
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    pub fn new(mode: UiMode, is_tty: bool, total_frames: u64) -> Self {
        let use_pretty = match mode {
            UiMode::Pretty => true,
            UiMode::Plain => false,
            UiMode::Auto => is_tty,
        };
        if !use_pretty {
            return Self { bar: None };
        }

        let bar = if total_frames > 0 {
            let bar = ProgressBar::new(total_frames);
            let style = ProgressStyle::with_template("{bar:30} {pos}/{len} frames  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style);
            bar
        } else {
            // Unknown stream length: fall back to a spinner.
            let bar = ProgressBar::new_spinner();
            let style = ProgressStyle::with_template("{spinner} frame {pos}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            bar.set_style(style);
            bar
        };
        bar.set_draw_target(ProgressDrawTarget::stderr());

        Self { bar: Some(bar) }
    }

    pub fn observe(&self, sample: &SampleSummary) {
        if let Some(bar) = &self.bar {
            bar.set_position(sample.frame_number);
            bar.set_message(format!("{} people", sample.people_count));
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
