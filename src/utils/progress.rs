//! Progress indicators for badge fetches
//!
//! Thin wrapper over `indicatif` with a consistent style. Bars are hidden when
//! `BADGESYNC_NO_PROGRESS` is set, so scripts and CI logs stay clean.

use indicatif::{ProgressBar as IndicatifBar, ProgressDrawTarget, ProgressStyle as IndicatifStyle};
use std::time::Duration;

/// Environment variable that disables all progress output.
pub const NO_PROGRESS_ENV: &str = "BADGESYNC_NO_PROGRESS";

fn is_progress_disabled() -> bool {
    std::env::var(NO_PROGRESS_ENV).is_ok()
}

/// A progress bar with badgesync styling.
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Create a bar for `len` steps, hidden when progress is disabled.
    pub fn new(len: u64) -> Self {
        if is_progress_disabled() {
            return Self::hidden();
        }

        let inner = IndicatifBar::new(len);
        inner.set_style(ProgressStyle::default_style());
        inner.enable_steady_tick(Duration::from_millis(100));
        Self {
            inner,
        }
    }

    /// A bar that never draws.
    pub fn hidden() -> Self {
        let inner = IndicatifBar::with_draw_target(Some(0), ProgressDrawTarget::hidden());
        Self {
            inner,
        }
    }

    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    pub fn inc(&self, delta: u64) {
        self.inner.inc(delta);
    }

    #[cfg(test)]
    fn position(&self) -> u64 {
        self.inner.position()
    }

    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

/// Preset styles.
pub struct ProgressStyle;

impl ProgressStyle {
    /// `⠋ [=====>    ] 3/7 Badge name`
    pub fn default_style() -> IndicatifStyle {
        IndicatifStyle::default_bar()
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| IndicatifStyle::default_bar())
            .progress_chars("=> ")
    }
}
