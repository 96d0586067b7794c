//! Progress reporting on stderr
//!
//! Bars are hidden in quiet mode and when progress is disabled, so stdout
//! and stderr stay clean for scripts.

use crate::core::parallel::ProgressUpdate;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use parking_lot::Mutex;
use std::sync::Arc;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}";

/// Progress reporter for the parsing phase
pub struct ProgressReporter {
    enabled: bool,
    bar: ProgressBar,
    current_operation: Mutex<String>,
}

impl ProgressReporter {
    /// Create a new progress reporter; a disabled reporter draws nothing
    pub fn new(enabled: bool) -> Self {
        let bar = if enabled {
            let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
            let style = ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-");
            bar.set_style(style);
            bar
        } else {
            ProgressBar::hidden()
        };

        Self {
            enabled,
            bar,
            current_operation: Mutex::new(String::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Start a new progress operation
    pub fn start(&self, total: usize, operation: &str) {
        *self.current_operation.lock() = operation.to_string();
        if !self.enabled {
            return;
        }
        self.bar.reset();
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_message(operation.to_string());
    }

    /// Update progress
    pub fn update(&self, current: usize, total: usize, message: &str) {
        tracing::trace!(current, total, "{}", message);
        if !self.enabled {
            return;
        }
        self.bar.set_length(total as u64);
        self.bar.set_position(current as u64);
        if *self.current_operation.lock() != message {
            self.bar.set_message(message.to_string());
        }
    }

    /// Update progress from a ProgressUpdate
    pub fn update_from(&self, progress: ProgressUpdate) {
        self.update(progress.current, progress.total, &progress.message);
    }

    /// Finish the progress operation and clear the bar
    pub fn finish(&self, message: &str) {
        if !self.enabled {
            return;
        }
        self.bar.finish_and_clear();
        tracing::debug!("{}", message);
    }
}

/// Create a progress callback function that updates a ProgressReporter
pub fn create_progress_callback(
    reporter: Arc<ProgressReporter>,
) -> impl Fn(ProgressUpdate) + Send + Sync {
    move |progress: ProgressUpdate| {
        reporter.update_from(progress);
    }
}
