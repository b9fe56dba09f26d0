//! Progress bar rendering for bulk commands.

use indicatif::{ProgressBar, ProgressStyle};
use manga_catalog_import::ImportProgress;

/// Draws import progress on an indicatif bar. Hidden in quiet mode.
pub(crate) struct BarProgress {
    pb: ProgressBar,
}

impl BarProgress {
    pub(crate) fn new(quiet: bool) -> Self {
        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(0);
            if let Ok(style) =
                ProgressStyle::with_template("  {bar:30.cyan/blue} {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("=> "));
            }
            pb
        };
        Self { pb }
    }
}

impl ImportProgress for BarProgress {
    fn on_item(&self, current: usize, total: usize, label: &str) {
        self.pb.set_length(total as u64);
        self.pb.set_position(current as u64);
        self.pb.set_message(label.to_string());
    }

    fn on_phase(&self, message: &str) {
        self.pb.suspend(|| log::info!("{}", message));
    }

    fn on_complete(&self, message: &str) {
        self.pb.finish_and_clear();
        log::info!("{}", message);
    }
}

impl Drop for BarProgress {
    fn drop(&mut self) {
        // An aborted run never reaches on_complete.
        if !self.pb.is_finished() {
            self.pb.finish_and_clear();
        }
    }
}
