//! Progress bar utilities

use apple_devices::UpdateProgress;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a standard progress bar
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("invalid progress bar template")
            .progress_chars("##-"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Update progress shown on a progress bar
pub struct FetchProgress {
    bar: ProgressBar,
}

impl FetchProgress {
    /// Visible progress bar, sized once the device list is known
    pub fn new() -> Self {
        Self {
            bar: create_progress_bar(0, "Fetching device list"),
        }
    }

    /// Progress that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Remove the bar, e.g. after a failed run
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

impl Default for FetchProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateProgress for FetchProgress {
    fn started(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_message("Fetching firmwares");
    }

    fn fetched(&self, identifier: &str) {
        self.bar.set_message(format!("Fetched: {identifier}"));
        self.bar.inc(1);
    }

    fn finished(&self) {
        self.bar.finish_with_message("Data file updated");
    }
}
