//! Progress bar shown while strips are decoded

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{msg:>16} [{bar:32.green/white}] {pos:>5}/{len:5} strips {elapsed}";

/// Strips below this count decode too fast for a bar to be useful
const MIN_VISIBLE: u64 = 16;

pub struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    pub fn new(total: u64, description: &str) -> Self {
        let bar = if total < MIN_VISIBLE {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total)
        };
        // Falls back to indicatif's default style on a bad template
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message(description.to_string());
        ProgressTracker { bar }
    }

    pub fn increment(&self, amount: u64) {
        self.bar.inc(amount);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
