use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{PROGRESS_CHARS, PROGRESS_TEMPLATE};

/// Block counter shown while a stage runs.
///
/// `indicatif` bars are internally synchronized, so one `Bar` can be advanced
/// from every rayon worker.
pub struct Bar {
    bar: ProgressBar,
}

impl Bar {
    pub fn new(total: u64, description: &str) -> Result<Self> {
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::default_bar().template(PROGRESS_TEMPLATE).context("invalid progress template")?.progress_chars(PROGRESS_CHARS);

        bar.set_style(style);
        bar.set_message(description.to_owned());

        Ok(Self { bar })
    }

    pub fn add(&self, delta: u64) {
        self.bar.inc(delta);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Done");
    }
}

impl Drop for Bar {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish();
        }
    }
}
