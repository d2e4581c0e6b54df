// file: src/pipeline/progress.rs
// description: spinner and per-request statistics for an analysis run
// reference: uses indicatif for the wait indicator and tracks stage timings

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestStats {
    pub records_scanned: usize,
    pub sections_expected: usize,
    pub sections_found: usize,
    pub stages: Vec<(String, u64)>,
}

impl RequestStats {
    pub fn new(sections_expected: usize) -> Self {
        Self {
            sections_expected,
            ..Self::default()
        }
    }

    pub fn record_stage(&mut self, stage: &str, elapsed: Duration) {
        self.stages
            .push((stage.to_string(), elapsed.as_millis() as u64));
    }

    pub fn total_ms(&self) -> u64 {
        self.stages.iter().map(|(_, ms)| ms).sum()
    }

    pub fn coverage(&self) -> f64 {
        if self.sections_expected == 0 {
            return 0.0;
        }
        (self.sections_found as f64 / self.sections_expected as f64) * 100.0
    }

    pub fn summary(&self) -> String {
        let stages = self
            .stages
            .iter()
            .map(|(name, ms)| format!("{} {}ms", name, ms))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{} records scanned, {}/{} sections ({:.0}%), {}ms total [{}]",
            self.records_scanned,
            self.sections_found,
            self.sections_expected,
            self.coverage(),
            self.total_ms(),
            stages
        )
    }
}

/// Wait indicator shown while the model call is in flight.
pub struct ReportSpinner {
    bar: ProgressBar,
}

impl ReportSpinner {
    pub fn new(message: &str, visible: bool) -> Self {
        if !visible {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} [{elapsed}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for ReportSpinner {
    fn drop(&mut self) {
        self.finish();
    }
}
