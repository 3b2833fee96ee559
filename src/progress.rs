use indicatif::{ProgressBar, ProgressStyle};
use log::info;

/// Completed-work tracker shared by all workers of a sweep
pub struct Progress {
    bar: ProgressBar,
    total: usize,
    /// Dequeued indices that are a multiple of this get a log line
    step: usize,
}

impl Progress {
    /// Progress bar on stderr, logging every tenth of `total`
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "  requirements [{bar:40}] {pos}/{len} [{elapsed} < {eta}, {per_sec}]",
        ) {
            bar.set_style(style);
        }
        Self::with_bar(bar, total)
    }

    /// No output at all; used by tests and benches
    pub fn hidden(total: usize) -> Self {
        Self::with_bar(ProgressBar::hidden(), total)
    }

    fn with_bar(bar: ProgressBar, total: usize) -> Self {
        Progress {
            bar,
            total,
            step: (total / 10).max(1),
        }
    }

    /// Log a percentage when a dequeued index crosses a tenth of the work.
    ///
    /// The bar is cleared while the line is written so the two don't interleave.
    pub fn dequeued(&self, index: usize) {
        if let Some(percent) = self.milestone(index) {
            self.bar
                .suspend(|| info!("{}% of requirements dispatched", percent));
        }
    }

    fn milestone(&self, index: usize) -> Option<usize> {
        if self.total > 0 && index > 0 && index % self.step == 0 {
            Some(index * 100 / self.total)
        } else {
            None
        }
    }

    #[inline]
    pub fn completed(&self, count: u64) {
        self.bar.inc(count);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_milestones_every_tenth() {
        let progress = Progress::hidden(1_000);
        let hits: Vec<usize> = (0..1_000).filter_map(|i| progress.milestone(i)).collect();
        assert_eq!(hits, vec![10, 20, 30, 40, 50, 60, 70, 80, 90]);
    }

    #[test]
    fn test_small_and_empty_totals() {
        assert_eq!(Progress::hidden(0).milestone(0), None);
        let progress = Progress::hidden(3);
        assert_eq!(progress.milestone(1), Some(33));
        progress.dequeued(2);
        progress.completed(3);
        progress.finish();
    }
}
