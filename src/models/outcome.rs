//! Per-item download outcomes and their aggregate.

use std::fmt;

/// Result of attempting one image download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Fetched and written to disk
    Downloaded,
    /// A non-empty file with the derived name already existed
    Skipped,
    /// Transport, status or filesystem error
    Failed,
}

impl DownloadOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadOutcome::Downloaded => "downloaded",
            DownloadOutcome::Skipped => "skipped",
            DownloadOutcome::Failed => "failed",
        }
    }
}

impl fmt::Display for DownloadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts of download outcomes for one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Regular files in the output directory after the batch
    pub files_in_dir: usize,
}

impl DownloadSummary {
    /// Count one outcome.
    pub fn record(&mut self, outcome: DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded => self.downloaded += 1,
            DownloadOutcome::Skipped => self.skipped += 1,
            DownloadOutcome::Failed => self.failed += 1,
        }
    }

    /// Number of items processed.
    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_each_outcome() {
        let mut summary = DownloadSummary::default();
        summary.record(DownloadOutcome::Downloaded);
        summary.record(DownloadOutcome::Skipped);
        summary.record(DownloadOutcome::Skipped);
        summary.record(DownloadOutcome::Failed);

        assert_eq!(summary.downloaded, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 4);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(DownloadOutcome::Skipped.to_string(), "skipped");
    }
}
