//! Result aggregation
//!
//! Counts outcomes as they complete and keeps them in completion order.
//! The pipeline feeds a single [`Aggregator`] from its collector thread, so
//! every outcome is counted exactly once no matter which worker produced it.

use serde::Serialize;

use crate::pipeline::{BatchResult, Outcome, OutcomeStatus};

/// Point-in-time progress of a batch.
///
/// `ok + skipped + failed == done` holds for every snapshot handed out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    pub done: usize,
    pub total: usize,
    pub ok: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ProgressSnapshot {
    /// Completion percentage rounded to the nearest integer; 0 for an empty batch.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.done as f64 / self.total as f64) * 100.0).round() as u8
    }

    pub fn is_complete(&self) -> bool {
        self.done == self.total
    }
}

impl std::fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Progress: {}/{} ({}%) | OK: {} | Skipped: {} | Failed: {}",
            self.done,
            self.total,
            self.percent(),
            self.ok,
            self.skipped,
            self.failed
        )
    }
}

#[derive(Debug)]
pub struct Aggregator {
    snapshot: ProgressSnapshot,
    outcomes: Vec<Outcome>,
}

impl Aggregator {
    pub fn new(total: usize) -> Self {
        Self {
            snapshot: ProgressSnapshot {
                total,
                ..ProgressSnapshot::default()
            },
            outcomes: Vec::with_capacity(total),
        }
    }

    /// Record one completed document and return the updated snapshot.
    pub fn record(&mut self, outcome: Outcome) -> ProgressSnapshot {
        match outcome.status() {
            OutcomeStatus::Ok => self.snapshot.ok += 1,
            OutcomeStatus::Skipped => self.snapshot.skipped += 1,
            OutcomeStatus::Failed => self.snapshot.failed += 1,
        }
        self.snapshot.done += 1;
        self.outcomes.push(outcome);
        self.snapshot
    }

    pub fn finish(self, cancelled: bool) -> BatchResult {
        debug_assert_eq!(self.snapshot.done, self.outcomes.len());
        BatchResult {
            total: self.snapshot.total,
            ok: self.snapshot.ok,
            skipped: self.snapshot.skipped,
            failed: self.snapshot.failed,
            outcomes: self.outcomes,
            cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::InputDocument;
    use crate::pipeline::OutcomeKind;

    fn outcome(position: usize, kind: OutcomeKind) -> Outcome {
        Outcome {
            position,
            document: InputDocument::from_bytes(format!("{position}.pdf"), Vec::new()),
            kind,
        }
    }

    #[test]
    fn test_percent() {
        let snapshot = ProgressSnapshot {
            done: 1,
            total: 3,
            ..Default::default()
        };
        assert_eq!(snapshot.percent(), 33);

        let snapshot = ProgressSnapshot {
            done: 2,
            total: 3,
            ..Default::default()
        };
        assert_eq!(snapshot.percent(), 67);
    }

    #[test]
    fn test_percent_empty_batch() {
        let snapshot = ProgressSnapshot::default();
        assert_eq!(snapshot.percent(), 0);
        assert!(snapshot.is_complete());
    }

    #[test]
    fn test_counts_stay_consistent() {
        let mut aggregator = Aggregator::new(3);

        let s1 = aggregator.record(outcome(2, OutcomeKind::Skipped));
        assert_eq!((s1.done, s1.skipped), (1, 1));

        let s2 = aggregator.record(outcome(
            0,
            OutcomeKind::Encrypted {
                produced: vec![1, 2, 3],
            },
        ));
        let s3 = aggregator.record(outcome(
            1,
            OutcomeKind::Failed {
                detail: "bad pdf".into(),
            },
        ));

        for s in [s1, s2, s3] {
            assert_eq!(s.ok + s.skipped + s.failed, s.done);
        }
        assert!(s3.is_complete());

        let result = aggregator.finish(false);
        assert_eq!((result.total, result.ok, result.skipped, result.failed), (3, 1, 1, 1));
        // Completion order is kept
        let positions: Vec<usize> = result.outcomes.iter().map(|o| o.position).collect();
        assert_eq!(positions, vec![2, 0, 1]);
    }

    #[test]
    fn test_display() {
        let snapshot = ProgressSnapshot {
            done: 2,
            total: 4,
            ok: 1,
            skipped: 1,
            failed: 0,
        };
        assert_eq!(
            snapshot.to_string(),
            "Progress: 2/4 (50%) | OK: 1 | Skipped: 1 | Failed: 0"
        );
    }
}
