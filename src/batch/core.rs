use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Running tally of a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub succeeded: usize,
    pub failed: usize,
}

impl UpdateOutcome {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            succeeded: 0,
            failed: 0,
        }
    }
    pub const fn add_success(&mut self) {
        self.succeeded += 1;
    }
    pub const fn add_failure(&mut self) {
        self.failed += 1;
    }
    #[must_use]
    pub const fn processed(&self) -> usize {
        self.succeeded + self.failed
    }
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Payload of the per-item progress callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub processed: usize,
    pub total: usize,
    /// `round(processed / total * 100)`
    pub percent: u8,
    pub outcome: UpdateOutcome,
}

impl ProgressUpdate {
    #[must_use]
    pub fn new(processed: usize, total: usize, outcome: UpdateOutcome) -> Self {
        Self {
            processed,
            total,
            percent: percent(processed, total),
            outcome,
        }
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((processed as f64 / total as f64) * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Terminal state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Every target succeeded
    Success,
    /// At least one target failed
    Partial,
}

/// Result of a finished batch run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub outcome: UpdateOutcome,
    pub status: RunStatus,
    /// Patched copy of the backing rows (local strategy only)
    pub rows: Option<Vec<Value>>,
}

impl RunReport {
    #[must_use]
    pub fn new(outcome: UpdateOutcome, rows: Option<Vec<Value>>) -> Self {
        let status = if outcome.is_clean() {
            RunStatus::Success
        } else {
            RunStatus::Partial
        };
        Self {
            outcome,
            status,
            rows,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }

    /// User-facing summary line
    #[must_use]
    pub fn summary(&self) -> String {
        let UpdateOutcome { succeeded, failed } = self.outcome;
        match self.status {
            RunStatus::Success => format!(
                "Updated {succeeded} record{}",
                if succeeded == 1 { "" } else { "s" }
            ),
            RunStatus::Partial => format!("{succeeded} succeeded, {failed} failed"),
        }
    }
}
