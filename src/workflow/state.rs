use std::fmt;

use crate::batch::{ProgressUpdate, RunReport};

/// Where an edit session currently stands
#[derive(Debug, Clone, Default, PartialEq)]
pub enum WorkflowState {
    /// No form open
    #[default]
    Idle,
    /// Fields are being inferred
    LoadingSchema,
    /// Form is editable; options may still be arriving
    Ready,
    /// A batch run is in flight
    Processing(ProgressUpdate),
    /// A run finished; partial results wait for `dismiss`
    ResultsShown(RunReport),
}

impl WorkflowState {
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Latest progress while processing
    #[must_use]
    pub const fn progress(&self) -> Option<&ProgressUpdate> {
        match self {
            Self::Processing(progress) => Some(progress),
            _ => None,
        }
    }

    /// Report of the finished run
    #[must_use]
    pub const fn report(&self) -> Option<&RunReport> {
        match self {
            Self::ResultsShown(report) => Some(report),
            _ => None,
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::LoadingSchema => write!(f, "loading schema"),
            Self::Ready => write!(f, "ready"),
            Self::Processing(p) => write!(f, "processing {}/{} ({}%)", p.processed, p.total, p.percent),
            Self::ResultsShown(report) => write!(f, "{}", report.summary()),
        }
    }
}
