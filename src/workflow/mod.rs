//! Bulk edit session workflow
//!
//! Ties schema inference, relationship resolution and the batch executor
//! into one state machine the shell drives:
//!
//! ```text
//! Idle → LoadingSchema → Ready → Processing → ResultsShown → Idle
//! ```
//!
//! Closing or re-opening cancels the session token, so late option loads
//! and completion callbacks for a closed form are dropped.

pub mod orchestrator;
pub mod state;

pub use orchestrator::BulkEditWorkflow;
pub use state::WorkflowState;
