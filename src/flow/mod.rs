//! The commit flow: state machine, controller and user-facing reporting.

pub mod confirm;
pub mod controller;
pub mod report;
pub mod state;

pub use confirm::{Confirmer, DialoguerConfirmer};
pub use controller::{CommitFlow, INTERRUPTED_EXIT_CODE, Outcome};
pub use report::{ConsoleReporter, Notice, Reporter, describe_outcome, render_notice};
pub use state::{AbortReason, Event, FlowState, transition};
