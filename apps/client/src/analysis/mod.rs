// Analysis submission: the HTTP client for /api/analyze, the host-side
// controller that owns form and outcome state, and the derived wizard.

pub mod client;
pub mod controller;
pub mod wizard;

pub use client::AnalysisClient;
pub use controller::{Outcome, SubmissionController};
pub use wizard::{StepStatus, Wizard, WizardStep};
