pub mod analysis;
pub mod form;
pub mod session;

pub use analysis::{advice, Advice, AnalysisResult, AnalyzeResponse, Breakdown, RingColor};
pub use form::{CvFile, SubmissionForm};
pub use session::VerifiedSession;
