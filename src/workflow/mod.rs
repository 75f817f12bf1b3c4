pub mod submission_flow;
pub mod submission_state;

pub use submission_flow::{InFlight, SubmissionFlow, SubmitRejected};
pub use submission_state::{Effect, SubmissionEvent, SubmissionState};
