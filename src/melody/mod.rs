pub mod session;
pub mod types;

pub use session::MelodySession;
pub use types::{Melody, Note, SessionResult, SessionState, SubmitOutcome};
