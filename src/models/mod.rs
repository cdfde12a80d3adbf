pub mod identity;
pub mod outcome;

pub use identity::{AuthProvider, UserIdentity};
pub use outcome::{DeletionOutcome, DeletionReport, StepOutcome};
