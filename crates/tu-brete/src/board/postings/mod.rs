//! Employer-side listing management: validation of drafts and the job service.

mod guard;
mod service;

pub use guard::{JobDraft, PostingGuard, PostingViolation, PostingViolations, ValidatedDraft};
pub use service::{PostingError, PostingService};
