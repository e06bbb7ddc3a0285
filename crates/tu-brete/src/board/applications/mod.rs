//! Application intake from job seekers and review by employers.

mod domain;
mod service;

pub use domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationSubmission, ApplicationTally,
    ApplicationView, EmployerApplications, JobSummary,
};
pub use service::{ApplicationService, ApplicationServiceError};
