use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::super::domain::{JobId, JobListing, UserId};
use super::super::repository::{ApplicationRepository, JobRepository, RepositoryError};
use super::domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationSubmission, ApplicationTally,
    ApplicationView, EmployerApplications, JobSummary,
};

/// Service composing application intake with employer review.
pub struct ApplicationService<A, J> {
    applications: Arc<A>,
    jobs: Arc<J>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

impl<A, J> ApplicationService<A, J>
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
{
    pub fn new(applications: Arc<A>, jobs: Arc<J>) -> Self {
        Self { applications, jobs }
    }

    /// Record an anonymous application against an active listing.
    pub fn submit(
        &self,
        job_id: &JobId,
        submission: ApplicationSubmission,
        now: DateTime<Utc>,
    ) -> Result<Application, ApplicationServiceError> {
        let applicant_name = submission.applicant_name.trim().to_string();
        if applicant_name.is_empty() {
            return Err(ApplicationServiceError::MissingName);
        }
        let applicant_phone = submission.applicant_phone.trim().to_string();
        if applicant_phone.is_empty() {
            return Err(ApplicationServiceError::MissingPhone);
        }

        let listing = self
            .jobs
            .fetch(job_id)?
            .ok_or(ApplicationServiceError::JobNotFound)?;
        if !listing.is_active() {
            return Err(ApplicationServiceError::JobNotAccepting);
        }

        let mut application = Application {
            id: next_application_id(),
            job_id: job_id.clone(),
            applicant_name,
            applicant_phone,
            applicant_message: submission
                .applicant_message
                .map(|message| message.trim().to_string())
                .filter(|message| !message.is_empty()),
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: None,
        };

        let stored = loop {
            match self.applications.insert(application.clone()) {
                Err(RepositoryError::Conflict) => {
                    debug!(
                        application_id = %application.id.0,
                        "application id taken, drawing the next one"
                    );
                    application.id = next_application_id();
                }
                other => break other?,
            }
        };
        info!(application_id = %stored.id.0, job_id = %job_id.0, "application received");
        Ok(stored)
    }

    /// Move an application on one of the employer's listings to its next state.
    pub fn update_status(
        &self,
        employer: &UserId,
        id: &ApplicationId,
        next: ApplicationStatus,
        now: DateTime<Utc>,
    ) -> Result<Application, ApplicationServiceError> {
        let mut application = self
            .applications
            .fetch(id)?
            .ok_or(ApplicationServiceError::NotFound)?;

        let owned = self
            .jobs
            .fetch(&application.job_id)?
            .is_some_and(|listing| &listing.employer_id == employer);
        if !owned {
            return Err(ApplicationServiceError::Forbidden);
        }

        if !application.status.can_transition_to(next) {
            return Err(ApplicationServiceError::InvalidTransition {
                from: application.status,
                to: next,
            });
        }

        application.status = next;
        application.updated_at = Some(now);
        self.applications.update(application.clone())?;
        info!(application_id = %id.0, status = ?next, "application status updated");
        Ok(application)
    }

    /// Applications on the employer's listings, newest first, optionally narrowed
    /// to one status. The tally always covers every status.
    pub fn for_employer(
        &self,
        employer: &UserId,
        status: Option<ApplicationStatus>,
    ) -> Result<EmployerApplications, ApplicationServiceError> {
        let listings = self.jobs.by_employer(employer)?;
        let job_ids: Vec<JobId> = listings.iter().map(|listing| listing.id.clone()).collect();
        let by_id: HashMap<&JobId, &JobListing> =
            listings.iter().map(|listing| (&listing.id, listing)).collect();

        let applications = self.applications.for_jobs(&job_ids)?;
        let tally = ApplicationTally::from_applications(&applications);

        let views = applications
            .into_iter()
            .filter(|application| status.map_or(true, |wanted| application.status == wanted))
            .filter_map(|application| {
                let listing = by_id.get(&application.job_id)?;
                Some(ApplicationView {
                    job: JobSummary::from(*listing),
                    status_label: application.status.label(),
                    id: application.id,
                    applicant_name: application.applicant_name,
                    applicant_phone: application.applicant_phone,
                    applicant_message: application.applicant_message,
                    status: application.status,
                    created_at: application.created_at,
                })
            })
            .collect();

        Ok(EmployerApplications {
            tally,
            applications: views,
        })
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("El nombre es requerido")]
    MissingName,
    #[error("El número de teléfono es requerido")]
    MissingPhone,
    #[error("job listing not found")]
    JobNotFound,
    #[error("job listing is not accepting applications")]
    JobNotAccepting,
    #[error("application not found")]
    NotFound,
    #[error("application belongs to another employer's listing")]
    Forbidden,
    #[error("cannot move application from {} to {}", .from.label(), .to.label())]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
