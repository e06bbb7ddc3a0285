use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::super::domain::{JobId, JobListing, ListingStatus, UserId};
use super::super::repository::{JobRepository, RepositoryError};
use super::super::session::SessionContext;
use super::guard::{JobDraft, PostingGuard, PostingViolations};

/// Service behind the posting wizard, the edit form and the employer job list.
pub struct PostingService<J> {
    jobs: Arc<J>,
    guard: PostingGuard,
}

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_id() -> JobId {
    let id = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobId(format!("job-{id:06}"))
}

impl<J> PostingService<J>
where
    J: JobRepository + 'static,
{
    pub fn new(jobs: Arc<J>, guard: PostingGuard) -> Self {
        Self { jobs, guard }
    }

    pub fn jobs(&self) -> &Arc<J> {
        &self.jobs
    }

    /// Publish a new listing owned by the session's employer.
    pub fn create(
        &self,
        session: &SessionContext,
        draft: JobDraft,
        now: DateTime<Utc>,
    ) -> Result<JobListing, PostingError> {
        let employer = session.user_id().ok_or(PostingError::Unauthenticated)?;
        let draft = self.guard.validate(draft, now)?;

        let mut listing = JobListing {
            id: next_job_id(),
            employer_id: employer.clone(),
            title: draft.title,
            description: Some(draft.description),
            company_name: Some(session.company_name().to_string()),
            job_type: Some(draft.job_type),
            category: Some(draft.category),
            location: Some(draft.location),
            experience_level: Some(draft.experience_level),
            is_remote: draft.is_remote,
            salary_min: draft.salary_min,
            salary_max: draft.salary_max,
            salary_currency: draft.salary_currency,
            requirements: draft.requirements,
            benefits: draft.benefits,
            contact_email: draft.contact_email,
            contact_phone: draft.contact_phone,
            status: ListingStatus::Active,
            created_at: now,
            updated_at: None,
            expires_at: Some(
                draft
                    .expires_at
                    .unwrap_or_else(|| self.guard.default_expiry(now)),
            ),
        };

        // Imported rows may already hold ids from the sequence.
        let stored = loop {
            match self.jobs.insert(listing.clone()) {
                Err(RepositoryError::Conflict) => {
                    debug!(job_id = %listing.id.0, "listing id taken, drawing the next one");
                    listing.id = next_job_id();
                }
                other => break other?,
            }
        };
        info!(job_id = %stored.id.0, employer = %employer.0, "listing published");
        Ok(stored)
    }

    /// Replace the editable fields of an owned listing.
    pub fn update(
        &self,
        employer: &UserId,
        id: &JobId,
        draft: JobDraft,
        now: DateTime<Utc>,
    ) -> Result<JobListing, PostingError> {
        let existing = self.owned(employer, id)?;
        let draft = self.guard.validate(draft, now)?;

        let listing = JobListing {
            title: draft.title,
            description: Some(draft.description),
            job_type: Some(draft.job_type),
            category: Some(draft.category),
            location: Some(draft.location),
            experience_level: Some(draft.experience_level),
            is_remote: draft.is_remote,
            salary_min: draft.salary_min,
            salary_max: draft.salary_max,
            salary_currency: draft.salary_currency,
            requirements: draft.requirements,
            benefits: draft.benefits,
            contact_email: draft.contact_email,
            contact_phone: draft.contact_phone,
            status: draft.status.unwrap_or(existing.status),
            updated_at: Some(now),
            expires_at: draft.expires_at.or(existing.expires_at),
            ..existing
        };

        self.jobs.update(listing.clone())?;
        info!(job_id = %id.0, status = ?listing.status, "listing updated");
        Ok(listing)
    }

    pub fn set_status(
        &self,
        employer: &UserId,
        id: &JobId,
        status: ListingStatus,
        now: DateTime<Utc>,
    ) -> Result<JobListing, PostingError> {
        let mut listing = self.owned(employer, id)?;
        listing.status = status;
        listing.updated_at = Some(now);
        self.jobs.update(listing.clone())?;
        info!(job_id = %id.0, ?status, "listing status changed");
        Ok(listing)
    }

    pub fn delete(&self, employer: &UserId, id: &JobId) -> Result<(), PostingError> {
        self.owned(employer, id)?;
        self.jobs.delete(id)?;
        info!(job_id = %id.0, "listing deleted");
        Ok(())
    }

    pub fn list_for_employer(&self, employer: &UserId) -> Result<Vec<JobListing>, PostingError> {
        Ok(self.jobs.by_employer(employer)?)
    }

    /// Public detail lookup; paused and closed listings are not visible.
    pub fn get_active(&self, id: &JobId) -> Result<JobListing, PostingError> {
        match self.jobs.fetch(id)? {
            Some(listing) if listing.is_active() => Ok(listing),
            _ => Err(PostingError::NotFound),
        }
    }

    fn owned(&self, employer: &UserId, id: &JobId) -> Result<JobListing, PostingError> {
        let listing = self.jobs.fetch(id)?.ok_or(PostingError::NotFound)?;
        if &listing.employer_id != employer {
            return Err(PostingError::Forbidden);
        }
        Ok(listing)
    }
}

/// Error raised by the posting service.
#[derive(Debug, thiserror::Error)]
pub enum PostingError {
    #[error("sign in as an employer to manage listings")]
    Unauthenticated,
    #[error("{0}")]
    Invalid(#[from] PostingViolations),
    #[error("listing not found")]
    NotFound,
    #[error("listing belongs to another employer")]
    Forbidden,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
