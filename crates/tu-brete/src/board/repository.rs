//! Storage abstractions over the hosted `jobs`, `applications` and `profiles`
//! tables so services can be exercised in isolation.

use super::applications::{Application, ApplicationId};
use super::domain::{JobId, JobListing, UserId};
use super::session::CompanyProfile;

pub trait JobRepository: Send + Sync {
    fn insert(&self, listing: JobListing) -> Result<JobListing, RepositoryError>;
    fn update(&self, listing: JobListing) -> Result<(), RepositoryError>;
    fn delete(&self, id: &JobId) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &JobId) -> Result<Option<JobListing>, RepositoryError>;
    /// Every listing owned by the employer, newest first.
    fn by_employer(&self, employer: &UserId) -> Result<Vec<JobListing>, RepositoryError>;
    /// Listings with `active` status, newest first.
    fn active(&self) -> Result<Vec<JobListing>, RepositoryError>;
}

pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn update(&self, application: Application) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    /// Applications on any of the given jobs, newest first.
    fn for_jobs(&self, jobs: &[JobId]) -> Result<Vec<Application>, RepositoryError>;
}

pub trait ProfileRepository: Send + Sync {
    fn fetch(&self, id: &UserId) -> Result<Option<CompanyProfile>, RepositoryError>;
    fn upsert(&self, profile: CompanyProfile) -> Result<CompanyProfile, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
