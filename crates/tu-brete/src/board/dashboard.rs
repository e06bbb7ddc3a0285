use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::applications::Application;
use super::domain::{JobId, JobListing, ListingStatus, UserId};
use super::repository::{ApplicationRepository, JobRepository, RepositoryError};

/// Applications newer than this count as recent on the dashboard.
const RECENT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_jobs: usize,
    pub active_jobs: usize,
    pub total_applications: usize,
    pub recent_applications: usize,
}

impl DashboardStats {
    pub fn compute(jobs: &[JobListing], applications: &[Application], now: DateTime<Utc>) -> Self {
        let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
        Self {
            total_jobs: jobs.len(),
            active_jobs: jobs.iter().filter(|job| job.is_active()).count(),
            total_applications: applications.len(),
            recent_applications: applications
                .iter()
                .filter(|application| application.created_at > cutoff)
                .count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardJobRow {
    pub id: JobId,
    pub title: String,
    pub status: ListingStatus,
    pub status_label: &'static str,
    pub salary: String,
    pub applications: usize,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployerDashboard {
    pub stats: DashboardStats,
    pub jobs: Vec<DashboardJobRow>,
}

/// Stats plus one row per listing (newest first) for the employer's management view.
pub fn employer_dashboard<J, A>(
    jobs: &J,
    applications: &A,
    employer: &UserId,
    now: DateTime<Utc>,
) -> Result<EmployerDashboard, RepositoryError>
where
    J: JobRepository + ?Sized,
    A: ApplicationRepository + ?Sized,
{
    let listings = jobs.by_employer(employer)?;
    let job_ids: Vec<JobId> = listings.iter().map(|listing| listing.id.clone()).collect();
    let received = applications.for_jobs(&job_ids)?;

    let mut per_job: HashMap<&JobId, usize> = HashMap::new();
    for application in &received {
        *per_job.entry(&application.job_id).or_default() += 1;
    }

    let rows = listings
        .iter()
        .map(|listing| DashboardJobRow {
            id: listing.id.clone(),
            title: listing.title.clone(),
            status: listing.status,
            status_label: listing.status.label(),
            salary: listing.salary_display(),
            applications: per_job.get(&listing.id).copied().unwrap_or(0),
            created_at: listing.created_at,
            expires_at: listing.expires_at,
        })
        .collect();

    Ok(EmployerDashboard {
        stats: DashboardStats::compute(&listings, &received, now),
        jobs: rows,
    })
}
