use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::domain::{JobId, JobListing, Vocabulary};

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Review state an employer moves an application through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Contacted,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub const fn ordered() -> [Self; 4] {
        [Self::Pending, Self::Contacted, Self::Rejected, Self::Hired]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pendiente",
            Self::Contacted => "Contactado",
            Self::Rejected => "Rechazado",
            Self::Hired => "Contratado",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "pending" | "pendiente" => Some(Self::Pending),
            "contacted" | "contactado" => Some(Self::Contacted),
            "rejected" | "rechazado" => Some(Self::Rejected),
            "hired" | "contratado" => Some(Self::Hired),
            _ => None,
        }
    }

    /// pending -> contacted -> hired, and rejection from either open state.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Contacted)
                | (Self::Contacted, Self::Hired)
                | (Self::Pending, Self::Rejected)
                | (Self::Contacted, Self::Rejected)
        )
    }
}

/// Row of the `applications` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub applicant_name: String,
    pub applicant_phone: String,
    #[serde(default)]
    pub applicant_message: Option<String>,
    /// Rows written before statuses existed have none; they read as pending.
    #[serde(default)]
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// What an anonymous job seeker sends from the application form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSubmission {
    #[serde(default)]
    pub applicant_name: String,
    #[serde(default)]
    pub applicant_phone: String,
    #[serde(default)]
    pub applicant_message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub id: JobId,
    pub title: String,
    pub job_type_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub salary: String,
}

impl From<&JobListing> for JobSummary {
    fn from(listing: &JobListing) -> Self {
        Self {
            id: listing.id.clone(),
            title: listing.title.clone(),
            job_type_label: listing
                .job_type
                .map(Vocabulary::label)
                .unwrap_or("No especificado"),
            location: listing.location.clone(),
            salary: listing.salary_display(),
        }
    }
}

/// Application joined with the job it targets, as listed to employers.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub id: ApplicationId,
    pub job: JobSummary,
    pub applicant_name: String,
    pub applicant_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant_message: Option<String>,
    pub status: ApplicationStatus,
    pub status_label: &'static str,
    pub created_at: DateTime<Utc>,
}

/// Per-status counts shown on the review tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationTally {
    pub all: usize,
    pub pending: usize,
    pub contacted: usize,
    pub rejected: usize,
    pub hired: usize,
}

impl ApplicationTally {
    pub fn from_applications<'a, I>(applications: I) -> Self
    where
        I: IntoIterator<Item = &'a Application>,
    {
        let mut tally = Self::default();
        for application in applications {
            tally.all += 1;
            match application.status {
                ApplicationStatus::Pending => tally.pending += 1,
                ApplicationStatus::Contacted => tally.contacted += 1,
                ApplicationStatus::Rejected => tally.rejected += 1,
                ApplicationStatus::Hired => tally.hired += 1,
            }
        }
        tally
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployerApplications {
    pub tally: ApplicationTally,
    pub applications: Vec<ApplicationView>,
}
