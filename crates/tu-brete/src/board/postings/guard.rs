use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use super::super::domain::{
    ExperienceLevel, JobCategory, JobType, ListingStatus, SalaryCurrency,
};

const DEFAULT_LOCATION: &str = "San Mateo";
const DEFAULT_TTL_DAYS: i64 = 30;

/// Employer-submitted listing fields, as sent by the posting wizard or the edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JobDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: Option<JobType>,
    #[serde(default)]
    pub category: Option<JobCategory>,
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default)]
    pub salary_min: Option<u64>,
    #[serde(default)]
    pub salary_max: Option<u64>,
    #[serde(default)]
    pub salary_currency: Option<SalaryCurrency>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub benefits: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub is_remote: bool,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<ListingStatus>,
}

/// A draft that passed validation, with defaults applied.
#[derive(Debug, Clone)]
pub struct ValidatedDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub job_type: JobType,
    pub category: JobCategory,
    pub experience_level: ExperienceLevel,
    pub salary_min: Option<u64>,
    pub salary_max: Option<u64>,
    pub salary_currency: SalaryCurrency,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub is_remote: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub status: Option<ListingStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostingViolation {
    #[error("El título es requerido")]
    MissingTitle,
    #[error("La descripción es requerida")]
    MissingDescription,
    #[error("El tipo de jornada es requerido")]
    MissingJobType,
    #[error("La categoría es requerida")]
    MissingCategory,
    #[error("El nivel de experiencia es requerido")]
    MissingExperienceLevel,
    #[error("El salario mínimo debe ser menor al máximo")]
    SalaryRangeInverted { min: u64, max: u64 },
    #[error("La fecha de vencimiento debe ser en el futuro")]
    ExpiryNotInFuture,
}

impl PostingViolation {
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingTitle => "title",
            Self::MissingDescription => "description",
            Self::MissingJobType => "job_type",
            Self::MissingCategory => "category",
            Self::MissingExperienceLevel => "experience_level",
            Self::SalaryRangeInverted { .. } => "salary",
            Self::ExpiryNotInFuture => "expires_at",
        }
    }
}

/// Every violation found in a draft, in form order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingViolations(pub Vec<PostingViolation>);

impl PostingViolations {
    pub fn contains(&self, violation: &PostingViolation) -> bool {
        self.0.contains(violation)
    }
}

impl fmt::Display for PostingViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for PostingViolations {}

/// Validation and defaulting rules for new and edited listings.
#[derive(Debug, Clone)]
pub struct PostingGuard {
    ttl: Duration,
}

impl Default for PostingGuard {
    fn default() -> Self {
        Self::with_ttl_days(DEFAULT_TTL_DAYS)
    }
}

impl PostingGuard {
    pub fn with_ttl_days(days: i64) -> Self {
        let days = if days > 0 { days } else { DEFAULT_TTL_DAYS };
        Self {
            ttl: Duration::days(days),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Expiry applied when the employer leaves the field blank.
    pub fn default_expiry(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + self.ttl
    }

    pub fn validate(
        &self,
        draft: JobDraft,
        now: DateTime<Utc>,
    ) -> Result<ValidatedDraft, PostingViolations> {
        let mut violations = Vec::new();

        let title = draft.title.trim().to_string();
        if title.is_empty() {
            violations.push(PostingViolation::MissingTitle);
        }
        let description = draft.description.trim().to_string();
        if description.is_empty() {
            violations.push(PostingViolation::MissingDescription);
        }
        if draft.job_type.is_none() {
            violations.push(PostingViolation::MissingJobType);
        }
        if draft.category.is_none() {
            violations.push(PostingViolation::MissingCategory);
        }
        if draft.experience_level.is_none() {
            violations.push(PostingViolation::MissingExperienceLevel);
        }
        if let (Some(min), Some(max)) = (draft.salary_min, draft.salary_max) {
            if min >= max {
                violations.push(PostingViolation::SalaryRangeInverted { min, max });
            }
        }
        if draft.expires_at.is_some_and(|expiry| expiry <= now) {
            violations.push(PostingViolation::ExpiryNotInFuture);
        }

        let (Some(job_type), Some(category), Some(experience_level)) =
            (draft.job_type, draft.category, draft.experience_level)
        else {
            return Err(PostingViolations(violations));
        };
        if !violations.is_empty() {
            return Err(PostingViolations(violations));
        }

        let location = draft
            .location
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

        Ok(ValidatedDraft {
            title,
            description,
            location,
            job_type,
            category,
            experience_level,
            salary_min: draft.salary_min,
            salary_max: draft.salary_max,
            salary_currency: draft.salary_currency.unwrap_or_default(),
            requirements: non_blank(draft.requirements),
            benefits: non_blank(draft.benefits),
            contact_email: non_blank(draft.contact_email),
            contact_phone: non_blank(draft.contact_phone),
            is_remote: draft.is_remote,
            expires_at: draft.expires_at,
            status: draft.status,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
