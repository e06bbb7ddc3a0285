use serde::Deserialize;
use tracing::debug;

use super::super::domain::{ExperienceLevel, JobCategory, JobType, Vocabulary};
use super::criteria::{FilterCriteria, RemotePreference};

/// Sentinels the two historic browse pages used for "no filter selected".
const ANY_SENTINELS: [&str; 5] = ["", "all", "any", "todos", "todas"];

/// Raw criteria as they arrive from a query string or CLI flags.
///
/// Every field is kept as text so that malformed input degrades to "unset"
/// during `into_criteria` instead of rejecting the whole request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    #[serde(default, alias = "q")]
    pub search: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "experience")]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub remote: Option<String>,
    #[serde(default)]
    pub salary_min: Option<String>,
    #[serde(default)]
    pub salary_max: Option<String>,
}

impl FilterQuery {
    pub fn into_criteria(self) -> FilterCriteria {
        FilterCriteria {
            search_text: self.search.unwrap_or_default(),
            job_type: parse_choice::<JobType>("job_type", self.job_type.as_deref()),
            category: parse_choice::<JobCategory>("category", self.category.as_deref()),
            location: self.location.unwrap_or_default(),
            experience_level: parse_choice::<ExperienceLevel>(
                "experience_level",
                self.experience_level.as_deref(),
            ),
            remote: self
                .remote
                .as_deref()
                .map(RemotePreference::parse)
                .unwrap_or_default(),
            salary_min: parse_salary_bound("salary_min", self.salary_min.as_deref()),
            salary_max: parse_salary_bound("salary_max", self.salary_max.as_deref()),
        }
    }
}

impl From<FilterQuery> for FilterCriteria {
    fn from(query: FilterQuery) -> Self {
        query.into_criteria()
    }
}

fn is_any_sentinel(raw: &str) -> bool {
    let lowered = raw.trim().to_lowercase();
    ANY_SENTINELS.contains(&lowered.as_str())
}

fn parse_choice<T: Vocabulary>(field: &'static str, raw: Option<&str>) -> Option<T> {
    let raw = raw?;
    if is_any_sentinel(raw) {
        return None;
    }
    let parsed = T::parse(raw);
    if parsed.is_none() {
        debug!(field, value = raw, "ignoring unrecognised filter value");
    }
    parsed
}

/// Non-numeric or negative bounds are treated as unset, never as zero.
pub(crate) fn parse_salary_bound(field: &'static str, raw: Option<&str>) -> Option<u64> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<u64>() {
        Ok(value) => Some(value),
        Err(_) => {
            debug!(field, value = trimmed, "ignoring non-numeric salary bound");
            None
        }
    }
}
