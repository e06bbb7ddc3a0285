use serde::Serialize;

use super::super::domain::{ExperienceLevel, JobCategory, JobListing, JobType};

/// Tri-state remote preference chosen on the browse page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemotePreference {
    #[default]
    Any,
    Remote,
    OnSite,
}

impl RemotePreference {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "remote" | "remoto" | "true" => Self::Remote,
            "on-site" | "onsite" | "presencial" | "false" => Self::OnSite,
            _ => Self::Any,
        }
    }

    fn admits(self, is_remote: bool) -> bool {
        match self {
            Self::Any => true,
            Self::Remote => is_remote,
            Self::OnSite => !is_remote,
        }
    }
}

/// User-selected constraints narrowing the listing snapshot.
///
/// `FilterCriteria::default()` carries no constraint and is what the "clear
/// filters" action resets to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FilterCriteria {
    pub search_text: String,
    pub job_type: Option<JobType>,
    pub category: Option<JobCategory>,
    pub location: String,
    pub experience_level: Option<ExperienceLevel>,
    pub remote: RemotePreference,
    pub salary_min: Option<u64>,
    pub salary_max: Option<u64>,
}

impl FilterCriteria {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_unconstrained(&self) -> bool {
        self.active_filter_count() == 0
    }

    /// Number of criteria deviating from their default value.
    ///
    /// Counts exactly the predicates `matches` evaluates, so a whitespace-only
    /// search never shows up in the badge.
    pub fn active_filter_count(&self) -> usize {
        [
            self.search_needle().is_some(),
            self.job_type.is_some(),
            self.category.is_some(),
            self.location_needle().is_some(),
            self.experience_level.is_some(),
            self.remote != RemotePreference::Any,
            self.salary_min.is_some(),
            self.salary_max.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Conjunction of every active predicate for a single listing.
    pub fn matches(&self, listing: &JobListing) -> bool {
        self.matches_search(listing)
            && self.job_type.map_or(true, |wanted| listing.job_type == Some(wanted))
            && self.category.map_or(true, |wanted| listing.category == Some(wanted))
            && self.matches_location(listing)
            && self
                .experience_level
                .map_or(true, |wanted| listing.experience_level == Some(wanted))
            && self.remote.admits(listing.is_remote)
            && self.matches_salary(listing)
    }

    pub(crate) fn search_needle(&self) -> Option<String> {
        lowered_needle(&self.search_text)
    }

    pub(crate) fn location_needle(&self) -> Option<String> {
        lowered_needle(&self.location)
    }

    // Absent title/description/company fields never match.
    fn matches_search(&self, listing: &JobListing) -> bool {
        let Some(needle) = self.search_needle() else {
            return true;
        };

        contains_lowered(Some(&listing.title), &needle)
            || contains_lowered(listing.description.as_ref(), &needle)
            || contains_lowered(listing.company_name.as_ref(), &needle)
    }

    fn matches_location(&self, listing: &JobListing) -> bool {
        match self.location_needle() {
            Some(needle) => contains_lowered(listing.location.as_ref(), &needle),
            None => true,
        }
    }

    // Undisclosed salaries never satisfy a requested bound.
    fn matches_salary(&self, listing: &JobListing) -> bool {
        let above_min = match self.salary_min {
            Some(bound) => listing.salary_min.is_some_and(|offered| offered >= bound),
            None => true,
        };
        let below_max = match self.salary_max {
            Some(bound) => listing.salary_max.is_some_and(|offered| offered <= bound),
            None => true,
        };
        above_min && below_max
    }
}

fn lowered_needle(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

fn contains_lowered(haystack: Option<&String>, needle: &str) -> bool {
    haystack.is_some_and(|value| value.to_lowercase().contains(needle))
}
