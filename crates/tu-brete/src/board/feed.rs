use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{JobListing, ListingCardView};
use super::filter::{filter_listings, FilterCriteria};
use super::repository::{JobRepository, RepositoryError};

/// Upstream query returning the active listings, newest first.
pub trait ListingSource: Send + Sync {
    fn fetch_active(&self) -> Result<Vec<JobListing>, FeedError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("listing source unavailable: {0}")]
    Unavailable(String),
}

impl From<RepositoryError> for FeedError {
    fn from(value: RepositoryError) -> Self {
        Self::Unavailable(value.to_string())
    }
}

/// Reads the board straight from the job repository.
pub struct RepositorySource<J> {
    jobs: Arc<J>,
}

impl<J> RepositorySource<J> {
    pub fn new(jobs: Arc<J>) -> Self {
        Self { jobs }
    }
}

impl<J: JobRepository> ListingSource for RepositorySource<J> {
    fn fetch_active(&self) -> Result<Vec<JobListing>, FeedError> {
        Ok(self.jobs.active()?)
    }
}

/// Immutable copy of the active listings taken by a single fetch.
#[derive(Debug, Clone)]
pub struct ListingSnapshot {
    listings: Vec<JobListing>,
    fetched_at: DateTime<Utc>,
}

impl ListingSnapshot {
    pub fn new(listings: Vec<JobListing>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            listings,
            fetched_at,
        }
    }

    pub fn listings(&self) -> &[JobListing] {
        &self.listings
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&JobListing> {
        filter_listings(&self.listings, criteria)
    }
}

/// Result of a fetch: either a snapshot or a failure the page must show as such.
#[derive(Debug, Clone)]
pub enum LoadState {
    Loaded(ListingSnapshot),
    Failed { reason: String },
}

/// Loads snapshots from a listing source. A reload replaces the whole snapshot.
pub struct ListingFeed<S> {
    source: S,
}

impl<S: ListingSource> ListingFeed<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn load(&self, now: DateTime<Utc>) -> LoadState {
        match self.source.fetch_active() {
            Ok(listings) => {
                let listings: Vec<JobListing> = listings
                    .into_iter()
                    .filter(JobListing::is_active)
                    .collect();
                info!(count = listings.len(), "listing snapshot loaded");
                LoadState::Loaded(ListingSnapshot::new(listings, now))
            }
            Err(err) => {
                warn!(error = %err, "failed to load listing snapshot");
                LoadState::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}

/// What the browse page should render for a given load state and criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowseOutcome {
    Failed,
    NoListings,
    NoMatches,
    Results,
}

#[derive(Debug, Clone, Serialize)]
pub struct BrowseResult {
    pub outcome: BrowseOutcome,
    pub total: usize,
    pub matched: usize,
    pub active_filter_count: usize,
    pub listings: Vec<ListingCardView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoadState {
    pub fn browse(&self, criteria: &FilterCriteria) -> BrowseResult {
        let active_filter_count = criteria.active_filter_count();
        match self {
            LoadState::Failed { reason } => BrowseResult {
                outcome: BrowseOutcome::Failed,
                total: 0,
                matched: 0,
                active_filter_count,
                listings: Vec::new(),
                error: Some(reason.clone()),
            },
            LoadState::Loaded(snapshot) => {
                let matched: Vec<ListingCardView> = snapshot
                    .filter(criteria)
                    .into_iter()
                    .map(JobListing::card)
                    .collect();
                let outcome = if snapshot.is_empty() {
                    BrowseOutcome::NoListings
                } else if matched.is_empty() {
                    BrowseOutcome::NoMatches
                } else {
                    BrowseOutcome::Results
                };
                BrowseResult {
                    outcome,
                    total: snapshot.len(),
                    matched: matched.len(),
                    active_filter_count,
                    listings: matched,
                    error: None,
                }
            }
        }
    }
}
