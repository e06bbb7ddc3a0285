//! Board domain: listings, the browse filter, employer postings and
//! applications, wired behind an HTTP router.

pub mod applications;
pub mod dashboard;
pub mod domain;
pub mod feed;
pub mod filter;
pub mod import;
pub mod postings;
pub mod repository;
pub mod router;
pub mod session;

#[cfg(test)]
mod tests;

pub use dashboard::{employer_dashboard, DashboardStats, EmployerDashboard};
pub use domain::{
    ExperienceLevel, JobCategory, JobId, JobListing, JobType, ListingCardView, ListingStatus,
    SalaryCurrency, UserId, Vocabulary,
};
pub use feed::{
    BrowseOutcome, BrowseResult, FeedError, ListingFeed, ListingSnapshot, ListingSource,
    LoadState, RepositorySource,
};
pub use filter::{filter_listings, filter_owned, FilterCriteria, FilterQuery, RemotePreference};
pub use import::{ListingImportError, ListingImporter};
pub use repository::{ApplicationRepository, JobRepository, ProfileRepository, RepositoryError};
pub use router::{board_router, BoardState, USER_ID_HEADER};
pub use session::{BrowseGate, CompanyProfile, ProfileUpdate, SessionContext};
