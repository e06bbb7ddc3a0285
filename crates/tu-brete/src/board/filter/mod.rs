//! Client-facing job filter: a stable, side-effect free narrowing of the
//! active listing snapshot by the browse criteria.

mod criteria;
mod query;

pub use criteria::{FilterCriteria, RemotePreference};
pub use query::FilterQuery;
pub(crate) use query::parse_salary_bound;

use super::domain::JobListing;

/// Keep the listings satisfying every active criterion, in input order.
pub fn filter_listings<'a>(
    listings: &'a [JobListing],
    criteria: &FilterCriteria,
) -> Vec<&'a JobListing> {
    listings
        .iter()
        .filter(|listing| criteria.matches(listing))
        .collect()
}

/// Owned variant of [`filter_listings`] for callers holding a `Vec`.
pub fn filter_owned(listings: &[JobListing], criteria: &FilterCriteria) -> Vec<JobListing> {
    filter_listings(listings, criteria)
        .into_iter()
        .cloned()
        .collect()
}
