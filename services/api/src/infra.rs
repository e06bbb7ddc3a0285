use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tu_brete::board::applications::{Application, ApplicationId};
use tu_brete::board::import::{ListingImportError, ListingImporter};
use tu_brete::board::{
    ApplicationRepository, CompanyProfile, JobId, JobListing, JobRepository, ProfileRepository,
    RepositoryError, UserId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
}

fn newest_first(listings: &mut [JobListing]) {
    listings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryJobRepository {
    listings: Arc<Mutex<HashMap<JobId, JobListing>>>,
}

impl InMemoryJobRepository {
    pub(crate) fn seeded(listings: Vec<JobListing>) -> Self {
        let map = listings
            .into_iter()
            .map(|listing| (listing.id.clone(), listing))
            .collect();
        Self {
            listings: Arc::new(Mutex::new(map)),
        }
    }

    pub(crate) fn from_csv(path: &Path) -> Result<Self, ListingImportError> {
        Ok(Self::seeded(ListingImporter::from_path(path)?))
    }

    fn collect<F>(&self, keep: F) -> Result<Vec<JobListing>, RepositoryError>
    where
        F: Fn(&JobListing) -> bool,
    {
        let guard = lock(&self.listings)?;
        let mut listings: Vec<JobListing> =
            guard.values().filter(|listing| keep(listing)).cloned().collect();
        newest_first(&mut listings);
        Ok(listings)
    }
}

impl JobRepository for InMemoryJobRepository {
    fn insert(&self, listing: JobListing) -> Result<JobListing, RepositoryError> {
        let mut guard = lock(&self.listings)?;
        if guard.contains_key(&listing.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(listing.id.clone(), listing.clone());
        Ok(listing)
    }

    fn update(&self, listing: JobListing) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.listings)?;
        if guard.contains_key(&listing.id) {
            guard.insert(listing.id.clone(), listing);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn delete(&self, id: &JobId) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.listings)?;
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn fetch(&self, id: &JobId) -> Result<Option<JobListing>, RepositoryError> {
        let guard = lock(&self.listings)?;
        Ok(guard.get(id).cloned())
    }

    fn by_employer(&self, employer: &UserId) -> Result<Vec<JobListing>, RepositoryError> {
        self.collect(|listing| &listing.employer_id == employer)
    }

    fn active(&self) -> Result<Vec<JobListing>, RepositoryError> {
        self.collect(JobListing::is_active)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, application: Application) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&application.id) {
            guard.insert(application.id.clone(), application);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard.get(id).cloned())
    }

    fn for_jobs(&self, jobs: &[JobId]) -> Result<Vec<Application>, RepositoryError> {
        let guard = lock(&self.records)?;
        let mut matching: Vec<Application> = guard
            .values()
            .filter(|application| jobs.contains(&application.job_id))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(matching)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    profiles: Arc<Mutex<HashMap<UserId, CompanyProfile>>>,
}

impl ProfileRepository for InMemoryProfileRepository {
    fn fetch(&self, id: &UserId) -> Result<Option<CompanyProfile>, RepositoryError> {
        let guard = lock(&self.profiles)?;
        Ok(guard.get(id).cloned())
    }

    fn upsert(&self, profile: CompanyProfile) -> Result<CompanyProfile, RepositoryError> {
        let mut guard = lock(&self.profiles)?;
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn listing(id: &str, day: u32) -> JobListing {
        JobListing {
            id: JobId(id.to_string()),
            employer_id: UserId("emp-1".to_string()),
            title: format!("Puesto {id}"),
            description: None,
            company_name: None,
            job_type: None,
            category: None,
            location: None,
            experience_level: None,
            is_remote: false,
            salary_min: None,
            salary_max: None,
            salary_currency: Default::default(),
            requirements: None,
            benefits: None,
            contact_email: None,
            contact_phone: None,
            status: Default::default(),
            created_at: Utc
                .with_ymd_and_hms(2025, 9, day, 8, 0, 0)
                .single()
                .expect("valid timestamp"),
            updated_at: None,
            expires_at: None,
        }
    }

    #[test]
    fn active_listings_come_back_newest_first() {
        let repository =
            InMemoryJobRepository::seeded(vec![listing("job-a", 1), listing("job-b", 3)]);
        let ids: Vec<String> = repository
            .active()
            .expect("active")
            .into_iter()
            .map(|listing| listing.id.0)
            .collect();
        assert_eq!(ids, vec!["job-b", "job-a"]);
    }

    #[test]
    fn updating_a_missing_listing_is_not_found() {
        let repository = InMemoryJobRepository::default();
        assert!(matches!(
            repository.update(listing("job-x", 1)),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn seeds_from_the_bundled_export() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/listings.csv");
        let repository = InMemoryJobRepository::from_csv(&path).expect("sample export loads");
        assert_eq!(repository.active().expect("active").len(), 5);
    }
}
