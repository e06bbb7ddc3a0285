use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::board::applications::{Application, ApplicationId};
use crate::board::domain::{
    ExperienceLevel, JobCategory, JobId, JobListing, JobType, ListingStatus, SalaryCurrency,
    UserId,
};
use crate::board::postings::{JobDraft, PostingGuard};
use crate::board::repository::{
    ApplicationRepository, JobRepository, ProfileRepository, RepositoryError,
};
use crate::board::router::{board_router, BoardState};
use crate::board::session::CompanyProfile;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn employer() -> UserId {
    UserId("emp-soda".to_string())
}

pub(super) fn rival() -> UserId {
    UserId("emp-hotel".to_string())
}

/// Active listing with every optional field unset.
pub(super) fn listing(id: &str, title: &str) -> JobListing {
    JobListing {
        id: JobId(id.to_string()),
        employer_id: employer(),
        title: title.to_string(),
        description: None,
        company_name: None,
        job_type: None,
        category: None,
        location: None,
        experience_level: None,
        is_remote: false,
        salary_min: None,
        salary_max: None,
        salary_currency: SalaryCurrency::Crc,
        requirements: None,
        benefits: None,
        contact_email: None,
        contact_phone: None,
        status: ListingStatus::Active,
        created_at: now(),
        updated_at: None,
        expires_at: None,
    }
}

/// A small San Mateo board covering every filterable field.
pub(super) fn board() -> Vec<JobListing> {
    vec![
        JobListing {
            description: Some("Preparar casados y gallos para el almuerzo".to_string()),
            company_name: Some("Soda La Esquina".to_string()),
            job_type: Some(JobType::FullTime),
            category: Some(JobCategory::Gastronomia),
            location: Some("San Mateo Centro".to_string()),
            experience_level: Some(ExperienceLevel::Mid),
            salary_min: Some(350_000),
            salary_max: Some(450_000),
            ..listing("job-1", "Cocinero de línea")
        },
        JobListing {
            description: Some("Atención de mesas los fines de semana".to_string()),
            company_name: Some("Restaurante El Mirador".to_string()),
            job_type: Some(JobType::PartTime),
            category: Some(JobCategory::Gastronomia),
            location: Some("Labrador".to_string()),
            experience_level: Some(ExperienceLevel::Entry),
            salary_min: Some(300_000),
            salary_max: Some(320_000),
            ..listing("job-2", "Mesero")
        },
        JobListing {
            description: Some("Guiar grupos por la ruta del café".to_string()),
            company_name: Some("Tours Orotina".to_string()),
            job_type: Some(JobType::FullTime),
            category: Some(JobCategory::Turismo),
            location: Some("Desmonte".to_string()),
            experience_level: Some(ExperienceLevel::Senior),
            ..listing("job-3", "Guía turístico")
        },
        JobListing {
            company_name: Some("Agencia Pacífico".to_string()),
            job_type: Some(JobType::Freelance),
            category: Some(JobCategory::Tecnologia),
            is_remote: true,
            salary_min: Some(800_000),
            salary_max: Some(1_200_000),
            salary_currency: SalaryCurrency::Crc,
            ..listing("job-4", "Desarrollador web")
        },
    ]
}

pub(super) fn draft() -> JobDraft {
    JobDraft {
        title: "Cocinero".to_string(),
        description: "Cocina típica para almuerzos".to_string(),
        job_type: Some(JobType::FullTime),
        category: Some(JobCategory::Gastronomia),
        experience_level: Some(ExperienceLevel::Mid),
        salary_min: Some(350_000),
        salary_max: Some(450_000),
        ..JobDraft::default()
    }
}

pub(super) fn profile(id: &UserId, company_name: &str) -> CompanyProfile {
    CompanyProfile {
        id: id.clone(),
        company_name: company_name.to_string(),
        website: None,
        updated_at: now() - Duration::days(10),
    }
}

pub(super) fn application(id: &str, job: &JobId, created_at: DateTime<Utc>) -> Application {
    Application {
        id: ApplicationId(id.to_string()),
        job_id: job.clone(),
        applicant_name: "María Rojas".to_string(),
        applicant_phone: "8888-0000".to_string(),
        applicant_message: None,
        status: Default::default(),
        created_at,
        updated_at: None,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryJobs {
    pub(super) listings: Arc<Mutex<HashMap<JobId, JobListing>>>,
}

impl MemoryJobs {
    pub(super) fn seeded(listings: Vec<JobListing>) -> Self {
        let store = Self::default();
        {
            let mut guard = store.listings.lock().expect("jobs mutex poisoned");
            for listing in listings {
                guard.insert(listing.id.clone(), listing);
            }
        }
        store
    }

    fn sorted<F>(&self, keep: F) -> Vec<JobListing>
    where
        F: Fn(&JobListing) -> bool,
    {
        let guard = self.listings.lock().expect("jobs mutex poisoned");
        let mut listings: Vec<JobListing> =
            guard.values().filter(|listing| keep(listing)).cloned().collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        listings
    }
}

impl JobRepository for MemoryJobs {
    fn insert(&self, listing: JobListing) -> Result<JobListing, RepositoryError> {
        let mut guard = self.listings.lock().expect("jobs mutex poisoned");
        if guard.contains_key(&listing.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(listing.id.clone(), listing.clone());
        Ok(listing)
    }

    fn update(&self, listing: JobListing) -> Result<(), RepositoryError> {
        let mut guard = self.listings.lock().expect("jobs mutex poisoned");
        guard.insert(listing.id.clone(), listing);
        Ok(())
    }

    fn delete(&self, id: &JobId) -> Result<(), RepositoryError> {
        let mut guard = self.listings.lock().expect("jobs mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn fetch(&self, id: &JobId) -> Result<Option<JobListing>, RepositoryError> {
        let guard = self.listings.lock().expect("jobs mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn by_employer(&self, employer: &UserId) -> Result<Vec<JobListing>, RepositoryError> {
        Ok(self.sorted(|listing| &listing.employer_id == employer))
    }

    fn active(&self) -> Result<Vec<JobListing>, RepositoryError> {
        Ok(self.sorted(JobListing::is_active))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryApplications {
    pub(super) records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl ApplicationRepository for MemoryApplications {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("applications mutex poisoned");
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, application: Application) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("applications mutex poisoned");
        guard.insert(application.id.clone(), application);
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("applications mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_jobs(&self, jobs: &[JobId]) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("applications mutex poisoned");
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
pub(super) struct MemoryProfiles {
    pub(super) profiles: Arc<Mutex<HashMap<UserId, CompanyProfile>>>,
}

impl MemoryProfiles {
    pub(super) fn with(profiles: Vec<CompanyProfile>) -> Self {
        let store = Self::default();
        {
            let mut guard = store.profiles.lock().expect("profiles mutex poisoned");
            for profile in profiles {
                guard.insert(profile.id.clone(), profile);
            }
        }
        store
    }
}

impl ProfileRepository for MemoryProfiles {
    fn fetch(&self, id: &UserId) -> Result<Option<CompanyProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("profiles mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn upsert(&self, profile: CompanyProfile) -> Result<CompanyProfile, RepositoryError> {
        let mut guard = self.profiles.lock().expect("profiles mutex poisoned");
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }
}

/// Job store whose every call fails, as when the hosted database is down.
#[derive(Default, Clone, Copy)]
pub(super) struct UnavailableJobs;

impl JobRepository for UnavailableJobs {
    fn insert(&self, _listing: JobListing) -> Result<JobListing, RepositoryError> {
        Err(unavailable())
    }

    fn update(&self, _listing: JobListing) -> Result<(), RepositoryError> {
        Err(unavailable())
    }

    fn delete(&self, _id: &JobId) -> Result<(), RepositoryError> {
        Err(unavailable())
    }

    fn fetch(&self, _id: &JobId) -> Result<Option<JobListing>, RepositoryError> {
        Err(unavailable())
    }

    fn by_employer(&self, _employer: &UserId) -> Result<Vec<JobListing>, RepositoryError> {
        Err(unavailable())
    }

    fn active(&self) -> Result<Vec<JobListing>, RepositoryError> {
        Err(unavailable())
    }
}

fn unavailable() -> RepositoryError {
    RepositoryError::Unavailable("connection refused".to_string())
}

pub(super) struct Harness {
    pub(super) jobs: Arc<MemoryJobs>,
    pub(super) applications: Arc<MemoryApplications>,
    pub(super) profiles: Arc<MemoryProfiles>,
    pub(super) state: BoardState<MemoryJobs, MemoryApplications, MemoryProfiles>,
}

pub(super) fn harness(listings: Vec<JobListing>, profiles: Vec<CompanyProfile>) -> Harness {
    let jobs = Arc::new(MemoryJobs::seeded(listings));
    let applications = Arc::new(MemoryApplications::default());
    let profiles = Arc::new(MemoryProfiles::with(profiles));
    let state = BoardState::new(
        jobs.clone(),
        applications.clone(),
        profiles.clone(),
        PostingGuard::default(),
    );
    Harness {
        jobs,
        applications,
        profiles,
        state,
    }
}

impl Harness {
    pub(super) fn router(&self) -> axum::Router {
        board_router(self.state.clone())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn titles(listings: &[&JobListing]) -> Vec<String> {
    listings.iter().map(|listing| listing.title.clone()).collect()
}
