use crate::infra::{
    InMemoryApplicationRepository, InMemoryJobRepository, InMemoryProfileRepository,
};
use chrono::{Duration, Utc};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tu_brete::board::applications::{ApplicationService, ApplicationStatus, ApplicationSubmission};
use tu_brete::board::import::ListingImporter;
use tu_brete::board::postings::{JobDraft, PostingGuard, PostingService};
use tu_brete::board::session::{upsert_profile, ProfileUpdate};
use tu_brete::board::{
    employer_dashboard, BrowseOutcome, BrowseResult, ExperienceLevel, FilterCriteria, FilterQuery,
    JobCategory, JobType, ListingFeed, ListingSnapshot, LoadState, RepositorySource,
    SessionContext, UserId,
};
use tu_brete::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct ListingSearchArgs {
    /// CSV export of the jobs table
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Free-text search over title, description and company
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Job type code or label (e.g. full-time, "Medio Tiempo")
    #[arg(long)]
    pub(crate) job_type: Option<String>,
    /// Category code or label (e.g. turismo, Gastronomía)
    #[arg(long)]
    pub(crate) category: Option<String>,
    /// Substring of the listing location
    #[arg(long)]
    pub(crate) location: Option<String>,
    /// Experience level code or label
    #[arg(long)]
    pub(crate) experience: Option<String>,
    /// remote, on-site or any
    #[arg(long)]
    pub(crate) remote: Option<String>,
    /// Lowest acceptable advertised minimum salary
    #[arg(long)]
    pub(crate) salary_min: Option<String>,
    /// Highest acceptable advertised maximum salary
    #[arg(long)]
    pub(crate) salary_max: Option<String>,
    /// Print the browse result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl ListingSearchArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterQuery {
            search: self.search.clone(),
            job_type: self.job_type.clone(),
            category: self.category.clone(),
            location: self.location.clone(),
            experience_level: self.experience.clone(),
            remote: self.remote.clone(),
            salary_min: self.salary_min.clone(),
            salary_max: self.salary_max.clone(),
        }
        .into_criteria()
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional listing export to browse instead of the built-in sample board
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Skip the application review portion of the demo
    #[arg(long)]
    pub(crate) skip_applications: bool,
}

pub(crate) fn run_listing_search(args: ListingSearchArgs) -> Result<(), AppError> {
    let criteria = args.criteria();
    let result = search_export(&args.csv, &criteria)?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&result).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        render_browse(&result);
    }
    Ok(())
}

fn search_export(
    path: &std::path::Path,
    criteria: &FilterCriteria,
) -> Result<BrowseResult, AppError> {
    let mut listings: Vec<_> = ListingImporter::from_path(path)?
        .into_iter()
        .filter(|listing| listing.is_active())
        .collect();
    listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let snapshot = ListingSnapshot::new(listings, Utc::now());
    Ok(LoadState::Loaded(snapshot).browse(criteria))
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let now = Utc::now();
    println!("Tu Brete San Mateo demo");

    let jobs = Arc::new(match &args.csv {
        Some(path) => InMemoryJobRepository::from_csv(path)?,
        None => InMemoryJobRepository::default(),
    });
    let applications = Arc::new(InMemoryApplicationRepository::default());
    let profiles = Arc::new(InMemoryProfileRepository::default());
    let postings = PostingService::new(jobs.clone(), PostingGuard::default());
    let intake = ApplicationService::new(applications.clone(), jobs.clone());

    let soda = UserId("demo-soda".to_string());
    let tours = UserId("demo-tours".to_string());
    for (employer, name) in [(&soda, "Soda La Esquina"), (&tours, "Tours Orotina")] {
        upsert_profile(
            profiles.as_ref(),
            employer,
            ProfileUpdate {
                company_name: name.to_string(),
                website: None,
            },
            now,
        )?;
    }

    if args.csv.is_none() {
        for (employer, draft) in sample_drafts(&soda, &tours) {
            let session = SessionContext::resolve(profiles.as_ref(), Some(employer.clone()))?;
            match postings.create(&session, draft, now) {
                Ok(listing) => println!("  published {} ({})", listing.title, listing.id.0),
                Err(err) => println!("  rejected draft: {err}"),
            }
        }
    }

    let feed = ListingFeed::new(RepositorySource::new(jobs.clone()));
    let state = feed.load(now);
    let searches: [(&str, FilterQuery); 3] = [
        ("all listings", FilterQuery::default()),
        (
            "turismo, remote only",
            FilterQuery {
                category: Some("Turismo".to_string()),
                remote: Some("remote".to_string()),
                ..FilterQuery::default()
            },
        ),
        (
            "salary from ₡300,000",
            FilterQuery {
                salary_min: Some("300000".to_string()),
                ..FilterQuery::default()
            },
        ),
    ];
    for (label, query) in searches {
        println!("\nBrowse: {label}");
        render_browse(&state.browse(&query.into_criteria()));
    }

    if args.skip_applications {
        return Ok(());
    }

    let LoadState::Loaded(snapshot) = &state else {
        return Ok(());
    };
    let Some(target) = snapshot.listings().first() else {
        return Ok(());
    };

    println!("\nApplying to {}", target.title);
    let submitted = intake
        .submit(
            &target.id,
            ApplicationSubmission {
                applicant_name: "María Rojas".to_string(),
                applicant_phone: "8888-0000".to_string(),
                applicant_message: Some("Tengo experiencia en cocina típica.".to_string()),
            },
            now,
        )?;
    println!("  application {} is {}", submitted.id.0, submitted.status.label());

    let owner = target.employer_id.clone();
    let contacted = intake
        .update_status(&owner, &submitted.id, ApplicationStatus::Contacted, now)?;
    println!("  employer moved it to {}", contacted.status.label());

    let dashboard = employer_dashboard(jobs.as_ref(), applications.as_ref(), &owner, now)?;
    println!(
        "\nDashboard for {}: {} listings ({} active), {} applications ({} this week)",
        owner.0,
        dashboard.stats.total_jobs,
        dashboard.stats.active_jobs,
        dashboard.stats.total_applications,
        dashboard.stats.recent_applications
    );
    for row in &dashboard.jobs {
        println!(
            "  - {} [{}] {} | {} applications",
            row.title, row.status_label, row.salary, row.applications
        );
    }

    Ok(())
}

fn sample_drafts(soda: &UserId, tours: &UserId) -> Vec<(UserId, JobDraft)> {
    let expiry = Some(Utc::now() + Duration::days(21));
    vec![
        (
            soda.clone(),
            JobDraft {
                title: "Cocinero de línea".to_string(),
                description: "Preparar casados y gallos para el almuerzo".to_string(),
                location: Some("San Mateo Centro".to_string()),
                job_type: Some(JobType::FullTime),
                category: Some(JobCategory::Gastronomia),
                experience_level: Some(ExperienceLevel::Mid),
                salary_min: Some(350_000),
                salary_max: Some(450_000),
                ..JobDraft::default()
            },
        ),
        (
            tours.clone(),
            JobDraft {
                title: "Guía turístico".to_string(),
                description: "Guiar grupos por la ruta del café".to_string(),
                location: Some("Desmonte".to_string()),
                job_type: Some(JobType::FullTime),
                category: Some(JobCategory::Turismo),
                experience_level: Some(ExperienceLevel::Senior),
                expires_at: expiry,
                ..JobDraft::default()
            },
        ),
        (
            tours.clone(),
            JobDraft {
                title: "Reservas en línea".to_string(),
                description: "Gestionar reservas y consultas por WhatsApp".to_string(),
                job_type: Some(JobType::PartTime),
                category: Some(JobCategory::Turismo),
                experience_level: Some(ExperienceLevel::Entry),
                is_remote: true,
                salary_min: Some(250_000),
                salary_max: Some(300_000),
                ..JobDraft::default()
            },
        ),
        (
            soda.clone(),
            JobDraft {
                title: "Salonero".to_string(),
                salary_min: Some(400_000),
                salary_max: Some(300_000),
                ..JobDraft::default()
            },
        ),
    ]
}

fn render_browse(result: &BrowseResult) {
    match result.outcome {
        BrowseOutcome::Failed => {
            println!(
                "  could not load listings: {}",
                result.error.as_deref().unwrap_or("unknown error")
            );
            return;
        }
        BrowseOutcome::NoListings => {
            println!("  no active listings yet");
            return;
        }
        BrowseOutcome::NoMatches => {
            println!(
                "  no listings match the {} active filter(s) out of {}",
                result.active_filter_count, result.total
            );
            return;
        }
        BrowseOutcome::Results => {}
    }

    println!(
        "  {} of {} listings ({} filter(s) active)",
        result.matched, result.total, result.active_filter_count
    );
    for card in &result.listings {
        let location = card.location.as_deref().unwrap_or("Sin ubicación");
        let remote = if card.is_remote { " · Remoto" } else { "" };
        println!(
            "  - {} | {} | {} | {}{} | {}",
            card.title, card.company_name, card.job_type_label, location, remote, card.salary
        );
    }
}
