use super::common::*;
use std::sync::Arc;

use chrono::Duration;

use crate::board::domain::{JobId, ListingStatus, SalaryCurrency};
use crate::board::postings::{
    JobDraft, PostingError, PostingGuard, PostingService, PostingViolation,
};
use crate::board::repository::JobRepository;
use crate::board::session::SessionContext;

fn service() -> (PostingService<MemoryJobs>, Arc<MemoryJobs>) {
    let jobs = Arc::new(MemoryJobs::default());
    (
        PostingService::new(jobs.clone(), PostingGuard::default()),
        jobs,
    )
}

fn company_session() -> SessionContext {
    SessionContext::new(
        Some(employer()),
        Some(profile(&employer(), "Soda La Esquina")),
    )
}

#[test]
fn publishing_applies_defaults() {
    let (service, jobs) = service();
    let listing = service
        .create(&company_session(), draft(), now())
        .expect("draft is valid");

    assert_eq!(listing.employer_id, employer());
    assert_eq!(listing.company_name.as_deref(), Some("Soda La Esquina"));
    assert_eq!(listing.location.as_deref(), Some("San Mateo"));
    assert_eq!(listing.status, ListingStatus::Active);
    assert_eq!(listing.salary_currency, SalaryCurrency::Crc);
    assert_eq!(listing.expires_at, Some(now() + Duration::days(30)));
    assert_eq!(listing.salary_display(), "₡350,000 - ₡450,000");

    let stored = jobs.fetch(&listing.id).expect("fetch").expect("stored");
    assert_eq!(stored, listing);
}

#[test]
fn users_without_profile_publish_as_empresa() {
    let (service, _) = service();
    let session = SessionContext::new(Some(employer()), None);
    let listing = service.create(&session, draft(), now()).expect("valid");
    assert_eq!(listing.company_name.as_deref(), Some("Empresa"));
}

#[test]
fn anonymous_sessions_cannot_publish() {
    let (service, _) = service();
    let err = service
        .create(&SessionContext::anonymous(), draft(), now())
        .expect_err("anonymous rejected");
    assert!(matches!(err, PostingError::Unauthenticated));
}

#[test]
fn validation_reports_every_problem_in_form_order() {
    let (service, jobs) = service();
    let bad = JobDraft {
        title: "   ".to_string(),
        salary_min: Some(500_000),
        salary_max: Some(400_000),
        expires_at: Some(now() - Duration::days(1)),
        ..JobDraft::default()
    };

    let PostingError::Invalid(violations) = service
        .create(&company_session(), bad, now())
        .expect_err("draft invalid")
    else {
        panic!("expected validation failure");
    };

    assert_eq!(
        violations.0,
        vec![
            PostingViolation::MissingTitle,
            PostingViolation::MissingDescription,
            PostingViolation::MissingJobType,
            PostingViolation::MissingCategory,
            PostingViolation::MissingExperienceLevel,
            PostingViolation::SalaryRangeInverted {
                min: 500_000,
                max: 400_000
            },
            PostingViolation::ExpiryNotInFuture,
        ]
    );
    assert!(violations.to_string().contains("El título es requerido"));
    assert!(jobs.active().expect("active").is_empty());
}

#[test]
fn equal_salary_bounds_are_rejected() {
    let guard = PostingGuard::default();
    let violations = guard
        .validate(
            JobDraft {
                salary_min: Some(400_000),
                salary_max: Some(400_000),
                ..draft()
            },
            now(),
        )
        .expect_err("min must be below max");
    assert!(violations.contains(&PostingViolation::SalaryRangeInverted {
        min: 400_000,
        max: 400_000
    }));
}

#[test]
fn configured_ttl_sets_default_expiry() {
    let guard = PostingGuard::with_ttl_days(45);
    assert_eq!(guard.default_expiry(now()), now() + Duration::days(45));
    assert_eq!(PostingGuard::with_ttl_days(0).ttl(), Duration::days(30));
}

#[test]
fn editing_keeps_identity_and_creation_time() {
    let (service, _) = service();
    let original = service
        .create(&company_session(), draft(), now())
        .expect("valid");

    let later = now() + Duration::hours(3);
    let edited = service
        .update(
            &employer(),
            &original.id,
            JobDraft {
                title: "Cocinero principal".to_string(),
                location: Some("Jesús María".to_string()),
                status: Some(ListingStatus::Paused),
                ..draft()
            },
            later,
        )
        .expect("owner may edit");

    assert_eq!(edited.id, original.id);
    assert_eq!(edited.created_at, original.created_at);
    assert_eq!(edited.company_name, original.company_name);
    assert_eq!(edited.expires_at, original.expires_at);
    assert_eq!(edited.updated_at, Some(later));
    assert_eq!(edited.title, "Cocinero principal");
    assert_eq!(edited.status, ListingStatus::Paused);
}

#[test]
fn other_employers_cannot_touch_a_listing() {
    let (service, jobs) = service();
    let listing = service
        .create(&company_session(), draft(), now())
        .expect("valid");

    assert!(matches!(
        service.update(&rival(), &listing.id, draft(), now()),
        Err(PostingError::Forbidden)
    ));
    assert!(matches!(
        service.set_status(&rival(), &listing.id, ListingStatus::Closed, now()),
        Err(PostingError::Forbidden)
    ));
    assert!(matches!(
        service.delete(&rival(), &listing.id),
        Err(PostingError::Forbidden)
    ));
    assert!(jobs.fetch(&listing.id).expect("fetch").is_some());
}

#[test]
fn paused_listings_leave_the_public_board() {
    let (service, _) = service();
    let listing = service
        .create(&company_session(), draft(), now())
        .expect("valid");
    assert!(service.get_active(&listing.id).is_ok());

    service
        .set_status(&employer(), &listing.id, ListingStatus::Paused, now())
        .expect("owner may pause");
    assert!(matches!(
        service.get_active(&listing.id),
        Err(PostingError::NotFound)
    ));
    assert_eq!(
        service
            .list_for_employer(&employer())
            .expect("list")
            .len(),
        1,
        "paused listings stay on the management view"
    );
}

#[test]
fn deleting_removes_the_listing() {
    let (service, _) = service();
    let listing = service
        .create(&company_session(), draft(), now())
        .expect("valid");
    service
        .delete(&employer(), &listing.id)
        .expect("owner may delete");
    assert!(matches!(
        service.delete(&employer(), &listing.id),
        Err(PostingError::NotFound)
    ));
    assert!(matches!(
        service.get_active(&JobId("job-missing".to_string())),
        Err(PostingError::NotFound)
    ));
}

#[test]
fn repository_outages_propagate() {
    let service = PostingService::new(Arc::new(UnavailableJobs), PostingGuard::default());
    assert!(matches!(
        service.create(&company_session(), draft(), now()),
        Err(PostingError::Repository(_))
    ));
}

#[test]
fn publishing_skips_ids_held_by_imported_rows() {
    let imported: Vec<_> = (1..=300)
        .map(|n| listing(&format!("job-{n:06}"), "Importado"))
        .collect();
    let jobs = Arc::new(MemoryJobs::seeded(imported));
    let service = PostingService::new(jobs.clone(), PostingGuard::default());

    for _ in 0..5 {
        let published = service
            .create(&company_session(), draft(), now())
            .expect("a free id is drawn");
        let stored = jobs.fetch(&published.id).expect("fetch").expect("stored");
        assert_eq!(stored.employer_id, employer());
    }
    assert_eq!(jobs.listings.lock().expect("jobs mutex").len(), 305);
}
