use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, patch, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::error::AppError;

use super::applications::{
    ApplicationId, ApplicationService, ApplicationServiceError, ApplicationStatus,
    ApplicationSubmission,
};
use super::dashboard::employer_dashboard;
use super::domain::{JobId, JobListing, ListingStatus, UserId};
use super::feed::{ListingFeed, RepositorySource};
use super::filter::FilterQuery;
use super::postings::{JobDraft, PostingError, PostingGuard, PostingService};
use super::repository::{ApplicationRepository, JobRepository, ProfileRepository, RepositoryError};
use super::session::{upsert_profile, BrowseGate, ProfileUpdate, SessionContext};

/// Header carrying the identity asserted by the upstream auth provider.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Shared handles for the board endpoints.
pub struct BoardState<J, A, P> {
    jobs: Arc<J>,
    applications: Arc<A>,
    profiles: Arc<P>,
    postings: Arc<PostingService<J>>,
    intake: Arc<ApplicationService<A, J>>,
}

impl<J, A, P> Clone for BoardState<J, A, P> {
    fn clone(&self) -> Self {
        Self {
            jobs: self.jobs.clone(),
            applications: self.applications.clone(),
            profiles: self.profiles.clone(),
            postings: self.postings.clone(),
            intake: self.intake.clone(),
        }
    }
}

impl<J, A, P> BoardState<J, A, P>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    pub fn new(jobs: Arc<J>, applications: Arc<A>, profiles: Arc<P>, guard: PostingGuard) -> Self {
        let postings = Arc::new(PostingService::new(jobs.clone(), guard));
        let intake = Arc::new(ApplicationService::new(applications.clone(), jobs.clone()));
        Self {
            jobs,
            applications,
            profiles,
            postings,
            intake,
        }
    }

    pub fn postings(&self) -> &PostingService<J> {
        &self.postings
    }

    pub fn intake(&self) -> &ApplicationService<A, J> {
        &self.intake
    }

    fn session(&self, headers: &HeaderMap) -> Result<SessionContext, RepositoryError> {
        SessionContext::resolve(self.profiles.as_ref(), asserted_user(headers))
    }
}

/// Router builder exposing the public board and the employer management endpoints.
pub fn board_router<J, A, P>(state: BoardState<J, A, P>) -> Router
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    Router::new()
        .route("/api/v1/jobs", get(browse_handler::<J, A, P>))
        .route("/api/v1/jobs/:job_id", get(listing_handler::<J, A, P>))
        .route(
            "/api/v1/jobs/:job_id/applications",
            post(apply_handler::<J, A, P>),
        )
        .route(
            "/api/v1/employer/jobs",
            get(employer_jobs_handler::<J, A, P>).post(create_job_handler::<J, A, P>),
        )
        .route(
            "/api/v1/employer/jobs/:job_id",
            put(update_job_handler::<J, A, P>)
                .patch(job_status_handler::<J, A, P>)
                .delete(delete_job_handler::<J, A, P>),
        )
        .route(
            "/api/v1/employer/applications",
            get(employer_applications_handler::<J, A, P>),
        )
        .route(
            "/api/v1/employer/applications/:application_id",
            patch(application_status_handler::<J, A, P>),
        )
        .route(
            "/api/v1/employer/dashboard",
            get(dashboard_handler::<J, A, P>),
        )
        .route("/api/v1/profile", put(profile_handler::<J, A, P>))
        .with_state(state)
}

fn asserted_user(headers: &HeaderMap) -> Option<UserId> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| UserId(value.to_string()))
}

fn require_user(headers: &HeaderMap) -> Result<UserId, Response> {
    asserted_user(headers).ok_or_else(|| {
        error_response(
            StatusCode::UNAUTHORIZED,
            "sign in as an employer to continue".to_string(),
        )
    })
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub(crate) async fn browse_handler<J, A, P>(
    State(state): State<BoardState<J, A, P>>,
    headers: HeaderMap,
    Query(query): Query<FilterQuery>,
) -> Response
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    let session = match state.session(&headers) {
        Ok(session) => session,
        Err(err) => return AppError::from(err).into_response(),
    };
    if let BrowseGate::RedirectTo(path) = session.browse_gate() {
        return Redirect::to(path).into_response();
    }

    let criteria = query.into_criteria();
    let feed = ListingFeed::new(RepositorySource::new(state.jobs.clone()));
    let result = feed.load(Utc::now()).browse(&criteria);
    (StatusCode::OK, Json(result)).into_response()
}

#[derive(Debug, Serialize)]
pub(crate) struct ListingDetail {
    #[serde(flatten)]
    listing: JobListing,
    salary: String,
}

pub(crate) async fn listing_handler<J, A, P>(
    State(state): State<BoardState<J, A, P>>,
    Path(job_id): Path<String>,
) -> Response
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    match state.postings.get_active(&JobId(job_id)) {
        Ok(listing) => {
            let salary = listing.salary_display();
            (StatusCode::OK, Json(ListingDetail { listing, salary })).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn apply_handler<J, A, P>(
    State(state): State<BoardState<J, A, P>>,
    Path(job_id): Path<String>,
    Json(submission): Json<ApplicationSubmission>,
) -> Response
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    match state.intake.submit(&JobId(job_id), submission, Utc::now()) {
        Ok(application) => {
            let payload = json!({
                "application_id": application.id,
                "status": application.status,
                "status_label": application.status.label(),
            });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn employer_jobs_handler<J, A, P>(
    State(state): State<BoardState<J, A, P>>,
    headers: HeaderMap,
) -> Response
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    let employer = match require_user(&headers) {
        Ok(employer) => employer,
        Err(response) => return response,
    };
    match state.postings.list_for_employer(&employer) {
        Ok(listings) => (StatusCode::OK, Json(listings)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_job_handler<J, A, P>(
    State(state): State<BoardState<J, A, P>>,
    headers: HeaderMap,
    Json(draft): Json<JobDraft>,
) -> Response
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    let session = match state.session(&headers) {
        Ok(session) => session,
        Err(err) => return AppError::from(err).into_response(),
    };
    match state.postings.create(&session, draft, Utc::now()) {
        Ok(listing) => (StatusCode::CREATED, Json(listing)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn update_job_handler<J, A, P>(
    State(state): State<BoardState<J, A, P>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
    Json(draft): Json<JobDraft>,
) -> Response
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    let employer = match require_user(&headers) {
        Ok(employer) => employer,
        Err(response) => return response,
    };
    match state
        .postings
        .update(&employer, &JobId(job_id), draft, Utc::now())
    {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingStatusChange {
    status: ListingStatus,
}

pub(crate) async fn job_status_handler<J, A, P>(
    State(state): State<BoardState<J, A, P>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
    Json(change): Json<ListingStatusChange>,
) -> Response
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    let employer = match require_user(&headers) {
        Ok(employer) => employer,
        Err(response) => return response,
    };
    match state
        .postings
        .set_status(&employer, &JobId(job_id), change.status, Utc::now())
    {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_job_handler<J, A, P>(
    State(state): State<BoardState<J, A, P>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Response
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    let employer = match require_user(&headers) {
        Ok(employer) => employer,
        Err(response) => return response,
    };
    match state.postings.delete(&employer, &JobId(job_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApplicationsQuery {
    #[serde(default)]
    status: Option<String>,
}

pub(crate) async fn employer_applications_handler<J, A, P>(
    State(state): State<BoardState<J, A, P>>,
    headers: HeaderMap,
    Query(query): Query<ApplicationsQuery>,
) -> Response
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    let employer = match require_user(&headers) {
        Ok(employer) => employer,
        Err(response) => return response,
    };
    // "all" and unknown tabs show everything
    let status = query.status.as_deref().and_then(ApplicationStatus::parse);
    match state.intake.for_employer(&employer, status) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplicationStatusChange {
    status: ApplicationStatus,
}

pub(crate) async fn application_status_handler<J, A, P>(
    State(state): State<BoardState<J, A, P>>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
    Json(change): Json<ApplicationStatusChange>,
) -> Response
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    let employer = match require_user(&headers) {
        Ok(employer) => employer,
        Err(response) => return response,
    };
    let id = ApplicationId(application_id);
    match state
        .intake
        .update_status(&employer, &id, change.status, Utc::now())
    {
        Ok(application) => (StatusCode::OK, Json(application)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn dashboard_handler<J, A, P>(
    State(state): State<BoardState<J, A, P>>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    let employer = match require_user(&headers) {
        Ok(employer) => employer,
        Err(response) => return Ok(response),
    };
    let dashboard = employer_dashboard(
        state.jobs.as_ref(),
        state.applications.as_ref(),
        &employer,
        Utc::now(),
    )?;
    Ok((StatusCode::OK, Json(dashboard)).into_response())
}

pub(crate) async fn profile_handler<J, A, P>(
    State(state): State<BoardState<J, A, P>>,
    headers: HeaderMap,
    Json(update): Json<ProfileUpdate>,
) -> Result<Response, AppError>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    let user = match require_user(&headers) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let profile = upsert_profile(state.profiles.as_ref(), &user, update, Utc::now())?;
    Ok((StatusCode::OK, Json(profile)).into_response())
}

impl IntoResponse for PostingError {
    fn into_response(self) -> Response {
        match self {
            PostingError::Invalid(violations) => {
                let fields: BTreeMap<&'static str, String> = violations
                    .0
                    .iter()
                    .map(|violation| (violation.field(), violation.to_string()))
                    .collect();
                let payload = json!({
                    "error": violations.to_string(),
                    "fields": fields,
                });
                (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
            }
            PostingError::Unauthenticated => {
                error_response(StatusCode::UNAUTHORIZED, self.to_string())
            }
            PostingError::NotFound => error_response(StatusCode::NOT_FOUND, self.to_string()),
            PostingError::Forbidden => {
                warn!("employer attempted to modify a listing it does not own");
                error_response(StatusCode::FORBIDDEN, self.to_string())
            }
            PostingError::Repository(err) => AppError::from(err).into_response(),
        }
    }
}

impl IntoResponse for ApplicationServiceError {
    fn into_response(self) -> Response {
        let status = match self {
            ApplicationServiceError::Repository(err) => return AppError::from(err).into_response(),
            ApplicationServiceError::MissingName | ApplicationServiceError::MissingPhone => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApplicationServiceError::JobNotFound | ApplicationServiceError::NotFound => {
                StatusCode::NOT_FOUND
            }
            ApplicationServiceError::JobNotAccepting
            | ApplicationServiceError::InvalidTransition { .. } => StatusCode::CONFLICT,
            ApplicationServiceError::Forbidden => StatusCode::FORBIDDEN,
        };
        error_response(status, self.to_string())
    }
}
