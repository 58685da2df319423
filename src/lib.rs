pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
    Router,
};
use reqwest::Client;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::Result;
use crate::middleware::{
    auth::require_auth,
    cors::api_cors,
    rate_limit::{limit_requests, RequestRateLimiter},
};
use crate::services::{
    application_service::ApplicationService,
    company_service::CompanyService,
    dashboard_service::DashboardService,
    job_alert_service::JobAlertService,
    job_service::JobService,
    resume_service::ResumeService,
    saved_job_service::SavedJobService,
    sync_service::{HttpFeedProvider, JobFeedProvider, MockStepstoneProvider, SyncService},
    user_service::UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub user_service: UserService,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub saved_job_service: SavedJobService,
    pub job_alert_service: JobAlertService,
    pub company_service: CompanyService,
    pub resume_service: ResumeService,
    pub dashboard_service: DashboardService,
    pub sync_service: SyncService,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Result<Self> {
        let provider: Arc<dyn JobFeedProvider> = match config.job_feed_url.clone() {
            Some(url) => {
                let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
                tracing::info!(%url, "Using HTTP job feed provider");
                Arc::new(HttpFeedProvider::new(client, url))
            }
            None => Arc::new(MockStepstoneProvider),
        };
        Ok(Self::with_provider(pool, config, provider))
    }

    pub fn with_provider(pool: PgPool, config: Config, provider: Arc<dyn JobFeedProvider>) -> Self {
        Self {
            user_service: UserService::new(pool.clone()),
            job_service: JobService::new(pool.clone()),
            application_service: ApplicationService::new(pool.clone()),
            saved_job_service: SavedJobService::new(pool.clone()),
            job_alert_service: JobAlertService::new(pool.clone()),
            company_service: CompanyService::new(pool.clone()),
            resume_service: ResumeService::new(pool.clone()),
            dashboard_service: DashboardService::new(pool.clone()),
            sync_service: SyncService::new(pool.clone(), provider),
            config: Arc::new(config),
            pool,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let protected_api = Router::new()
        .route("/api/auth/user", get(routes::auth::current_user))
        .route(
            "/api/jobs",
            get(routes::jobs::list_jobs).post(routes::jobs::create_job),
        )
        .route("/api/jobs/:id", get(routes::jobs::get_job))
        .route(
            "/api/applications",
            get(routes::applications::list_applications)
                .post(routes::applications::create_application),
        )
        .route(
            "/api/applications/:id",
            patch(routes::applications::update_application_status),
        )
        .route(
            "/api/saved-jobs",
            get(routes::saved_jobs::list_saved_jobs).post(routes::saved_jobs::save_job),
        )
        .route(
            "/api/saved-jobs/:job_id",
            axum::routing::delete(routes::saved_jobs::unsave_job),
        )
        .route(
            "/api/job-alerts",
            get(routes::job_alerts::list_job_alerts).post(routes::job_alerts::create_job_alert),
        )
        .route(
            "/api/job-alerts/:id",
            axum::routing::delete(routes::job_alerts::delete_job_alert),
        )
        .route("/api/companies", post(routes::companies::create_company))
        .route(
            "/api/resumes",
            get(routes::resumes::list_resumes).post(routes::resumes::create_resume),
        )
        .route(
            "/api/resumes/:id",
            get(routes::resumes::get_resume)
                .put(routes::resumes::update_resume)
                .delete(routes::resumes::delete_resume),
        )
        .route(
            "/api/resumes/:id/default",
            put(routes::resumes::set_default_resume),
        )
        .route(
            "/api/stepstone/sync",
            post(routes::sync::sync_stepstone_jobs),
        )
        .route("/api/dashboard/stats", get(routes::dashboard::get_stats))
        .route(
            "/api/dashboard/activity",
            get(routes::dashboard::get_recent_activity),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let public_api = Router::new().route("/api/companies", get(routes::companies::list_companies));

    let api = protected_api
        .merge(public_api)
        .layer(from_fn_with_state(
            RequestRateLimiter::new(state.config.api_rps),
            limit_requests,
        ));

    Router::new()
        .route("/health", get(routes::health::health))
        .merge(api)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(api_cors()),
        )
}
