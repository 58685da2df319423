use std::{env, sync::Arc};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use job_board_backend::{
    build_router,
    config::Config,
    database::pool::run_migrations,
    middleware::auth::Claims,
    services::sync_service::MockStepstoneProvider,
    AppState,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value as JsonValue};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "test_secret_key";

struct TestApp {
    router: Router,
    pool: PgPool,
}

async fn setup() -> TestApp {
    dotenvy::dotenv().ok();
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let config = Config {
        server_address: "127.0.0.1:0".into(),
        database_url: database_url.clone(),
        database_max_connections: 5,
        jwt_secret: SECRET.into(),
        api_rps: 10_000,
        job_feed_url: None,
    };
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("pool");
    run_migrations(&pool).await.expect("migrations");

    let state = AppState::with_provider(pool.clone(), config, Arc::new(MockStepstoneProvider));
    TestApp {
        router: build_router(state),
        pool,
    }
}

fn token_for(user_id: &str) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        email: Some(format!("{}@example.com", user_id)),
        first_name: Some("Test".into()),
        last_name: Some("User".into()),
        profile_image_url: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

async fn call(
    app: &TestApp,
    method: Method,
    uri: &str,
    user_id: &str,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for(user_id)));
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let resp = app
        .router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 4 * 1024 * 1024).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn new_user() -> String {
    format!("user-{}", Uuid::new_v4())
}

async fn create_company(app: &TestApp, user: &str, name: &str) -> i64 {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/companies",
        user,
        Some(json!({ "name": name, "location": "Remote" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().unwrap()
}

async fn create_job(app: &TestApp, user: &str, company_id: i64, job: JsonValue) -> i64 {
    let mut payload = json!({
        "description": "Build and run services",
        "companyId": company_id,
        "type": "full-time",
        "skills": ["Rust"]
    });
    if let (Some(target), Some(extra)) = (payload.as_object_mut(), job.as_object()) {
        for (key, value) in extra {
            target.insert(key.clone(), value.clone());
        }
    }
    let (status, body) = call(app, Method::POST, "/api/jobs", user, Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
#[ignore = "requires a running Postgres at DATABASE_URL"]
async fn authenticated_user_is_upserted_from_claims() {
    let app = setup().await;
    let user = new_user();

    let (status, body) = call(&app, Method::GET, "/api/auth/user", &user, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user.as_str());
    assert_eq!(body["email"], format!("{}@example.com", user));
    assert_eq!(body["firstName"], "Test");
}

#[tokio::test]
#[ignore = "requires a running Postgres at DATABASE_URL"]
async fn applying_twice_to_the_same_job_is_rejected() {
    let app = setup().await;
    let user = new_user();
    let company = create_company(&app, &user, "Apply Twice Co").await;
    let job = create_job(&app, &user, company, json!({ "title": "Backend Engineer" })).await;

    let (status, first) = call(
        &app,
        Method::POST,
        "/api/applications",
        &user,
        Some(json!({ "jobId": job, "coverLetter": "Hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["status"], "pending");

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/applications",
        &user,
        Some(json!({ "jobId": job })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "You have already applied to this job");

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM applications WHERE user_id = $1 AND job_id = $2",
    )
    .bind(&user)
    .bind(job as i32)
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert_eq!(count, 1);

    let (status, listed) = call(&app, Method::GET, "/api/applications", &user, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["job"]["title"], "Backend Engineer");
    assert_eq!(listed[0]["job"]["company"]["name"], "Apply Twice Co");
}

#[tokio::test]
#[ignore = "requires a running Postgres at DATABASE_URL"]
async fn applying_to_an_unknown_job_is_404() {
    let app = setup().await;
    let user = new_user();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/applications",
        &user,
        Some(json!({ "jobId": i32::MAX })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Job not found");
}

#[tokio::test]
#[ignore = "requires a running Postgres at DATABASE_URL"]
async fn status_updates_are_scoped_to_the_applicant() {
    let app = setup().await;
    let owner = new_user();
    let stranger = new_user();
    let company = create_company(&app, &owner, "Scoped Co").await;
    let job = create_job(&app, &owner, company, json!({ "title": "Scoped Role" })).await;

    let (_, application) = call(
        &app,
        Method::POST,
        "/api/applications",
        &owner,
        Some(json!({ "jobId": job })),
    )
    .await;
    let uri = format!("/api/applications/{}", application["id"]);

    let (status, _) = call(
        &app,
        Method::PATCH,
        &uri,
        &stranger,
        Some(json!({ "status": "interview" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(
        &app,
        Method::PATCH,
        &uri,
        &owner,
        Some(json!({ "status": "hired" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        Method::PATCH,
        &uri,
        &owner,
        Some(json!({ "status": "interview" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "interview");

    let (_, stats) = call(&app, Method::GET, "/api/dashboard/stats", &owner, None).await;
    assert_eq!(stats["applications"], 1);
    assert_eq!(stats["interviews"], 1);
    assert_eq!(stats["pending"], 0);
}

#[tokio::test]
#[ignore = "requires a running Postgres at DATABASE_URL"]
async fn job_filters_combine_location_and_keywords() {
    let app = setup().await;
    let user = new_user();
    let marker = Uuid::new_v4().simple().to_string();
    let company = create_company(&app, &user, "Filter Co").await;

    let remote_engineer = create_job(
        &app,
        &user,
        company,
        json!({ "title": format!("Remote Engineer {}", marker), "location": "Remote" }),
    )
    .await;
    create_job(
        &app,
        &user,
        company,
        json!({ "title": format!("Onsite Engineer {}", marker), "location": "Berlin, Germany" }),
    )
    .await;
    create_job(
        &app,
        &user,
        company,
        json!({ "title": format!("Remote Designer {}", marker), "location": "remote" }),
    )
    .await;
    create_job(
        &app,
        &user,
        company,
        json!({ "title": format!("Hidden Engineer {}", marker), "location": "Remote", "isActive": false }),
    )
    .await;

    let uri = format!("/api/jobs?location=Remote&keywords=engineer%20{}", marker);
    let (status, body) = call(&app, Method::GET, &uri, &user, None).await;
    assert_eq!(status, StatusCode::OK);
    let jobs = body.as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["id"].as_i64(), Some(remote_engineer));
    assert_eq!(jobs[0]["isSaved"], false);
    assert_eq!(jobs[0]["hasApplied"], false);

    let uri = format!("/api/jobs?location=All%20Locations&type=all&keywords={}", marker);
    let (_, body) = call(&app, Method::GET, &uri, &user, None).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
#[ignore = "requires a running Postgres at DATABASE_URL"]
async fn saving_flags_jobs_and_feeds_the_activity_stream() {
    let app = setup().await;
    let user = new_user();
    let marker = Uuid::new_v4().simple().to_string();
    let company = create_company(&app, &user, "Saved Co").await;
    let job = create_job(&app, &user, company, json!({ "title": format!("Saved Role {}", marker) })).await;

    let (status, _) = call(&app, Method::POST, "/api/saved-jobs", &user, Some(json!({ "jobId": job }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = call(&app, Method::POST, "/api/saved-jobs", &user, Some(json!({ "jobId": job }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Job is already saved");

    let (_, saved) = call(&app, Method::GET, "/api/saved-jobs", &user, None).await;
    assert_eq!(saved.as_array().unwrap().len(), 1);
    assert_eq!(saved[0]["isSaved"], true);

    let (_, listed) = call(&app, Method::GET, &format!("/api/jobs?keywords={}", marker), &user, None).await;
    assert_eq!(listed[0]["isSaved"], true);

    let (_, activity) = call(&app, Method::GET, "/api/dashboard/activity", &user, None).await;
    assert_eq!(activity[0]["type"], "save");
    assert_eq!(activity[0]["companyName"], "Saved Co");

    let (status, _) = call(&app, Method::DELETE, &format!("/api/saved-jobs/{}", job), &user, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, saved) = call(&app, Method::GET, "/api/saved-jobs", &user, None).await;
    assert!(saved.as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a running Postgres at DATABASE_URL"]
async fn only_one_resume_stays_default() {
    let app = setup().await;
    let user = new_user();

    let (_, first) = call(
        &app,
        Method::POST,
        "/api/resumes",
        &user,
        Some(json!({
            "title": "First",
            "isDefault": true,
            "experience": [{ "company": "Acme", "position": "Engineer", "startDate": "2021-01", "current": true }]
        })),
    )
    .await;
    assert_eq!(first["isDefault"], true);
    assert!(!first["experience"][0]["id"].as_str().unwrap().is_empty());

    let (_, second) = call(
        &app,
        Method::POST,
        "/api/resumes",
        &user,
        Some(json!({ "title": "Second", "isDefault": true })),
    )
    .await;
    assert_eq!(second["isDefault"], true);

    let defaults = |resumes: &JsonValue| -> Vec<i64> {
        resumes
            .as_array()
            .unwrap()
            .iter()
            .filter(|r| r["isDefault"] == true)
            .filter_map(|r| r["id"].as_i64())
            .collect()
    };

    let (_, resumes) = call(&app, Method::GET, "/api/resumes", &user, None).await;
    assert_eq!(defaults(&resumes), vec![second["id"].as_i64().unwrap()]);

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/resumes/{}/default", first["id"]),
        &user,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Default resume updated successfully");

    let (_, resumes) = call(&app, Method::GET, "/api/resumes", &user, None).await;
    assert_eq!(defaults(&resumes), vec![first["id"].as_i64().unwrap()]);

    let stranger = new_user();
    let (status, _) = call(
        &app,
        Method::PUT,
        &format!("/api/resumes/{}/default", second["id"]),
        &stranger,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(
        &app,
        Method::DELETE,
        &format!("/api/resumes/{}", second["id"]),
        &user,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Resume deleted successfully");
}

#[tokio::test]
#[ignore = "requires a running Postgres at DATABASE_URL"]
async fn designer_sync_ingests_one_job_with_provenance() {
    let app = setup().await;
    let user = new_user();

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/stepstone/sync",
        &user,
        Some(json!({ "keywords": "Designer" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully synced 1 jobs from Stepstone");
    let jobs = body["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["title"], "UX Designer");
    assert_eq!(jobs[0]["location"], "Munich, Germany");

    let job_id = jobs[0]["id"].as_i64().unwrap() as i32;
    let (external_id, title): (String, Option<String>) = sqlx::query_as(
        "SELECT external_id, data -> 'originalData' ->> 'title' FROM external_job_sources WHERE job_id = $1",
    )
    .bind(job_id)
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert!(external_id.starts_with("stepstone_"));
    assert_eq!(title.as_deref(), Some("UX Designer"));

    let (_, job) = call(&app, Method::GET, &format!("/api/jobs/{}", job_id), &user, None).await;
    assert_eq!(job["company"]["name"], "Stepstone Partner Company");
}

#[tokio::test]
#[ignore = "requires a running Postgres at DATABASE_URL"]
async fn malformed_bodies_are_400() {
    let app = setup().await;
    let user = new_user();

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/job-alerts",
        &user,
        Some(json!({ "type": "gig" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/applications",
        &user,
        Some(json!({ "jobId": "not-a-number" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a running Postgres at DATABASE_URL"]
async fn job_alerts_can_only_be_deleted_by_their_owner() {
    let app = setup().await;
    let owner = new_user();
    let stranger = new_user();

    let (status, alert) = call(
        &app,
        Method::POST,
        "/api/job-alerts",
        &owner,
        Some(json!({ "keywords": "rust", "type": "contract", "salaryMin": "50000" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(alert["isActive"], true);

    let uri = format!("/api/job-alerts/{}", alert["id"]);
    let (status, _) = call(&app, Method::DELETE, &uri, &stranger, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, Method::DELETE, &uri, &owner, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

async fn apply(app: &TestApp, user: &str, job_id: i64) -> i64 {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/applications",
        user,
        Some(json!({ "jobId": job_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
#[ignore = "requires a running Postgres at DATABASE_URL"]
async fn pending_counter_includes_reviewed_applications() {
    let app = setup().await;
    let user = new_user();
    let company = create_company(&app, &user, "Counter Co").await;

    let mut applications = Vec::new();
    for n in 0..5 {
        let job = create_job(&app, &user, company, json!({ "title": format!("Counter Role {}", n) })).await;
        applications.push(apply(&app, &user, job).await);
    }
    for (application, status) in applications.iter().zip(["reviewed", "interview", "rejected"]) {
        let (code, body) = call(
            &app,
            Method::PATCH,
            &format!("/api/applications/{}", application),
            &user,
            Some(json!({ "status": status })),
        )
        .await;
        assert_eq!(code, StatusCode::OK, "{}", body);
    }

    let (status, stats) = call(&app, Method::GET, "/api/dashboard/stats", &user, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["applications"], 5);
    // two untouched plus the reviewed one
    assert_eq!(stats["pending"], 3);
    assert_eq!(stats["interviews"], 1);
    assert_eq!(stats["savedJobs"], 0);
}

#[tokio::test]
#[ignore = "requires a running Postgres at DATABASE_URL"]
async fn salary_floor_and_type_are_applied_in_the_query() {
    let app = setup().await;
    let user = new_user();
    let marker = Uuid::new_v4().simple().to_string();
    let company = create_company(&app, &user, "Salary Co").await;

    let well_paid_contract = create_job(
        &app,
        &user,
        company,
        json!({ "title": format!("Contract A {}", marker), "type": "contract", "salaryMin": "90000" }),
    )
    .await;
    create_job(
        &app,
        &user,
        company,
        json!({ "title": format!("Contract B {}", marker), "type": "contract", "salaryMin": "50000" }),
    )
    .await;
    create_job(
        &app,
        &user,
        company,
        json!({ "title": format!("Permanent {}", marker), "type": "full-time", "salaryMin": "95000" }),
    )
    .await;
    create_job(
        &app,
        &user,
        company,
        json!({ "title": format!("Contract C {}", marker), "type": "contract" }),
    )
    .await;

    let uri = format!("/api/jobs?salaryMin=60000&type=contract&keywords={}", marker);
    let (status, body) = call(&app, Method::GET, &uri, &user, None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|job| job["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![well_paid_contract]);

    let uri = format!("/api/jobs?salaryMin=60000&keywords={}", marker);
    let (_, body) = call(&app, Method::GET, &uri, &user, None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = call(&app, Method::GET, "/api/jobs?salaryMin=lots", &user, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
#[ignore = "requires a running Postgres at DATABASE_URL"]
async fn activity_feed_is_the_newest_ten_across_both_sources() {
    let app = setup().await;
    let user = new_user();
    let company = create_company(&app, &user, "Feed Co").await;

    let mut jobs = Vec::new();
    for n in 0..11 {
        jobs.push(create_job(&app, &user, company, json!({ "title": format!("Feed Role {}", n) })).await);
    }
    for job in &jobs[..3] {
        let (status, _) = call(&app, Method::POST, "/api/saved-jobs", &user, Some(json!({ "jobId": job }))).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    sqlx::query("UPDATE saved_jobs SET saved_at = NOW() - INTERVAL '1 hour' WHERE user_id = $1")
        .bind(&user)
        .execute(&app.pool)
        .await
        .unwrap();
    for job in &jobs[3..] {
        apply(&app, &user, *job).await;
    }

    let (status, activity) = call(&app, Method::GET, "/api/dashboard/activity", &user, None).await;
    assert_eq!(status, StatusCode::OK);
    let kinds: Vec<&str> = activity
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|item| item["type"].as_str())
        .collect();
    assert_eq!(kinds.len(), 10);
    assert!(kinds[..8].iter().all(|kind| *kind == "application"));
    assert!(kinds[8..].iter().all(|kind| *kind == "save"));
}
