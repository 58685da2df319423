pub mod applications;
pub mod auth;
pub mod companies;
pub mod dashboard;
pub mod health;
pub mod job_alerts;
pub mod jobs;
pub mod resumes;
pub mod saved_jobs;
pub mod sync;
