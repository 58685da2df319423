pub mod application_service;
pub mod company_service;
pub mod dashboard_service;
pub mod job_alert_service;
pub mod job_service;
pub mod resume_service;
pub mod saved_job_service;
pub mod sync_service;
pub mod user_service;
