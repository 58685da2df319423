pub mod application;
pub mod company;
pub mod external_job_source;
pub mod job;
pub mod job_alert;
pub mod resume;
pub mod saved_job;
pub mod user;
