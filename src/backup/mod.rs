pub mod activity_log;
pub mod backup_job;
pub mod encrypt;
pub mod finish;
pub mod policy;
pub mod result_error;
pub mod run;
pub mod settings;
pub mod share;
pub mod transform;
pub mod validate;
pub mod walker;
