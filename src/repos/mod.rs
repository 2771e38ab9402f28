pub mod error;
pub mod filter;
pub mod patient_repo;
pub mod record_repo;
pub mod user_repo;
