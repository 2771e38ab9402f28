//! Patient registration and search.
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::repos::patient_repo::{self, NewPatient, PatientFilter, PatientRow};
use crate::services::new_id;

#[derive(Debug, Error)]
pub enum PatientError {
    #[error("identity number already exists")]
    IdentityNumberAlreadyExists,
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for PatientError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => PatientError::IdentityNumberAlreadyExists,
            e => PatientError::Repo(e),
        }
    }
}

#[derive(Debug)]
pub struct PatientInput<'a> {
    pub identity_number: i64,
    pub phone_number: &'a str,
    pub name: &'a str,
    pub birth_date: DateTime<Utc>,
    pub gender: &'a str,
    pub identity_card_url: &'a str,
}

#[derive(Clone, Debug)]
pub struct PatientService {
    db: PgPool,
}

impl PatientService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn register(&self, input: &PatientInput<'_>) -> Result<PatientRow, PatientError> {
        let id = new_id();
        let row = patient_repo::create(
            &self.db,
            &NewPatient {
                id: &id,
                identity_number: input.identity_number,
                phone_number: input.phone_number,
                name: input.name,
                birth_date: input.birth_date,
                gender: input.gender,
                identity_card_url: input.identity_card_url,
            },
        )
        .await?;

        tracing::info!(patient_id = %row.id, "patient registered");
        Ok(row)
    }

    pub async fn list(&self, filter: &PatientFilter) -> Result<Vec<PatientRow>, PatientError> {
        Ok(patient_repo::list(&self.db, filter).await?)
    }
}
