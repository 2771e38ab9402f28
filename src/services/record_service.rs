//! Medical records attached to registered patients.
use sqlx::PgPool;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::repos::patient_repo;
use crate::repos::record_repo::{self, NewRecord, RecordFilter, RecordListRow, RecordRow};
use crate::services::new_id;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("identity number does not exist")]
    PatientNotFound,
    /// The author's account was deleted while their token is still valid.
    #[error("author does not exist")]
    AuthorNotFound,
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for RecordError {
    fn from(e: RepoError) -> Self {
        match e {
            // patients are never deleted, so the dangling key is the author
            RepoError::MissingReference => RecordError::AuthorNotFound,
            e => RecordError::Repo(e),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RecordService {
    db: PgPool,
}

impl RecordService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Attach a record to the patient with `identity_number`, authored by
    /// `author_id` (the authenticated staff member).
    pub async fn create(
        &self,
        author_id: &str,
        identity_number: i64,
        symptoms: &str,
        medications: &str,
    ) -> Result<RecordRow, RecordError> {
        let patient_id = patient_repo::find_id_by_identity_number(&self.db, identity_number)
            .await?
            .ok_or(RecordError::PatientNotFound)?;

        let id = new_id();
        let row = record_repo::create(
            &self.db,
            &NewRecord {
                id: &id,
                patient_id: &patient_id,
                user_id: author_id,
                symptoms,
                medications,
            },
        )
        .await?;

        tracing::info!(record_id = %row.id, %patient_id, author_id, "medical record created");
        Ok(row)
    }

    pub async fn list(&self, filter: &RecordFilter) -> Result<Vec<RecordListRow>, RecordError> {
        Ok(record_repo::list(&self.db, filter).await?)
    }
}
