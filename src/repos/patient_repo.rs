/*
 * Responsibility
 * - medical_patients テーブル向け SQLx 操作
 * - identity_number は一意 (重複は RepoError::Conflict)
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::filter::{ComposedQuery, Connective, FilterQuery, MatchMode, Page, SortDirection};

const PATIENT_COLUMNS: &str = "id, identity_number, phone_number, name, birth_date, gender, \
                               identity_card_url, created_at";

#[derive(Debug, Clone, FromRow)]
pub struct PatientRow {
    pub id: String,
    pub identity_number: i64,
    pub phone_number: String,
    pub name: String,
    pub birth_date: DateTime<Utc>,
    pub gender: String,
    pub identity_card_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewPatient<'a> {
    pub id: &'a str,
    pub identity_number: i64,
    pub phone_number: &'a str,
    pub name: &'a str,
    pub birth_date: DateTime<Utc>,
    pub gender: &'a str,
    pub identity_card_url: &'a str,
}

/// Search parameters of `GET /v1/medical/patient`. Filters are combined with OR.
#[derive(Debug, Clone, Default)]
pub struct PatientFilter {
    pub identity_number: Option<String>,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub created_at: Option<SortDirection>,
    pub page: Page,
}

pub async fn create(db: &PgPool, patient: &NewPatient<'_>) -> RepoResult<PatientRow> {
    let row = sqlx::query_as::<_, PatientRow>(&format!(
        r#"
        INSERT INTO medical_patients
            (id, identity_number, phone_number, name, birth_date, gender, identity_card_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {PATIENT_COLUMNS}
        "#
    ))
    .bind(patient.id)
    .bind(patient.identity_number)
    .bind(patient.phone_number)
    .bind(patient.name)
    .bind(patient.birth_date)
    .bind(patient.gender)
    .bind(patient.identity_card_url)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

/// Internal id of the patient with this identity number, if registered.
pub async fn find_id_by_identity_number(
    db: &PgPool,
    identity_number: i64,
) -> RepoResult<Option<String>> {
    let id = sqlx::query_scalar::<_, String>(
        r#"
        SELECT id
        FROM medical_patients
        WHERE identity_number = $1
        "#,
    )
    .bind(identity_number)
    .fetch_optional(db)
    .await?;

    Ok(id)
}

pub(crate) fn list_query(filter: &PatientFilter) -> ComposedQuery {
    let mut q = FilterQuery::new(
        &format!("SELECT {PATIENT_COLUMNS} FROM medical_patients"),
        Connective::Or,
    );
    q.filter(
        "CAST(identity_number AS TEXT)",
        MatchMode::Exact,
        filter.identity_number.as_deref(),
    )
    .filter(
        "name",
        MatchMode::ContainsIgnoreCase,
        filter.name.as_deref(),
    )
    .filter(
        "phone_number",
        MatchMode::Contains,
        filter.phone_number.as_deref(),
    )
    .order_by("created_at", filter.created_at);

    q.paginate(filter.page)
}

pub async fn list(db: &PgPool, filter: &PatientFilter) -> RepoResult<Vec<PatientRow>> {
    let rows = list_query(filter).fetch_all::<PatientRow>(db).await?;
    Ok(rows)
}
