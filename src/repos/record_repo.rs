/*
 * Responsibility
 * - medical_records テーブル向け SQLx 操作
 * - 一覧は患者 (medical_patients) と作成者 (users) を JOIN して返す
 * - 作成者が削除された記録は user_id が NULL になる (ON DELETE SET NULL)
 * - 存在しない作成者での INSERT (23503) は RepoError::MissingReference
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::filter::{ComposedQuery, Connective, FilterQuery, MatchMode, Page, SortDirection};

#[derive(Debug, Clone, FromRow)]
pub struct RecordRow {
    pub id: String,
    pub patient_id: String,
    pub user_id: Option<String>,
    pub symptoms: String,
    pub medications: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewRecord<'a> {
    pub id: &'a str,
    pub patient_id: &'a str,
    pub user_id: &'a str,
    pub symptoms: &'a str,
    pub medications: &'a str,
}

/// One listing row: the record, its patient and its author.
#[derive(Debug, Clone, FromRow)]
pub struct RecordListRow {
    pub symptoms: String,
    pub medications: String,
    pub created_at: DateTime<Utc>,

    pub patient_identity_number: i64,
    pub patient_phone_number: String,
    pub patient_name: String,
    pub patient_birth_date: DateTime<Utc>,
    pub patient_gender: String,
    pub patient_identity_card_url: String,

    pub creator_id: Option<String>,
    pub creator_nip: Option<i64>,
    pub creator_name: Option<String>,
}

/// Search parameters of `GET /v1/medical/record`. Filters are combined with OR.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub identity_number: Option<String>,
    pub creator_id: Option<String>,
    pub creator_nip: Option<String>,
    pub created_at: Option<SortDirection>,
    pub page: Page,
}

const LIST_BASE: &str = r#"
    SELECT
        r.symptoms, r.medications, r.created_at,
        p.identity_number AS patient_identity_number,
        p.phone_number AS patient_phone_number,
        p.name AS patient_name,
        p.birth_date AS patient_birth_date,
        p.gender AS patient_gender,
        p.identity_card_url AS patient_identity_card_url,
        u.id AS creator_id,
        u.nip AS creator_nip,
        u.name AS creator_name
    FROM medical_records r
    JOIN medical_patients p ON p.id = r.patient_id
    LEFT JOIN users u ON u.id = r.user_id
"#;

pub async fn create(db: &PgPool, record: &NewRecord<'_>) -> RepoResult<RecordRow> {
    let row = sqlx::query_as::<_, RecordRow>(
        r#"
        INSERT INTO medical_records (id, patient_id, user_id, symptoms, medications)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, patient_id, user_id, symptoms, medications, created_at
        "#,
    )
    .bind(record.id)
    .bind(record.patient_id)
    .bind(record.user_id)
    .bind(record.symptoms)
    .bind(record.medications)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub(crate) fn list_query(filter: &RecordFilter) -> ComposedQuery {
    let mut q = FilterQuery::new(LIST_BASE, Connective::Or);
    q.filter(
        "CAST(p.identity_number AS TEXT)",
        MatchMode::Exact,
        filter.identity_number.as_deref(),
    )
    .filter("u.id", MatchMode::Exact, filter.creator_id.as_deref())
    .filter(
        "CAST(u.nip AS TEXT)",
        MatchMode::Exact,
        filter.creator_nip.as_deref(),
    )
    .order_by("r.created_at", filter.created_at);

    q.paginate(filter.page)
}

pub async fn list(db: &PgPool, filter: &RecordFilter) -> RepoResult<Vec<RecordListRow>> {
    let rows = list_query(filter).fetch_all::<RecordListRow>(db).await?;
    Ok(rows)
}
