/*
 * Responsibility
 * - users テーブル向け SQLx 操作 (IT / Nurse 共通)
 * - PgPool を受け取り CRUD を提供
 * - 一意制約違反は RepoError::Conflict に変換して返す
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::filter::{ComposedQuery, Connective, FilterQuery, MatchMode, Page, SortDirection};
use crate::services::auth::Role;

const USER_COLUMNS: &str =
    "id, nip, name, user_type, hashed_password, identity_card_url, created_at";

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub nip: i64,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub user_type: Role,
    pub hashed_password: Option<String>,
    pub identity_card_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewUser<'a> {
    pub id: &'a str,
    pub nip: i64,
    pub name: &'a str,
    pub user_type: Role,
    pub hashed_password: Option<&'a str>,
    pub identity_card_url: Option<&'a str>,
}

/// Search parameters of `GET /v1/user`. Filters are combined with AND.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub nip: Option<String>,
    pub role: Option<Role>,
    pub created_at: Option<SortDirection>,
    pub page: Page,
}

pub async fn create(db: &PgPool, user: &NewUser<'_>) -> RepoResult<UserRow> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        INSERT INTO users (id, nip, name, user_type, hashed_password, identity_card_url)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(user.id)
    .bind(user.nip)
    .bind(user.name)
    .bind(user.user_type.as_str())
    .bind(user.hashed_password)
    .bind(user.identity_card_url)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn get_by_nip(db: &PgPool, nip: i64) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE nip = $1
        "#
    ))
    .bind(nip)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn get_by_id(db: &PgPool, user_id: &str) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE id = $1
        "#
    ))
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub(crate) fn list_query(filter: &UserFilter) -> ComposedQuery {
    let mut q = FilterQuery::new(
        &format!("SELECT {USER_COLUMNS} FROM users"),
        Connective::And,
    );
    q.filter("id", MatchMode::Exact, filter.user_id.as_deref())
        .filter("name", MatchMode::Contains, filter.name.as_deref())
        .filter("CAST(nip AS TEXT)", MatchMode::Prefix, filter.nip.as_deref())
        .filter(
            "user_type",
            MatchMode::Exact,
            filter.role.as_ref().map(Role::as_str),
        )
        .order_by("created_at", filter.created_at);

    q.paginate(filter.page)
}

pub async fn list(db: &PgPool, filter: &UserFilter) -> RepoResult<Vec<UserRow>> {
    let rows = list_query(filter).fetch_all::<UserRow>(db).await?;
    Ok(rows)
}

pub async fn update_profile(
    db: &PgPool,
    user_id: &str,
    nip: i64,
    name: &str,
) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        UPDATE users
        SET nip = $2, name = $3
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(nip)
    .bind(name)
    .fetch_optional(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn set_password(db: &PgPool, user_id: &str, hashed_password: &str) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET hashed_password = $2
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(hashed_password)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(db: &PgPool, user_id: &str) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
