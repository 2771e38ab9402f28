/*
 * Responsibility
 * - /v1/user 系 handler (IT の登録/ログイン, nurse 管理)
 * - ApiJson/Query を extractor で受け、DTO validation → service 呼び出し
 * - service のエラーは AppError の From 実装で HTTP に変換
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    api::v1::dto::{
        Envelope,
        users::{
            GrantAccessRequest, ListUsersQuery, LoginRequest, RegisterItRequest,
            RegisterNurseRequest, UpdateNurseRequest, UserAuthResponse, UserResponse,
        },
    },
    api::v1::extractors::ApiJson,
    error::AppError,
    services::auth::Role,
    state::AppState,
};

type Reply<T> = Result<(StatusCode, Json<Envelope<T>>), AppError>;

pub async fn register_it(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterItRequest>,
) -> Reply<UserAuthResponse> {
    req.validate().map_err(AppError::validation)?;

    let out = state
        .users
        .register_it(req.nip, &req.name, &req.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::new("User registered successfully", out.into())),
    ))
}

pub async fn login_it(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Reply<UserAuthResponse> {
    login(state, Role::Operator, req).await
}

pub async fn login_nurse(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Reply<UserAuthResponse> {
    login(state, Role::Caregiver, req).await
}

async fn login(state: AppState, role: Role, req: LoginRequest) -> Reply<UserAuthResponse> {
    req.validate(role).map_err(AppError::validation)?;

    let out = state.users.login(role, req.nip, &req.password).await?;

    Ok((
        StatusCode::OK,
        Json(Envelope::new("User logged in successfully", out.into())),
    ))
}

pub async fn register_nurse(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterNurseRequest>,
) -> Reply<UserAuthResponse> {
    req.validate().map_err(AppError::validation)?;

    let user = state
        .users
        .register_nurse(req.nip, &req.name, &req.identity_card_scan_img)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::new("Nurse registered successfully", user.into())),
    ))
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Reply<Vec<UserResponse>> {
    let rows = state.users.list(&query.into_filter()).await?;
    let res = rows.into_iter().map(UserResponse::from).collect();

    Ok((StatusCode::OK, Json(Envelope::new("success", res))))
}

pub async fn update_nurse(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ApiJson(req): ApiJson<UpdateNurseRequest>,
) -> Reply<UserResponse> {
    req.validate().map_err(AppError::validation)?;

    let user = state
        .users
        .update_nurse(&user_id, req.nip, &req.name)
        .await?;

    Ok((
        StatusCode::OK,
        Json(Envelope::new("Nurse updated successfully", user.into())),
    ))
}

pub async fn delete_nurse(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Reply<()> {
    state.users.delete_nurse(&user_id).await?;

    Ok((
        StatusCode::OK,
        Json(Envelope::message("Nurse deleted successfully")),
    ))
}

pub async fn grant_nurse_access(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ApiJson(req): ApiJson<GrantAccessRequest>,
) -> Reply<()> {
    req.validate().map_err(AppError::validation)?;

    state
        .users
        .grant_nurse_access(&user_id, &req.password)
        .await?;

    Ok((
        StatusCode::OK,
        Json(Envelope::message("Nurse access granted successfully")),
    ))
}
