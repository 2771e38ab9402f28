/*
 * Responsibility
 * - /v1/medical/record (作成 / 検索)
 * - 作成者は gate が入れた AuthCtx.user_id (body からは受け取らない)
 */
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    api::v1::dto::{
        Envelope,
        records::{CreateRecordRequest, ListRecordsQuery, RecordResponse},
    },
    api::v1::extractors::{ApiJson, AuthCtxExtractor},
    error::AppError,
    state::AppState,
};

pub async fn create_record(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiJson(req): ApiJson<CreateRecordRequest>,
) -> Result<(StatusCode, Json<Envelope<()>>), AppError> {
    req.validate().map_err(AppError::validation)?;

    state
        .records
        .create(
            &ctx.user_id,
            req.identity_number,
            &req.symptoms,
            &req.medications,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::message("Medical record created successfully")),
    ))
}

pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<ListRecordsQuery>,
) -> Result<Json<Envelope<Vec<RecordResponse>>>, AppError> {
    let rows = state.records.list(&query.into_filter()).await?;

    Ok(Json(Envelope::new(
        "Medical records fetched successfully",
        rows.into_iter().map(RecordResponse::from).collect(),
    )))
}
