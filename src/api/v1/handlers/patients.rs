/*
 * Responsibility
 * - /v1/medical/patient (登録 / 検索)
 * - IT / Nurse どちらの token でも通る (gate 側で判定済み)
 */
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    api::v1::dto::{
        Envelope,
        patients::{CreatePatientRequest, ListPatientsQuery, PatientResponse},
    },
    api::v1::extractors::ApiJson,
    error::AppError,
    state::AppState,
};

pub async fn create_patient(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Envelope<PatientResponse>>), AppError> {
    req.validate().map_err(AppError::validation)?;

    let row = state.patients.register(&req.as_input()).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::new("Patient registered successfully", row.into())),
    ))
}

pub async fn list_patients(
    State(state): State<AppState>,
    Query(query): Query<ListPatientsQuery>,
) -> Result<Json<Envelope<Vec<PatientResponse>>>, AppError> {
    let rows = state.patients.list(&query.into_filter()).await?;

    Ok(Json(Envelope::new(
        "Patients fetched successfully",
        rows.into_iter().map(PatientResponse::from).collect(),
    )))
}
