/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - repo / service / extractor のエラーを網羅的な match で HTTP の意味に変換
 * - 想定外のものは 500 (ログだけ詳細を残す)
 */
use axum::{
    Json,
    extract::rejection::JsonRejection,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::image_store::ImageError;
use crate::services::patient_service::PatientError;
use crate::services::record_service::RecordError;
use crate::services::user_service::UserError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("{code}: {message}")]
    Conflict { code: &'static str, message: String },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::bad_request("VALIDATION_FAILED", message)
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            AppError::BadRequest { code, message } => (code, message),
            AppError::Unauthorized => ("UNAUTHORIZED", "unauthorized".into()),
            AppError::NotFound { resource } => ("NOT_FOUND", format!("{resource} not found.")),
            AppError::Conflict { code, message } => (code, message),
            AppError::Internal => ("INTERNAL_SERVER_ERROR", "internal server error".into()),
        };

        error_response(status, code, message)
    }
}

/// JSON error body shared by `AppError` and the HTTP-level layers.
pub fn error_response(status: StatusCode, code: &'static str, message: String) -> Response {
    let body = ErrorResponse {
        error: ErrorBody { code, message },
    };

    (status, Json(body)).into_response()
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::conflict("CONFLICT", "conflict"),
            RepoError::MissingReference => AppError::not_found("resource"),
            RepoError::Db(e) => {
                tracing::error!(error = %e, "database error");
                AppError::Internal
            }
        }
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::NotFound => AppError::not_found("user"),
            UserError::NipAlreadyExists => {
                AppError::conflict("NIP_ALREADY_EXISTS", "NIP already exists")
            }
            UserError::PasswordNotCreated => AppError::bad_request(
                "PASSWORD_NOT_CREATED",
                "user has not been granted access yet",
            ),
            UserError::WrongPassword => AppError::bad_request("WRONG_PASSWORD", "wrong password"),
            UserError::Repo(e) => e.into(),
            UserError::Token(e) => {
                tracing::error!(error = %e, "failed to issue access token");
                AppError::Internal
            }
            UserError::Password(e) => {
                tracing::error!(error = %e, "password hashing failed");
                AppError::Internal
            }
        }
    }
}

impl From<PatientError> for AppError {
    fn from(e: PatientError) -> Self {
        match e {
            PatientError::IdentityNumberAlreadyExists => AppError::conflict(
                "IDENTITY_NUMBER_ALREADY_EXISTS",
                "identity number already exists",
            ),
            PatientError::Repo(e) => e.into(),
        }
    }
}

impl From<RecordError> for AppError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::PatientNotFound => AppError::not_found("patient"),
            RecordError::AuthorNotFound => AppError::not_found("user"),
            RecordError::Repo(e) => e.into(),
        }
    }
}

impl From<ImageError> for AppError {
    fn from(e: ImageError) -> Self {
        match e {
            ImageError::UnsupportedType | ImageError::InvalidSize => {
                AppError::bad_request("INVALID_IMAGE", e.to_string())
            }
            ImageError::Storage(e) => {
                tracing::error!(error = %e, "image storage failed");
                AppError::Internal
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::bad_request("INVALID_JSON", e.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::bad_request("INVALID_MULTIPART", e.body_text())
    }
}
