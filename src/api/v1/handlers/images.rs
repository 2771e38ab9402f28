/*
 * Responsibility
 * - POST /v1/image (multipart の `file` を受けて保存し、公開 URL を返す)
 * - 拡張子 / サイズの検査は services::image_store 側
 */
use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};

use crate::{
    api::v1::dto::{Envelope, images::ImageResponse},
    error::AppError,
    services::image_store::validate_upload,
    state::AppState,
};

const FILE_FIELD: &str = "file";

pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Envelope<ImageResponse>>), AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        let extension = validate_upload(&file_name, bytes.len())?;

        let image_url = state.images.put(extension, bytes).await?;
        tracing::info!(
            backend = state.images.backend_name(),
            %image_url,
            "image uploaded"
        );

        return Ok((
            StatusCode::OK,
            Json(Envelope::new("File uploaded successfully", ImageResponse { image_url })),
        ));
    }

    Err(AppError::bad_request(
        "INVALID_MULTIPART",
        "multipart field `file` is required",
    ))
}
