/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - public / IT 専用 / staff (IT + Nurse) の 3 つの router を merge
 * - gate は route_layer で router 単位に掛ける
 */
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

use crate::middleware::auth::{AccessPolicy, access};
use crate::services::image_store::MAX_IMAGE_BYTES;
use crate::state::AppState;

use crate::api::v1::handlers::{
    images::upload_image,
    patients::{create_patient, list_patients},
    records::{create_record, list_records},
    users::{
        delete_nurse, grant_nurse_access, list_users, login_it, login_nurse, register_it,
        register_nurse, update_nurse,
    },
};

// multipart の boundary / header 分の余白
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/user/it/register", post(register_it))
        .route("/user/it/login", post(login_it))
        .route("/user/nurse/login", post(login_nurse));

    let operator = Router::new()
        .route("/user", get(list_users))
        .route("/user/nurse/register", post(register_nurse))
        .route("/user/nurse/{user_id}", put(update_nurse).delete(delete_nurse))
        .route("/user/nurse/{user_id}/access", post(grant_nurse_access));
    let operator = access::apply(operator, state.tokens.clone(), AccessPolicy::OperatorOnly);

    let staff = Router::new()
        .route("/medical/patient", get(list_patients).post(create_patient))
        .route("/medical/record", get(list_records).post(create_record))
        .route(
            "/image",
            post(upload_image)
                .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + MULTIPART_OVERHEAD_BYTES)),
        );
    let staff = access::apply(staff, state.tokens.clone(), AccessPolicy::Staff);

    public.merge(operator).merge(staff)
}
