/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - db: PgPool, tokens: TokenCodec, 各ドメインの service, 画像ストア
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use sqlx::PgPool;

use crate::services::auth::TokenCodec;
use crate::services::image_store::ImageStore;
use crate::services::patient_service::PatientService;
use crate::services::record_service::RecordService;
use crate::services::user_service::UserService;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub tokens: Arc<TokenCodec>,
    pub users: UserService,
    pub patients: PatientService,
    pub records: RecordService,
    pub images: Arc<dyn ImageStore>,
}

impl AppState {
    pub fn new(
        db: PgPool,
        tokens: Arc<TokenCodec>,
        token_ttl: chrono::Duration,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            users: UserService::new(db.clone(), tokens.clone(), token_ttl),
            patients: PatientService::new(db.clone()),
            records: RecordService::new(db.clone()),
            db,
            tokens,
            images,
        }
    }
}
