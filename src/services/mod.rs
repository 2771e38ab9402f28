/*
 * Responsibility
 * - ドメインのユースケース (users / patients / records / images)
 * - 認証トークン・パスワードなどの横断的な部品
 */
pub mod auth;
pub mod image_store;
pub mod password;
pub mod patient_service;
pub mod record_service;
pub mod user_service;

/// Primary key for newly created rows.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
