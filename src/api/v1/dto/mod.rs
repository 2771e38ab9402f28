/*
 * Responsibility
 * - v1 の request/response DTO
 * - 形式チェックは各 request の validate() で行い、handler が 400 に変換する
 */
pub mod envelope;
pub mod images;
pub mod patients;
pub mod records;
pub mod users;
mod validate;

pub use envelope::Envelope;
