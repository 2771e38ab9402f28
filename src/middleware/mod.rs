/*
 * Responsibility
 * - middleware の公開インターフェース
 * - http: 全ルート共通 (request-id / trace / limit / timeout / panic)
 * - auth: Bearer token の検証と role による認可 (route 単位で適用)
 */
pub mod auth;
pub mod http;
