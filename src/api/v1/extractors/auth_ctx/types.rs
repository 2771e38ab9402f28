/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - gate middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックは middleware/services 側の責務
 */
use crate::services::auth::Role;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` は token の `sub` (users.id)
/// - `role` は token の `role` claim。gate の policy はこれで判定済み
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: String,
    pub role: Role,
}

impl AuthCtx {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }
}
