//! access token (HS256 JWT) 検証 + role 認可 → AuthCtx を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` を TokenCodec で検証する
//! - claim の role が AccessPolicy に含まれなければ拒否
//! - 拒否理由は warn ログにだけ残し、client には一律 401 を返す

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};
use thiserror::Error;

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{Role, TokenCodec, TokenError};

/// Which roles a gated route admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// IT staff only (staff account management).
    OperatorOnly,
    /// IT staff or nurses (patients, records, images).
    Staff,
}

impl AccessPolicy {
    pub fn admits(self, role: Role) -> bool {
        match (self, role) {
            (AccessPolicy::OperatorOnly, Role::Operator) => true,
            (AccessPolicy::OperatorOnly, Role::Caregiver) => false,
            (AccessPolicy::Staff, Role::Operator | Role::Caregiver) => true,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthRejection {
    #[error("authorization header missing")]
    HeaderMissing,
    #[error("authorization header is not a bearer token")]
    HeaderMalformed,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("role {role} is not admitted by {policy:?}")]
    RoleForbidden { role: Role, policy: AccessPolicy },
}

#[derive(Clone)]
struct Gate {
    tokens: Arc<TokenCodec>,
    policy: AccessPolicy,
}

/// Gate every route of `router` behind `policy`.
///
/// `route_layer` is used so unmatched paths still fall through to 404 instead
/// of being answered with 401.
///
/// ```ignore
/// let staff = Router::new().route("/medical/patient", get(list_patients));
/// let staff = middleware::auth::access::apply(staff, state.tokens.clone(), AccessPolicy::Staff);
/// ```
pub fn apply<S>(router: Router<S>, tokens: Arc<TokenCodec>, policy: AccessPolicy) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(
        Gate { tokens, policy },
        access_middleware,
    ))
}

async fn access_middleware(
    State(gate): State<Gate>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let ctx = match authorize(&gate.tokens, gate.policy, req.headers()) {
        Ok(ctx) => ctx,
        Err(reason) => {
            tracing::warn!(
                error = %reason,
                path = %req.uri().path(),
                "access denied"
            );
            return Err(AppError::Unauthorized);
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}

pub fn authorize(
    tokens: &TokenCodec,
    policy: AccessPolicy,
    headers: &HeaderMap,
) -> Result<AuthCtx, AuthRejection> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthRejection::HeaderMissing)?;
    let raw = raw.to_str().map_err(|_| AuthRejection::HeaderMalformed)?;

    let token = raw
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthRejection::HeaderMalformed)?;

    let verified = tokens.verify(token)?;

    if !policy.admits(verified.role) {
        return Err(AuthRejection::RoleForbidden {
            role: verified.role,
            policy,
        });
    }

    Ok(AuthCtx::new(verified.subject, verified.role))
}
