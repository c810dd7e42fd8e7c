//! Bearer-token authentication layer.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use formhub_core::policy::Caller;
use surrealdb::Connection;
use tracing::debug;

use crate::api::error::ApiError;
use crate::state::AppState;

/// The authenticated caller, inserted into request extensions.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub caller: Caller,
}

/// Extract the token from an `Authorization: Bearer <token>` value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Verify the bearer token, load the caller it names and attach an
/// [`AuthContext`]. Role and linked admin come from the stored user, not
/// from the token.
pub async fn require_auth<C: Connection>(
    State(state): State<AppState<C>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_owned)
        .ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;

    let claims = state.auth.authenticate(&token)?;
    let user = state.auth.current_user(&claims).await?;
    let caller = Caller::from(&user);

    debug!(user_id = %caller.user_id, role = %caller.role, "request authenticated");
    req.extensions_mut().insert(AuthContext { caller });

    Ok(next.run(req).await)
}
