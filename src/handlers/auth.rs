use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::AppState;
use crate::utils::ApiError;

/// Id of the caller, injected by the upstream authenticator as a request header.
///
/// The header is trusted as already verified; only its shape is checked here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub i64);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(state.config.user_id_header.as_str())
            .ok_or_else(|| ApiError::unauthorized("Authenticated user is required"))?;

        value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|&id| id > 0)
            .map(CurrentUser)
            .ok_or_else(|| ApiError::unauthorized("Invalid authenticated user"))
    }
}
