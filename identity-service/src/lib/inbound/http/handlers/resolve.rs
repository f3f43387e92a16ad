use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::ProfileData;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::Subject;
use crate::inbound::http::router::InternalState;

/// Password-less lookup for trusted internal callers.
pub async fn resolve(
    State(state): State<InternalState>,
    Json(body): Json<ResolveRequest>,
) -> Result<ApiSuccess<ProfileData>, ApiError> {
    let subject = Subject::from_parts(body.email, body.username, body.user_id)
        .map_err(IdentityError::from)?;

    state
        .credential_service
        .resolve(subject)
        .await
        .map_err(ApiError::from)
        .map(|ref profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResolveRequest {
    email: Option<String>,
    username: Option<String>,
    user_id: Option<String>,
}
