use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::TokenPairData;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::Subject;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let subject = Subject::from_parts(body.email, body.username, body.user_id)
        .map_err(IdentityError::from)?;

    let user_id = state
        .credential_service
        .login(LoginCommand::new(subject, body.password))
        .await?;

    let tokens = state.token_manager.issue_pair(&user_id.to_string())?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            user_id: user_id.to_string(),
            tokens: tokens.into(),
        },
    ))
}

/// Exactly one of `email`, `username` or `user_id` selects the identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    username: Option<String>,
    user_id: Option<String>,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub user_id: String,
    #[serde(flatten)]
    pub tokens: TokenPairData,
}
