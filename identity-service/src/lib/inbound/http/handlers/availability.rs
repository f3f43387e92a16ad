use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::identity::models::Availability;
use crate::inbound::http::router::AppState;

pub async fn check_availability(
    State(state): State<AppState>,
    Json(body): Json<AvailabilityRequest>,
) -> Result<ApiSuccess<Availability>, ApiError> {
    let availability = state
        .credential_service
        .check_availability(&body.email, &body.username)
        .await?;

    Ok(ApiSuccess::new(StatusCode::OK, availability))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AvailabilityRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    username: String,
}
