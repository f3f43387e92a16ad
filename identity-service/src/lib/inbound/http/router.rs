use std::sync::Arc;
use std::time::Duration;

use auth::TokenManager;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::availability::check_availability;
use super::handlers::login::login;
use super::handlers::me::me;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::handlers::resolve::resolve;
use super::middleware::authenticate as auth_middleware;
use crate::domain::identity::ports::CredentialServicePort;

#[derive(Clone)]
pub struct AppState {
    pub credential_service: Arc<dyn CredentialServicePort>,
    pub token_manager: Arc<dyn TokenManager>,
}

/// State of the internal listener. No token manager: callers are trusted by network placement.
#[derive(Clone)]
pub struct InternalState {
    pub credential_service: Arc<dyn CredentialServicePort>,
}

/// Routes served to end users on the public listener.
pub fn create_router(
    credential_service: Arc<dyn CredentialServicePort>,
    token_manager: Arc<dyn TokenManager>,
) -> Router {
    let state = AppState {
        credential_service,
        token_manager,
    };

    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/availability", post(check_availability));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .with_state(state);

    with_tracing(router)
}

/// Routes for trusted services, served on the internal listener only.
pub fn create_internal_router(credential_service: Arc<dyn CredentialServicePort>) -> Router {
    let router = Router::new()
        .route("/internal/identities/resolve", post(resolve))
        .with_state(InternalState { credential_service });

    with_tracing(router)
}

fn with_tracing(router: Router) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    router.layer(trace_layer)
}
