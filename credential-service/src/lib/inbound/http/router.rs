use std::sync::Arc;
use std::time::Duration;

use auth::TokenValidator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::patch;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_user::create_user;
use super::handlers::create_user_id::create_user_id;
use super::handlers::delete_user::delete_user;
use super::handlers::login_user::login_user;
use super::handlers::refresh_token::refresh_token;
use super::handlers::update_password::update_password;
use super::middleware::authenticate;
use crate::credential::ports::CredentialServicePort;

#[derive(Clone)]
pub struct AppState {
    pub credential_service: Arc<dyn CredentialServicePort>,
    pub token_validator: Arc<TokenValidator>,
}

pub fn create_router(
    credential_service: Arc<dyn CredentialServicePort>,
    token_validator: Arc<TokenValidator>,
) -> Router {
    let state = AppState {
        credential_service,
        token_validator,
    };

    let public_routes = Router::new()
        .route("/user", post(create_user_id))
        .route("/user/:user_id", put(create_user))
        .route("/user/:user_id/login", post(login_user))
        .route("/user/:user_id/refresh", patch(refresh_token));

    let protected_routes = Router::new()
        .route("/user/:user_id", patch(update_password).delete(delete_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    // Headers are not recorded: they carry bearer and refresh tokens.
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

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
