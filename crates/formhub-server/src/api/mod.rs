//! HTTP API surface.

pub mod auth_handlers;
pub mod error;
pub mod form_handlers;
pub mod health;
pub mod middleware;
pub mod submission_handlers;

use axum::Router;
use axum::routing::{get, post};
use surrealdb::Connection;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
///
/// Everything under `/api/forms` sits behind the bearer-token layer;
/// registration, login and the health probe are public.
pub fn router<C: Connection>(state: AppState<C>) -> Router {
    let protected = Router::new()
        .route(
            "/api/forms",
            post(form_handlers::create_form::<C>).get(form_handlers::list_forms::<C>),
        )
        .route(
            "/api/forms/:id",
            get(form_handlers::get_form::<C>)
                .put(form_handlers::update_form::<C>)
                .delete(form_handlers::delete_form::<C>),
        )
        .route(
            "/api/forms/:id/submissions",
            post(submission_handlers::create_submission::<C>)
                .get(submission_handlers::list_submissions::<C>),
        )
        .route(
            "/api/forms/submissions/:id",
            get(submission_handlers::get_submission::<C>)
                .put(submission_handlers::edit_submission::<C>),
        )
        .route(
            "/api/forms/submissions/:id/revisions",
            get(submission_handlers::list_revisions::<C>),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth::<C>,
        ));

    Router::new()
        .route("/health", get(health::health))
        .route("/api/auth/register", post(auth_handlers::register::<C>))
        .route("/api/auth/login", post(auth_handlers::login::<C>))
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
