use axum::{
    middleware,
    routing::{get, post},
    Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    models::ListKind,
};

use super::handlers;
use super::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Routes under /api
fn api_routes() -> Router<AppState> {
    let catalog = Router::new()
        .route("/movies", get(handlers::list_movies))
        .route("/search", get(handlers::search))
        .route("/movie/:id", get(handlers::movie_details));

    ListKind::ALL.into_iter().fold(catalog, |router, kind| {
        router.nest(&format!("/{}", kind.route()), list_routes(kind))
    })
}

/// The same three operations for each list, told apart by the `ListKind` extension
fn list_routes(kind: ListKind) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_memberships).post(handlers::add_membership_from_body),
        )
        .route(
            "/:movie_id",
            post(handlers::add_membership).delete(handlers::remove_membership),
        )
        .layer(Extension(kind))
}
