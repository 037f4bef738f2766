//! HTTP routing — pure glue mapping verbs/paths to service calls.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the service router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7). Static
/// segments (`/patient/details`) take priority over `/patient/:id`.
pub fn api_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/patient/extract_text", post(endpoints::patients::extract_text))
        .route("/patient", get(endpoints::patients::list))
        .route("/patient/details", post(endpoints::patients::details))
        .route(
            "/patient/:id",
            get(endpoints::patients::detail)
                .put(endpoints::patients::update)
                .delete(endpoints::patients::remove),
        )
        .route(
            "/patient/:id/upload_file",
            post(endpoints::patients::upload_file),
        )
        .route(
            "/patients/:id/notes",
            get(endpoints::notes::list_for_patient).post(endpoints::notes::create),
        )
        .route(
            "/notes/:id",
            get(endpoints::notes::detail)
                .put(endpoints::notes::update)
                .delete(endpoints::notes::remove),
        )
        // GET/POST take a patient id, DELETE a summary id — inherited surface.
        .route(
            "/summary/:id",
            get(endpoints::summaries::list_for_patient)
                .post(endpoints::summaries::generate)
                .delete(endpoints::summaries::remove),
        )
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
