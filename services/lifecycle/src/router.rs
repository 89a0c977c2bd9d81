use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use tollgate_core::health::healthz;
use tollgate_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    cleanup::{delete_stale, list_stale, sweep_expired},
    health::readyz,
    triggers::{post_confirmation, pre_sign_up},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Directory triggers
        .route("/triggers/pre-sign-up", post(pre_sign_up))
        .route("/triggers/post-confirmation", post(post_confirmation))
        // Cleanup
        .route("/cleanup/list", post(list_stale))
        .route("/cleanup/delete", post(delete_stale))
        .route("/cleanup/sweep-expired", post(sweep_expired))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
