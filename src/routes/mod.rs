//! HTTP route trees.

use axum::Router;

use crate::state::SharedState;

/// Lobby chat endpoints.
pub mod chat;
/// Swagger UI and OpenAPI document.
pub mod docs;
/// Health check endpoint.
pub mod health;
/// Registration, session, and lobby endpoints.
pub mod player;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router().merge(player::router()).merge(chat::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
