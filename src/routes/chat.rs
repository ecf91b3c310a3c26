//! Routes for the lobby chat.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};

use crate::{
    dto::chat::{ChatHistoryResponse, ChatQuery, PostChatRequest},
    error::AppError,
    services::chat_service,
    state::{SharedState, chat::ChatMessage},
};

/// Configure the chat routes subtree.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/get_chat", get(get_chat))
        .route("/post_chat", post(post_chat))
}

#[utoipa::path(
    get,
    path = "/get_chat",
    tag = "chat",
    params(ChatQuery),
    responses(
        (status = 200, description = "Messages newer than `since`, oldest first", body = ChatHistoryResponse)
    )
)]
/// Return retained chat messages newer than the given timestamp. Requests
/// reaching further back than the retention window are clamped to it.
pub async fn get_chat(
    State(state): State<SharedState>,
    Query(query): Query<ChatQuery>,
) -> Json<ChatHistoryResponse> {
    Json(chat_service::chat_since(&state, query.since).await)
}

#[utoipa::path(
    post,
    path = "/post_chat",
    tag = "chat",
    request_body = PostChatRequest,
    responses(
        (status = 200, description = "The appended message", body = ChatMessage),
        (status = 401, description = "Invalid session token or message")
    )
)]
/// Append a chat message on behalf of an active session.
pub async fn post_chat(
    State(state): State<SharedState>,
    Json(payload): Json<PostChatRequest>,
) -> Result<Json<ChatMessage>, AppError> {
    let message = chat_service::post_chat(&state, payload).await?;
    Ok(Json(message))
}
