//! Chat request and response payloads.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::state::chat::ChatMessage;

/// Query parameters accepted by the chat history endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ChatQuery {
    /// Return messages strictly newer than this unix-millisecond timestamp.
    /// Omitting it (or passing 0) asks for the whole retention window.
    #[serde(default)]
    pub since: u64,
}

/// Payload posting a chat message on behalf of a session.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PostChatRequest {
    /// Session token authorizing the post.
    pub token: Uuid,
    /// Message body (1-512 bytes).
    pub text: String,
}

/// Chat messages newer than the requested timestamp, oldest first.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatHistoryResponse {
    /// Retained messages, oldest first.
    pub messages: Vec<ChatMessage>,
}
