//! Chat operations: authenticated posting and time-windowed retrieval.

use crate::{
    dto::chat::{ChatHistoryResponse, PostChatRequest},
    error::ServiceError,
    state::{SharedState, chat::ChatMessage},
};

/// Post a chat message on behalf of an active session.
///
/// The token must resolve to a logged-in player; the author's nick is taken
/// from the session, never from the request.
pub async fn post_chat(
    state: &SharedState,
    request: PostChatRequest,
) -> Result<ChatMessage, ServiceError> {
    let session = state.sessions().resolve(request.token).await?;
    let message = state
        .chat()
        .append(session.player_id, session.nick, request.text)
        .await?;
    Ok(message)
}

/// Chat messages strictly newer than `since_ms`, clamped to the retention
/// window. Reads require no session (kept from the original product sketch).
pub async fn chat_since(state: &SharedState, since_ms: u64) -> ChatHistoryResponse {
    ChatHistoryResponse {
        messages: state.chat().since(since_ms).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    use crate::dto::player::{ConnectRequest, RegisterRequest};
    use crate::services::{player_service, testing::test_state};
    use crate::state::SharedState;

    async fn connected_token(state: &SharedState, nick: &str) -> Uuid {
        player_service::register(
            state,
            RegisterRequest {
                nick: nick.into(),
                pass: "pw".into(),
            },
        )
        .await
        .expect("register");
        player_service::connect(
            state,
            ConnectRequest {
                nick: nick.into(),
                pass: "pw".into(),
                avatar: 0,
            },
        )
        .await
        .expect("connect")
        .token
    }

    #[tokio::test]
    async fn post_then_read_round_trips() {
        let state = test_state(4).await;
        let token = connected_token(&state, "alice").await;

        let posted = post_chat(
            &state,
            PostChatRequest {
                token,
                text: "hello".into(),
            },
        )
        .await
        .expect("post");

        let history = chat_since(&state, posted.timestamp_ms - 1).await;
        assert_eq!(history.messages, vec![posted]);
        assert_eq!(history.messages[0].author_nick, "alice");
    }

    #[tokio::test]
    async fn posting_without_a_session_is_rejected() {
        let state = test_state(4).await;

        let err = post_chat(
            &state,
            PostChatRequest {
                token: Uuid::new_v4(),
                text: "hello".into(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ServiceError::InvalidSession));
        assert!(chat_since(&state, 0).await.messages.is_empty());
    }

    #[tokio::test]
    async fn posting_after_logout_is_rejected() {
        let state = test_state(4).await;
        let token = connected_token(&state, "alice").await;
        player_service::logout(&state, token).await;

        let err = post_chat(
            &state,
            PostChatRequest {
                token,
                text: "hello".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidSession));
    }

    #[tokio::test]
    async fn empty_message_is_an_invalid_argument() {
        let state = test_state(4).await;
        let token = connected_token(&state, "alice").await;

        let err = post_chat(
            &state,
            PostChatRequest {
                token,
                text: String::new(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn chat_reads_work_in_degraded_mode() {
        // Chat and sessions are in-memory; losing the database must not take
        // the chat endpoints down with it.
        let state = test_state(4).await;
        let token = connected_token(&state, "alice").await;
        state.clear_player_store().await;

        post_chat(
            &state,
            PostChatRequest {
                token,
                text: "still here".into(),
            },
        )
        .await
        .expect("post without storage");
        assert_eq!(chat_since(&state, 0).await.messages.len(), 1);
    }
}
