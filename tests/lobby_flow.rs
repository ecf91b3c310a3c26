//! End-to-end scenarios over the service facade, backed by an in-memory
//! database.

use lobby_back::{
    config::AppConfig,
    dao::player_store::sqlite::{SqliteConfig, SqlitePlayerStore},
    dto::{
        chat::PostChatRequest,
        player::{ConnectRequest, RegisterRequest},
    },
    error::ServiceError,
    services::{chat_service, player_service},
    state::{AppState, SharedState},
};

async fn lobby(max_players: usize) -> SharedState {
    let config = AppConfig {
        max_active_players: max_players,
        ..AppConfig::default()
    };
    let state = AppState::new(config);
    let store = SqlitePlayerStore::connect(SqliteConfig::in_memory())
        .await
        .expect("in-memory store");
    state.set_player_store(store).await;
    state
}

async fn register(state: &SharedState, nick: &str, pass: &str) {
    player_service::register(
        state,
        RegisterRequest {
            nick: nick.into(),
            pass: pass.into(),
        },
    )
    .await
    .expect("register");
}

async fn connect(
    state: &SharedState,
    nick: &str,
    pass: &str,
) -> Result<lobby_back::dto::player::ConnectResponse, ServiceError> {
    player_service::connect(
        state,
        ConnectRequest {
            nick: nick.into(),
            pass: pass.into(),
            avatar: 0,
        },
    )
    .await
}

#[tokio::test]
async fn full_player_lifecycle() {
    let state = lobby(64).await;
    register(&state, "alice", "pw1").await;

    // Fresh player: token plus zeroed stats.
    let session = connect(&state, "alice", "pw1").await.expect("connect");
    assert_eq!((session.wins, session.losses), (0, 0));

    // Wrong password is an authentication failure, not a crash or conflict.
    assert!(matches!(
        connect(&state, "alice", "wrong").await.unwrap_err(),
        ServiceError::AuthFailed
    ));

    // The session can chat and shows up in the lobby.
    let posted = chat_service::post_chat(
        &state,
        PostChatRequest {
            token: session.token,
            text: "hello".into(),
        },
    )
    .await
    .expect("post");

    let history = chat_service::chat_since(&state, posted.timestamp_ms - 1).await;
    assert_eq!(history.messages.len(), 1);
    assert_eq!(history.messages[0].text, "hello");
    assert_eq!(history.messages[0].author_nick, "alice");

    let lobby_list = player_service::active_players(&state).await;
    assert_eq!(lobby_list.players.len(), 1);
    assert_eq!(lobby_list.players[0].nick, "alice");

    // Logout is idempotent and invalidates the token.
    assert!(player_service::logout(&state, session.token).await);
    assert!(!player_service::logout(&state, session.token).await);
    assert!(matches!(
        chat_service::post_chat(
            &state,
            PostChatRequest {
                token: session.token,
                text: "ghost".into(),
            },
        )
        .await
        .unwrap_err(),
        ServiceError::InvalidSession
    ));
    assert!(player_service::active_players(&state).await.players.is_empty());
}

#[tokio::test]
async fn a_full_lobby_rejects_the_next_login_only() {
    let state = lobby(64).await;
    for n in 0..65 {
        register(&state, &format!("player-{n:02}"), "pw").await;
    }

    let mut tokens = Vec::new();
    for n in 0..64 {
        let session = connect(&state, &format!("player-{n:02}"), "pw")
            .await
            .expect("under capacity");
        tokens.push(session.token);
    }

    assert!(matches!(
        connect(&state, "player-64", "pw").await.unwrap_err(),
        ServiceError::ServerFull
    ));
    assert_eq!(player_service::active_players(&state).await.players.len(), 64);

    // Freeing one slot admits the waiting player.
    player_service::logout(&state, tokens[0]).await;
    connect(&state, "player-64", "pw")
        .await
        .expect("slot freed by logout");
}

#[tokio::test]
async fn concurrent_login_storm_never_exceeds_capacity() {
    let state = lobby(16).await;
    for n in 0..48 {
        register(&state, &format!("racer-{n:02}"), "pw").await;
    }

    let mut handles = Vec::new();
    for n in 0..48 {
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            connect(&state, &format!("racer-{n:02}"), "pw").await
        }));
    }

    let mut admitted = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.expect("task") {
            Ok(_) => admitted += 1,
            Err(ServiceError::ServerFull) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(admitted, 16);
    assert_eq!(rejected, 32);
    assert_eq!(player_service::active_players(&state).await.players.len(), 16);
}

#[tokio::test]
async fn chat_reads_are_clamped_to_the_retention_window() {
    let state = lobby(4).await;
    register(&state, "alice", "pw").await;
    let session = connect(&state, "alice", "pw").await.unwrap();

    let posted = chat_service::post_chat(
        &state,
        PostChatRequest {
            token: session.token,
            text: "recent".into(),
        },
    )
    .await
    .unwrap();

    // Asking from the epoch returns at most the window.
    let from_epoch = chat_service::chat_since(&state, 0).await;
    assert_eq!(from_epoch.messages.len(), 1);

    // Nothing at or before the requested timestamp is ever returned.
    let nothing = chat_service::chat_since(&state, posted.timestamp_ms).await;
    assert!(nothing.messages.is_empty());
}

#[tokio::test]
async fn responses_keep_the_wire_field_names() {
    let state = lobby(4).await;
    register(&state, "alice", "pw").await;
    let session = connect(&state, "alice", "pw").await.unwrap();

    let body = serde_json::to_value(&session).expect("serialize session");
    assert_eq!(body["token"], serde_json::json!(session.token));
    assert_eq!(body["wins"], 0);
    assert_eq!(body["losses"], 0);

    let posted = chat_service::post_chat(
        &state,
        PostChatRequest {
            token: session.token,
            text: "hello".into(),
        },
    )
    .await
    .unwrap();

    let body = serde_json::to_value(&posted).expect("serialize message");
    assert_eq!(body["author_nick"], "alice");
    assert_eq!(body["text"], "hello");
    assert!(body["timestamp_ms"].is_u64());
    assert!(body["author_id"].is_i64());
}
