//! Player manager facade: registration, login/logout, and the lobby listing.
//!
//! Per player the lifecycle is `Anonymous -> connect -> ActiveSession ->
//! (logout | idle sweep) -> Anonymous`, composed from the credential store
//! and the session registry.

use argon2::{
    Argon2, PasswordHasher, PasswordVerifier,
    password_hash::{PasswordHash, SaltString, rand_core::OsRng},
};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        player::{
            ActivePlayersResponse, ConnectRequest, ConnectResponse, PlayerSummary, RegisterRequest,
        },
        validation::validate_nick,
    },
    error::ServiceError,
    state::SharedState,
};

use super::with_storage_timeout;

/// Register a new player, storing only the salted argon2 verifier.
pub async fn register(
    state: &SharedState,
    request: RegisterRequest,
) -> Result<PlayerSummary, ServiceError> {
    request.validate()?;
    validate_nick(&request.nick).map_err(invalid_nick)?;

    let store = state.require_player_store().await?;
    let pass_hash = hash_password(&request.pass)?;

    let player = with_storage_timeout(state, store.create_player(request.nick, pass_hash)).await?;

    info!(nick = %player.nick, player_id = player.id, "player registered");
    Ok(player.into())
}

/// Authenticate a player and admit them into the lobby.
///
/// Unknown nick and wrong password both surface as [`ServiceError::AuthFailed`]
/// so responses cannot be used to probe which nicks exist.
pub async fn connect(
    state: &SharedState,
    request: ConnectRequest,
) -> Result<ConnectResponse, ServiceError> {
    request.validate()?;
    validate_nick(&request.nick).map_err(invalid_nick)?;

    let store = state.require_player_store().await?;
    let Some(player) = with_storage_timeout(state, store.find_by_nick(request.nick)).await? else {
        return Err(ServiceError::AuthFailed);
    };

    if !verify_password(&request.pass, &player.pass_hash) {
        warn!(nick = %player.nick, "login rejected: bad password");
        return Err(ServiceError::AuthFailed);
    }

    let entry = state
        .sessions()
        .login(player.id, player.nick, request.avatar)
        .await?;

    Ok(ConnectResponse {
        token: entry.token,
        wins: player.wins,
        losses: player.losses,
    })
}

/// Close the session bound to `token`. Idempotent: closing an unknown or
/// already-closed session is not an error.
pub async fn logout(state: &SharedState, token: Uuid) -> bool {
    state.sessions().logout(token).await
}

/// Lobby listing of all logged-in players, oldest login first.
pub async fn active_players(state: &SharedState) -> ActivePlayersResponse {
    let players = state
        .sessions()
        .list_active()
        .await
        .into_iter()
        .map(Into::into)
        .collect();
    ActivePlayersResponse { players }
}

/// Record the outcome of a finished match for a player. Entry point for the
/// match-result collaborator; not exposed over HTTP.
pub async fn record_match_result(
    state: &SharedState,
    player_id: i64,
    won: bool,
) -> Result<(), ServiceError> {
    let store = state.require_player_store().await?;
    with_storage_timeout(state, store.record_match_result(player_id, won)).await
}

/// Compute the salted argon2 verifier for a raw password.
fn hash_password(pass: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(pass.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| ServiceError::InvalidArgument("password could not be hashed".into()))
}

/// Constant-time verification of a raw password against a stored verifier.
/// An unparsable stored hash verifies as `false`, never as an error.
fn verify_password(pass: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        warn!("stored password verifier is unparsable");
        return false;
    };
    Argon2::default()
        .verify_password(pass.as_bytes(), &parsed)
        .is_ok()
}

/// Turn a nick validation failure into the service taxonomy.
fn invalid_nick(err: validator::ValidationError) -> ServiceError {
    let message = err
        .message
        .map(|m| m.to_string())
        .unwrap_or_else(|| "invalid nick".into());
    ServiceError::InvalidArgument(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::test_state;

    fn register_request(nick: &str, pass: &str) -> RegisterRequest {
        RegisterRequest {
            nick: nick.into(),
            pass: pass.into(),
        }
    }

    fn connect_request(nick: &str, pass: &str) -> ConnectRequest {
        ConnectRequest {
            nick: nick.into(),
            pass: pass.into(),
            avatar: 0,
        }
    }

    #[tokio::test]
    async fn register_then_connect_issues_token_and_stats() {
        let state = test_state(4).await;
        register(&state, register_request("alice", "pw1"))
            .await
            .expect("register");

        let response = connect(&state, connect_request("alice", "pw1"))
            .await
            .expect("connect");

        assert_eq!(response.wins, 0);
        assert_eq!(response.losses, 0);
        assert_eq!(state.sessions().len().await, 1);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_nick_are_indistinguishable() {
        let state = test_state(4).await;
        register(&state, register_request("alice", "pw1"))
            .await
            .unwrap();

        let wrong_pass = connect(&state, connect_request("alice", "wrong"))
            .await
            .unwrap_err();
        let unknown_nick = connect(&state, connect_request("mallory", "pw1"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_pass, ServiceError::AuthFailed));
        assert!(matches!(unknown_nick, ServiceError::AuthFailed));
    }

    #[tokio::test]
    async fn duplicate_registration_is_a_conflict() {
        let state = test_state(4).await;
        register(&state, register_request("alice", "pw1"))
            .await
            .unwrap();

        let err = register(&state, register_request("alice", "other"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn second_login_is_a_conflict() {
        let state = test_state(4).await;
        register(&state, register_request("alice", "pw1"))
            .await
            .unwrap();
        connect(&state, connect_request("alice", "pw1"))
            .await
            .unwrap();

        let err = connect(&state, connect_request("alice", "pw1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn empty_credentials_are_invalid_arguments() {
        let state = test_state(4).await;

        let err = connect(&state, connect_request("", "pw")).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));

        let err = connect(&state, connect_request("alice", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn login_past_capacity_is_server_full() {
        let state = test_state(2).await;
        for nick in ["a", "b", "c"] {
            register(&state, register_request(nick, "pw")).await.unwrap();
        }
        connect(&state, connect_request("a", "pw")).await.unwrap();
        connect(&state, connect_request("b", "pw")).await.unwrap();

        let err = connect(&state, connect_request("c", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ServerFull));
    }

    #[tokio::test]
    async fn logout_frees_capacity_and_is_idempotent() {
        let state = test_state(1).await;
        register(&state, register_request("a", "pw")).await.unwrap();
        register(&state, register_request("b", "pw")).await.unwrap();
        let response = connect(&state, connect_request("a", "pw")).await.unwrap();

        assert!(logout(&state, response.token).await);
        assert!(!logout(&state, response.token).await);

        connect(&state, connect_request("b", "pw"))
            .await
            .expect("slot freed");
    }

    #[tokio::test]
    async fn active_players_lists_in_login_order() {
        let state = test_state(4).await;
        for nick in ["carol", "alice", "bob"] {
            register(&state, register_request(nick, "pw")).await.unwrap();
            connect(&state, connect_request(nick, "pw")).await.unwrap();
        }

        let listing = active_players(&state).await;
        let nicks: Vec<&str> = listing.players.iter().map(|p| p.nick.as_str()).collect();
        assert_eq!(nicks, vec!["carol", "alice", "bob"]);
    }

    #[tokio::test]
    async fn match_results_feed_back_into_connect_stats() {
        let state = test_state(4).await;
        let registered = register(&state, register_request("alice", "pw1"))
            .await
            .unwrap();

        record_match_result(&state, registered.id, true).await.unwrap();
        record_match_result(&state, registered.id, false).await.unwrap();
        record_match_result(&state, registered.id, true).await.unwrap();

        let response = connect(&state, connect_request("alice", "pw1"))
            .await
            .unwrap();
        assert_eq!(response.wins, 2);
        assert_eq!(response.losses, 1);
    }

    #[tokio::test]
    async fn degraded_mode_rejects_storage_backed_calls() {
        let state = test_state(4).await;
        state.clear_player_store().await;

        let err = connect(&state, connect_request("alice", "pw1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Degraded));

        // The lobby listing is served from memory and still works.
        assert!(active_players(&state).await.players.is_empty());
    }

    #[tokio::test]
    async fn verifier_round_trip() {
        let hash = hash_password("hunter2").expect("hash");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
        assert!(!verify_password("hunter2", "not-a-phc-string"));
    }
}
