//! Routes for registration, sessions, and the lobby listing.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::player::{
        ActivePlayersResponse, ConnectRequest, ConnectResponse, LogoutRequest, LogoutResponse,
        PlayerSummary, RegisterRequest,
    },
    error::AppError,
    services::player_service,
    state::SharedState,
};

/// Configure the player routes subtree.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/register", post(register))
        .route("/connect", post(connect))
        .route("/logout", post(logout))
        .route("/get_active_players", get(get_active_players))
}

#[utoipa::path(
    post,
    path = "/register",
    tag = "player",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Player created", body = PlayerSummary),
        (status = 401, description = "Invalid nick or password"),
        (status = 409, description = "Nick already registered"),
        (status = 500, description = "Storage unavailable")
    )
)]
/// Register a new player.
pub async fn register(
    State(state): State<SharedState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<PlayerSummary>, AppError> {
    let summary = player_service::register(&state, payload).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/connect",
    tag = "player",
    request_body = ConnectRequest,
    responses(
        (status = 200, description = "Session token and lifetime stats", body = ConnectResponse),
        (status = 401, description = "Missing or rejected credentials"),
        (status = 409, description = "Player already logged in"),
        (status = 429, description = "Server full"),
        (status = 500, description = "Storage unavailable")
    )
)]
/// Authenticate a player and open a session.
pub async fn connect(
    State(state): State<SharedState>,
    Json(payload): Json<ConnectRequest>,
) -> Result<Json<ConnectResponse>, AppError> {
    let response = player_service::connect(&state, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/logout",
    tag = "player",
    request_body = LogoutRequest,
    responses((status = 200, description = "Session closed (idempotent)", body = LogoutResponse))
)]
/// Close a session. Closing an already-closed session succeeds.
pub async fn logout(
    State(state): State<SharedState>,
    Json(payload): Json<LogoutRequest>,
) -> Json<LogoutResponse> {
    let closed = player_service::logout(&state, payload.token).await;
    Json(LogoutResponse { closed })
}

#[utoipa::path(
    get,
    path = "/get_active_players",
    tag = "player",
    responses(
        (status = 200, description = "Logged-in players in login order", body = ActivePlayersResponse)
    )
)]
/// Return the lobby listing of currently logged-in players.
pub async fn get_active_players(State(state): State<SharedState>) -> Json<ActivePlayersResponse> {
    Json(player_service::active_players(&state).await)
}
