//! OpenAPI documentation generation.

use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the lobby backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::player::register,
        crate::routes::player::connect,
        crate::routes::player::logout,
        crate::routes::player::get_active_players,
        crate::routes::chat::get_chat,
        crate::routes::chat::post_chat,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::player::RegisterRequest,
            crate::dto::player::ConnectRequest,
            crate::dto::player::ConnectResponse,
            crate::dto::player::PlayerSummary,
            crate::dto::player::LogoutRequest,
            crate::dto::player::LogoutResponse,
            crate::dto::player::ActivePlayer,
            crate::dto::player::ActivePlayersResponse,
            crate::dto::chat::PostChatRequest,
            crate::dto::chat::ChatHistoryResponse,
            crate::state::chat::ChatMessage,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "player", description = "Registration, sessions, and the lobby listing"),
        (name = "chat", description = "Lobby chat"),
    )
)]
pub struct ApiDoc;
