//! HTTP route definitions

use axum::{
    extract::{Path, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::app::AppState;
use crate::game::{Game, GameError, GameId, MoveKind};
use crate::store::{GameEvent, HistoryRecord, StoreError};
use crate::util::time::uptime_secs;

/// Events returned by the per-game event query.
const EVENT_QUERY_LIMIT: usize = 50;
/// Records returned by the history query.
const HISTORY_QUERY_LIMIT: usize = 20;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // CORS configuration - support multiple origins (comma-separated in
    // CLIENT_ORIGIN) or `*` for any, the microcontroller sends no Origin
    let cors = if state.config.client_origin.trim() == "*" {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let allowed_origins: Vec<header::HeaderValue> = state
            .config
            .client_origin
            .split(',')
            .filter_map(|s| s.trim().parse::<header::HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(allowed_origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/game", post(create_game_handler))
        .route("/game/update", post(game_update_handler))
        .route("/game/:id", get(get_game_handler))
        .route("/game/:id/start", post(start_game_handler))
        .route("/game/:id/events", get(list_events_handler))
        .route("/history", get(list_history_handler))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ============================================================================
// Health endpoint
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: uptime_secs(),
    })
}

// ============================================================================
// Game lifecycle endpoints
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateGameRequest {
    player1_name: String,
    player1_color: String,
    player2_name: String,
    player2_color: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateGameResponse {
    game_id: GameId,
}

async fn create_game_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateGameRequest>,
) -> Result<Json<CreateGameResponse>, AppError> {
    let game_id = state
        .engine
        .create_game(
            &req.player1_name,
            &req.player1_color,
            &req.player2_name,
            &req.player2_color,
        )
        .await?;

    Ok(Json(CreateGameResponse { game_id }))
}

#[derive(Serialize)]
struct UpdateResponse {
    success: bool,
}

async fn start_game_handler(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
) -> Result<Json<UpdateResponse>, AppError> {
    state.engine.start_game(id).await?;
    Ok(Json(UpdateResponse { success: true }))
}

// ============================================================================
// Command gateway
// ============================================================================

/// Command envelope shared by the web UI and the microcontroller.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum GameCommand {
    #[serde(rename_all = "camelCase")]
    DiceRoll { game_id: GameId, dice_value: u8 },
    #[serde(rename_all = "camelCase")]
    PlayerMove {
        game_id: GameId,
        new_position: u16,
        #[serde(default)]
        move_type: Option<MoveKind>,
    },
}

async fn game_update_handler(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<UpdateResponse>, AppError> {
    match parse_command(body)? {
        GameCommand::DiceRoll { game_id, dice_value } => {
            state.engine.record_dice_roll(game_id, dice_value).await?;
        }
        GameCommand::PlayerMove { game_id, new_position, move_type } => {
            state.engine.move_player(game_id, new_position, move_type).await?;
        }
    }

    Ok(Json(UpdateResponse { success: true }))
}

/// Decode the command envelope. A missing or unrecognized `type` keeps the
/// exact "Unknown update type" message the dice firmware matches on.
fn parse_command(body: serde_json::Value) -> Result<GameCommand, AppError> {
    match body.get("type").and_then(serde_json::Value::as_str) {
        Some("dice_roll" | "player_move") => serde_json::from_value(body)
            .map_err(|e| AppError::BadRequest(format!("invalid command payload: {e}"))),
        _ => Err(AppError::BadRequest("Unknown update type".to_string())),
    }
}

// ============================================================================
// Query endpoints
// ============================================================================

async fn get_game_handler(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
) -> Result<Json<Game>, AppError> {
    let game = state
        .store
        .get_game(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("game not found: {id}")))?;

    Ok(Json(game))
}

async fn list_events_handler(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
) -> Result<Json<Vec<GameEvent>>, AppError> {
    let events = state.store.recent_events(id, EVENT_QUERY_LIMIT).await?;
    Ok(Json(events))
}

async fn list_history_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<HistoryRecord>>, AppError> {
    let records = state.store.recent_history(HISTORY_QUERY_LIMIT).await?;
    Ok(Json(records))
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<GameError> for AppError {
    fn from(err: GameError) -> Self {
        match &err {
            GameError::Validation(_) => AppError::BadRequest(err.to_string()),
            GameError::NotFound(_) => AppError::NotFound(err.to_string()),
            GameError::InvalidState { .. } => AppError::Conflict(err.to_string()),
            GameError::Store(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}
