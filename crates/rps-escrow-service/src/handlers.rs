//! HTTP API handlers.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use rps_escrow_core::{
    Clock, Commitment, Custody, EngineError, GameEvent, GameId, GameRecord,
    PrincipalId, Secret,
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Header carrying the trusted caller identity
pub const PLAYER_HEADER: &str = "X-Player-Id";

// ============ Errors ============

/// Application error type
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        let status = match &e {
            EngineError::GameNotFound(_) => StatusCode::NOT_FOUND,
            EngineError::Unauthorized | EngineError::SelfPlay => StatusCode::FORBIDDEN,
            EngineError::DuplicateGame(_)
            | EngineError::DuplicateSecretUse
            | EngineError::WrongState { .. }
            | EngineError::GameExpired { .. }
            | EngineError::TimeoutNotReached { .. } => StatusCode::CONFLICT,
            EngineError::InvalidChoice(_)
            | EngineError::MalformedCommitment(_)
            | EngineError::InvalidDeadline
            | EngineError::AmountOverflow => StatusCode::UNPROCESSABLE_ENTITY,
            EngineError::SystemPaused => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::new(status, e.code(), e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({"error": self.message, "code": self.code})),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// ============ Request/Response types ============

#[derive(Deserialize)]
pub struct CommitmentRequest {
    pub choice: u8,
    pub opponent: PrincipalId,
    pub secret: String,
}

#[derive(Serialize)]
pub struct CommitmentResponse {
    pub commitment: Commitment,
}

#[derive(Deserialize)]
pub struct CreateGameRequest {
    pub opponent: PrincipalId,
    pub commitment: Commitment,
    pub relative_deadline: u64,
    pub stake: u64,
}

#[derive(Deserialize)]
pub struct BetRequest {
    pub choice: u8,
    #[serde(default)]
    pub deposit: u64,
}

#[derive(Deserialize)]
pub struct RevealRequest {
    pub choice: u8,
    pub secret: String,
}

#[derive(Serialize)]
pub struct EventResponse {
    pub event: GameEvent,
}

#[derive(Serialize)]
pub struct GameResponse {
    pub game_id: GameId,
    pub phase: &'static str,
    #[serde(flatten)]
    pub record: GameRecord,
}

#[derive(Serialize)]
pub struct BalanceResponse {
    pub principal: PrincipalId,
    pub balance: u64,
}

#[derive(Deserialize)]
pub struct EventsQuery {
    pub player: Option<PrincipalId>,
    pub game: Option<Commitment>,
    pub since: Option<usize>,
}

#[derive(Serialize)]
pub struct EventsResponse {
    /// Cursor to pass as `since` on the next poll
    pub next: usize,
    pub events: Vec<GameEvent>,
}

#[derive(Deserialize)]
pub struct TickRequest {
    pub blocks: u64,
}

#[derive(Serialize)]
pub struct SystemResponse {
    pub height: u64,
    pub paused: bool,
    pub held: u64,
    pub escrowed: u64,
    /// Stored game records, settled ones included until pruned
    pub games: usize,
}

#[derive(Serialize)]
pub struct PruneResponse {
    pub pruned: usize,
    pub games: usize,
}

#[derive(Deserialize)]
pub struct FundRequest {
    pub amount: u64,
}

#[derive(Serialize)]
pub struct WalletResponse {
    pub principal: PrincipalId,
    pub wallet: u64,
}

// ============ Helpers ============

fn caller_from_headers(headers: &HeaderMap) -> Result<PrincipalId, ApiError> {
    headers
        .get(PLAYER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            ApiError::new(
                StatusCode::UNAUTHORIZED,
                "MissingCaller",
                format!("Missing or invalid {} header", PLAYER_HEADER),
            )
        })
}

fn parse_game_id(raw: &str) -> Result<GameId, ApiError> {
    raw.parse::<Commitment>().map_err(ApiError::from)
}

fn parse_principal(raw: &str) -> Result<PrincipalId, ApiError> {
    raw.parse().map_err(|e| {
        ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "MalformedPrincipal",
            format!("Malformed principal id: {}", e),
        )
    })
}

fn system_snapshot(state: &AppState) -> SystemResponse {
    let engine = state.engine();
    SystemResponse {
        height: engine.host().current_height(),
        paused: engine.host().is_paused(),
        held: engine.host().held(),
        escrowed: engine.escrowed_total(),
        games: engine.game_count(),
    }
}

// ============ Game handlers ============

pub async fn compute_commitment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CommitmentRequest>,
) -> ApiResult<CommitmentResponse> {
    let caller = caller_from_headers(&headers)?;
    let secret = Secret::from_phrase(&req.secret);
    let commitment = state
        .engine()
        .compute_commitment(req.choice, &req.opponent, &secret, &caller)?;
    Ok(Json(CommitmentResponse { commitment }))
}

pub async fn create_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateGameRequest>,
) -> ApiResult<EventResponse> {
    let caller = caller_from_headers(&headers)?;
    let event = state.engine().create_game(
        caller,
        req.opponent,
        req.commitment,
        req.relative_deadline,
        req.stake,
    )?;
    Ok(Json(EventResponse { event }))
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> ApiResult<GameResponse> {
    let game_id = parse_game_id(&game_id)?;
    let engine = state.engine();
    let record = engine
        .get_game(&game_id)
        .cloned()
        .ok_or(EngineError::GameNotFound(game_id))?;

    Ok(Json(GameResponse {
        game_id,
        phase: record.phase().as_str(),
        record,
    }))
}

pub async fn bet_in_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(game_id): Path<String>,
    Json(req): Json<BetRequest>,
) -> ApiResult<EventResponse> {
    let caller = caller_from_headers(&headers)?;
    let game_id = parse_game_id(&game_id)?;
    let event = state
        .engine()
        .bet_in_game(caller, game_id, req.choice, req.deposit)?;
    Ok(Json(EventResponse { event }))
}

pub async fn reveal_choice(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(game_id): Path<String>,
    Json(req): Json<RevealRequest>,
) -> ApiResult<EventResponse> {
    let caller = caller_from_headers(&headers)?;
    let game_id = parse_game_id(&game_id)?;
    let secret = Secret::from_phrase(&req.secret);
    let event = state
        .engine()
        .reveal_choice(caller, game_id, req.choice, &secret)?;
    Ok(Json(EventResponse { event }))
}

pub async fn cancel_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(game_id): Path<String>,
) -> ApiResult<EventResponse> {
    let caller = caller_from_headers(&headers)?;
    let game_id = parse_game_id(&game_id)?;
    let event = state.engine().cancel_game(caller, game_id)?;
    Ok(Json(EventResponse { event }))
}

pub async fn claim_unplayed_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(game_id): Path<String>,
) -> ApiResult<EventResponse> {
    let caller = caller_from_headers(&headers)?;
    let game_id = parse_game_id(&game_id)?;
    let event = state.engine().claim_unplayed_game(caller, game_id)?;
    Ok(Json(EventResponse { event }))
}

pub async fn claim_unrevealed_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(game_id): Path<String>,
) -> ApiResult<EventResponse> {
    let caller = caller_from_headers(&headers)?;
    let game_id = parse_game_id(&game_id)?;
    let event = state.engine().claim_unrevealed_game(caller, game_id)?;
    Ok(Json(EventResponse { event }))
}

// ============ Ledger handlers ============

pub async fn withdraw(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<EventResponse> {
    let caller = caller_from_headers(&headers)?;
    let event = state.engine().withdraw(caller)?;
    Ok(Json(EventResponse { event }))
}

pub async fn get_balance(
    State(state): State<AppState>,
    Path(principal): Path<String>,
) -> ApiResult<BalanceResponse> {
    let principal = parse_principal(&principal)?;
    let balance = state.engine().get_balance(&principal);
    Ok(Json(BalanceResponse { principal, balance }))
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Json<EventsResponse> {
    let engine = state.engine();
    let since = query.since.unwrap_or(0);
    let events = engine
        .events_since(since)
        .iter()
        .filter(|e| query.player.map_or(true, |p| e.involves(&p)))
        .filter(|e| query.game.map_or(true, |g| e.game_id() == Some(&g)))
        .cloned()
        .collect();

    Json(EventsResponse {
        next: engine.events().len(),
        events,
    })
}

// ============ System handlers ============

pub async fn system_status(State(state): State<AppState>) -> Json<SystemResponse> {
    Json(system_snapshot(&state))
}

pub async fn tick(
    State(state): State<AppState>,
    Json(req): Json<TickRequest>,
) -> Json<SystemResponse> {
    let height = state.engine().host_mut().advance(req.blocks);
    tracing::info!("Clock advanced by {} to height {}", req.blocks, height);
    Json(system_snapshot(&state))
}

pub async fn pause(State(state): State<AppState>) -> Json<SystemResponse> {
    state.engine().host_mut().pause();
    tracing::warn!("System paused");
    Json(system_snapshot(&state))
}

pub async fn resume(State(state): State<AppState>) -> Json<SystemResponse> {
    state.engine().host_mut().resume();
    tracing::info!("System resumed");
    Json(system_snapshot(&state))
}

/// Drop settled game records. Their commitments stay unusable.
pub async fn prune(State(state): State<AppState>) -> Json<PruneResponse> {
    let mut engine = state.engine();
    let pruned = engine.prune_settled();
    Json(PruneResponse {
        pruned,
        games: engine.game_count(),
    })
}

pub async fn fund_wallet(
    State(state): State<AppState>,
    Path(principal): Path<String>,
    Json(req): Json<FundRequest>,
) -> ApiResult<WalletResponse> {
    let principal = parse_principal(&principal)?;
    let mut engine = state.engine();
    engine.host_mut().fund(principal, req.amount);
    Ok(Json(WalletResponse {
        principal,
        wallet: engine.host().wallet_balance(&principal),
    }))
}

pub async fn get_wallet(
    State(state): State<AppState>,
    Path(principal): Path<String>,
) -> ApiResult<WalletResponse> {
    let principal = parse_principal(&principal)?;
    let wallet = state.engine().host().wallet_balance(&principal);
    Ok(Json(WalletResponse { principal, wallet }))
}

pub async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_errors_map_to_statuses() {
        let cases = [
            (EngineError::SystemPaused, StatusCode::SERVICE_UNAVAILABLE),
            (EngineError::Unauthorized, StatusCode::FORBIDDEN),
            (EngineError::SelfPlay, StatusCode::FORBIDDEN),
            (EngineError::DuplicateSecretUse, StatusCode::CONFLICT),
            (EngineError::InvalidChoice(9), StatusCode::UNPROCESSABLE_ENTITY),
            (EngineError::RevealMismatch, StatusCode::BAD_REQUEST),
            (EngineError::NoBalance, StatusCode::BAD_REQUEST),
            (
                EngineError::GameNotFound(Commitment::from_bytes([0; 32])),
                StatusCode::NOT_FOUND,
            ),
        ];

        for (error, status) in cases {
            let code = error.code();
            let api = ApiError::from(error);
            assert_eq!(api.status, status);
            assert_eq!(api.code, code);
        }
    }

    #[test]
    fn test_caller_header() {
        let mut headers = HeaderMap::new();
        assert!(caller_from_headers(&headers).is_err());

        headers.insert(PLAYER_HEADER, "garbage".parse().unwrap());
        assert!(caller_from_headers(&headers).is_err());

        let id = PrincipalId::new();
        headers.insert(PLAYER_HEADER, id.to_string().parse().unwrap());
        assert_eq!(caller_from_headers(&headers).unwrap(), id);
    }
}
