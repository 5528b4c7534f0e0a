use std::sync::{Arc, Mutex};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use flashy_shared::protocol::{
    CardRequest, CardResponse, CardsResponse, CreateDeckRequest, DeckResponse, DecksResponse,
    HealthResponse, SuccessResponse, UpdateDeckRequest,
};
use flashy_store::Database;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::identity::Caller;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Run a store operation on the blocking pool.
    ///
    /// Each call takes the connection lock for its whole duration, so every
    /// access-policy check is evaluated fresh against the current rows.
    async fn with_db<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Database) -> flashy_store::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = db
                .lock()
                .map_err(|_| ApiError::Internal("database lock poisoned".into()))?;
            op(&mut *guard).map_err(ApiError::from)
        })
        .await
        .map_err(|e| ApiError::Internal(format!("store task failed: {e}")))?
    }
}

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_check))
        .route("/decks", get(list_decks).post(create_deck))
        .route(
            "/decks/:deck_id",
            get(get_deck).put(update_deck).delete(delete_deck),
        )
        .route("/decks/:deck_id/cards", get(list_cards).post(create_card))
        .route(
            "/decks/:deck_id/cards/:card_id",
            axum::routing::put(update_card).delete(delete_card),
        );

    if state.config.cors_allow_any {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any);
        router = router.layer(cors);
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Ids in the path are opaque to callers; one that does not parse cannot
/// name an accessible record.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e.body_text())))
}

// ─── Health ───

async fn health_check(State(state): State<AppState>) -> Response {
    match state.with_db(|db| db.db_time()).await {
        Ok(now) => Json(HealthResponse {
            ok: true,
            db_time: Some(now),
            error: None,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    ok: false,
                    db_time: None,
                    error: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}

// ─── Decks ───

async fn list_decks(
    Caller(caller): Caller,
    State(state): State<AppState>,
) -> Result<Json<DecksResponse>, ApiError> {
    let decks = state.with_db(move |db| db.list_decks(&caller)).await?;
    Ok(Json(DecksResponse { decks }))
}

async fn create_deck(
    Caller(caller): Caller,
    State(state): State<AppState>,
    payload: Result<Json<CreateDeckRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DeckResponse>), ApiError> {
    let req = body(payload)?;
    let deck = state
        .with_db(move |db| {
            db.create_deck(
                &caller,
                req.title.as_deref(),
                req.description.as_deref(),
                req.color.as_deref(),
            )
        })
        .await?;
    Ok((StatusCode::CREATED, Json(DeckResponse { deck })))
}

async fn get_deck(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(deck_id): Path<String>,
) -> Result<Json<DeckResponse>, ApiError> {
    let deck_id = parse_id(&deck_id)?;
    let deck = state.with_db(move |db| db.get_deck(deck_id, &caller)).await?;
    Ok(Json(DeckResponse { deck }))
}

async fn update_deck(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(deck_id): Path<String>,
    payload: Result<Json<UpdateDeckRequest>, JsonRejection>,
) -> Result<Json<DeckResponse>, ApiError> {
    let deck_id = parse_id(&deck_id)?;
    let req = body(payload)?;
    let deck = state
        .with_db(move |db| {
            db.update_deck(
                deck_id,
                &caller,
                req.title.as_deref(),
                req.description.as_deref(),
            )
        })
        .await?;
    Ok(Json(DeckResponse { deck }))
}

async fn delete_deck(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(deck_id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let deck_id = parse_id(&deck_id)?;
    state
        .with_db(move |db| db.delete_deck(deck_id, &caller))
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}

// ─── Cards ───

async fn list_cards(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(deck_id): Path<String>,
) -> Result<Json<CardsResponse>, ApiError> {
    let deck_id = parse_id(&deck_id)?;
    let cards = state
        .with_db(move |db| db.list_cards(deck_id, &caller))
        .await?;
    Ok(Json(CardsResponse { cards }))
}

async fn create_card(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(deck_id): Path<String>,
    payload: Result<Json<CardRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CardResponse>), ApiError> {
    let deck_id = parse_id(&deck_id)?;
    let req = body(payload)?;
    let card = state
        .with_db(move |db| {
            db.create_card(deck_id, &caller, req.front.as_deref(), req.back.as_deref())
        })
        .await?;
    Ok((StatusCode::CREATED, Json(CardResponse { card })))
}

async fn update_card(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path((deck_id, card_id)): Path<(String, String)>,
    payload: Result<Json<CardRequest>, JsonRejection>,
) -> Result<Json<CardResponse>, ApiError> {
    let deck_id = parse_id(&deck_id)?;
    let card_id = parse_id(&card_id)?;
    let req = body(payload)?;
    let card = state
        .with_db(move |db| {
            db.update_card(
                deck_id,
                card_id,
                &caller,
                req.front.as_deref(),
                req.back.as_deref(),
            )
        })
        .await?;
    Ok(Json(CardResponse { card }))
}

async fn delete_card(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path((deck_id, card_id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let deck_id = parse_id(&deck_id)?;
    let card_id = parse_id(&card_id)?;
    state
        .with_db(move |db| db.delete_card(deck_id, card_id, &caller))
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
