//! HTTP routes.
//!
//! Store calls are synchronous SQLite I/O. Each one runs on the blocking pool
//! while holding the database mutex; the request timeout answers the client
//! but cannot cancel a statement that is already running.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, Method},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use friendcrm_shared::clock::Clock;
use friendcrm_shared::display::{
    activity_lines, avatar_color, avatar_initial, cadence_label, last_contact_label,
};
use friendcrm_shared::overdue::days_until_due;
use friendcrm_shared::types::{FriendId, InteractionId, PrincipalId};
use friendcrm_shared::validate::LogInteraction;
use friendcrm_shared::{FriendService, RosterEntry, Tenancy};
use friendcrm_store::Database;

use crate::config::ServerConfig;
use crate::error::ServerError;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub config: Arc<ServerConfig>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Principal id from the trusted auth header, if present and non-empty.
    fn principal(&self, headers: &HeaderMap) -> Option<PrincipalId> {
        headers
            .get(self.config.principal_header.as_str())
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(PrincipalId::new)
    }

    /// Like [`AppState::principal`], but rejects a missing principal up
    /// front in multi-tenant mode so the body is never looked at.
    fn require_principal(&self, headers: &HeaderMap) -> Result<Option<PrincipalId>, ServerError> {
        let principal = self.principal(headers);
        if principal.is_none() && self.config.tenancy() == Tenancy::Multi {
            return Err(ServerError::Unauthorized);
        }
        Ok(principal)
    }

    /// Run one core operation against the database on the blocking pool.
    async fn with_service<T, F>(&self, op: F) -> Result<T, ServerError>
    where
        F: FnOnce(&FriendService<'_, Database, dyn Clock>) -> friendcrm_shared::error::Result<T>
            + Send
            + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let clock = Arc::clone(&self.clock);
        let tenancy = self.config.tenancy();

        tokio::task::spawn_blocking(move || {
            let db = db
                .lock()
                .map_err(|_| ServerError::Internal("database lock poisoned".into()))?;
            let service = FriendService::new(&*db, clock.as_ref(), tenancy);
            op(&service).map_err(ServerError::from)
        })
        .await
        .map_err(|e| ServerError::Internal(format!("store task failed: {e}")))?
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/friends", get(list_friends).post(add_friend))
        .route("/friends/overdue", get(list_overdue_friends))
        .route("/interactions", post(log_interaction))
        .layer(TimeoutLayer::new(state.config.request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// A roster entry plus the labels a friend card shows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendCardDto {
    #[serde(flatten)]
    entry: RosterEntry,
    overdue: bool,
    /// `None` for a friend never contacted, negative once overdue.
    days_until_due: Option<f64>,
    last_contact_label: String,
    cadence_label: String,
    activity: Vec<String>,
    avatar_color: &'static str,
    initial: String,
}

impl FriendCardDto {
    fn new(entry: RosterEntry, now: DateTime<Utc>) -> Self {
        let friend = &entry.friend;
        Self {
            overdue: entry.is_overdue(now),
            days_until_due: days_until_due(
                friend.last_contacted_at,
                Some(friend.frequency_days),
                now,
            ),
            last_contact_label: last_contact_label(&entry.recent_interactions, now),
            cadence_label: cadence_label(friend.frequency_days),
            activity: activity_lines(&entry.last_by_type, now),
            avatar_color: avatar_color(&friend.name),
            initial: avatar_initial(&friend.name),
            entry,
        }
    }

    fn from_roster(roster: Vec<RosterEntry>, now: DateTime<Utc>) -> Vec<Self> {
        roster
            .into_iter()
            .map(|entry| Self::new(entry, now))
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddFriendRequest {
    name: String,
    frequency_days: Option<i64>,
}

#[derive(Serialize)]
struct AddFriendResponse {
    id: FriendId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogInteractionRequest {
    friend_id: String,
    #[serde(rename = "type")]
    kind: String,
    occurred_at: Option<String>,
    notes: Option<String>,
}

#[derive(Serialize)]
struct LogInteractionResponse {
    id: InteractionId,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn list_friends(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Json<Vec<FriendCardDto>>, ServerError> {
    let principal = state.principal(&headers);
    let cards = state
        .with_service(move |service| {
            let now = service.now();
            let roster = service.get_friends(principal.as_ref())?;
            Ok(FriendCardDto::from_roster(roster, now))
        })
        .await?;
    Ok(Json(cards))
}

async fn list_overdue_friends(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Json<Vec<FriendCardDto>>, ServerError> {
    let principal = state.principal(&headers);
    let cards = state
        .with_service(move |service| {
            let now = service.now();
            let overdue = service.overdue_friends(principal.as_ref())?;
            Ok(FriendCardDto::from_roster(overdue, now))
        })
        .await?;
    Ok(Json(cards))
}

async fn add_friend(
    headers: HeaderMap,
    State(state): State<AppState>,
    body: Result<Json<AddFriendRequest>, JsonRejection>,
) -> Result<Json<AddFriendResponse>, ServerError> {
    let principal = state.require_principal(&headers)?;
    let Json(req) = body?;

    let id = state
        .with_service(move |service| {
            service.add_friend(principal.as_ref(), &req.name, req.frequency_days)
        })
        .await?;
    Ok(Json(AddFriendResponse { id }))
}

async fn log_interaction(
    headers: HeaderMap,
    State(state): State<AppState>,
    body: Result<Json<LogInteractionRequest>, JsonRejection>,
) -> Result<Json<LogInteractionResponse>, ServerError> {
    let principal = state.require_principal(&headers)?;
    let Json(req) = body?;
    let request = LogInteraction::from_raw(
        &req.friend_id,
        &req.kind,
        req.occurred_at.as_deref(),
        req.notes,
    )?;

    let id = state
        .with_service(move |service| service.log_interaction(principal.as_ref(), request))
        .await?;
    Ok(Json(LogInteractionResponse { id }))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
