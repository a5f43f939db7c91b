use std::sync::Arc;

use crate::{
    config::Config,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use ledgersync_connect::DEFAULT_PROVIDER_NAME;
use ledgersync_core::{
    families::{Family, NewFamily},
    items::LinkedItem,
    sync::{SyncRecord, SyncTarget, SyncWindow},
    transfers::{RejectedPair, Transfer},
};
use serde::{Deserialize, Serialize};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Header carrying the signed verification token on webhook deliveries.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "plaid-verification";

pub async fn healthz() -> &'static str {
    "ok"
}

async fn create_family(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewFamily>,
) -> ApiResult<Json<Family>> {
    payload.validate()?;
    let family = state.families.create(payload).await?;
    Ok(Json(family))
}

/// Queues a family sync, or returns the one already running.
async fn sync_family(
    Path(family_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<(StatusCode, Json<SyncRecord>)> {
    state.families.get_by_id(&family_id)?;
    let record = state
        .scheduler
        .sync_later(SyncTarget::Family(family_id), SyncWindow::default(), None)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(record)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SyncStatusResponse {
    family_id: String,
    syncing: bool,
}

async fn family_sync_status(
    Path(family_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SyncStatusResponse>> {
    state.families.get_by_id(&family_id)?;
    let syncing = state.scheduler.is_family_syncing(&family_id)?;
    Ok(Json(SyncStatusResponse { family_id, syncing }))
}

async fn list_transfers(
    Path(family_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Transfer>>> {
    Ok(Json(state.transfer_service.list_for_family(&family_id)?))
}

async fn confirm_transfer(
    Path(transfer_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Transfer>> {
    Ok(Json(state.transfer_service.confirm(&transfer_id).await?))
}

async fn reject_transfer(
    Path(transfer_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RejectedPair>> {
    Ok(Json(state.transfer_service.reject(&transfer_id).await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkItemBody {
    family_id: String,
    #[serde(default)]
    provider: Option<String>,
    public_token: String,
    name: String,
}

async fn link_item(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LinkItemBody>,
) -> ApiResult<Json<LinkedItem>> {
    if payload.public_token.trim().is_empty() {
        return Err(ApiError::BadRequest("publicToken is required".to_string()));
    }
    state.families.get_by_id(&payload.family_id)?;
    let provider = payload
        .provider
        .as_deref()
        .unwrap_or(DEFAULT_PROVIDER_NAME);
    let item = state
        .item_service
        .create_from_public_token(
            &payload.family_id,
            provider,
            &payload.public_token,
            &payload.name,
        )
        .await?;
    Ok(Json(item))
}

async fn disconnect_item(
    Path(item_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.item_service.disconnect(&item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Webhook ingress. Always acknowledges: a provider that sees errors stops
/// delivering, so verification and dispatch happen after the response.
async fn receive_webhook(
    Path(provider): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> StatusCode {
    let signature = headers
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let processor = state.webhook_processor.clone();
    tokio::spawn(async move {
        processor.process(&provider, &signature, &body).await;
    });
    StatusCode::OK
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let api = Router::new()
        .route("/healthz", get(healthz))
        .route("/families", post(create_family))
        .route("/families/{id}/sync", post(sync_family))
        .route("/families/{id}/sync-status", get(family_sync_status))
        .route("/families/{id}/transfers", get(list_transfers))
        .route("/transfers/{id}/confirm", post(confirm_transfer))
        .route("/transfers/{id}/reject", post(reject_transfer))
        .route("/items", post(link_item))
        .route("/items/{id}", delete(disconnect_item))
        .route("/webhooks/{provider}", post(receive_webhook));

    Router::new()
        .nest("/api/v1", api)
        .with_state(state)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
