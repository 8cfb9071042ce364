use axum::{
    extract::{Json as ExtractJson, Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::live::{LiveTemplate, StreamResult};
use crate::models::common::{
    BlacklistRequest, ImportAccountRequest, OperationResult, SendSmsRequest, StateQueryRequest,
    UserIdsRequest,
};
use crate::sms::{SendSmsResponse, SmsTemplate};
use crate::tim::models::{
    AccountCheckResponse, AccountImportResponse, AccountKickResponse, AccountStateResponse,
};
use crate::tim::TimTemplate;

// Products left disabled in the environment stay `None`
pub struct AppState {
    pub tim: Option<TimTemplate>,
    pub sms: Option<SmsTemplate>,
    pub live: Option<LiveTemplate>,
}

impl AppState {
    fn tim(&self) -> Result<&TimTemplate, StatusCode> {
        self.tim.as_ref().ok_or_else(|| unavailable("tim"))
    }

    fn sms(&self) -> Result<&SmsTemplate, StatusCode> {
        self.sms.as_ref().ok_or_else(|| unavailable("sms"))
    }

    fn live(&self) -> Result<&LiveTemplate, StatusCode> {
        self.live.as_ref().ok_or_else(|| unavailable("live"))
    }
}

fn unavailable(product: &str) -> StatusCode {
    warn!("Rejected request: {} is not enabled", product);
    StatusCode::SERVICE_UNAVAILABLE
}

// Import account endpoint
pub async fn import_account(
    State(state): State<Arc<AppState>>,
    ExtractJson(request): ExtractJson<ImportAccountRequest>,
) -> Result<Json<AccountImportResponse>, StatusCode> {
    info!("Received request to import account: {}", request.user_id);

    match state
        .tim()?
        .account()
        .import_account(&request.user_id, &request.nickname, &request.avatar)
        .await
    {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            error!("Failed to import account: {}", err);
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}

// Check accounts endpoint
pub async fn check_accounts(
    State(state): State<Arc<AppState>>,
    ExtractJson(request): ExtractJson<UserIdsRequest>,
) -> Result<Json<AccountCheckResponse>, StatusCode> {
    info!("Received request to check {} accounts", request.user_ids.len());

    match state.tim()?.account().check_accounts(&request.user_ids).await {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            error!("Failed to check accounts: {}", err);
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}

// Online state endpoint
pub async fn query_state(
    State(state): State<Arc<AppState>>,
    ExtractJson(request): ExtractJson<StateQueryRequest>,
) -> Result<Json<AccountStateResponse>, StatusCode> {
    info!(
        "Received request to query state of {} accounts, need_detail={}",
        request.user_ids.len(),
        request.need_detail
    );

    match state
        .tim()?
        .account()
        .query_state_detail(&request.user_ids, request.need_detail)
        .await
    {
        Ok(response) => {
            info!("Query returned {} results", response.query_result.len());
            Ok(Json(response))
        }
        Err(err) => {
            error!("Failed to query state: {}", err);
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}

// Kick account endpoint
pub async fn kick_account(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<AccountKickResponse>, StatusCode> {
    info!("Received request to kick account: {}", user_id);

    match state.tim()?.account().kick(&user_id).await {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            error!("Failed to kick account: {}", err);
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}

// Blacklist endpoint
pub async fn add_blacklist(
    State(state): State<Arc<AppState>>,
    ExtractJson(request): ExtractJson<BlacklistRequest>,
) -> Result<Json<OperationResult>, StatusCode> {
    info!(
        "Received request to blacklist {} users for {}",
        request.targets.len(),
        request.user_id
    );

    match state
        .tim()?
        .sns()
        .add_blacklist(&request.user_id, &request.targets)
        .await
    {
        Ok(success) => Ok(Json(OperationResult { success })),
        Err(err) => {
            error!("Failed to add blacklist: {}", err);
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}

// Send SMS endpoint
pub async fn send_sms(
    State(state): State<Arc<AppState>>,
    ExtractJson(request): ExtractJson<SendSmsRequest>,
) -> Result<Json<SendSmsResponse>, StatusCode> {
    info!(
        "Received request to send template {} to {} numbers",
        request.template_id,
        request.phone_numbers.len()
    );

    match state
        .sms()?
        .send_batch(&request.phone_numbers, &request.template_id, &request.params)
        .await
    {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            error!("Failed to send SMS: {}", err);
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}

// Signed live stream addresses
pub async fn stream_urls(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<StreamResult>, StatusCode> {
    info!("Received request for stream urls: {}", name);
    Ok(Json(state.live()?.stream_urls(&name)))
}
