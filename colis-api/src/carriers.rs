use crate::error::ApiError;
use crate::notify::{ActionResponse, Notification};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use colis_core::{CarrierConfig, ConnectionReport, ProviderKind, ShipmentRequest};
use colis_shared::TransportNature;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/carriers", post(create_carrier).get(list_carriers))
        .route("/carriers/{id}/test-connection", post(test_connection))
        .route("/carriers/{id}/refresh-token", post(refresh_token))
        .route("/carriers/{id}/track", post(track_package))
        .route("/carriers/{id}/shipments", post(create_carrier_shipment))
}

#[derive(Debug, Deserialize)]
struct NewCarrierRequest {
    name: String,
    provider: ProviderKind,
    default_transport_nature: Option<TransportNature>,
    contract_code: Option<String>,
    secret_key: Option<String>,
    ecom_password: Option<String>,
    tracking_url: Option<String>,
    ecom_base_url: Option<String>,
    notes: Option<String>,
}

async fn create_carrier(
    State(state): State<AppState>,
    Json(req): Json<NewCarrierRequest>,
) -> Json<CarrierConfig> {
    let mut config = CarrierConfig::new(req.name, req.provider);
    if let Some(nature) = req.default_transport_nature {
        config.default_transport_nature = nature;
    }
    config.contract_code = req.contract_code;
    config.secret_key = req.secret_key;
    config.ecom_password = req.ecom_password;
    config.tracking_url = req.tracking_url.or_else(|| state.settings.tracking_url.clone());
    config.ecom_base_url = req
        .ecom_base_url
        .or_else(|| state.settings.ecom_base_url.clone());
    config.notes = req.notes;

    // Advisory credential check: issues are logged, creation proceeds
    if let Ok(provider) = state.registry.resolve(&config, state.token_cache.clone()) {
        let _ = provider.validate_credentials();
    }

    state.directory.insert(config.clone());
    Json(config)
}

async fn list_carriers(State(state): State<AppState>) -> Json<Vec<CarrierConfig>> {
    Json(state.directory.list_active())
}

#[derive(Debug, Serialize)]
struct TestConnectionResponse {
    notification: Notification,
    report: ConnectionReport,
}

async fn test_connection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TestConnectionResponse>, ApiError> {
    let provider = state.provider_for(id)?;
    let report = provider.test_connection().await;

    let notification = if report.success {
        Notification::success(
            "Connection Test",
            format!(
                "Tracking API: {}\nE-Commerce API: {}",
                report.tracking_api.message, report.ecom_api.message
            ),
        )
    } else {
        let mut messages = Vec::new();
        if !report.tracking_api.success {
            messages.push(format!("Tracking API: {}", report.tracking_api.message));
        }
        if !report.ecom_api.success {
            messages.push(format!("E-Commerce API: {}", report.ecom_api.message));
        }
        Notification::danger("Connection Test Failed", messages.join("\n"))
    };

    Ok(Json(TestConnectionResponse {
        notification,
        report,
    }))
}

async fn refresh_token(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, ApiError> {
    let provider = state.provider_for(id)?;
    match provider.fetch_token(true).await {
        Ok(_) => Ok(Json(ActionResponse::ok(
            "Token Refreshed",
            "E-commerce API token has been refreshed successfully",
            None,
        ))),
        Err(err) => Ok(Json(ActionResponse::failed(
            "Token Refresh Failed",
            format!("Failed to refresh token: {err}"),
        ))),
    }
}

#[derive(Debug, Deserialize)]
struct TrackRequest {
    tracking_number: String,
}

async fn track_package(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TrackRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    let provider = state.provider_for(id)?;
    match provider.track_package(&req.tracking_number).await {
        Ok(info) => {
            let data = serde_json::to_value(&info).ok();
            Ok(Json(ActionResponse::ok(
                "Tracking",
                format!("Tracking information received for {}", info.tracking_number),
                data,
            )))
        }
        Err(err) => Ok(Json(ActionResponse::failed(
            "Tracking Failed",
            err.to_string(),
        ))),
    }
}

async fn create_carrier_shipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ShipmentRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    let provider = state.provider_for(id)?;
    match provider.create_shipment(&req).await {
        Ok(receipt) => {
            let data = serde_json::to_value(&receipt).ok();
            Ok(Json(ActionResponse::ok(
                "Shipment Created",
                "Shipment registered with the carrier",
                data,
            )))
        }
        Err(err) => Ok(Json(ActionResponse::failed(
            "Shipment Creation Failed",
            err.to_string(),
        ))),
    }
}
