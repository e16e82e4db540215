use crate::error::ApiError;
use crate::notify::ActionResponse;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use colis_core::ShipmentRequest;
use colis_shared::Partner;
use colis_shipment::{build_rows, to_csv, NewShipment, Package, Shipment};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shipments", post(create_shipment))
        .route("/shipments/{id}", get(get_shipment))
        .route("/shipments/{id}/generate-barcodes", post(generate_barcodes))
        .route("/shipments/{id}/clear-barcodes", post(clear_barcodes))
        .route("/shipments/{id}/confirm", post(confirm))
        .route("/shipments/{id}/in-transit", post(mark_in_transit))
        .route("/shipments/{id}/deliver", post(mark_delivered))
        .route("/shipments/{id}/return", post(mark_returned))
        .route("/shipments/{id}/cancel", post(cancel))
        .route("/shipments/{id}/draft", post(reset_to_draft))
        .route("/shipments/{id}/send", post(send_to_carrier))
        .route("/shipments/export", post(export))
}

#[derive(Debug, Serialize)]
struct CreatedResponse {
    id: Uuid,
}

#[derive(Debug, Deserialize)]
struct NewShipmentRequest {
    delivery_id: Uuid,
    partner: Partner,
    reference_from: Option<String>,
}

/// Create a shipment record from a delivery; shipping details come from
/// the delivery, which inherited them from its sale order.
async fn create_shipment(
    State(state): State<AppState>,
    Json(req): Json<NewShipmentRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let new = {
        let documents = state.documents.read().unwrap_or_else(|e| e.into_inner());
        let delivery = documents
            .delivery(req.delivery_id)
            .ok_or_else(|| ApiError::NotFound(format!("delivery {}", req.delivery_id)))?;
        let carrier_id = delivery.shipping.carrier_id.ok_or_else(|| {
            ApiError::Validation("Select a delivery company on the delivery first".to_string())
        })?;
        let config = state
            .directory
            .get(carrier_id)
            .ok_or_else(|| ApiError::NotFound(format!("carrier {carrier_id}")))?;

        NewShipment {
            delivery_id: delivery.id,
            sale_order_id: delivery.sale_order_id,
            partner: req.partner,
            carrier_id,
            provider: config.provider,
            declared_packages: delivery.shipping.package_count,
            payment_method: delivery.shipping.payment_method,
            transport_nature: delivery.shipping.transport_nature,
            shipping_date: Utc::now().date_naive(),
            reference_from: req.reference_from,
        }
    };

    let mut shipments = state.shipments.write().unwrap_or_else(|e| e.into_inner());
    let id = shipments.create(new);
    Ok(Json(CreatedResponse { id }))
}

async fn get_shipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Shipment>, ApiError> {
    let shipments = state.shipments.read().unwrap_or_else(|e| e.into_inner());
    shipments
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("shipment {id}")))
}

async fn generate_barcodes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Package>>, ApiError> {
    let mut shipments = state.shipments.write().unwrap_or_else(|e| e.into_inner());
    Ok(Json(shipments.generate_packages(id)?))
}

async fn clear_barcodes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut shipments = state.shipments.write().unwrap_or_else(|e| e.into_inner());
    shipments.clear_packages(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn confirm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut shipments = state.shipments.write().unwrap_or_else(|e| e.into_inner());
    shipments.confirm(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn mark_in_transit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut shipments = state.shipments.write().unwrap_or_else(|e| e.into_inner());
    shipments.mark_in_transit(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn mark_delivered(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut shipments = state.shipments.write().unwrap_or_else(|e| e.into_inner());
    shipments.mark_delivered(id, Utc::now().date_naive())?;
    Ok(StatusCode::NO_CONTENT)
}

async fn mark_returned(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut shipments = state.shipments.write().unwrap_or_else(|e| e.into_inner());
    shipments.mark_returned(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut shipments = state.shipments.write().unwrap_or_else(|e| e.into_inner());
    shipments.cancel(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reset_to_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut shipments = state.shipments.write().unwrap_or_else(|e| e.into_inner());
    shipments.reset_to_draft(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Register the shipment with the carrier's e-commerce API
async fn send_to_carrier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, ApiError> {
    let (carrier_id, request) = {
        let shipments = state.shipments.read().unwrap_or_else(|e| e.into_inner());
        let shipment = shipments
            .get(id)
            .ok_or_else(|| ApiError::NotFound(format!("shipment {id}")))?;
        let request = ShipmentRequest {
            recipient_name: shipment.partner.name.clone(),
            recipient_address: shipment.partner.full_address(),
            recipient_city: shipment.partner.city.clone().unwrap_or_default(),
            recipient_phone: shipment
                .recipient_phone
                .clone()
                .or_else(|| shipment.partner.contact_number().map(str::to_string))
                .unwrap_or_default(),
            weight: shipment.weight,
            cod_amount: (shipment.cod_cash > 0.0).then_some(shipment.cod_cash),
            description: shipment.content_description.clone(),
        };
        (shipment.carrier_id, request)
    };

    let provider = state.provider_for(carrier_id)?;
    match provider.create_shipment(&request).await {
        Ok(receipt) => Ok(Json(ActionResponse::ok(
            "Shipment Created",
            "Shipment registered with the carrier",
            serde_json::to_value(&receipt).ok(),
        ))),
        Err(err) => Ok(Json(ActionResponse::failed(
            "Shipment Creation Failed",
            err.to_string(),
        ))),
    }
}

#[derive(Debug, Deserialize)]
struct ExportRequest {
    shipment_ids: Vec<Uuid>,
}

/// Bulk export: one CSV row per physical package
async fn export(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let shipments = state.shipments.read().unwrap_or_else(|e| e.into_inner());
    let selected = req
        .shipment_ids
        .iter()
        .map(|id| {
            shipments
                .get(*id)
                .ok_or_else(|| ApiError::NotFound(format!("shipment {id}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let rows = build_rows(&selected)?;
    let csv = to_csv(&rows);
    Ok((
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        csv,
    ))
}
