use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use colis_orders::{
    DeliveryKind, DeliveryOrder, Invoice, NewDelivery, PropagationOutcome, SaleOrder,
    ShippingDetails, ShippingPatch,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/confirm", post(confirm_order))
        .route("/deliveries", post(create_delivery))
        .route("/deliveries/{id}", get(get_delivery))
        .route("/deliveries/{id}/shipping", patch(write_shipping))
        .route("/deliveries/{id}/complete", post(complete_delivery))
        .route("/invoices", post(create_invoice))
        .route("/invoices/{id}", get(get_invoice))
        .route("/invoices/{id}/post", post(post_invoice))
}

#[derive(Debug, Serialize)]
struct CreatedResponse {
    id: Uuid,
}

#[derive(Debug, Deserialize)]
struct NewOrderRequest {
    name: String,
    partner_id: Uuid,
    date_order: Option<DateTime<Utc>>,
    #[serde(default)]
    shipping: ShippingDetails,
}

async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<NewOrderRequest>,
) -> Json<CreatedResponse> {
    let mut documents = state.documents.write().unwrap_or_else(|e| e.into_inner());
    let id = documents.create_order(
        req.name,
        req.partner_id,
        req.date_order.unwrap_or_else(Utc::now),
        req.shipping,
    );
    Json(CreatedResponse { id })
}

async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SaleOrder>, ApiError> {
    let documents = state.documents.read().unwrap_or_else(|e| e.into_inner());
    documents
        .order(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("sale order {id}")))
}

async fn confirm_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut documents = state.documents.write().unwrap_or_else(|e| e.into_inner());
    documents.confirm_order(id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct NewDeliveryRequest {
    name: String,
    kind: DeliveryKind,
    group_id: Option<Uuid>,
    sale_order_id: Option<Uuid>,
    created_at: Option<DateTime<Utc>>,
}

async fn create_delivery(
    State(state): State<AppState>,
    Json(req): Json<NewDeliveryRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let mut documents = state.documents.write().unwrap_or_else(|e| e.into_inner());
    let id = documents.create_delivery(NewDelivery {
        name: req.name,
        kind: req.kind,
        group_id: req.group_id,
        sale_order_id: req.sale_order_id,
        created_at: req.created_at.unwrap_or_else(Utc::now),
    })?;
    Ok(Json(CreatedResponse { id }))
}

async fn get_delivery(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeliveryOrder>, ApiError> {
    let documents = state.documents.read().unwrap_or_else(|e| e.into_inner());
    documents
        .delivery(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("delivery {id}")))
}

async fn write_shipping(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ShippingPatch>,
) -> Result<Json<PropagationOutcome>, ApiError> {
    let mut documents = state.documents.write().unwrap_or_else(|e| e.into_inner());
    let outcome = documents.write_delivery_shipping(id, &patch, Utc::now().date_naive())?;
    Ok(Json(outcome))
}

async fn complete_delivery(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut documents = state.documents.write().unwrap_or_else(|e| e.into_inner());
    documents.complete_delivery(id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct NewInvoiceRequest {
    name: String,
    order_id: Uuid,
}

async fn create_invoice(
    State(state): State<AppState>,
    Json(req): Json<NewInvoiceRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let mut documents = state.documents.write().unwrap_or_else(|e| e.into_inner());
    let id = documents.create_invoice(req.name, req.order_id)?;
    Ok(Json(CreatedResponse { id }))
}

async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Invoice>, ApiError> {
    let documents = state.documents.read().unwrap_or_else(|e| e.into_inner());
    documents
        .invoice(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("invoice {id}")))
}

async fn post_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut documents = state.documents.write().unwrap_or_else(|e| e.into_inner());
    documents.post_invoice(id)?;
    Ok(StatusCode::NO_CONTENT)
}
