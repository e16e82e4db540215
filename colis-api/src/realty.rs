use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use colis_realty::schedule::SplitRequest;
use colis_realty::{generate_schedule, split_installment, Installment, ScheduleRequest, SweepReport};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/properties", post(create_property))
        .route("/presales", post(create_presale))
        .route("/presales/{id}/activate", post(activate_presale))
        .route("/presales/{id}/cancel", post(cancel_presale))
        .route("/presales/{id}/convert", post(convert_presale))
        .route("/presales/sweep", post(sweep_presales))
        .route("/schedules/generate", post(generate))
        .route("/installments/{id}/payments", post(register_payment))
        .route("/installments/{id}/split", post(split))
}

#[derive(Debug, Serialize)]
struct CreatedResponse {
    id: Uuid,
}

#[derive(Debug, Deserialize)]
struct NewPropertyRequest {
    name: String,
}

async fn create_property(
    State(state): State<AppState>,
    Json(req): Json<NewPropertyRequest>,
) -> Json<CreatedResponse> {
    let mut presales = state.presales.write().unwrap_or_else(|e| e.into_inner());
    let id = presales.add_property(req.name);
    Json(CreatedResponse { id })
}

#[derive(Debug, Deserialize)]
struct NewPresaleRequest {
    property_id: Uuid,
    partner_id: Uuid,
    date_start: Option<NaiveDate>,
    validity_days: Option<i64>,
    amount: Option<f64>,
}

async fn create_presale(
    State(state): State<AppState>,
    Json(req): Json<NewPresaleRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let mut presales = state.presales.write().unwrap_or_else(|e| e.into_inner());
    let id = presales.create(
        req.property_id,
        req.partner_id,
        req.date_start.unwrap_or_else(|| Utc::now().date_naive()),
        req.validity_days.unwrap_or(2),
        req.amount.unwrap_or(0.0),
    )?;
    Ok(Json(CreatedResponse { id }))
}

async fn activate_presale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<axum::http::StatusCode, ApiError> {
    let mut presales = state.presales.write().unwrap_or_else(|e| e.into_inner());
    presales.activate(id)?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn cancel_presale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<axum::http::StatusCode, ApiError> {
    let mut presales = state.presales.write().unwrap_or_else(|e| e.into_inner());
    presales.cancel(id)?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn convert_presale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<axum::http::StatusCode, ApiError> {
    let mut presales = state.presales.write().unwrap_or_else(|e| e.into_inner());
    presales.convert(id, Utc::now().date_naive())?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn sweep_presales(State(state): State<AppState>) -> Json<SweepReport> {
    let mut presales = state.presales.write().unwrap_or_else(|e| e.into_inner());
    Json(presales.sweep(Utc::now().date_naive()))
}

async fn generate(
    State(state): State<AppState>,
    Json(req): Json<ScheduleRequest>,
) -> Result<Json<Vec<Installment>>, ApiError> {
    let lines = generate_schedule(&req)?;
    let mut installments = state.installments.write().unwrap_or_else(|e| e.into_inner());
    installments.insert_all(lines.clone());
    Ok(Json(lines))
}

#[derive(Debug, Deserialize)]
struct PaymentRequest {
    amount: f64,
    payment_date: Option<NaiveDate>,
    reference: Option<String>,
}

async fn register_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PaymentRequest>,
) -> Result<Json<Installment>, ApiError> {
    let mut installments = state.installments.write().unwrap_or_else(|e| e.into_inner());
    let line = installments.get_mut(id)?;
    line.register_payment(
        req.amount,
        req.payment_date.unwrap_or_else(|| Utc::now().date_naive()),
        req.reference,
    )?;
    Ok(Json(line.clone()))
}

#[derive(Debug, Serialize)]
struct SplitResponse {
    created: Vec<Uuid>,
}

async fn split(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SplitRequest>,
) -> Result<Json<SplitResponse>, ApiError> {
    let mut installments = state.installments.write().unwrap_or_else(|e| e.into_inner());
    let replacements = {
        let line = installments.get_mut(id)?;
        split_installment(line, &req)?
    };
    let created = replacements.iter().map(|line| line.id).collect();
    for line in replacements {
        installments.insert(line);
    }
    Ok(Json(SplitResponse { created }))
}
