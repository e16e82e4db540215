use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use colis_core::CarrierError;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    Carrier(CarrierError),
    NotFound(String),
    Validation(String),
    Conflict(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Carrier(err) => {
                let status = match &err {
                    CarrierError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
                    CarrierError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                    CarrierError::Configuration(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    CarrierError::Auth(_)
                    | CarrierError::Remote { .. }
                    | CarrierError::Network(_) => StatusCode::BAD_GATEWAY,
                };
                (status, err.to_string())
            }
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("Not found: {what}")),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<CarrierError> for ApiError {
    fn from(err: CarrierError) -> Self {
        ApiError::Carrier(err)
    }
}

impl From<colis_orders::OrderError> for ApiError {
    fn from(err: colis_orders::OrderError) -> Self {
        ApiError::NotFound(err.to_string())
    }
}

impl From<colis_shipment::ShipmentError> for ApiError {
    fn from(err: colis_shipment::ShipmentError) -> Self {
        use colis_shipment::ShipmentError;
        match err {
            ShipmentError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ShipmentError::PackagesAlreadyExist | ShipmentError::BarcodesRequired => {
                ApiError::Conflict(err.to_string())
            }
        }
    }
}

impl From<colis_shipment::ExportError> for ApiError {
    fn from(err: colis_shipment::ExportError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<colis_realty::presale::PresaleError> for ApiError {
    fn from(err: colis_realty::presale::PresaleError) -> Self {
        use colis_realty::presale::PresaleError;
        match err {
            PresaleError::NotFound(_) | PresaleError::PropertyNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            PresaleError::PropertyUnavailable(_) | PresaleError::NotConvertible(_) => {
                ApiError::Conflict(err.to_string())
            }
        }
    }
}

impl From<colis_realty::installment::InstallmentError> for ApiError {
    fn from(err: colis_realty::installment::InstallmentError) -> Self {
        use colis_realty::installment::InstallmentError;
        match err {
            InstallmentError::NotFound(_) => ApiError::NotFound(err.to_string()),
            InstallmentError::LineCancelled(_) => ApiError::Conflict(err.to_string()),
            InstallmentError::NonPositiveAmount => ApiError::Validation(err.to_string()),
        }
    }
}

impl From<colis_realty::schedule::ScheduleError> for ApiError {
    fn from(err: colis_realty::schedule::ScheduleError) -> Self {
        use colis_realty::schedule::ScheduleError;
        match err {
            ScheduleError::SplitOnPaidLine => ApiError::Conflict(err.to_string()),
            _ => ApiError::Validation(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}
