use crate::error::CarrierResult;
use crate::token::BearerToken;
use crate::CarrierError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Tracking lookup result: the carrier answers with an opaque payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingInfo {
    pub tracking_number: String,
    pub data: String,
}

/// Shipment creation payload sent to the carrier's e-commerce API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentRequest {
    pub recipient_name: String,
    pub recipient_address: String,
    pub recipient_city: String,
    pub recipient_phone: String,
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cod_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Shipment creation result, parsed as JSON when the response says so
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShipmentReceipt {
    Json(serde_json::Value),
    Raw(String),
}

/// Label download result (usually PDF bytes)
#[derive(Debug, Clone)]
pub struct LabelData {
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Outcome of one connectivity sub-check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub success: bool,
    pub message: String,
}

impl CheckOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Aggregate of the tracking-API and e-commerce-API connectivity checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionReport {
    pub success: bool,
    pub tracking_api: CheckOutcome,
    pub ecom_api: CheckOutcome,
}

/// Advisory credential validation: issues are reported, never fatal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialReport {
    pub valid: bool,
    pub issues: Vec<String>,
}

/// Contract every delivery provider implements.
///
/// Providers with partial capability sets are legal: unimplemented
/// operations answer `CarrierError::Unsupported` so callers can render the
/// limitation instead of crashing the triggering action.
#[async_trait]
pub trait CarrierProvider: Send + Sync {
    /// Unique identifier for this provider (e.g. "barid")
    fn provider_code(&self) -> &'static str;

    /// Human-readable provider name
    fn provider_name(&self) -> &'static str;

    /// Check that the configured credentials look complete. Advisory only:
    /// a misconfigured carrier may still attempt calls and surface the
    /// provider's own error.
    fn validate_credentials(&self) -> CredentialReport;

    /// Return a valid bearer token, fetching a fresh one when the cached
    /// entry is missing, expired, or a refresh is forced. Any fetch
    /// failure leaves the previously cached token untouched.
    async fn fetch_token(&self, force_refresh: bool) -> CarrierResult<BearerToken>;

    /// Look up tracking information for a shipment. Single call, no retry.
    async fn track_package(&self, tracking_number: &str) -> CarrierResult<TrackingInfo>;

    /// Create a shipment with the carrier. On a 401 the provider performs
    /// exactly one forced token refresh and one retry.
    async fn create_shipment(&self, request: &ShipmentRequest) -> CarrierResult<ShipmentReceipt>;

    /// Probe both carrier APIs and aggregate per-check outcomes. Never
    /// fails: connectivity problems land in the report.
    async fn test_connection(&self) -> ConnectionReport;

    /// Download the shipping label for a tracking number
    async fn get_label(&self, tracking_number: &str) -> CarrierResult<LabelData> {
        let _ = tracking_number;
        Err(CarrierError::Unsupported(format!(
            "{} does not support label download",
            self.provider_name()
        )))
    }

    /// Cancel a shipment with the carrier
    async fn cancel_shipment(&self, tracking_number: &str) -> CarrierResult<()> {
        let _ = tracking_number;
        Err(CarrierError::Unsupported(format!(
            "{} does not support shipment cancellation",
            self.provider_name()
        )))
    }
}
