use colis_shared::TransportNature;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Provider selector stored on a carrier configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Barid,
    Other,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Barid => write!(f, "barid"),
            ProviderKind::Other => write!(f, "other"),
        }
    }
}

/// Named carrier configuration.
///
/// Credential fields are opaque strings consumed by the provider client;
/// endpoint overrides fall back to the provider's defaults when unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierConfig {
    pub id: Uuid,
    pub name: String,
    pub active: bool,
    pub provider: ProviderKind,
    pub default_transport_nature: TransportNature,
    /// Contract code for the tracking API ("codecontrat")
    pub contract_code: Option<String>,
    /// Secret key for tracking API authentication
    pub secret_key: Option<String>,
    /// Password for the e-commerce API, exchanged for a bearer token
    pub ecom_password: Option<String>,
    pub tracking_url: Option<String>,
    pub ecom_base_url: Option<String>,
    pub notes: Option<String>,
}

impl CarrierConfig {
    pub fn new(name: impl Into<String>, provider: ProviderKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            active: true,
            provider,
            default_transport_nature: TransportNature::default(),
            contract_code: None,
            secret_key: None,
            ecom_password: None,
            tracking_url: None,
            ecom_base_url: None,
            notes: None,
        }
    }
}
