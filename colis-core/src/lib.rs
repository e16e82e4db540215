pub mod company;
pub mod error;
pub mod provider;
pub mod registry;
pub mod token;

pub use company::{CarrierConfig, ProviderKind};
pub use error::{CarrierError, CarrierResult};
pub use provider::{
    CarrierProvider, CheckOutcome, ConnectionReport, CredentialReport, LabelData, ShipmentReceipt,
    ShipmentRequest, TrackingInfo,
};
pub use registry::ProviderRegistry;
pub use token::{BearerToken, TokenCache};
