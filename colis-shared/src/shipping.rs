use serde::{Deserialize, Serialize};

/// Transport nature offered by the carrier network
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransportNature {
    Standard,
    Express,
    /// Home delivery ("à domicile")
    Domicile,
}

impl Default for TransportNature {
    fn default() -> Self {
        TransportNature::Standard
    }
}

/// Payment method agreed with the carrier for a delivery
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShippingPaymentMethod {
    BankTransfer,
    /// Cash ("espèce")
    Cash,
    Cheque,
    Effet,
}

impl Default for ShippingPaymentMethod {
    fn default() -> Self {
        ShippingPaymentMethod::Cash
    }
}
