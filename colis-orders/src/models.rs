use chrono::{DateTime, Utc};
use colis_shared::{ShippingPaymentMethod, TransportNature};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The shipping metadata that travels along the document chain
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingDetails {
    pub carrier_id: Option<Uuid>,
    pub payment_method: ShippingPaymentMethod,
    pub transport_nature: TransportNature,
    pub package_count: u32,
}

impl Default for ShippingDetails {
    fn default() -> Self {
        Self {
            carrier_id: None,
            payment_method: ShippingPaymentMethod::default(),
            transport_nature: TransportNature::default(),
            package_count: 1,
        }
    }
}

/// Partial write of the shipping metadata; only fields that are present
/// are applied and propagated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingPatch {
    pub carrier_id: Option<Uuid>,
    pub payment_method: Option<ShippingPaymentMethod>,
    pub transport_nature: Option<TransportNature>,
    pub package_count: Option<u32>,
}

impl ShippingPatch {
    pub fn carrier(carrier_id: Uuid) -> Self {
        Self {
            carrier_id: Some(carrier_id),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.carrier_id.is_none()
            && self.payment_method.is_none()
            && self.transport_nature.is_none()
            && self.package_count.is_none()
    }

    pub fn apply(&self, details: &mut ShippingDetails) {
        if let Some(carrier_id) = self.carrier_id {
            details.carrier_id = Some(carrier_id);
        }
        if let Some(payment_method) = self.payment_method {
            details.payment_method = payment_method;
        }
        if let Some(transport_nature) = self.transport_nature {
            details.transport_nature = transport_nature;
        }
        if let Some(package_count) = self.package_count {
            details.package_count = package_count;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleOrder {
    pub id: Uuid,
    pub name: String,
    pub partner_id: Uuid,
    pub date_order: DateTime<Utc>,
    pub shipping: ShippingDetails,
    pub delivery_ids: Vec<Uuid>,
    pub invoice_ids: Vec<Uuid>,
}

impl SaleOrder {
    pub fn new(
        name: impl Into<String>,
        partner_id: Uuid,
        date_order: DateTime<Utc>,
        shipping: ShippingDetails,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            partner_id,
            date_order,
            shipping,
            delivery_ids: Vec::new(),
            invoice_ids: Vec::new(),
        }
    }
}

/// Direction of a stock transfer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryKind {
    Outgoing,
    Incoming,
    Internal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
    Draft,
    Done,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryOrder {
    pub id: Uuid,
    pub name: String,
    pub kind: DeliveryKind,
    pub state: DeliveryState,
    /// Logistics group tying sibling transfers of one procurement together
    pub group_id: Option<Uuid>,
    pub sale_order_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub shipping: ShippingDetails,
    /// Chained transfers fed by this one (e.g. pick → ship)
    pub next_delivery_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceState {
    Draft,
    Posted,
    Cancelled,
}

/// Customer invoice; only the shipping fields it actually carries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub name: String,
    pub order_id: Option<Uuid>,
    pub state: InvoiceState,
    pub carrier_id: Option<Uuid>,
    pub payment_method: ShippingPaymentMethod,
}
