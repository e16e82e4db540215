use chrono::NaiveDate;
use colis_core::ProviderKind;
use colis_shared::{Partner, ShippingPaymentMethod, TransportNature};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentState {
    Draft,
    Confirmed,
    InTransit,
    Delivered,
    Returned,
    Cancelled,
}

/// One physical package of a shipment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub id: Uuid,
    pub shipment_id: Uuid,
    /// 1-based position within the shipment
    pub sequence: u32,
    pub gab: Option<String>,
    pub reference: Option<String>,
}

impl Package {
    /// Code-39 wrapped form of the barcode, `*GAB*`
    pub fn cab1(&self) -> Option<String> {
        self.gab.as_ref().map(|gab| format!("*{gab}*"))
    }

    pub fn display_code(&self) -> &str {
        self.gab
            .as_deref()
            .or(self.reference.as_deref())
            .unwrap_or("")
    }
}

/// One outgoing delivery order handed to a carrier, mapped to 1..N packages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    pub id: Uuid,
    pub name: String,
    pub delivery_id: Uuid,
    pub sale_order_id: Option<Uuid>,
    pub partner: Partner,
    pub carrier_id: Uuid,
    pub provider: ProviderKind,
    /// Declared number of packages ("nombre de colis")
    pub declared_packages: u32,
    pub payment_method: ShippingPaymentMethod,
    pub transport_nature: TransportNature,
    /// Legacy single-barcode field, mirrors the first package's GAB
    pub gab: Option<String>,
    /// Recipient phone printed on labels ("MS destinataire")
    pub recipient_phone: Option<String>,
    /// Declared value for fragile or valuable contents ("VD")
    pub declared_value: f64,
    /// Cash to collect on delivery ("CRBT espèce")
    pub cod_cash: f64,
    /// Cheque number for payment on delivery ("CRBT chèque")
    pub cod_cheque: Option<String>,
    pub weight: f64,
    pub content_description: Option<String>,
    pub fragile: bool,
    pub length_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
    pub relay_point_code: Option<String>,
    pub supplier_code: Option<String>,
    /// Single reference for carriers without GAB barcodes
    pub reference: Option<String>,
    /// Starting reference for multi-package non-GAB shipments
    pub reference_from: Option<String>,
    pub state: ShipmentState,
    pub shipping_date: NaiveDate,
    pub delivery_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub packages: Vec<Package>,
}

impl Shipment {
    /// GAB barcodes only apply to the Barid provider; other carriers use
    /// plain reference ranges.
    pub fn uses_gab(&self) -> bool {
        matches!(self.provider, ProviderKind::Barid)
    }

    pub fn cab1(&self) -> Option<String> {
        self.gab.as_ref().map(|gab| format!("*{gab}*"))
    }

    pub fn has_multiple_packages(&self) -> bool {
        self.declared_packages > 1
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Ending reference derived from the start reference and the declared
    /// package count; non-numeric starts pass through unchanged.
    pub fn reference_to(&self) -> Option<String> {
        let from = self.reference_from.as_deref()?;
        match from.parse::<u64>() {
            Ok(start) => Some((start + u64::from(self.declared_packages)).to_string()),
            Err(_) => Some(from.to_string()),
        }
    }

    pub fn reference_display(&self) -> Option<String> {
        if self.declared_packages > 1 {
            match (self.reference_from.as_deref(), self.reference_to()) {
                (Some(from), Some(to)) => Some(format!("{from} → {to}")),
                (Some(from), None) => Some(from.to_string()),
                _ => None,
            }
        } else {
            self.reference.clone()
        }
    }

    /// `first → last` barcode range over the generated packages
    pub fn gab_range(&self) -> Option<String> {
        let first = self.packages.first()?;
        let last = self.packages.last()?;
        if self.packages.len() == 1 {
            Some(first.display_code().to_string())
        } else {
            Some(format!("{} → {}", first.display_code(), last.display_code()))
        }
    }
}
