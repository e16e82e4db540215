use crate::barcode::{format_gab, SequenceAllocator};
use crate::models::{Package, Shipment, ShipmentState};
use chrono::NaiveDate;
use colis_core::ProviderKind;
use colis_shared::{Partner, ShippingPaymentMethod, TransportNature};
use std::collections::HashMap;
use uuid::Uuid;

/// Creation arguments for a shipment, usually sourced from a done outgoing
/// delivery and its sale order.
#[derive(Debug, Clone)]
pub struct NewShipment {
    pub delivery_id: Uuid,
    pub sale_order_id: Option<Uuid>,
    pub partner: Partner,
    pub carrier_id: Uuid,
    pub provider: ProviderKind,
    pub declared_packages: u32,
    pub payment_method: ShippingPaymentMethod,
    pub transport_nature: TransportNature,
    pub shipping_date: NaiveDate,
    pub reference_from: Option<String>,
}

/// Manages shipment records and their package barcodes
pub struct ShipmentService {
    shipments: HashMap<Uuid, Shipment>,
    sequencer: SequenceAllocator,
    name_counter: u32,
}

impl ShipmentService {
    pub fn new(sequencer: SequenceAllocator) -> Self {
        Self {
            shipments: HashMap::new(),
            sequencer,
            name_counter: 0,
        }
    }

    pub fn create(&mut self, new: NewShipment) -> Uuid {
        self.name_counter += 1;
        let recipient_phone = new.partner.contact_number().map(str::to_string);
        let shipment = Shipment {
            id: Uuid::new_v4(),
            name: format!("SHP{:05}", self.name_counter),
            delivery_id: new.delivery_id,
            sale_order_id: new.sale_order_id,
            partner: new.partner,
            carrier_id: new.carrier_id,
            provider: new.provider,
            declared_packages: new.declared_packages.max(1),
            payment_method: new.payment_method,
            transport_nature: new.transport_nature,
            gab: None,
            recipient_phone,
            declared_value: 0.0,
            cod_cash: 0.0,
            cod_cheque: None,
            weight: 0.0,
            content_description: None,
            fragile: false,
            length_cm: 0.0,
            width_cm: 0.0,
            height_cm: 0.0,
            relay_point_code: None,
            supplier_code: None,
            reference: None,
            reference_from: new.reference_from,
            state: ShipmentState::Draft,
            shipping_date: new.shipping_date,
            delivery_date: None,
            notes: None,
            packages: Vec::new(),
        };
        let id = shipment.id;
        self.shipments.insert(id, shipment);
        id
    }

    pub fn get(&self, id: Uuid) -> Option<&Shipment> {
        self.shipments.get(&id)
    }

    pub fn list(&self) -> impl Iterator<Item = &Shipment> {
        self.shipments.values()
    }

    fn get_mut(&mut self, id: Uuid) -> Result<&mut Shipment, ShipmentError> {
        self.shipments
            .get_mut(&id)
            .ok_or(ShipmentError::NotFound(id))
    }

    /// Generate one package record per declared package.
    ///
    /// Refused while packages already exist: regeneration would allocate a
    /// second barcode range for the same shipment. Barid shipments get GAB
    /// barcodes from the allocator; other carriers get a numeric reference
    /// range starting at `reference_from`.
    pub fn generate_packages(&mut self, id: Uuid) -> Result<Vec<Package>, ShipmentError> {
        let sequencer = &mut self.sequencer;
        let shipment = self
            .shipments
            .get_mut(&id)
            .ok_or(ShipmentError::NotFound(id))?;
        if !shipment.packages.is_empty() {
            return Err(ShipmentError::PackagesAlreadyExist);
        }

        let count = shipment.declared_packages.max(1);
        if shipment.uses_gab() {
            for i in 0..count {
                let gab = format_gab(sequencer.next_value());
                shipment.packages.push(Package {
                    id: Uuid::new_v4(),
                    shipment_id: id,
                    sequence: i + 1,
                    gab: Some(gab),
                    reference: None,
                });
            }
            // Mirror the first GAB into the legacy single-barcode field
            shipment.gab = shipment
                .packages
                .first()
                .and_then(|package| package.gab.clone());
        } else {
            let start = shipment
                .reference_from
                .as_deref()
                .and_then(|from| from.parse::<u64>().ok())
                .unwrap_or(0);
            for i in 0..count {
                let reference = if start > 0 {
                    (start + u64::from(i)).to_string()
                } else {
                    format!("REF-{}", i + 1)
                };
                shipment.packages.push(Package {
                    id: Uuid::new_v4(),
                    shipment_id: id,
                    sequence: i + 1,
                    gab: None,
                    reference: Some(reference),
                });
            }
        }

        tracing::info!(shipment = %shipment.name, count, "generated packages");
        Ok(shipment.packages.clone())
    }

    /// All-or-nothing: removes every package and the legacy barcode field
    pub fn clear_packages(&mut self, id: Uuid) -> Result<(), ShipmentError> {
        let shipment = self.get_mut(id)?;
        shipment.packages.clear();
        shipment.gab = None;
        Ok(())
    }

    pub fn confirm(&mut self, id: Uuid) -> Result<(), ShipmentError> {
        let shipment = self.get_mut(id)?;
        if shipment.uses_gab() && shipment.packages.is_empty() {
            return Err(ShipmentError::BarcodesRequired);
        }
        shipment.state = ShipmentState::Confirmed;
        Ok(())
    }

    pub fn mark_in_transit(&mut self, id: Uuid) -> Result<(), ShipmentError> {
        self.get_mut(id)?.state = ShipmentState::InTransit;
        Ok(())
    }

    pub fn mark_delivered(&mut self, id: Uuid, today: NaiveDate) -> Result<(), ShipmentError> {
        let shipment = self.get_mut(id)?;
        shipment.state = ShipmentState::Delivered;
        shipment.delivery_date = Some(today);
        Ok(())
    }

    pub fn mark_returned(&mut self, id: Uuid) -> Result<(), ShipmentError> {
        self.get_mut(id)?.state = ShipmentState::Returned;
        Ok(())
    }

    pub fn cancel(&mut self, id: Uuid) -> Result<(), ShipmentError> {
        self.get_mut(id)?.state = ShipmentState::Cancelled;
        Ok(())
    }

    pub fn reset_to_draft(&mut self, id: Uuid) -> Result<(), ShipmentError> {
        self.get_mut(id)?.state = ShipmentState::Draft;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ShipmentError {
    #[error("Shipment not found: {0}")]
    NotFound(Uuid),

    #[error("Packages already exist, clear them first to generate new ones")]
    PackagesAlreadyExist,

    #[error("Generate barcodes before confirming")]
    BarcodesRequired,
}
