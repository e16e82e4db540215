use crate::models::{
    DeliveryKind, DeliveryOrder, DeliveryState, Invoice, InvoiceState, SaleOrder, ShippingDetails,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// Holds the order/delivery/invoice documents and their links
#[derive(Debug, Default)]
pub struct DocumentStore {
    pub(crate) orders: HashMap<Uuid, SaleOrder>,
    pub(crate) deliveries: HashMap<Uuid, DeliveryOrder>,
    pub(crate) invoices: HashMap<Uuid, Invoice>,
}

/// Creation arguments for a delivery order
#[derive(Debug, Clone)]
pub struct NewDelivery {
    pub name: String,
    pub kind: DeliveryKind,
    pub group_id: Option<Uuid>,
    pub sale_order_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_order(
        &mut self,
        name: impl Into<String>,
        partner_id: Uuid,
        date_order: DateTime<Utc>,
        shipping: ShippingDetails,
    ) -> Uuid {
        let order = SaleOrder::new(name, partner_id, date_order, shipping);
        let id = order.id;
        self.orders.insert(id, order);
        id
    }

    /// Create a delivery. A delivery linked to a sale order inherits the
    /// order's shipping details at creation time.
    pub fn create_delivery(&mut self, new: NewDelivery) -> Result<Uuid, OrderError> {
        let shipping = match new.sale_order_id {
            Some(order_id) => {
                let order = self
                    .orders
                    .get(&order_id)
                    .ok_or(OrderError::OrderNotFound(order_id))?;
                order.shipping.clone()
            }
            None => ShippingDetails::default(),
        };

        let delivery = DeliveryOrder {
            id: Uuid::new_v4(),
            name: new.name,
            kind: new.kind,
            state: DeliveryState::Draft,
            group_id: new.group_id,
            sale_order_id: new.sale_order_id,
            created_at: new.created_at,
            shipping,
            next_delivery_ids: Vec::new(),
        };
        let id = delivery.id;
        if let Some(order_id) = new.sale_order_id {
            if let Some(order) = self.orders.get_mut(&order_id) {
                order.delivery_ids.push(id);
            }
        }
        self.deliveries.insert(id, delivery);
        Ok(id)
    }

    /// Create a draft invoice for an order; carrier and payment method come
    /// from the order.
    pub fn create_invoice(
        &mut self,
        name: impl Into<String>,
        order_id: Uuid,
    ) -> Result<Uuid, OrderError> {
        let order = self
            .orders
            .get_mut(&order_id)
            .ok_or(OrderError::OrderNotFound(order_id))?;
        let invoice = Invoice {
            id: Uuid::new_v4(),
            name: name.into(),
            order_id: Some(order_id),
            state: InvoiceState::Draft,
            carrier_id: order.shipping.carrier_id,
            payment_method: order.shipping.payment_method,
        };
        let id = invoice.id;
        order.invoice_ids.push(id);
        self.invoices.insert(id, invoice);
        Ok(id)
    }

    /// Chain a successor transfer behind a delivery (pick → ship)
    pub fn chain_delivery(&mut self, from: Uuid, to: Uuid) -> Result<(), OrderError> {
        if !self.deliveries.contains_key(&to) {
            return Err(OrderError::DeliveryNotFound(to));
        }
        let delivery = self
            .deliveries
            .get_mut(&from)
            .ok_or(OrderError::DeliveryNotFound(from))?;
        delivery.next_delivery_ids.push(to);
        Ok(())
    }

    /// Confirming an order pushes its carrier onto linked deliveries that
    /// have none yet.
    pub fn confirm_order(&mut self, order_id: Uuid) -> Result<(), OrderError> {
        let order = self
            .orders
            .get(&order_id)
            .ok_or(OrderError::OrderNotFound(order_id))?;
        let carrier_id = order.shipping.carrier_id;
        let delivery_ids = order.delivery_ids.clone();

        if let Some(carrier_id) = carrier_id {
            for delivery_id in delivery_ids {
                if let Some(delivery) = self.deliveries.get_mut(&delivery_id) {
                    if delivery.shipping.carrier_id.is_none() {
                        delivery.shipping.carrier_id = Some(carrier_id);
                    }
                }
            }
        }
        Ok(())
    }

    /// Mark a delivery done and fill the carrier forward onto chained
    /// successor transfers that have none.
    pub fn complete_delivery(&mut self, delivery_id: Uuid) -> Result<(), OrderError> {
        let delivery = self
            .deliveries
            .get_mut(&delivery_id)
            .ok_or(OrderError::DeliveryNotFound(delivery_id))?;
        delivery.state = DeliveryState::Done;
        let carrier_id = delivery.shipping.carrier_id;
        let next_ids = delivery.next_delivery_ids.clone();

        if let Some(carrier_id) = carrier_id {
            for next_id in next_ids {
                if let Some(next) = self.deliveries.get_mut(&next_id) {
                    if next.shipping.carrier_id.is_none() {
                        next.shipping.carrier_id = Some(carrier_id);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn post_invoice(&mut self, invoice_id: Uuid) -> Result<(), OrderError> {
        let invoice = self
            .invoices
            .get_mut(&invoice_id)
            .ok_or(OrderError::InvoiceNotFound(invoice_id))?;
        invoice.state = InvoiceState::Posted;
        Ok(())
    }

    pub fn order(&self, id: Uuid) -> Option<&SaleOrder> {
        self.orders.get(&id)
    }

    pub fn delivery(&self, id: Uuid) -> Option<&DeliveryOrder> {
        self.deliveries.get(&id)
    }

    pub fn invoice(&self, id: Uuid) -> Option<&Invoice> {
        self.invoices.get(&id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Sale order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("Delivery order not found: {0}")]
    DeliveryNotFound(Uuid),

    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),
}
