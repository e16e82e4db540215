use crate::models::{DeliveryKind, InvoiceState, ShippingPatch};
use crate::store::{DocumentStore, OrderError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Documents a propagation pass touched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropagationOutcome {
    pub order_updated: Option<Uuid>,
    pub sibling_delivery_ids: Vec<Uuid>,
    pub invoice_ids: Vec<Uuid>,
}

impl DocumentStore {
    /// Write shipping fields on a delivery and propagate them along the
    /// document chain.
    ///
    /// The effect is one pass over a pre-computed affected-document set:
    /// the originating sale order (only if dated `today`), sibling
    /// deliveries of the same logistics group created `today`, and draft
    /// invoices of the order. Propagation only triggers for outgoing
    /// deliveries created `today`; nothing written here re-enters the
    /// trigger, so historical documents are never rewritten.
    pub fn write_delivery_shipping(
        &mut self,
        delivery_id: Uuid,
        patch: &ShippingPatch,
        today: NaiveDate,
    ) -> Result<PropagationOutcome, OrderError> {
        let delivery = self
            .deliveries
            .get_mut(&delivery_id)
            .ok_or(OrderError::DeliveryNotFound(delivery_id))?;
        patch.apply(&mut delivery.shipping);

        let propagates = delivery.kind == DeliveryKind::Outgoing
            && delivery.created_at.date_naive() == today
            && !patch.is_empty();
        if !propagates {
            return Ok(PropagationOutcome::default());
        }

        let group_id = delivery.group_id;
        let sale_order_id = delivery.sale_order_id;

        // Pre-compute the affected set before writing anything
        let order_target = sale_order_id
            .and_then(|order_id| self.orders.get(&order_id))
            .filter(|order| order.date_order.date_naive() == today)
            .map(|order| order.id);

        let sibling_ids: Vec<Uuid> = match group_id {
            Some(group_id) => self
                .deliveries
                .values()
                .filter(|sibling| {
                    sibling.id != delivery_id
                        && sibling.group_id == Some(group_id)
                        && sibling.created_at.date_naive() == today
                })
                .map(|sibling| sibling.id)
                .collect(),
            None => Vec::new(),
        };

        let invoice_ids: Vec<Uuid> = sale_order_id
            .and_then(|order_id| self.orders.get(&order_id))
            .map(|order| {
                order
                    .invoice_ids
                    .iter()
                    .filter(|invoice_id| {
                        self.invoices
                            .get(invoice_id)
                            .map(|invoice| invoice.state == InvoiceState::Draft)
                            .unwrap_or(false)
                    })
                    .copied()
                    .collect()
            })
            .unwrap_or_default();

        // Apply the patch across the set
        if let Some(order_id) = order_target {
            if let Some(order) = self.orders.get_mut(&order_id) {
                patch.apply(&mut order.shipping);
            }
        }
        for sibling_id in &sibling_ids {
            if let Some(sibling) = self.deliveries.get_mut(sibling_id) {
                patch.apply(&mut sibling.shipping);
            }
        }
        for invoice_id in &invoice_ids {
            if let Some(invoice) = self.invoices.get_mut(invoice_id) {
                // Invoices only carry carrier and payment method
                if let Some(carrier_id) = patch.carrier_id {
                    invoice.carrier_id = Some(carrier_id);
                }
                if let Some(payment_method) = patch.payment_method {
                    invoice.payment_method = payment_method;
                }
            }
        }

        tracing::debug!(
            %delivery_id,
            order_updated = ?order_target,
            siblings = sibling_ids.len(),
            invoices = invoice_ids.len(),
            "propagated shipping fields"
        );

        Ok(PropagationOutcome {
            order_updated: order_target,
            sibling_delivery_ids: sibling_ids,
            invoice_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShippingDetails;
    use crate::store::NewDelivery;
    use chrono::{Duration, Utc};
    use colis_shared::ShippingPaymentMethod;

    struct Chain {
        store: DocumentStore,
        order_id: Uuid,
        delivery_id: Uuid,
        sibling_today_id: Uuid,
        sibling_yesterday_id: Uuid,
        invoice_id: Uuid,
    }

    fn build_chain() -> Chain {
        let mut store = DocumentStore::new();
        let now = Utc::now();
        let group_id = Uuid::new_v4();

        let order_id = store.create_order(
            "SO0001",
            Uuid::new_v4(),
            now,
            ShippingDetails::default(),
        );
        let delivery_id = store
            .create_delivery(NewDelivery {
                name: "WH/OUT/0001".to_string(),
                kind: DeliveryKind::Outgoing,
                group_id: Some(group_id),
                sale_order_id: Some(order_id),
                created_at: now,
            })
            .unwrap();
        let sibling_today_id = store
            .create_delivery(NewDelivery {
                name: "WH/OUT/0002".to_string(),
                kind: DeliveryKind::Outgoing,
                group_id: Some(group_id),
                sale_order_id: None,
                created_at: now,
            })
            .unwrap();
        let sibling_yesterday_id = store
            .create_delivery(NewDelivery {
                name: "WH/OUT/0003".to_string(),
                kind: DeliveryKind::Outgoing,
                group_id: Some(group_id),
                sale_order_id: None,
                created_at: now - Duration::days(1),
            })
            .unwrap();
        let invoice_id = store.create_invoice("INV/0001", order_id).unwrap();

        Chain {
            store,
            order_id,
            delivery_id,
            sibling_today_id,
            sibling_yesterday_id,
            invoice_id,
        }
    }

    #[test]
    fn test_carrier_write_reaches_order_siblings_and_invoices() {
        let mut chain = build_chain();
        let carrier_id = Uuid::new_v4();
        let today = Utc::now().date_naive();

        let outcome = chain
            .store
            .write_delivery_shipping(chain.delivery_id, &ShippingPatch::carrier(carrier_id), today)
            .unwrap();

        assert_eq!(outcome.order_updated, Some(chain.order_id));
        assert_eq!(outcome.sibling_delivery_ids, vec![chain.sibling_today_id]);
        assert_eq!(outcome.invoice_ids, vec![chain.invoice_id]);

        let store = &chain.store;
        assert_eq!(
            store.order(chain.order_id).unwrap().shipping.carrier_id,
            Some(carrier_id)
        );
        assert_eq!(
            store
                .delivery(chain.sibling_today_id)
                .unwrap()
                .shipping
                .carrier_id,
            Some(carrier_id)
        );
        assert_eq!(
            store.invoice(chain.invoice_id).unwrap().carrier_id,
            Some(carrier_id)
        );
        // The sibling created yesterday is a historical document
        assert_eq!(
            store
                .delivery(chain.sibling_yesterday_id)
                .unwrap()
                .shipping
                .carrier_id,
            None
        );
    }

    #[test]
    fn test_posted_invoices_are_left_alone() {
        let mut chain = build_chain();
        chain.store.post_invoice(chain.invoice_id).unwrap();
        let today = Utc::now().date_naive();

        let outcome = chain
            .store
            .write_delivery_shipping(
                chain.delivery_id,
                &ShippingPatch::carrier(Uuid::new_v4()),
                today,
            )
            .unwrap();

        assert!(outcome.invoice_ids.is_empty());
        assert_eq!(chain.store.invoice(chain.invoice_id).unwrap().carrier_id, None);
    }

    #[test]
    fn test_order_dated_yesterday_is_not_rewritten() {
        let mut chain = build_chain();
        let today = Utc::now().date_naive() + Duration::days(1);

        // Viewed from tomorrow, every document in the chain is historical
        let outcome = chain
            .store
            .write_delivery_shipping(
                chain.delivery_id,
                &ShippingPatch::carrier(Uuid::new_v4()),
                today,
            )
            .unwrap();

        assert!(outcome.order_updated.is_none());
        assert!(outcome.sibling_delivery_ids.is_empty());
        assert!(outcome.invoice_ids.is_empty());
    }

    #[test]
    fn test_incoming_delivery_never_propagates() {
        let mut store = DocumentStore::new();
        let now = Utc::now();
        let order_id = store.create_order(
            "SO0002",
            Uuid::new_v4(),
            now,
            ShippingDetails::default(),
        );
        let receipt_id = store
            .create_delivery(NewDelivery {
                name: "WH/IN/0001".to_string(),
                kind: DeliveryKind::Incoming,
                group_id: None,
                sale_order_id: Some(order_id),
                created_at: now,
            })
            .unwrap();

        let outcome = store
            .write_delivery_shipping(
                receipt_id,
                &ShippingPatch::carrier(Uuid::new_v4()),
                now.date_naive(),
            )
            .unwrap();

        assert!(outcome.order_updated.is_none());
        assert_eq!(store.order(order_id).unwrap().shipping.carrier_id, None);
        // The write itself still lands on the delivery
        assert!(store.delivery(receipt_id).unwrap().shipping.carrier_id.is_some());
    }

    #[test]
    fn test_full_patch_propagates_all_four_fields() {
        let mut chain = build_chain();
        let carrier_id = Uuid::new_v4();
        let today = Utc::now().date_naive();

        let patch = ShippingPatch {
            carrier_id: Some(carrier_id),
            payment_method: Some(ShippingPaymentMethod::Cheque),
            transport_nature: Some(colis_shared::TransportNature::Express),
            package_count: Some(4),
        };
        chain
            .store
            .write_delivery_shipping(chain.delivery_id, &patch, today)
            .unwrap();

        let order = chain.store.order(chain.order_id).unwrap();
        assert_eq!(order.shipping.package_count, 4);
        assert_eq!(order.shipping.payment_method, ShippingPaymentMethod::Cheque);

        let invoice = chain.store.invoice(chain.invoice_id).unwrap();
        assert_eq!(invoice.payment_method, ShippingPaymentMethod::Cheque);
        assert_eq!(invoice.carrier_id, Some(carrier_id));
    }

    #[test]
    fn test_empty_patch_is_a_no_op() {
        let mut chain = build_chain();
        let today = Utc::now().date_naive();

        let outcome = chain
            .store
            .write_delivery_shipping(chain.delivery_id, &ShippingPatch::default(), today)
            .unwrap();

        assert!(outcome.order_updated.is_none());
        assert!(outcome.sibling_delivery_ids.is_empty());
    }
}
