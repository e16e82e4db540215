pub mod models;
pub mod propagation;
pub mod store;

pub use models::{
    DeliveryKind, DeliveryOrder, DeliveryState, Invoice, InvoiceState, SaleOrder, ShippingDetails,
    ShippingPatch,
};
pub use propagation::PropagationOutcome;
pub use store::{DocumentStore, NewDelivery, OrderError};
