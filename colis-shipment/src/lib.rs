pub mod barcode;
pub mod export;
pub mod models;
pub mod service;

pub use barcode::{format_gab, SequenceAllocator};
pub use export::{build_rows, to_csv, ExportError, ExportRow};
pub use models::{Package, Shipment, ShipmentState};
pub use service::{NewShipment, ShipmentError, ShipmentService};
