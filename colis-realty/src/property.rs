use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStage {
    Available,
    PreSale,
    OnSale,
    Sold,
}

/// A sellable property unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyUnit {
    pub id: Uuid,
    pub name: String,
    pub stage: PropertyStage,
    pub customer_id: Option<Uuid>,
    pub presale_id: Option<Uuid>,
}

impl PropertyUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            stage: PropertyStage::Available,
            customer_id: None,
            presale_id: None,
        }
    }
}
