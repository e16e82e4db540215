use crate::property::{PropertyStage, PropertyUnit};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PresaleState {
    Draft,
    Active,
    Expired,
    Converted,
    Cancelled,
}

/// Short-lived purchase option on a property unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presale {
    pub id: Uuid,
    pub name: String,
    pub property_id: Uuid,
    pub partner_id: Uuid,
    pub date_start: NaiveDate,
    pub validity_days: i64,
    /// Deposit paid to hold the option
    pub amount: f64,
    pub note: Option<String>,
    pub state: PresaleState,
    /// Set once the day-before reminder has fired
    pub reminder_sent: bool,
    /// Set once the expiry notice has fired
    pub expiry_notified: bool,
}

impl Presale {
    pub fn date_expiry(&self) -> NaiveDate {
        self.date_start + Duration::days(self.validity_days)
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.date_expiry() < today
            && matches!(self.state, PresaleState::Draft | PresaleState::Active)
    }
}

/// What an expiry sweep found and acted on
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepReport {
    /// Active options expiring tomorrow, reminded once
    pub reminders: Vec<Uuid>,
    /// Active options past expiry, expired and released
    pub expired: Vec<Uuid>,
}

/// Manages properties and their purchase options
#[derive(Debug, Default)]
pub struct PresaleBook {
    presales: HashMap<Uuid, Presale>,
    properties: HashMap<Uuid, PropertyUnit>,
    name_counter: u32,
}

impl PresaleBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_property(&mut self, name: impl Into<String>) -> Uuid {
        let property = PropertyUnit::new(name);
        let id = property.id;
        self.properties.insert(id, property);
        id
    }

    pub fn property(&self, id: Uuid) -> Option<&PropertyUnit> {
        self.properties.get(&id)
    }

    pub fn presale(&self, id: Uuid) -> Option<&Presale> {
        self.presales.get(&id)
    }

    pub fn create(
        &mut self,
        property_id: Uuid,
        partner_id: Uuid,
        date_start: NaiveDate,
        validity_days: i64,
        amount: f64,
    ) -> Result<Uuid, PresaleError> {
        if !self.properties.contains_key(&property_id) {
            return Err(PresaleError::PropertyNotFound(property_id));
        }
        self.name_counter += 1;
        let presale = Presale {
            id: Uuid::new_v4(),
            name: format!("PS{:05}", self.name_counter),
            property_id,
            partner_id,
            date_start,
            validity_days,
            amount,
            note: None,
            state: PresaleState::Draft,
            reminder_sent: false,
            expiry_notified: false,
        };
        let id = presale.id;
        self.presales.insert(id, presale);
        Ok(id)
    }

    /// Activate an option and put the property in the pre-sale stage
    pub fn activate(&mut self, id: Uuid) -> Result<(), PresaleError> {
        let presale = self
            .presales
            .get_mut(&id)
            .ok_or(PresaleError::NotFound(id))?;
        let property = self
            .properties
            .get_mut(&presale.property_id)
            .ok_or(PresaleError::PropertyNotFound(presale.property_id))?;

        if !matches!(
            property.stage,
            PropertyStage::Available | PropertyStage::PreSale | PropertyStage::OnSale
        ) {
            return Err(PresaleError::PropertyUnavailable(property.name.clone()));
        }

        presale.state = PresaleState::Active;
        property.stage = PropertyStage::PreSale;
        property.presale_id = Some(id);
        property.customer_id = Some(presale.partner_id);
        Ok(())
    }

    pub fn cancel(&mut self, id: Uuid) -> Result<(), PresaleError> {
        let presale = self
            .presales
            .get_mut(&id)
            .ok_or(PresaleError::NotFound(id))?;
        presale.state = PresaleState::Cancelled;
        Self::release_property(&mut self.properties, presale.property_id, id);
        Ok(())
    }

    /// Expire an option; converted or cancelled options are left alone
    pub fn mark_expired(&mut self, id: Uuid) -> Result<(), PresaleError> {
        let presale = self
            .presales
            .get_mut(&id)
            .ok_or(PresaleError::NotFound(id))?;
        if matches!(
            presale.state,
            PresaleState::Converted | PresaleState::Cancelled
        ) {
            return Ok(());
        }
        presale.state = PresaleState::Expired;
        Self::release_property(&mut self.properties, presale.property_id, id);
        Ok(())
    }

    /// Convert an active, unexpired option into a sale
    pub fn convert(&mut self, id: Uuid, today: NaiveDate) -> Result<(), PresaleError> {
        let presale = self
            .presales
            .get_mut(&id)
            .ok_or(PresaleError::NotFound(id))?;
        if presale.state != PresaleState::Active || presale.is_expired(today) {
            return Err(PresaleError::NotConvertible(id));
        }
        presale.state = PresaleState::Converted;
        if let Some(property) = self.properties.get_mut(&presale.property_id) {
            property.stage = PropertyStage::OnSale;
        }
        Ok(())
    }

    /// Scheduler pass: remind about options expiring tomorrow and expire
    /// overdue ones. Each notice fires exactly once.
    pub fn sweep(&mut self, today: NaiveDate) -> SweepReport {
        let tomorrow = today + Duration::days(1);
        let mut report = SweepReport::default();

        for presale in self.presales.values_mut() {
            if presale.state == PresaleState::Active
                && presale.date_expiry() == tomorrow
                && !presale.reminder_sent
            {
                tracing::info!(presale = %presale.name, "pre-sale expires tomorrow");
                presale.reminder_sent = true;
                report.reminders.push(presale.id);
            }
        }

        let overdue: Vec<Uuid> = self
            .presales
            .values()
            .filter(|presale| {
                presale.state == PresaleState::Active
                    && presale.date_expiry() < today
                    && !presale.expiry_notified
            })
            .map(|presale| presale.id)
            .collect();

        for id in overdue {
            if let Some(presale) = self.presales.get_mut(&id) {
                tracing::info!(presale = %presale.name, "pre-sale expired");
                presale.expiry_notified = true;
            }
            // Release the property alongside the notice
            let _ = self.mark_expired(id);
            report.expired.push(id);
        }

        report
    }

    fn release_property(
        properties: &mut HashMap<Uuid, PropertyUnit>,
        property_id: Uuid,
        presale_id: Uuid,
    ) {
        if let Some(property) = properties.get_mut(&property_id) {
            if property.presale_id == Some(presale_id) {
                property.presale_id = None;
                property.stage = PropertyStage::Available;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PresaleError {
    #[error("Pre-sale not found: {0}")]
    NotFound(Uuid),

    #[error("Property not found: {0}")]
    PropertyNotFound(Uuid),

    #[error("The property must be available or in sale to set a pre-sale: {0}")]
    PropertyUnavailable(String),

    #[error("Only active, unexpired pre-sales can be converted: {0}")]
    NotConvertible(Uuid),
}
