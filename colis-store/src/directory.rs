use colis_core::CarrierConfig;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// In-memory registry of carrier configurations, keyed by id
#[derive(Debug, Default)]
pub struct CarrierDirectory {
    entries: RwLock<HashMap<Uuid, CarrierConfig>>,
}

impl CarrierDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, config: CarrierConfig) -> Uuid {
        let id = config.id;
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(id, config);
        tracing::info!(%id, "registered carrier configuration");
        id
    }

    pub fn get(&self, id: Uuid) -> Option<CarrierConfig> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(&id).cloned()
    }

    pub fn list_active(&self) -> Vec<CarrierConfig> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let mut configs: Vec<CarrierConfig> = entries
            .values()
            .filter(|config| config.active)
            .cloned()
            .collect();
        configs.sort_by(|a, b| a.name.cmp(&b.name));
        configs
    }

    /// Apply an edit to a stored configuration; false if it does not exist
    pub fn update<F>(&self, id: Uuid, edit: F) -> bool
    where
        F: FnOnce(&mut CarrierConfig),
    {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        match entries.get_mut(&id) {
            Some(config) => {
                edit(config);
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, id: Uuid) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(&id).is_some()
    }
}
