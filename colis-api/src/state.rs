use crate::error::ApiError;
use colis_core::{CarrierProvider, ProviderRegistry, TokenCache};
use colis_orders::DocumentStore;
use colis_realty::{InstallmentLedger, PresaleBook};
use colis_shipment::{SequenceAllocator, ShipmentService};
use colis_store::{CarrierDirectory, CarrierSettings};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<CarrierDirectory>,
    pub registry: Arc<ProviderRegistry>,
    pub token_cache: Arc<TokenCache>,
    pub settings: Arc<CarrierSettings>,
    pub documents: Arc<RwLock<DocumentStore>>,
    pub shipments: Arc<RwLock<ShipmentService>>,
    pub presales: Arc<RwLock<PresaleBook>>,
    pub installments: Arc<RwLock<InstallmentLedger>>,
}

impl AppState {
    pub fn new(registry: ProviderRegistry, settings: CarrierSettings) -> Self {
        Self {
            directory: Arc::new(CarrierDirectory::new()),
            registry: Arc::new(registry),
            token_cache: Arc::new(TokenCache::new()),
            settings: Arc::new(settings),
            documents: Arc::new(RwLock::new(DocumentStore::new())),
            shipments: Arc::new(RwLock::new(ShipmentService::new(SequenceAllocator::new(1)))),
            presales: Arc::new(RwLock::new(PresaleBook::new())),
            installments: Arc::new(RwLock::new(InstallmentLedger::new())),
        }
    }

    /// Resolve the provider client for a stored carrier configuration.
    /// An unknown carrier or an unregistered provider kind is fatal to the
    /// calling action.
    pub fn provider_for(&self, carrier_id: Uuid) -> Result<Arc<dyn CarrierProvider>, ApiError> {
        let config = self
            .directory
            .get(carrier_id)
            .ok_or_else(|| ApiError::NotFound(format!("carrier {carrier_id}")))?;
        Ok(self.registry.resolve(&config, self.token_cache.clone())?)
    }
}
