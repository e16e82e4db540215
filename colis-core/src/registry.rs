use crate::company::{CarrierConfig, ProviderKind};
use crate::error::{CarrierError, CarrierResult};
use crate::provider::CarrierProvider;
use crate::token::TokenCache;
use std::collections::HashMap;
use std::sync::Arc;

type ProviderCtor =
    Box<dyn Fn(CarrierConfig, Arc<TokenCache>) -> Arc<dyn CarrierProvider> + Send + Sync>;

/// Maps a provider selector to a client constructor.
///
/// Built once at startup; adding a provider means one `register` call, not
/// touching existing clients. Resolving an unregistered kind is a constant
/// configuration error, fatal to the action that triggered it.
#[derive(Default)]
pub struct ProviderRegistry {
    ctors: HashMap<ProviderKind, ProviderCtor>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, kind: ProviderKind, ctor: F)
    where
        F: Fn(CarrierConfig, Arc<TokenCache>) -> Arc<dyn CarrierProvider> + Send + Sync + 'static,
    {
        self.ctors.insert(kind, Box::new(ctor));
    }

    pub fn is_registered(&self, kind: ProviderKind) -> bool {
        self.ctors.contains_key(&kind)
    }

    /// Build a provider client for the given carrier configuration
    pub fn resolve(
        &self,
        config: &CarrierConfig,
        cache: Arc<TokenCache>,
    ) -> CarrierResult<Arc<dyn CarrierProvider>> {
        let ctor = self.ctors.get(&config.provider).ok_or_else(|| {
            CarrierError::Configuration(format!(
                "provider '{}' is not yet implemented",
                config.provider
            ))
        })?;
        Ok(ctor(config.clone(), cache))
    }
}
