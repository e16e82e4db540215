use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Short-lived credential obtained from the carrier's account endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BearerToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl BearerToken {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// A token is valid strictly before its expiry instant
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Bearer-token cache keyed by carrier-configuration id.
///
/// One entry per carrier configuration, passed explicitly to provider
/// clients at construction. A failed fetch must never clobber the entry:
/// clients only call `store` on success.
#[derive(Debug, Default)]
pub struct TokenCache {
    entries: RwLock<HashMap<Uuid, BearerToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token for a carrier while it is still valid
    pub fn lookup(&self, carrier_id: Uuid, now: DateTime<Utc>) -> Option<BearerToken> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(&carrier_id)
            .filter(|token| token.is_valid(now))
            .cloned()
    }

    pub fn store(&self, carrier_id: Uuid, token: BearerToken) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(carrier_id, token);
    }

    pub fn invalidate(&self, carrier_id: Uuid) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(&carrier_id);
    }
}
