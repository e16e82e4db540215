use async_trait::async_trait;
use chrono::Utc;
use colis_core::{
    BearerToken, CarrierConfig, CarrierError, CarrierProvider, CarrierResult, CheckOutcome,
    ConnectionReport, CredentialReport, ProviderKind, ProviderRegistry, ShipmentReceipt,
    ShipmentRequest, TokenCache, TrackingInfo,
};
use reqwest::{header, StatusCode};
use std::sync::Arc;
use std::time::Duration;

/// Tracking API, SuiviBordereau method
pub const DEFAULT_TRACKING_URL: &str =
    "https://api-bam.example/publichtrack/ApiTracking.asmx/SuiviBordereau";

/// E-commerce API base (token + shipment endpoints)
pub const DEFAULT_ECOM_BASE_URL: &str = "https://apicom.example/api";

/// Known-good tracking id used by the connection probe
pub const TEST_TRACKING_CODE: &str = "ANP03920060MA";

const USER_AGENT: &str = concat!("colis/", env!("CARGO_PKG_VERSION"));

/// Per-deployment knobs of the Barid client.
#[derive(Debug, Clone)]
pub struct BaridTunables {
    /// Assumed bearer-token lifetime. The account endpoint does not return
    /// an expiry, so this window is an approximation of server behavior;
    /// keep it below the real lifetime or shipment calls will burn their
    /// single 401 retry.
    pub token_validity_hours: i64,
    /// Deadline for tracking and token calls
    pub tracking_timeout: Duration,
    /// Deadline for shipment creation calls
    pub shipment_timeout: Duration,
}

impl Default for BaridTunables {
    fn default() -> Self {
        Self {
            token_validity_hours: 23,
            tracking_timeout: Duration::from_secs(60),
            shipment_timeout: Duration::from_secs(30),
        }
    }
}

/// Client for the Barid Al-Maghrib (Amana) delivery APIs.
///
/// Two upstream services: the public tracking API (form-encoded, static
/// credentials) and the e-commerce API (bearer token exchanged against the
/// account password, cached per carrier configuration).
pub struct BaridClient {
    config: CarrierConfig,
    cache: Arc<TokenCache>,
    tunables: BaridTunables,
    http: reqwest::Client,
}

/// Register the Barid constructor so `ProviderKind::Barid` resolves
pub fn register(registry: &mut ProviderRegistry, tunables: BaridTunables) {
    registry.register(ProviderKind::Barid, move |config, cache| {
        Arc::new(BaridClient::with_tunables(config, cache, tunables.clone()))
            as Arc<dyn CarrierProvider>
    });
}

impl BaridClient {
    pub fn new(config: CarrierConfig, cache: Arc<TokenCache>) -> Self {
        Self::with_tunables(config, cache, BaridTunables::default())
    }

    pub fn with_tunables(
        config: CarrierConfig,
        cache: Arc<TokenCache>,
        tunables: BaridTunables,
    ) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            config,
            cache,
            tunables,
            http,
        }
    }

    pub fn config(&self) -> &CarrierConfig {
        &self.config
    }

    fn tracking_url(&self) -> &str {
        self.config
            .tracking_url
            .as_deref()
            .unwrap_or(DEFAULT_TRACKING_URL)
    }

    fn ecom_base_url(&self) -> &str {
        self.config
            .ecom_base_url
            .as_deref()
            .unwrap_or(DEFAULT_ECOM_BASE_URL)
            .trim_end_matches('/')
    }

    async fn post_shipment(
        &self,
        request: &ShipmentRequest,
        token: &str,
    ) -> CarrierResult<reqwest::Response> {
        let url = format!("{}/Package/Insert", self.ecom_base_url());
        self.http
            .post(&url)
            .bearer_auth(token)
            .json(request)
            .timeout(self.tunables.shipment_timeout)
            .send()
            .await
            .map_err(|e| request_error(&e, "creating shipment"))
    }

    async fn parse_receipt(&self, response: reqwest::Response) -> CarrierResult<ShipmentReceipt> {
        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("application/json"))
            .unwrap_or(false);

        if is_json {
            let value = response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| request_error(&e, "creating shipment"))?;
            tracing::info!(carrier = %self.config.name, "shipment created: {}", value);
            Ok(ShipmentReceipt::Json(value))
        } else {
            let body = response
                .text()
                .await
                .map_err(|e| request_error(&e, "creating shipment"))?;
            Ok(ShipmentReceipt::Raw(body))
        }
    }

    async fn probe_tracking(&self) -> CheckOutcome {
        let contract_code = self.config.contract_code.clone().unwrap_or_default();
        let secret_key = self.config.secret_key.clone().unwrap_or_default();

        tracing::info!(url = self.tracking_url(), "testing tracking API");
        let response = self
            .http
            .post(self.tracking_url())
            .form(&[
                ("CodeBordereau", TEST_TRACKING_CODE),
                ("codecontrat", contract_code.as_str()),
                ("SecretKey", secret_key.as_str()),
            ])
            .timeout(self.tunables.tracking_timeout)
            .send()
            .await;

        match response {
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                if status == StatusCode::OK {
                    // An error payload for the probe id still proves the API
                    // is reachable.
                    CheckOutcome::ok(format!(
                        "tracking API is accessible: {}",
                        excerpt(&body, 100)
                    ))
                } else {
                    CheckOutcome::failed(format!(
                        "tracking API returned status {}: {}",
                        status.as_u16(),
                        excerpt(&body, 200)
                    ))
                }
            }
            Err(err) => CheckOutcome::failed(format!("tracking API error: {err}")),
        }
    }
}

#[async_trait]
impl CarrierProvider for BaridClient {
    fn provider_code(&self) -> &'static str {
        "barid"
    }

    fn provider_name(&self) -> &'static str {
        "Barid Al-Maghrib (Amana)"
    }

    fn validate_credentials(&self) -> CredentialReport {
        let mut issues = Vec::new();
        if self.config.contract_code.as_deref().unwrap_or("").is_empty() {
            issues.push("contract code is required for tracking".to_string());
        }
        if self.config.secret_key.as_deref().unwrap_or("").is_empty() {
            issues.push("secret key is required for tracking".to_string());
        }
        if self.config.ecom_password.as_deref().unwrap_or("").is_empty() {
            issues.push("e-commerce password is required for shipping".to_string());
        }
        if !issues.is_empty() {
            tracing::warn!(carrier = %self.config.name, ?issues, "credential validation warnings");
        }
        CredentialReport {
            valid: issues.is_empty(),
            issues,
        }
    }

    async fn fetch_token(&self, force_refresh: bool) -> CarrierResult<BearerToken> {
        let now = Utc::now();
        if !force_refresh {
            if let Some(token) = self.cache.lookup(self.config.id, now) {
                return Ok(token);
            }
        }

        let url = format!("{}/Account/GetToken", self.ecom_base_url());
        let password = self.config.ecom_password.clone().unwrap_or_default();

        tracing::info!(carrier = %self.config.name, "fetching new e-commerce token");
        let response = self
            .http
            .get(&url)
            .query(&[("password", password.as_str())])
            .timeout(self.tunables.tracking_timeout)
            .send()
            .await
            .map_err(|e| CarrierError::Auth(token_fetch_failure(&e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(CarrierError::Auth(format!(
                "token request failed with status {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CarrierError::Auth(token_fetch_failure(&e)))?;
        // The endpoint sometimes wraps the token in quotes
        let token = body.trim().trim_matches('"').to_string();
        if token.is_empty() || token == "null" {
            return Err(CarrierError::Auth(
                "invalid token received from API".to_string(),
            ));
        }

        let token = BearerToken::new(
            token,
            now + chrono::Duration::hours(self.tunables.token_validity_hours),
        );
        self.cache.store(self.config.id, token.clone());
        tracing::info!(carrier = %self.config.name, "e-commerce token obtained");
        Ok(token)
    }

    async fn track_package(&self, tracking_number: &str) -> CarrierResult<TrackingInfo> {
        let (contract_code, secret_key) = match (
            self.config.contract_code.as_deref(),
            self.config.secret_key.as_deref(),
        ) {
            (Some(code), Some(key)) if !code.is_empty() && !key.is_empty() => (code, key),
            _ => {
                return Err(CarrierError::Configuration(
                    "tracking credentials are not configured".to_string(),
                ))
            }
        };

        tracing::info!(tracking_number, "tracking package");
        let response = self
            .http
            .post(self.tracking_url())
            .form(&[
                ("CodeBordereau", tracking_number),
                ("codecontrat", contract_code),
                ("SecretKey", secret_key),
            ])
            .timeout(self.tunables.tracking_timeout)
            .send()
            .await
            .map_err(|e| request_error(&e, "tracking package"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| request_error(&e, "tracking package"))?;
        if status != StatusCode::OK {
            return Err(CarrierError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        Ok(TrackingInfo {
            tracking_number: tracking_number.to_string(),
            data: body,
        })
    }

    async fn create_shipment(&self, request: &ShipmentRequest) -> CarrierResult<ShipmentReceipt> {
        let token = self.fetch_token(false).await?;
        let response = self.post_shipment(request, &token.token).await?;

        match response.status() {
            status if status == StatusCode::OK || status == StatusCode::CREATED => {
                self.parse_receipt(response).await
            }
            StatusCode::UNAUTHORIZED => {
                // Token rejected: exactly one forced refresh and one retry
                tracing::warn!(carrier = %self.config.name, "token rejected, forcing refresh");
                let token = self.fetch_token(true).await.map_err(|_| {
                    CarrierError::Auth(
                        "authentication failed even after token refresh".to_string(),
                    )
                })?;
                let retry = self.post_shipment(request, &token.token).await?;
                match retry.status() {
                    status if status == StatusCode::OK || status == StatusCode::CREATED => {
                        self.parse_receipt(retry).await
                    }
                    _ => Err(CarrierError::Auth(
                        "authentication failed even after token refresh".to_string(),
                    )),
                }
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(CarrierError::Remote {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    async fn test_connection(&self) -> ConnectionReport {
        let tracking_api = self.probe_tracking().await;
        let ecom_api = match self.fetch_token(true).await {
            Ok(_) => CheckOutcome::ok("e-commerce API token obtained successfully"),
            Err(err) => CheckOutcome::failed(format!("e-commerce API error: {err}")),
        };
        ConnectionReport {
            success: tracking_api.success && ecom_api.success,
            tracking_api,
            ecom_api,
        }
    }

    async fn get_label(&self, tracking_number: &str) -> CarrierResult<colis_core::LabelData> {
        let _ = tracking_number;
        tracing::warn!("label API not available for this provider");
        Err(CarrierError::Unsupported(
            "label printing is not available for Barid, use the Barid portal".to_string(),
        ))
    }

    async fn cancel_shipment(&self, tracking_number: &str) -> CarrierResult<()> {
        let _ = tracking_number;
        tracing::warn!("cancellation API not available for this provider");
        Err(CarrierError::Unsupported(
            "shipment cancellation is not available via the Barid API".to_string(),
        ))
    }
}

fn request_error(err: &reqwest::Error, context: &str) -> CarrierError {
    if err.is_timeout() {
        CarrierError::Timeout(format!("connection timeout while {context}"))
    } else {
        CarrierError::Network(format!("error while {context}: {err}"))
    }
}

fn token_fetch_failure(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "connection timeout while fetching token".to_string()
    } else {
        format!("token request failed: {err}")
    }
}

fn excerpt(body: &str, limit: usize) -> String {
    if body.is_empty() {
        return "empty".to_string();
    }
    body.chars().take(limit).collect()
}
