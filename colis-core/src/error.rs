/// Errors surfaced by carrier providers.
///
/// Carrier operations return these as tagged results so callers can render
/// partial success: a provider may implement only a subset of the
/// operations, and UI actions recover every variant into a notification.
#[derive(Debug, thiserror::Error)]
pub enum CarrierError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Connection timeout: {0}")]
    Timeout(String),

    #[error("Carrier returned status {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("Operation not supported: {0}")]
    Unsupported(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),
}

pub type CarrierResult<T> = Result<T, CarrierError>;
