use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Danger,
}

/// User-facing banner shown after a carrier action
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Failure banners stay on screen until dismissed
    pub sticky: bool,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            message: message.into(),
            sticky: false,
        }
    }

    pub fn danger(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Danger,
            title: title.into(),
            message: message.into(),
            sticky: true,
        }
    }
}

/// Carrier action result: failures are recovered into a danger banner
/// instead of an error response, so the UI can always render the outcome.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub notification: Notification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ActionResponse {
    pub fn ok(
        title: impl Into<String>,
        message: impl Into<String>,
        data: Option<serde_json::Value>,
    ) -> Self {
        Self {
            success: true,
            notification: Notification::success(title, message),
            data,
        }
    }

    pub fn failed(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            notification: Notification::danger(title, message),
            data: None,
        }
    }
}
