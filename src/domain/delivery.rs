use serde::{Deserialize, Serialize};
use std::fmt;

pub const DELIVERED_MESSAGE: &str = "Message sent successfully! I'll get back to you soon.";

/// Closed set of reasons a delivery can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Network,
    RateLimit,
    TemplateMissing,
    Unauthorized,
    ServiceMisconfigured,
    Unknown,
    NotConfigured,
    InvalidInput,
}

impl ErrorCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::RateLimit => "rate_limit",
            Self::TemplateMissing => "template_missing",
            Self::Unauthorized => "unauthorized",
            Self::ServiceMisconfigured => "service_misconfigured",
            Self::Unknown => "unknown",
            Self::NotConfigured => "not_configured",
            Self::InvalidInput => "invalid_input",
        }
    }

    /// The one message shown to the visitor for this category.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::Network => "Network error. Please check your internet connection and try again.",
            Self::RateLimit => "Too many requests. Please wait a moment and try again.",
            Self::TemplateMissing => "Email template not found. Please contact me directly.",
            Self::Unauthorized => "Email service authentication failed. Please try again later.",
            Self::ServiceMisconfigured => "Email service configuration error. Please contact me directly.",
            Self::Unknown => {
                "Unable to send message at this time. Please try again later or contact me directly."
            }
            Self::NotConfigured => {
                "Email service is currently unavailable. Please try contacting me directly via email or social media."
            }
            Self::InvalidInput => "Please fill in all required fields.",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_category: Option<ErrorCategory>,
}

impl DeliveryResult {
    #[must_use]
    pub fn delivered() -> Self {
        Self { success: true, message: DELIVERED_MESSAGE.to_string(), error_category: None }
    }

    #[must_use]
    pub fn failed(category: ErrorCategory) -> Self {
        Self { success: false, message: category.user_message().to_string(), error_category: Some(category) }
    }
}

/// Ordered classification rules. The first rule with a needle found in the
/// error text wins.
///
/// Known to be over-broad: any error mentioning "service" or "400" lands in
/// `ServiceMisconfigured`, whatever its actual cause.
pub const CLASSIFICATION_RULES: &[(&[&str], ErrorCategory)] = &[
    (&["network", "fetch", "networkerror"], ErrorCategory::Network),
    (&["rate limit", "429"], ErrorCategory::RateLimit),
    (&["template", "404"], ErrorCategory::TemplateMissing),
    (&["unauthorized", "401"], ErrorCategory::Unauthorized),
    (&["service", "400"], ErrorCategory::ServiceMisconfigured),
];

/// Classifies a failure from its message and its string representation.
#[must_use]
pub fn classify_text(message: &str, representation: &str) -> ErrorCategory {
    let message = message.to_lowercase();
    let representation = representation.to_lowercase();
    CLASSIFICATION_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| message.contains(n) || representation.contains(n)))
        .map_or(ErrorCategory::Unknown, |&(_, category)| category)
}

/// Classifies an error value using its `Display` and `Debug` renderings.
#[must_use]
pub fn classify<E: fmt::Display + fmt::Debug + ?Sized>(error: &E) -> ErrorCategory {
    classify_text(&error.to_string(), &format!("{error:?}"))
}
