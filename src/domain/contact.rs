use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

pub const NAME_MIN_CHARS: usize = 2;
pub const MESSAGE_MIN_CHARS: usize = 10;
pub const MESSAGE_MAX_CHARS: usize = 1000;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Valid email pattern"));

/// The three inputs of the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    pub const ALL: [Self; 3] = [Self::Name, Self::Email, Self::Message];

    /// Resolves a form field name. Unknown names resolve to `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "message" => Some(Self::Message),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        }
    }

    /// Checks `value` against this field's rule and returns the user-facing reason on failure.
    #[must_use]
    pub fn check(self, value: &str) -> Option<&'static str> {
        let trimmed = value.trim();
        let len = trimmed.chars().count();
        match self {
            Self::Name => {
                if trimmed.is_empty() {
                    Some("Name is required")
                } else if len < NAME_MIN_CHARS {
                    Some("Name must be at least 2 characters")
                } else {
                    None
                }
            }
            Self::Email => {
                if trimmed.is_empty() {
                    Some("Email is required")
                } else if !EMAIL_PATTERN.is_match(value) {
                    Some("Please enter a valid email address")
                } else {
                    None
                }
            }
            Self::Message => {
                if trimmed.is_empty() {
                    Some("Message is required")
                } else if len < MESSAGE_MIN_CHARS {
                    Some("Message must be at least 10 characters")
                } else if len > MESSAGE_MAX_CHARS {
                    Some("Message must be less than 1000 characters")
                } else {
                    None
                }
            }
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validates a single form field by name.
///
/// Names that are not part of the form always pass.
#[must_use]
pub fn validate(field_name: &str, value: &str) -> Option<&'static str> {
    Field::from_name(field_name).and_then(|field| field.check(value))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl SubmissionPayload {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), email: email.into(), message: message.into() }
    }

    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Message => self.message = value,
        }
    }

    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }

    /// True when any field is empty after trimming.
    #[must_use]
    pub fn has_blank_field(&self) -> bool {
        Field::ALL.iter().any(|&f| self.get(f).trim().is_empty())
    }
}

/// Per-field validation failures. A field without an entry has no error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    /// Recomputes every field of `payload` from scratch.
    #[must_use]
    pub fn validate_all(payload: &SubmissionPayload) -> Self {
        Self(
            Field::ALL
                .iter()
                .filter_map(|&f| f.check(payload.get(f)).map(|reason| (f, reason.to_string())))
                .collect(),
        )
    }

    pub fn set(&mut self, field: Field, reason: Option<&str>) {
        match reason {
            Some(r) => {
                self.0.insert(field, r.to_string());
            }
            None => {
                self.0.remove(&field);
            }
        }
    }

    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}
