//! Contact form messages.

use crate::ids::MessageId;
use crate::validation::FieldErrors;
use crate::CommerceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subject stored when the sender leaves it blank.
pub const DEFAULT_SUBJECT: &str = "No Subject";

/// Handling state of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    New,
    Read,
    Replied,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::New => "new",
            MessageStatus::Read => "read",
            MessageStatus::Replied => "replied",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CommerceError> {
        match s.to_lowercase().as_str() {
            "new" => Ok(MessageStatus::New),
            "read" => Ok(MessageStatus::Read),
            "replied" => Ok(MessageStatus::Replied),
            _ => Err(CommerceError::UnknownValue {
                kind: "message status",
                value: s.to_string(),
            }),
        }
    }
}

/// What the visitor typed into the contact form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("name", "Name", &self.name);
        errors.require_email("email", &self.email);
        errors.require("message", "Message", &self.message);
        errors
    }
}

/// A stored contact message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactMessage {
    #[serde(rename = "_id")]
    pub id: MessageId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub status: MessageStatus,
}

impl ContactMessage {
    /// Document type in the content store.
    pub const DOC_TYPE: &'static str = "contactMessage";

    /// Validate the form and build a new message.
    pub fn from_form(form: &ContactForm, now: DateTime<Utc>) -> Result<Self, CommerceError> {
        form.validate().into_result()?;

        let subject = form.subject.trim();
        Ok(Self {
            id: MessageId::generate(),
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            subject: if subject.is_empty() {
                DEFAULT_SUBJECT.to_string()
            } else {
                subject.to_string()
            },
            message: form.message.trim().to_string(),
            sent_at: now,
            status: MessageStatus::New,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: "Sana".into(),
            email: "sana@example.com".into(),
            subject: "".into(),
            message: "Do you ship to Quetta?".into(),
        }
    }

    #[test]
    fn test_blank_subject_defaults() {
        let msg = ContactMessage::from_form(&form(), Utc::now()).unwrap();
        assert_eq!(msg.subject, DEFAULT_SUBJECT);
        assert_eq!(msg.status, MessageStatus::New);
    }

    #[test]
    fn test_malformed_email_rejected() {
        let mut f = form();
        f.email = "foo@bar".into();
        let err = ContactMessage::from_form(&f, Utc::now()).unwrap_err();
        assert_eq!(
            err.field_errors().unwrap().get("email"),
            Some("Please enter a valid email address")
        );
    }

    #[test]
    fn test_missing_fields_rejected() {
        let err = ContactMessage::from_form(&ContactForm::default(), Utc::now()).unwrap_err();
        let errors = err.field_errors().unwrap();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("email"), Some("Email is required"));
    }
}
