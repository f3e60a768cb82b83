use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::message::NewMessage;
use crate::domain::types::{
    EmailAddress, MessageBody, PersonName, PhoneNumber, TypeConstraintError,
};
use crate::forms::non_blank;
use crate::repository::MessageListQuery;

/// Public contact form.
#[derive(Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactFormPayload {
    pub name: PersonName,
    pub email: Option<EmailAddress>,
    pub phone: Option<PhoneNumber>,
    pub body: MessageBody,
}

impl ContactFormPayload {
    pub fn into_new_message(self) -> NewMessage {
        NewMessage {
            name: self.name,
            email: self.email,
            phone: self.phone,
            body: self.body,
            created_at: Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ContactFormError {
    #[error("Contact form validation failed: {0}")]
    Validation(String),
    #[error("Contact form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Provide an email address or a phone number")]
    MissingContact,
}

impl From<ValidationErrors> for ContactFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ContactFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ContactForm> for ContactFormPayload {
    type Error = ContactFormError;

    fn try_from(value: ContactForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let email = non_blank(value.email).map(EmailAddress::new).transpose()?;
        let phone = non_blank(value.phone).map(PhoneNumber::new).transpose()?;
        if email.is_none() && phone.is_none() {
            return Err(ContactFormError::MissingContact);
        }

        Ok(Self {
            name: PersonName::new(value.name)?,
            email,
            phone,
            body: MessageBody::new(value.message)?,
        })
    }
}

/// Tabs on the admin messages screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageFilter {
    #[default]
    All,
    Unread,
    Read,
}

impl MessageFilter {
    /// Unknown values fall back to [`MessageFilter::All`].
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("unread") => Self::Unread,
            Some("read") => Self::Read,
            _ => Self::All,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Unread => "unread",
            Self::Read => "read",
        }
    }

    pub fn query(self) -> MessageListQuery {
        match self {
            Self::All => MessageListQuery::default(),
            Self::Unread => MessageListQuery::default().read(false),
            Self::Read => MessageListQuery::default().read(true),
        }
    }
}

#[derive(Deserialize)]
pub struct MessageFilterQuery {
    pub filter: Option<String>,
}

#[derive(Deserialize)]
pub struct SetReadForm {
    pub read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(email: Option<&str>, phone: Option<&str>) -> ContactForm {
        ContactForm {
            name: "Ann".into(),
            email: email.map(Into::into),
            phone: phone.map(Into::into),
            message: "Hello".into(),
        }
    }

    #[test]
    fn either_contact_channel_is_enough() {
        let payload: ContactFormPayload = form(Some("ann@example.com"), None).try_into().unwrap();
        assert!(payload.phone.is_none());

        let payload: ContactFormPayload = form(None, Some("+1 555 0100")).try_into().unwrap();
        assert!(payload.email.is_none());
    }

    #[test]
    fn missing_both_channels_is_rejected() {
        let result: Result<ContactFormPayload, _> = form(Some("  "), None).try_into();
        assert!(matches!(result, Err(ContactFormError::MissingContact)));
    }

    #[test]
    fn invalid_email_is_rejected() {
        let result: Result<ContactFormPayload, _> = form(Some("nope"), None).try_into();
        assert!(matches!(result, Err(ContactFormError::TypeConstraint(_))));
    }

    #[test]
    fn filter_parses_and_defaults_to_all() {
        assert_eq!(MessageFilter::parse(Some("unread")), MessageFilter::Unread);
        assert_eq!(MessageFilter::parse(Some("read")).query().read, Some(true));
        assert_eq!(MessageFilter::parse(Some("bogus")), MessageFilter::All);
        assert_eq!(MessageFilter::parse(None).query().read, None);
    }
}
