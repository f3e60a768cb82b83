use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{EmailAddress, MessageBody, MessageId, PersonName, PhoneNumber};

/// Contact form submission from an anonymous visitor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub name: PersonName,
    pub email: Option<EmailAddress>,
    pub phone: Option<PhoneNumber>,
    pub body: MessageBody,
    pub read: bool,
    pub created_at: NaiveDateTime,
}

/// Data required to insert a new [`Message`].
///
/// At least one of `email`/`phone` is present; the contact form enforces it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMessage {
    pub name: PersonName,
    pub email: Option<EmailAddress>,
    pub phone: Option<PhoneNumber>,
    pub body: MessageBody,
    pub created_at: NaiveDateTime,
}

impl NewMessage {
    pub fn into_message(self, id: MessageId) -> Message {
        Message {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            body: self.body,
            read: false,
            created_at: self.created_at,
        }
    }
}
