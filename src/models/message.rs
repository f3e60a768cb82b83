use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::message::Message as DomainMessage;
use crate::domain::types::{
    EmailAddress, MessageBody, MessageId, PersonName, PhoneNumber, TypeConstraintError,
};

/// Diesel model representing the `messages` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::messages)]
pub struct Message {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub body: String,
    pub read: bool,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Message> for DomainMessage {
    type Error = TypeConstraintError;

    fn try_from(message: Message) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MessageId::new(message.id)?,
            name: PersonName::new(message.name)?,
            email: message.email.map(EmailAddress::new).transpose()?,
            phone: message.phone.map(PhoneNumber::new).transpose()?,
            body: MessageBody::new(message.body)?,
            read: message.read,
            created_at: message.created_at,
        })
    }
}

impl From<&DomainMessage> for Message {
    fn from(message: &DomainMessage) -> Self {
        Self {
            id: message.id.as_str().to_string(),
            name: message.name.as_str().to_string(),
            email: message.email.as_ref().map(|e| e.as_str().to_string()),
            phone: message.phone.as_ref().map(|p| p.as_str().to_string()),
            body: message.body.as_str().to_string(),
            read: message.read,
            created_at: message.created_at,
        }
    }
}
