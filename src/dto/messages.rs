use serde::Serialize;

use crate::domain::message::Message;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageDto {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: String,
    pub read: bool,
    pub created_at: String,
}

impl From<Message> for MessageDto {
    fn from(value: Message) -> Self {
        Self {
            id: value.id.into_inner(),
            name: value.name.into_inner(),
            email: value.email.map(|e| e.into_inner()),
            phone: value.phone.map(|p| p.into_inner()),
            message: value.body.into_inner(),
            read: value.read,
            created_at: value.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}
