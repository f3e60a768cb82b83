use diesel::prelude::*;

use crate::domain::message::{Message, NewMessage};
use crate::domain::types::MessageId;
use crate::models::message::Message as DbMessage;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, MessageListQuery, MessageReader, MessageWriter};

impl MessageReader for DieselRepository {
    fn list_messages(&self, query: MessageListQuery) -> RepositoryResult<Vec<Message>> {
        use crate::schema::messages;

        let mut conn = self.conn()?;

        let mut items = messages::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(read) = query.read {
            items = items.filter(messages::read.eq(read));
        }

        let messages = items
            .order(messages::created_at.desc())
            .load::<DbMessage>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Message>, _>>()?;

        Ok(messages)
    }

    fn get_message_by_id(&self, id: &MessageId) -> RepositoryResult<Option<Message>> {
        use crate::schema::messages;

        let mut conn = self.conn()?;

        let message = messages::table
            .filter(messages::id.eq(id.as_str()))
            .first::<DbMessage>(&mut conn)
            .optional()?;

        Ok(message.map(TryInto::try_into).transpose()?)
    }
}

impl MessageWriter for DieselRepository {
    fn create_message(&self, message: &NewMessage) -> RepositoryResult<Message> {
        use crate::schema::messages;

        let mut conn = self.conn()?;
        let message = message.clone().into_message(MessageId::generate());

        diesel::insert_into(messages::table)
            .values(DbMessage::from(&message))
            .execute(&mut conn)?;

        Ok(message)
    }

    fn set_message_read(&self, id: &MessageId, read: bool) -> RepositoryResult<usize> {
        use crate::schema::messages;

        let mut conn = self.conn()?;

        let affected = diesel::update(messages::table.filter(messages::id.eq(id.as_str())))
            .set(messages::read.eq(read))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_message(&self, id: &MessageId) -> RepositoryResult<usize> {
        use crate::schema::messages;

        let mut conn = self.conn()?;

        let affected = diesel::delete(messages::table.filter(messages::id.eq(id.as_str())))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
