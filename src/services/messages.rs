use crate::domain::types::MessageId;
use crate::dto::messages::MessageDto;
use crate::forms::messages::{ContactForm, ContactFormPayload, MessageFilter};
use crate::repository::{MessageReader, MessageWriter};

use super::{ServiceError, ServiceResult};

/// Stores a visitor's message. Invalid forms never reach the store.
pub fn submit_message<R>(form: ContactForm, repo: &R) -> ServiceResult<()>
where
    R: MessageWriter + ?Sized,
{
    let payload: ContactFormPayload = form.try_into()?;

    match repo.create_message(&payload.into_new_message()) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to store contact message: {e}");
            Err(e.into())
        }
    }
}

pub fn show_messages<R>(filter: MessageFilter, repo: &R) -> ServiceResult<Vec<MessageDto>>
where
    R: MessageReader + ?Sized,
{
    match repo.list_messages(filter.query()) {
        Ok(messages) => Ok(messages.into_iter().map(MessageDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list messages: {e}");
            Err(e.into())
        }
    }
}

pub fn set_read<R>(id: &MessageId, read: bool, repo: &R) -> ServiceResult<()>
where
    R: MessageWriter + ?Sized,
{
    match repo.set_message_read(id, read) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to update message {id}: {e}");
            Err(e.into())
        }
    }
}

pub fn delete_message<R>(id: &MessageId, repo: &R) -> ServiceResult<()>
where
    R: MessageWriter + ?Sized,
{
    match repo.delete_message(id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to delete message {id}: {e}");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test::TestRepository;

    fn form(email: Option<&str>, phone: Option<&str>) -> ContactForm {
        ContactForm {
            name: "Ann".into(),
            email: email.map(Into::into),
            phone: phone.map(Into::into),
            message: "Can we talk?".into(),
        }
    }

    #[test]
    fn message_with_only_a_phone_is_stored_unread() {
        let repo = TestRepository::new();

        submit_message(form(None, Some("555-0100")), &repo).unwrap();

        let unread = show_messages(MessageFilter::Unread, &repo).unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].phone.as_deref(), Some("555-0100"));
        assert!(unread[0].email.is_none());
    }

    #[test]
    fn message_without_contact_never_reaches_the_store() {
        let repo = TestRepository::new();

        let result = submit_message(form(None, None), &repo);

        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert_eq!(repo.write_calls(), 0);
    }

    #[test]
    fn read_toggle_moves_message_between_filters() {
        let repo = TestRepository::new();
        submit_message(form(Some("ann@example.com"), None), &repo).unwrap();
        let id = MessageId::new(show_messages(MessageFilter::All, &repo).unwrap()[0].id.clone())
            .unwrap();

        set_read(&id, true, &repo).unwrap();

        assert!(show_messages(MessageFilter::Unread, &repo).unwrap().is_empty());
        assert_eq!(show_messages(MessageFilter::Read, &repo).unwrap().len(), 1);

        delete_message(&id, &repo).unwrap();
        assert_eq!(delete_message(&id, &repo), Err(ServiceError::NotFound));
    }

    #[test]
    fn store_rejection_is_unavailable() {
        let repo = TestRepository::new();
        repo.set_failing_writes(true);

        assert!(matches!(
            submit_message(form(Some("ann@example.com"), None), &repo),
            Err(ServiceError::StoreUnavailable(_))
        ));
    }
}
