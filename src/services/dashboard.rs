use crate::domain::types::ReviewStatus;
use crate::dto::dashboard::DashboardDto;
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    CategoryReader, MessageListQuery, MessageReader, ProjectListQuery, ProjectReader,
    ReviewListQuery, ReviewReader,
};

use super::ServiceResult;

pub fn show_dashboard<R>(repo: &R) -> ServiceResult<DashboardDto>
where
    R: CategoryReader + ProjectReader + MessageReader + ReviewReader + ?Sized,
{
    count_entities(repo).map_err(|e| {
        log::error!("Failed to load dashboard counts: {e}");
        e.into()
    })
}

fn count_entities<R>(repo: &R) -> RepositoryResult<DashboardDto>
where
    R: CategoryReader + ProjectReader + MessageReader + ReviewReader + ?Sized,
{
    Ok(DashboardDto {
        projects: repo.list_projects(ProjectListQuery::default())?.len(),
        categories: repo.list_categories()?.len(),
        unread_messages: repo
            .list_messages(MessageListQuery::default().read(false))?
            .len(),
        pending_reviews: repo
            .list_reviews(ReviewListQuery::default().status(ReviewStatus::Pending))?
            .len(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::domain::message::Message;
    use crate::domain::types::{EmailAddress, MessageBody, MessageId, PersonName};
    use crate::repository::test::TestRepository;
    use crate::services::ServiceError;

    fn message(id: &str, read: bool) -> Message {
        Message {
            id: MessageId::new(id).unwrap(),
            name: PersonName::new("Ann").unwrap(),
            email: Some(EmailAddress::new("ann@example.com").unwrap()),
            phone: None,
            body: MessageBody::new("Hi").unwrap(),
            read,
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    #[test]
    fn counts_only_unread_messages() {
        let repo = TestRepository::new().with_messages(vec![
            message("1", false),
            message("2", true),
            message("3", false),
        ]);

        let dashboard = show_dashboard(&repo).unwrap();

        assert_eq!(dashboard.unread_messages, 2);
        assert_eq!(dashboard.projects, 0);
        assert_eq!(dashboard.pending_reviews, 0);
    }

    #[test]
    fn unavailable_store_is_reported() {
        let repo = TestRepository::new();
        repo.set_unavailable(true);
        assert!(matches!(
            show_dashboard(&repo),
            Err(ServiceError::StoreUnavailable(_))
        ));
    }
}
