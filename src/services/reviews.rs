use crate::domain::types::{ReviewId, ReviewStatus};
use crate::dto::reviews::{ReviewDto, ReviewSummaryDto};
use crate::forms::reviews::{ReviewFilterQuery, ReviewForm, ReviewFormPayload};
use crate::repository::{ReviewListQuery, ReviewReader, ReviewWriter};

use super::{ServiceError, ServiceResult};

/// Stores a visitor's review as pending. Invalid forms never reach the store.
pub fn submit_review<R>(form: ReviewForm, repo: &R) -> ServiceResult<()>
where
    R: ReviewWriter + ?Sized,
{
    let payload: ReviewFormPayload = form.try_into()?;

    match repo.create_review(&payload.into_new_review()) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to store review: {e}");
            Err(e.into())
        }
    }
}

/// Approved reviews with their average rating for the public page.
pub fn show_approved_reviews<R>(repo: &R) -> ServiceResult<ReviewSummaryDto>
where
    R: ReviewReader + ?Sized,
{
    match repo.list_reviews(ReviewListQuery::default().status(ReviewStatus::Approved)) {
        Ok(reviews) => Ok(ReviewSummaryDto::new(reviews)),
        Err(e) => {
            log::error!("Failed to list approved reviews: {e}");
            Err(e.into())
        }
    }
}

pub fn show_reviews<R>(filter: &ReviewFilterQuery, repo: &R) -> ServiceResult<Vec<ReviewDto>>
where
    R: ReviewReader + ?Sized,
{
    match repo.list_reviews(filter.query()) {
        Ok(reviews) => Ok(reviews.into_iter().map(ReviewDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list reviews: {e}");
            Err(e.into())
        }
    }
}

pub fn set_status<R>(id: &ReviewId, status: ReviewStatus, repo: &R) -> ServiceResult<()>
where
    R: ReviewWriter + ?Sized,
{
    match repo.set_review_status(id, status) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to set status of review {id}: {e}");
            Err(e.into())
        }
    }
}

pub fn delete_review<R>(id: &ReviewId, repo: &R) -> ServiceResult<()>
where
    R: ReviewWriter + ?Sized,
{
    match repo.delete_review(id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to delete review {id}: {e}");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test::TestRepository;

    fn form(rating: i32) -> ReviewForm {
        ReviewForm {
            name: "Bob".into(),
            email: "bob@example.com".into(),
            company: Some("Acme".into()),
            rating,
            review: "Solid work".into(),
        }
    }

    fn all() -> ReviewFilterQuery {
        ReviewFilterQuery { status: None }
    }

    #[test]
    fn zero_rating_is_rejected_without_a_store_call() {
        let repo = TestRepository::new();

        let result = submit_review(form(0), &repo);

        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert_eq!(repo.write_calls(), 0);
    }

    #[test]
    fn new_reviews_are_pending_and_hidden_from_the_public() {
        let repo = TestRepository::new();
        submit_review(form(4), &repo).unwrap();

        let reviews = show_reviews(&all(), &repo).unwrap();
        assert_eq!(reviews[0].status, "pending");
        assert!(!reviews[0].approved);

        let public = show_approved_reviews(&repo).unwrap();
        assert!(public.reviews.is_empty());
        assert_eq!(public.average_rating, None);
    }

    #[test]
    fn approving_publishes_the_review() {
        let repo = TestRepository::new();
        submit_review(form(4), &repo).unwrap();
        submit_review(form(5), &repo).unwrap();
        for review in show_reviews(&all(), &repo).unwrap() {
            let id = ReviewId::new(review.id).unwrap();
            set_status(&id, ReviewStatus::Approved, &repo).unwrap();
        }

        let public = show_approved_reviews(&repo).unwrap();
        assert_eq!(public.reviews.len(), 2);
        assert!(public.reviews.iter().all(|r| r.approved));
        assert_eq!(public.average_rating, Some(4.5));

        let pending = ReviewFilterQuery {
            status: Some("pending".into()),
        };
        assert!(show_reviews(&pending, &repo).unwrap().is_empty());
    }

    #[test]
    fn missing_review_is_not_found() {
        let repo = TestRepository::new();
        let id = ReviewId::new("missing").unwrap();

        assert_eq!(
            set_status(&id, ReviewStatus::Rejected, &repo),
            Err(ServiceError::NotFound)
        );
        assert_eq!(delete_review(&id, &repo), Err(ServiceError::NotFound));
    }
}
