use diesel::prelude::*;

use crate::domain::review::{NewReview, Review};
use crate::domain::types::{ReviewId, ReviewStatus};
use crate::models::review::Review as DbReview;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ReviewListQuery, ReviewReader, ReviewWriter};

impl ReviewReader for DieselRepository {
    fn list_reviews(&self, query: ReviewListQuery) -> RepositoryResult<Vec<Review>> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;

        let mut items = reviews::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(status) = query.status {
            items = items.filter(reviews::status.eq(status.as_str()));
        }

        let reviews = items
            .order(reviews::created_at.desc())
            .load::<DbReview>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Review>, _>>()?;

        Ok(reviews)
    }

    fn get_review_by_id(&self, id: &ReviewId) -> RepositoryResult<Option<Review>> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;

        let review = reviews::table
            .filter(reviews::id.eq(id.as_str()))
            .first::<DbReview>(&mut conn)
            .optional()?;

        Ok(review.map(TryInto::try_into).transpose()?)
    }
}

impl ReviewWriter for DieselRepository {
    fn create_review(&self, review: &NewReview) -> RepositoryResult<Review> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;
        let review = review.clone().into_review(ReviewId::generate());

        diesel::insert_into(reviews::table)
            .values(DbReview::from(&review))
            .execute(&mut conn)?;

        Ok(review)
    }

    fn set_review_status(&self, id: &ReviewId, status: ReviewStatus) -> RepositoryResult<usize> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;

        let affected = diesel::update(reviews::table.filter(reviews::id.eq(id.as_str())))
            .set(reviews::status.eq(status.as_str()))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_review(&self, id: &ReviewId) -> RepositoryResult<usize> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;

        let affected = diesel::delete(reviews::table.filter(reviews::id.eq(id.as_str())))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
