use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::review::Review as DomainReview;
use crate::domain::types::{
    CompanyName, EmailAddress, PersonName, Rating, ReviewBody, ReviewId, ReviewStatus,
    TypeConstraintError,
};

/// Diesel model representing the `reviews` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::reviews)]
pub struct Review {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub rating: i32,
    pub body: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Review> for DomainReview {
    type Error = TypeConstraintError;

    fn try_from(review: Review) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ReviewId::new(review.id)?,
            name: PersonName::new(review.name)?,
            email: EmailAddress::new(review.email)?,
            company: review.company.map(CompanyName::new).transpose()?,
            rating: Rating::new(review.rating)?,
            body: ReviewBody::new(review.body)?,
            status: ReviewStatus::try_from(review.status)?,
            created_at: review.created_at,
        })
    }
}

impl From<&DomainReview> for Review {
    fn from(review: &DomainReview) -> Self {
        Self {
            id: review.id.as_str().to_string(),
            name: review.name.as_str().to_string(),
            email: review.email.as_str().to_string(),
            company: review.company.as_ref().map(|c| c.as_str().to_string()),
            rating: review.rating.get(),
            body: review.body.as_str().to_string(),
            status: review.status.as_str().to_string(),
            created_at: review.created_at,
        }
    }
}
