use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CompanyName, EmailAddress, PersonName, Rating, ReviewBody, ReviewId, ReviewStatus,
};

/// Visitor testimonial awaiting or past moderation.
///
/// `status` is the only source of truth for approval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    pub name: PersonName,
    pub email: EmailAddress,
    pub company: Option<CompanyName>,
    pub rating: Rating,
    pub body: ReviewBody,
    pub status: ReviewStatus,
    pub created_at: NaiveDateTime,
}

/// Data required to insert a new [`Review`]. New reviews start pending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewReview {
    pub name: PersonName,
    pub email: EmailAddress,
    pub company: Option<CompanyName>,
    pub rating: Rating,
    pub body: ReviewBody,
    pub created_at: NaiveDateTime,
}

impl NewReview {
    pub fn into_review(self, id: ReviewId) -> Review {
        Review {
            id,
            name: self.name,
            email: self.email,
            company: self.company,
            rating: self.rating,
            body: self.body,
            status: ReviewStatus::Pending,
            created_at: self.created_at,
        }
    }
}
