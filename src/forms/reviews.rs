use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::review::NewReview;
use crate::domain::types::{
    CompanyName, EmailAddress, PersonName, Rating, ReviewBody, ReviewStatus,
    TypeConstraintError,
};
use crate::forms::non_blank;
use crate::repository::ReviewListQuery;

/// Public review form. A missing rating deserializes to zero and is rejected.
#[derive(Deserialize, Validate)]
pub struct ReviewForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub company: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(min = 1, max = 5000))]
    pub review: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewFormPayload {
    pub name: PersonName,
    pub email: EmailAddress,
    pub company: Option<CompanyName>,
    pub rating: Rating,
    pub body: ReviewBody,
}

impl ReviewFormPayload {
    pub fn into_new_review(self) -> NewReview {
        NewReview {
            name: self.name,
            email: self.email,
            company: self.company,
            rating: self.rating,
            body: self.body,
            created_at: Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReviewFormError {
    #[error("Review form validation failed: {0}")]
    Validation(String),
    #[error("Review form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ReviewFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ReviewFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ReviewForm> for ReviewFormPayload {
    type Error = ReviewFormError;

    fn try_from(value: ReviewForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: PersonName::new(value.name)?,
            email: EmailAddress::new(value.email)?,
            company: non_blank(value.company).map(CompanyName::new).transpose()?,
            rating: Rating::new(value.rating)?,
            body: ReviewBody::new(value.review)?,
        })
    }
}

/// Approve / reject / reset buttons.
#[derive(Deserialize)]
pub struct ReviewStatusForm {
    pub status: String,
}

impl TryFrom<ReviewStatusForm> for ReviewStatus {
    type Error = TypeConstraintError;

    fn try_from(value: ReviewStatusForm) -> Result<Self, Self::Error> {
        ReviewStatus::try_from(value.status.as_str())
    }
}

#[derive(Deserialize)]
pub struct ReviewFilterQuery {
    pub status: Option<String>,
}

impl ReviewFilterQuery {
    /// `None` lists every review; unknown values do the same.
    pub fn status(&self) -> Option<ReviewStatus> {
        self.status
            .as_deref()
            .and_then(|s| ReviewStatus::try_from(s).ok())
    }

    pub fn query(&self) -> ReviewListQuery {
        match self.status() {
            Some(status) => ReviewListQuery::default().status(status),
            None => ReviewListQuery::default(),
        }
    }
}
