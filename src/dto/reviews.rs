use serde::Serialize;

use crate::domain::review::Review;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub rating: i32,
    pub review: String,
    pub status: String,
    /// Derived from `status`, never stored on its own.
    pub approved: bool,
    pub created_at: String,
}

impl From<Review> for ReviewDto {
    fn from(value: Review) -> Self {
        Self {
            id: value.id.into_inner(),
            name: value.name.into_inner(),
            email: value.email.into_inner(),
            company: value.company.map(|c| c.into_inner()),
            rating: value.rating.get(),
            review: value.body.into_inner(),
            status: value.status.as_str().to_string(),
            approved: value.status.is_approved(),
            created_at: value.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Public testimonials page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummaryDto {
    pub reviews: Vec<ReviewDto>,
    /// Mean rating rounded to one decimal; `None` without reviews.
    pub average_rating: Option<f64>,
}

impl ReviewSummaryDto {
    pub fn new(reviews: Vec<Review>) -> Self {
        let average_rating = (!reviews.is_empty()).then(|| {
            let total: i32 = reviews.iter().map(|r| r.rating.get()).sum();
            let mean = f64::from(total) / reviews.len() as f64;
            (mean * 10.0).round() / 10.0
        });

        Self {
            reviews: reviews.into_iter().map(ReviewDto::from).collect(),
            average_rating,
        }
    }
}
