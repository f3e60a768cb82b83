use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AdminUser;
use crate::domain::types::{ReviewId, ReviewStatus};
use crate::forms::reviews::{ReviewFilterQuery, ReviewStatusForm};
use crate::models::config::ServerConfig;
use crate::repository::PortfolioStore;
use crate::routes::{base_context, flash_error, redirect, render_error, render_template};
use crate::services::reviews::{
    delete_review as delete_review_service, set_status as set_status_service,
    show_reviews as show_reviews_service,
};

const REVIEWS_PAGE: &str = "/admin/reviews";
const NOT_FOUND: &str = "Review not found.";

#[get("/admin/reviews")]
pub async fn show_reviews(
    params: web::Query<ReviewFilterQuery>,
    _admin: AdminUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<dyn PortfolioStore>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(
        &flash_messages,
        true,
        "reviews",
        server_config.alert_dismiss_seconds,
    );

    match show_reviews_service(&params, repo.get_ref()) {
        Ok(reviews) => {
            context.insert("reviews", &reviews);
            context.insert("status", &params.status().map(ReviewStatus::as_str));
            render_template(&tera, "admin/reviews.html", &context)
        }
        Err(err) => render_error(&tera, context, &err, NOT_FOUND),
    }
}

#[post("/admin/reviews/{review_id}/status")]
pub async fn set_status(
    review_id: web::Path<String>,
    _admin: AdminUser,
    repo: web::Data<dyn PortfolioStore>,
    web::Form(form): web::Form<ReviewStatusForm>,
) -> impl Responder {
    let status: ReviewStatus = match form.try_into() {
        Ok(status) => status,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(REVIEWS_PAGE);
        }
    };

    let review_id = match ReviewId::new(review_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(REVIEWS_PAGE);
        }
    };

    match set_status_service(&review_id, status, repo.get_ref()) {
        Ok(()) => FlashMessage::success(format!("Review marked {status}.")).send(),
        Err(err) => flash_error(&err, NOT_FOUND),
    }

    redirect(REVIEWS_PAGE)
}

#[post("/admin/reviews/{review_id}/delete")]
pub async fn delete_review(
    review_id: web::Path<String>,
    _admin: AdminUser,
    repo: web::Data<dyn PortfolioStore>,
) -> impl Responder {
    let review_id = match ReviewId::new(review_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(REVIEWS_PAGE);
        }
    };

    match delete_review_service(&review_id, repo.get_ref()) {
        Ok(()) => FlashMessage::success("Review deleted.").send(),
        Err(err) => flash_error(&err, NOT_FOUND),
    }

    redirect(REVIEWS_PAGE)
}
