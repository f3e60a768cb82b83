use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::types::ProjectId;
use crate::forms::messages::ContactForm;
use crate::forms::reviews::ReviewForm;
use crate::models::config::ServerConfig;
use crate::repository::PortfolioStore;
use crate::routes::{base_context, flash_error, redirect, render_error, render_template};
use crate::services::portfolio::{
    show_portfolio as show_portfolio_service,
    show_project_detail as show_project_detail_service,
};
use crate::services::messages::submit_message as submit_message_service;
use crate::services::reviews::{
    show_approved_reviews as show_approved_reviews_service,
    submit_review as submit_review_service,
};

#[derive(Deserialize)]
struct PortfolioQueryParams {
    category: Option<String>,
}

#[get("/")]
pub async fn index(
    params: web::Query<PortfolioQueryParams>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<dyn PortfolioStore>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(
        &flash_messages,
        false,
        "portfolio",
        server_config.alert_dismiss_seconds,
    );

    match show_portfolio_service(params.category.as_deref(), repo.get_ref()) {
        Ok(portfolio) => {
            context.insert("portfolio", &portfolio);
            render_template(&tera, "public/index.html", &context)
        }
        Err(err) => render_error(&tera, context, &err, "Category not found."),
    }
}

#[get("/projects/{project_id}")]
pub async fn show_project(
    project_id: web::Path<String>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<dyn PortfolioStore>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(
        &flash_messages,
        false,
        "portfolio",
        server_config.alert_dismiss_seconds,
    );

    let result = ProjectId::new(project_id.into_inner())
        .map_err(Into::into)
        .and_then(|id| show_project_detail_service(&id, repo.get_ref()));

    match result {
        Ok(project) => {
            context.insert("project", &project);
            render_template(&tera, "public/project.html", &context)
        }
        Err(err) => render_error(&tera, context, &err, "Project not found."),
    }
}

#[get("/reviews")]
pub async fn show_reviews(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<dyn PortfolioStore>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(
        &flash_messages,
        false,
        "reviews",
        server_config.alert_dismiss_seconds,
    );

    match show_approved_reviews_service(repo.get_ref()) {
        Ok(summary) => {
            context.insert("summary", &summary);
            render_template(&tera, "public/reviews.html", &context)
        }
        Err(err) => render_error(&tera, context, &err, "Reviews not found."),
    }
}

#[post("/reviews")]
pub async fn submit_review(
    repo: web::Data<dyn PortfolioStore>,
    web::Form(form): web::Form<ReviewForm>,
) -> impl Responder {
    match submit_review_service(form, repo.get_ref()) {
        Ok(()) => FlashMessage::success("Thank you! Your review will appear once approved.").send(),
        Err(err) => flash_error(&err, "Review not found."),
    }

    redirect("/reviews")
}

#[get("/contact")]
pub async fn show_contact(
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(
        &flash_messages,
        false,
        "contact",
        server_config.alert_dismiss_seconds,
    );
    render_template(&tera, "public/contact.html", &context)
}

#[post("/contact")]
pub async fn submit_contact(
    repo: web::Data<dyn PortfolioStore>,
    web::Form(form): web::Form<ContactForm>,
) -> impl Responder {
    match submit_message_service(form, repo.get_ref()) {
        Ok(()) => FlashMessage::success("Message sent. I will get back to you soon.").send(),
        Err(err) => flash_error(&err, "Message not found."),
    }

    redirect("/contact")
}
