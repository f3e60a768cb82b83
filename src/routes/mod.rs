//! HTTP handlers of the public site and the admin panel.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::services::ServiceError;

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod messages;
pub mod projects;
pub mod public;
pub mod reviews;

/// Registers every handler on the application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(public::index)
        .service(public::show_project)
        .service(public::show_reviews)
        .service(public::submit_review)
        .service(public::show_contact)
        .service(public::submit_contact)
        .service(auth::show_login)
        .service(auth::login)
        .service(auth::logout)
        .service(dashboard::show_dashboard)
        .service(categories::show_categories)
        .service(categories::add_category)
        .service(categories::rename_category)
        .service(categories::move_category)
        .service(categories::delete_category)
        .service(projects::show_projects)
        .service(projects::create_project)
        .service(projects::show_project)
        .service(projects::update_project)
        .service(projects::add_media)
        .service(projects::remove_media)
        .service(projects::move_project)
        .service(projects::delete_project)
        .service(messages::show_messages)
        .service(messages::set_read)
        .service(messages::delete_message)
        .service(reviews::show_reviews)
        .service(reviews::set_status)
        .service(reviews::delete_review);
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    HttpResponse::Ok().body(tera.render(template, context).unwrap_or_else(|e| {
        log::error!("Failed to render template '{template}': {e}");
        String::new()
    }))
}

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context shared by every page: banners, their dismiss delay, the active
/// navigation entry and whether the admin navigation is shown.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    is_admin: bool,
    current_page: &str,
    alert_dismiss_seconds: u64,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("alert_dismiss_ms", &(alert_dismiss_seconds * 1000));
    context.insert("is_admin", &is_admin);
    context.insert("current_page", current_page);
    context
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Banner text for a failed action.
pub fn error_message(err: &ServiceError, not_found: &str) -> String {
    match err {
        ServiceError::Validation(message) => message.clone(),
        ServiceError::NotFound => not_found.to_string(),
        ServiceError::StoreUnavailable(_) => {
            "The data store is unavailable. Please try again.".to_string()
        }
        ServiceError::PartialFailure(message) => {
            format!("The change was only partly saved: {message}")
        }
        ServiceError::Unauthorized => "Please log in.".to_string(),
        ServiceError::Internal => "Something went wrong.".to_string(),
    }
}

/// Queues the banner for a failed POST; the caller redirects afterwards.
pub fn flash_error(err: &ServiceError, not_found: &str) {
    FlashMessage::error(error_message(err, not_found)).send();
}

/// Page rendered when a GET cannot load its data.
pub fn render_error(
    tera: &Tera,
    mut context: Context,
    err: &ServiceError,
    not_found: &str,
) -> HttpResponse {
    let status = match err {
        ServiceError::NotFound => StatusCode::NOT_FOUND,
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    log::warn!("Failed to load page: {err}");

    context.insert("error", &error_message(err, not_found));
    let body = tera.render("error.html", &context).unwrap_or_else(|e| {
        log::error!("Failed to render error page: {e}");
        String::new()
    });
    HttpResponse::build(status).body(body)
}
