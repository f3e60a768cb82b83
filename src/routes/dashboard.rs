use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::auth::AdminUser;
use crate::models::config::ServerConfig;
use crate::repository::PortfolioStore;
use crate::routes::{base_context, render_error, render_template};
use crate::services::dashboard::show_dashboard as show_dashboard_service;

#[get("/admin")]
pub async fn show_dashboard(
    _admin: AdminUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<dyn PortfolioStore>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(
        &flash_messages,
        true,
        "dashboard",
        server_config.alert_dismiss_seconds,
    );

    match show_dashboard_service(repo.get_ref()) {
        Ok(dashboard) => {
            context.insert("dashboard", &dashboard);
            render_template(&tera, "admin/dashboard.html", &context)
        }
        Err(err) => render_error(&tera, context, &err, "Nothing to show."),
    }
}
