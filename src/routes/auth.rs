use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::{ADMIN_IDENTITY, AdminUser};
use crate::forms::auth::{LoginForm, LoginFormPayload};
use crate::models::config::ServerConfig;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::auth::login as login_service;

#[get("/admin/login")]
pub async fn show_login(
    admin: Option<AdminUser>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    if admin.is_some() {
        return redirect("/admin");
    }

    let context = base_context(
        &flash_messages,
        false,
        "login",
        server_config.alert_dismiss_seconds,
    );
    render_template(&tera, "admin/login.html", &context)
}

#[post("/admin/login")]
pub async fn login(
    request: HttpRequest,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let payload: LoginFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/admin/login");
        }
    };

    match login_service(&payload, &server_config.admin_password_hash) {
        Ok(()) => {}
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Wrong password.").send();
            return redirect("/admin/login");
        }
        Err(err) => {
            log::error!("Failed to log in: {err}");
            FlashMessage::error("Login is unavailable right now.").send();
            return redirect("/admin/login");
        }
    }

    if let Err(e) = Identity::login(&request.extensions(), ADMIN_IDENTITY.to_string()) {
        log::error!("Failed to start admin session: {e}");
        FlashMessage::error("Login is unavailable right now.").send();
        return redirect("/admin/login");
    }

    FlashMessage::success("Welcome back.").send();
    redirect("/admin")
}

#[post("/admin/logout")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    FlashMessage::info("Logged out.").send();
    redirect("/admin/login")
}
