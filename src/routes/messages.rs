use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AdminUser;
use crate::domain::types::MessageId;
use crate::forms::messages::{MessageFilter, MessageFilterQuery, SetReadForm};
use crate::models::config::ServerConfig;
use crate::repository::PortfolioStore;
use crate::routes::{base_context, flash_error, redirect, render_error, render_template};
use crate::services::messages::{
    delete_message as delete_message_service, set_read as set_read_service,
    show_messages as show_messages_service,
};

const MESSAGES_PAGE: &str = "/admin/messages";
const NOT_FOUND: &str = "Message not found.";

#[get("/admin/messages")]
pub async fn show_messages(
    params: web::Query<MessageFilterQuery>,
    _admin: AdminUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<dyn PortfolioStore>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let filter = MessageFilter::parse(params.filter.as_deref());
    let mut context = base_context(
        &flash_messages,
        true,
        "messages",
        server_config.alert_dismiss_seconds,
    );

    match show_messages_service(filter, repo.get_ref()) {
        Ok(messages) => {
            context.insert("messages", &messages);
            context.insert("filter", filter.as_str());
            render_template(&tera, "admin/messages.html", &context)
        }
        Err(err) => render_error(&tera, context, &err, NOT_FOUND),
    }
}

#[post("/admin/messages/{message_id}/read")]
pub async fn set_read(
    message_id: web::Path<String>,
    _admin: AdminUser,
    repo: web::Data<dyn PortfolioStore>,
    web::Form(form): web::Form<SetReadForm>,
) -> impl Responder {
    let message_id = match MessageId::new(message_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(MESSAGES_PAGE);
        }
    };

    match set_read_service(&message_id, form.read, repo.get_ref()) {
        Ok(()) if form.read => FlashMessage::success("Marked as read.").send(),
        Ok(()) => FlashMessage::success("Marked as unread.").send(),
        Err(err) => flash_error(&err, NOT_FOUND),
    }

    redirect(MESSAGES_PAGE)
}

#[post("/admin/messages/{message_id}/delete")]
pub async fn delete_message(
    message_id: web::Path<String>,
    _admin: AdminUser,
    repo: web::Data<dyn PortfolioStore>,
) -> impl Responder {
    let message_id = match MessageId::new(message_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(MESSAGES_PAGE);
        }
    };

    match delete_message_service(&message_id, repo.get_ref()) {
        Ok(()) => FlashMessage::success("Message deleted.").send(),
        Err(err) => flash_error(&err, NOT_FOUND),
    }

    redirect(MESSAGES_PAGE)
}
