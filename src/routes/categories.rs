use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AdminUser;
use crate::domain::types::CategoryId;
use crate::forms::MoveForm;
use crate::forms::categories::{
    AddCategoryForm, AddCategoryFormPayload, RenameCategoryForm, RenameCategoryFormPayload,
};
use crate::models::config::ServerConfig;
use crate::ordering::MoveDirection;
use crate::repository::PortfolioStore;
use crate::routes::{base_context, flash_error, redirect, render_error, render_template};
use crate::services::categories::{
    add_category as add_category_service, delete_category as delete_category_service,
    move_category as move_category_service, rename_category as rename_category_service,
    show_categories as show_categories_service,
};

const CATEGORIES_PAGE: &str = "/admin/categories";
const NOT_FOUND: &str = "Category not found.";

#[get("/admin/categories")]
pub async fn show_categories(
    _admin: AdminUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<dyn PortfolioStore>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(
        &flash_messages,
        true,
        "categories",
        server_config.alert_dismiss_seconds,
    );

    match show_categories_service(repo.get_ref()) {
        Ok(categories) => {
            context.insert("categories", &categories);
            render_template(&tera, "admin/categories.html", &context)
        }
        Err(err) => render_error(&tera, context, &err, NOT_FOUND),
    }
}

#[post("/admin/categories")]
pub async fn add_category(
    _admin: AdminUser,
    repo: web::Data<dyn PortfolioStore>,
    web::Form(form): web::Form<AddCategoryForm>,
) -> impl Responder {
    let payload: AddCategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(CATEGORIES_PAGE);
        }
    };

    match add_category_service(payload, repo.get_ref()) {
        Ok(category) => FlashMessage::success(format!("Category {} added.", category.name)).send(),
        Err(err) => flash_error(&err, NOT_FOUND),
    }

    redirect(CATEGORIES_PAGE)
}

#[post("/admin/categories/{category_id}/rename")]
pub async fn rename_category(
    category_id: web::Path<String>,
    _admin: AdminUser,
    repo: web::Data<dyn PortfolioStore>,
    web::Form(form): web::Form<RenameCategoryForm>,
) -> impl Responder {
    let payload: RenameCategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(CATEGORIES_PAGE);
        }
    };

    let category_id = match CategoryId::new(category_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(CATEGORIES_PAGE);
        }
    };

    match rename_category_service(&category_id, payload, repo.get_ref()) {
        Ok(()) => FlashMessage::success("Category renamed.").send(),
        Err(err) => flash_error(&err, NOT_FOUND),
    }

    redirect(CATEGORIES_PAGE)
}

#[post("/admin/categories/{category_id}/move")]
pub async fn move_category(
    category_id: web::Path<String>,
    _admin: AdminUser,
    repo: web::Data<dyn PortfolioStore>,
    web::Form(form): web::Form<MoveForm>,
) -> impl Responder {
    let direction: MoveDirection = match form.try_into() {
        Ok(direction) => direction,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(CATEGORIES_PAGE);
        }
    };

    let category_id = match CategoryId::new(category_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(CATEGORIES_PAGE);
        }
    };

    match move_category_service(&category_id, direction, repo.get_ref()) {
        Ok(true) => FlashMessage::success("Category moved.").send(),
        Ok(false) => {}
        Err(err) => flash_error(&err, NOT_FOUND),
    }

    redirect(CATEGORIES_PAGE)
}

#[post("/admin/categories/{category_id}/delete")]
pub async fn delete_category(
    category_id: web::Path<String>,
    _admin: AdminUser,
    repo: web::Data<dyn PortfolioStore>,
) -> impl Responder {
    let category_id = match CategoryId::new(category_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(CATEGORIES_PAGE);
        }
    };

    match delete_category_service(&category_id, repo.get_ref()) {
        Ok(()) => FlashMessage::success("Category deleted.").send(),
        Err(err) => flash_error(&err, NOT_FOUND),
    }

    redirect(CATEGORIES_PAGE)
}
