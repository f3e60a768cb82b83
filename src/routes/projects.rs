use actix_multipart::form::MultipartForm;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AdminUser;
use crate::clients::object_storage::ObjectStorage;
use crate::domain::types::{MediaId, ProjectId};
use crate::forms::MoveForm;
use crate::forms::projects::{
    AddMediaForm, AddMediaFormPayload, CreateProjectForm, CreateProjectFormPayload,
    UpdateProjectForm, UpdateProjectFormPayload,
};
use crate::models::config::ServerConfig;
use crate::ordering::MoveDirection;
use crate::repository::PortfolioStore;
use crate::routes::{base_context, flash_error, redirect, render_error, render_template};
use crate::services::projects::{
    add_media as add_media_service, create_project as create_project_service,
    delete_project as delete_project_service, move_project as move_project_service,
    remove_media as remove_media_service, show_project as show_project_service,
    show_projects as show_projects_service, update_project as update_project_service,
};

const PROJECTS_PAGE: &str = "/admin/projects";
const NOT_FOUND: &str = "Project not found.";

fn project_page(id: &ProjectId) -> String {
    format!("{PROJECTS_PAGE}/{id}")
}

#[get("/admin/projects")]
pub async fn show_projects(
    _admin: AdminUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<dyn PortfolioStore>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(
        &flash_messages,
        true,
        "projects",
        server_config.alert_dismiss_seconds,
    );

    match show_projects_service(repo.get_ref()) {
        Ok((projects, categories)) => {
            context.insert("projects", &projects);
            context.insert("categories", &categories);
            render_template(&tera, "admin/projects.html", &context)
        }
        Err(err) => render_error(&tera, context, &err, NOT_FOUND),
    }
}

#[post("/admin/projects")]
pub async fn create_project(
    _admin: AdminUser,
    repo: web::Data<dyn PortfolioStore>,
    storage: web::Data<dyn ObjectStorage>,
    MultipartForm(form): MultipartForm<CreateProjectForm>,
) -> impl Responder {
    let payload: CreateProjectFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(PROJECTS_PAGE);
        }
    };

    match create_project_service(payload, repo.get_ref(), storage.get_ref()) {
        Ok(id) => {
            FlashMessage::success("Project created.").send();
            redirect(&project_page(&id))
        }
        Err(err) => {
            flash_error(&err, NOT_FOUND);
            redirect(PROJECTS_PAGE)
        }
    }
}

#[get("/admin/projects/{project_id}")]
pub async fn show_project(
    project_id: web::Path<String>,
    _admin: AdminUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<dyn PortfolioStore>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(
        &flash_messages,
        true,
        "projects",
        server_config.alert_dismiss_seconds,
    );

    let result = ProjectId::new(project_id.into_inner())
        .map_err(Into::into)
        .and_then(|id| show_project_service(&id, repo.get_ref()));

    match result {
        Ok((project, categories)) => {
            context.insert("project", &project);
            context.insert("categories", &categories);
            render_template(&tera, "admin/project.html", &context)
        }
        Err(err) => render_error(&tera, context, &err, NOT_FOUND),
    }
}

#[post("/admin/projects/{project_id}/update")]
pub async fn update_project(
    project_id: web::Path<String>,
    _admin: AdminUser,
    repo: web::Data<dyn PortfolioStore>,
    web::Form(form): web::Form<UpdateProjectForm>,
) -> impl Responder {
    let project_id = match ProjectId::new(project_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(PROJECTS_PAGE);
        }
    };

    let payload: UpdateProjectFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(&project_page(&project_id));
        }
    };

    match update_project_service(&project_id, payload, repo.get_ref()) {
        Ok(()) => FlashMessage::success("Project saved.").send(),
        Err(err) => flash_error(&err, NOT_FOUND),
    }

    redirect(&project_page(&project_id))
}

#[post("/admin/projects/{project_id}/media")]
pub async fn add_media(
    project_id: web::Path<String>,
    _admin: AdminUser,
    repo: web::Data<dyn PortfolioStore>,
    storage: web::Data<dyn ObjectStorage>,
    MultipartForm(form): MultipartForm<AddMediaForm>,
) -> impl Responder {
    let project_id = match ProjectId::new(project_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(PROJECTS_PAGE);
        }
    };

    let payload: AddMediaFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(&project_page(&project_id));
        }
    };

    match add_media_service(&project_id, payload, repo.get_ref(), storage.get_ref()) {
        Ok(count) => FlashMessage::success(format!("{count} file(s) added.")).send(),
        Err(err) => flash_error(&err, NOT_FOUND),
    }

    redirect(&project_page(&project_id))
}

#[post("/admin/projects/{project_id}/media/{media_id}/delete")]
pub async fn remove_media(
    path: web::Path<(String, String)>,
    _admin: AdminUser,
    repo: web::Data<dyn PortfolioStore>,
    storage: web::Data<dyn ObjectStorage>,
) -> impl Responder {
    let (project_id, media_id) = path.into_inner();
    let ids = ProjectId::new(project_id).and_then(|p| Ok((p, MediaId::new(media_id)?)));
    let (project_id, media_id) = match ids {
        Ok(ids) => ids,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(PROJECTS_PAGE);
        }
    };

    match remove_media_service(&project_id, &media_id, repo.get_ref(), storage.get_ref()) {
        Ok(()) => FlashMessage::success("File removed.").send(),
        Err(err) => flash_error(&err, "File not found."),
    }

    redirect(&project_page(&project_id))
}

#[post("/admin/projects/{project_id}/move")]
pub async fn move_project(
    project_id: web::Path<String>,
    _admin: AdminUser,
    repo: web::Data<dyn PortfolioStore>,
    web::Form(form): web::Form<MoveForm>,
) -> impl Responder {
    let direction: MoveDirection = match form.try_into() {
        Ok(direction) => direction,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(PROJECTS_PAGE);
        }
    };

    let project_id = match ProjectId::new(project_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(PROJECTS_PAGE);
        }
    };

    match move_project_service(&project_id, direction, repo.get_ref()) {
        Ok(true) => FlashMessage::success("Project moved.").send(),
        Ok(false) => {}
        Err(err) => flash_error(&err, NOT_FOUND),
    }

    redirect(PROJECTS_PAGE)
}

#[post("/admin/projects/{project_id}/delete")]
pub async fn delete_project(
    project_id: web::Path<String>,
    _admin: AdminUser,
    repo: web::Data<dyn PortfolioStore>,
    storage: web::Data<dyn ObjectStorage>,
) -> impl Responder {
    let project_id = match ProjectId::new(project_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(PROJECTS_PAGE);
        }
    };

    match delete_project_service(&project_id, repo.get_ref(), storage.get_ref()) {
        Ok(()) => FlashMessage::success("Project deleted.").send(),
        Err(err) => flash_error(&err, NOT_FOUND),
    }

    redirect(PROJECTS_PAGE)
}
