use chrono::Utc;
use uuid::Uuid;

use crate::clients::object_storage::ObjectStorage;
use crate::domain::project::{NewMedia, NewProject, Project};
use crate::domain::types::{CategoryId, MediaId, MediaUrl, ProjectId};
use crate::dto::categories::CategoryDto;
use crate::dto::projects::ProjectDto;
use crate::forms::projects::{
    AddMediaFormPayload, CreateProjectFormPayload, MediaUpload, UpdateProjectFormPayload,
};
use crate::ordering::{MoveDirection, OrderedCollection};
use crate::repository::{CategoryReader, ProjectListQuery, ProjectReader, ProjectWriter};

use super::{ServiceError, ServiceResult};

/// Admin project list with the categories offered by the edit forms.
pub fn show_projects<R>(repo: &R) -> ServiceResult<(Vec<ProjectDto>, Vec<CategoryDto>)>
where
    R: ProjectReader + CategoryReader + ?Sized,
{
    let categories = repo.list_categories().inspect_err(|e| {
        log::error!("Failed to list categories: {e}");
    })?;
    let projects = repo
        .list_projects(ProjectListQuery::default())
        .inspect_err(|e| log::error!("Failed to list projects: {e}"))?;

    let projects = projects
        .into_iter()
        .map(|project| ProjectDto::new(project, &categories))
        .collect();
    Ok((projects, categories.into_iter().map(CategoryDto::from).collect()))
}

pub fn show_project<R>(id: &ProjectId, repo: &R) -> ServiceResult<(ProjectDto, Vec<CategoryDto>)>
where
    R: ProjectReader + CategoryReader + ?Sized,
{
    let project = load_project(id, repo)?;
    let categories = repo.list_categories().inspect_err(|e| {
        log::error!("Failed to list categories: {e}");
    })?;

    let project = ProjectDto::new(project, &categories);
    Ok((project, categories.into_iter().map(CategoryDto::from).collect()))
}

/// Uploads the media batch and stores the project on top of the list.
///
/// Files already uploaded are removed again when a later upload or the
/// project insert fails.
pub fn create_project<R, S>(
    payload: CreateProjectFormPayload,
    repo: &R,
    storage: &S,
) -> ServiceResult<ProjectId>
where
    R: ProjectReader + ProjectWriter + CategoryReader + ?Sized,
    S: ObjectStorage + ?Sized,
{
    if let Some(category_id) = &payload.category_id {
        ensure_category(category_id, repo)?;
    }

    let mut projects = OrderedCollection::<Project, R>::load(repo).inspect_err(|e| {
        log::error!("Failed to load projects: {e}");
    })?;

    let media = store_uploads(payload.uploads, storage)?;
    let urls: Vec<MediaUrl> = media.iter().map(|m| m.url.clone()).collect();
    let now = Utc::now().naive_utc();
    let new_project = NewProject {
        title: payload.title,
        description: payload.description,
        category_id: payload.category_id,
        technologies: payload.technologies,
        media,
        created_at: now,
        updated_at: now,
    };

    match projects.add(new_project) {
        Ok(project) => Ok(project.id),
        Err(e) => {
            log::error!("Failed to create project: {e}");
            discard_files(storage, &urls);
            Err(e.into())
        }
    }
}

pub fn update_project<R>(
    id: &ProjectId,
    payload: UpdateProjectFormPayload,
    repo: &R,
) -> ServiceResult<()>
where
    R: ProjectWriter + CategoryReader + ?Sized,
{
    if let Some(category_id) = &payload.category_id {
        ensure_category(category_id, repo)?;
    }

    match repo.update_project(id, &payload.into_changes()) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to update project {id}: {e}");
            Err(e.into())
        }
    }
}

/// Appends uploaded files to the project's gallery.
pub fn add_media<R, S>(
    id: &ProjectId,
    payload: AddMediaFormPayload,
    repo: &R,
    storage: &S,
) -> ServiceResult<usize>
where
    R: ProjectReader + ProjectWriter + ?Sized,
    S: ObjectStorage + ?Sized,
{
    load_project(id, repo)?;

    let media = store_uploads(payload.uploads, storage)?;
    match repo.add_project_media(id, &media) {
        Ok(added) => Ok(added.len()),
        Err(e) => {
            log::error!("Failed to add media to project {id}: {e}");
            discard_files(storage, media.iter().map(|m| &m.url));
            Err(e.into())
        }
    }
}

/// Removes one media row, then its stored file.
pub fn remove_media<R, S>(
    project_id: &ProjectId,
    media_id: &MediaId,
    repo: &R,
    storage: &S,
) -> ServiceResult<()>
where
    R: ProjectReader + ProjectWriter + ?Sized,
    S: ObjectStorage + ?Sized,
{
    let project = load_project(project_id, repo)?;
    let Some(media) = project.media.iter().find(|m| &m.id == media_id) else {
        return Err(ServiceError::NotFound);
    };

    match repo.delete_project_media(project_id, media_id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => {
            discard_files(storage, [&media.url]);
            Ok(())
        }
        Err(e) => {
            log::error!("Failed to remove media {media_id}: {e}");
            Err(e.into())
        }
    }
}

pub fn move_project<R>(id: &ProjectId, direction: MoveDirection, repo: &R) -> ServiceResult<bool>
where
    R: ProjectReader + ProjectWriter + ?Sized,
{
    let mut projects = OrderedCollection::<Project, R>::load(repo).inspect_err(|e| {
        log::error!("Failed to load projects: {e}");
    })?;

    projects
        .move_one(id, direction)
        .inspect_err(|e| log::error!("Failed to move project {id}: {e}"))
        .map_err(Into::into)
}

/// Deletes the project with its media rows, then the stored files.
pub fn delete_project<R, S>(id: &ProjectId, repo: &R, storage: &S) -> ServiceResult<()>
where
    R: ProjectReader + ProjectWriter + ?Sized,
    S: ObjectStorage + ?Sized,
{
    let mut projects = OrderedCollection::<Project, R>::load(repo).inspect_err(|e| {
        log::error!("Failed to load projects: {e}");
    })?;
    let urls: Vec<MediaUrl> = projects
        .get(id)
        .map(|p| p.media.iter().map(|m| m.url.clone()).collect())
        .ok_or(ServiceError::NotFound)?;

    projects
        .remove(id)
        .inspect_err(|e| log::error!("Failed to delete project {id}: {e}"))?;
    discard_files(storage, &urls);
    Ok(())
}

fn load_project<R>(id: &ProjectId, repo: &R) -> ServiceResult<Project>
where
    R: ProjectReader + ?Sized,
{
    match repo.get_project_by_id(id) {
        Ok(Some(project)) => Ok(project),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get project {id}: {e}");
            Err(e.into())
        }
    }
}

fn ensure_category<R>(id: &CategoryId, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader + ?Sized,
{
    match repo.get_category_by_id(id) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(ServiceError::Validation(format!("unknown category: {id}"))),
        Err(e) => {
            log::error!("Failed to get category {id}: {e}");
            Err(e.into())
        }
    }
}

fn object_path(upload: &MediaUpload) -> String {
    match upload.extension() {
        Some(ext) => format!("projects/{}.{ext}", Uuid::new_v4()),
        None => format!("projects/{}", Uuid::new_v4()),
    }
}

fn store_uploads<S>(uploads: Vec<MediaUpload>, storage: &S) -> ServiceResult<Vec<NewMedia>>
where
    S: ObjectStorage + ?Sized,
{
    let mut stored: Vec<NewMedia> = Vec::with_capacity(uploads.len());
    for upload in uploads {
        match storage.upload(&object_path(&upload), &upload.bytes) {
            Ok(url) => stored.push(NewMedia {
                url,
                kind: upload.kind,
            }),
            Err(e) => {
                log::error!("Failed to upload {}: {e}", upload.file_name);
                discard_files(storage, stored.iter().map(|m| &m.url));
                return Err(e.into());
            }
        }
    }
    Ok(stored)
}

/// Best-effort removal; a leftover file is only logged.
fn discard_files<'a, S>(storage: &S, urls: impl IntoIterator<Item = &'a MediaUrl>)
where
    S: ObjectStorage + ?Sized,
{
    for url in urls {
        if let Err(e) = storage.remove(url) {
            log::warn!("Failed to remove stored file {url}: {e}");
        }
    }
}
