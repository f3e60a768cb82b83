//! Read-only views of the public site.

use crate::domain::types::{CategoryId, ProjectId};
use crate::dto::categories::CategoryDto;
use crate::dto::projects::{PortfolioDto, ProjectDto, group_projects};
use crate::repository::{CategoryReader, ProjectListQuery, ProjectReader};

use super::{ServiceError, ServiceResult};

/// Projects grouped by category, optionally narrowed to one category.
pub fn show_portfolio<R>(category: Option<&str>, repo: &R) -> ServiceResult<PortfolioDto>
where
    R: CategoryReader + ProjectReader + ?Sized,
{
    let selected = category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(CategoryId::new)
        .transpose()?;

    let categories = repo.list_categories().inspect_err(|e| {
        log::error!("Failed to list categories: {e}");
    })?;

    let query = match &selected {
        Some(id) => ProjectListQuery::default().category(id.clone()),
        None => ProjectListQuery::default(),
    };
    let projects = repo
        .list_projects(query)
        .inspect_err(|e| log::error!("Failed to list projects: {e}"))?;

    Ok(PortfolioDto {
        groups: group_projects(projects, &categories),
        categories: categories.into_iter().map(CategoryDto::from).collect(),
        selected: selected.map(CategoryId::into_inner),
    })
}

pub fn show_project_detail<R>(id: &ProjectId, repo: &R) -> ServiceResult<ProjectDto>
where
    R: CategoryReader + ProjectReader + ?Sized,
{
    let project = match repo.get_project_by_id(id) {
        Ok(Some(project)) => project,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get project {id}: {e}");
            return Err(e.into());
        }
    };

    // The page still renders without category names.
    let categories = repo.list_categories().unwrap_or_else(|e| {
        log::warn!("Failed to list categories for project {id}: {e}");
        Vec::new()
    });
    Ok(ProjectDto::new(project, &categories))
}
