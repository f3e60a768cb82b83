use std::collections::HashMap;

use serde::Serialize;

use crate::UNCATEGORIZED;
use crate::domain::category::Category;
use crate::domain::project::{Media, Project};
use crate::dto::categories::CategoryDto;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaDto {
    pub id: String,
    pub url: String,
    pub kind: String,
}

impl From<Media> for MediaDto {
    fn from(value: Media) -> Self {
        Self {
            id: value.id.into_inner(),
            url: value.url.into_inner(),
            kind: value.kind.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category_id: Option<String>,
    /// Name of the category, `None` when unset or dangling.
    pub category_name: Option<String>,
    pub technologies: Vec<String>,
    pub cover_url: Option<String>,
    pub media: Vec<MediaDto>,
    pub sequence: Option<i32>,
}

impl ProjectDto {
    /// Builds the view, resolving the category name from `categories`.
    pub fn new(project: Project, categories: &[Category]) -> Self {
        let category_name = project.category_id.as_ref().and_then(|id| {
            categories
                .iter()
                .find(|c| &c.id == id)
                .map(|c| c.name.as_str().to_string())
        });
        let cover_url = project.cover().map(|m| m.url.as_str().to_string());

        Self {
            id: project.id.into_inner(),
            title: project.title.into_inner(),
            description: project.description,
            category_id: project.category_id.map(|id| id.into_inner()),
            category_name,
            technologies: project
                .technologies
                .into_iter()
                .map(|t| t.into_inner())
                .collect(),
            cover_url,
            media: project.media.into_iter().map(MediaDto::from).collect(),
            sequence: project.sequence.map(|s| s.get()),
        }
    }
}

/// Projects sharing a category on the public home page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectGroupDto {
    /// `None` for the synthetic uncategorized group.
    pub category_id: Option<String>,
    pub name: String,
    pub projects: Vec<ProjectDto>,
}

/// Public home page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioDto {
    pub groups: Vec<ProjectGroupDto>,
    /// Every category, for the filter bar.
    pub categories: Vec<CategoryDto>,
    /// Category chosen with `?category=`, if any.
    pub selected: Option<String>,
}

/// Groups projects by category in category order.
///
/// Projects without a category or pointing at a deleted one end up in a
/// trailing [`UNCATEGORIZED`] group. Empty groups are dropped; project order
/// inside a group is kept.
pub fn group_projects(projects: Vec<Project>, categories: &[Category]) -> Vec<ProjectGroupDto> {
    let mut by_category: HashMap<String, Vec<ProjectDto>> = HashMap::new();
    let mut uncategorized = Vec::new();

    for project in projects {
        let known = project
            .category_id
            .as_ref()
            .filter(|id| categories.iter().any(|c| &c.id == *id))
            .map(|id| id.as_str().to_string());
        let dto = ProjectDto::new(project, categories);
        match known {
            Some(id) => by_category.entry(id).or_default().push(dto),
            None => uncategorized.push(dto),
        }
    }

    let mut groups: Vec<ProjectGroupDto> = categories
        .iter()
        .filter_map(|category| {
            let projects = by_category.remove(category.id.as_str())?;
            Some(ProjectGroupDto {
                category_id: Some(category.id.as_str().to_string()),
                name: category.name.as_str().to_string(),
                projects,
            })
        })
        .collect();

    if !uncategorized.is_empty() {
        groups.push(ProjectGroupDto {
            category_id: None,
            name: UNCATEGORIZED.to_string(),
            projects: uncategorized,
        });
    }

    groups
}
