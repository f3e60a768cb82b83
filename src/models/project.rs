use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::project::{Media as DomainMedia, Project as DomainProject};
use crate::domain::types::{
    CategoryId, MediaId, MediaKind, MediaUrl, ProjectId, ProjectTitle, Sequence, Technology,
    TypeConstraintError,
};

/// Diesel model representing the `projects` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::projects)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category_id: Option<String>,
    /// JSON array of technology tags.
    pub technologies: String,
    pub display_order: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Project`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::projects)]
pub struct NewProject {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category_id: Option<String>,
    pub technologies: String,
    pub display_order: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Diesel model representing the `project_media` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::project_media)]
pub struct ProjectMedia {
    pub id: String,
    pub project_id: String,
    pub url: String,
    pub media_type: String,
    pub display_order: i32,
}

pub fn encode_technologies(technologies: &[Technology]) -> String {
    let tags: Vec<&str> = technologies.iter().map(Technology::as_str).collect();
    serde_json::to_string(&tags).unwrap_or_else(|_| "[]".to_string())
}

pub fn decode_technologies(raw: &str) -> Result<Vec<Technology>, TypeConstraintError> {
    let tags: Vec<String> = serde_json::from_str(raw)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("technologies: {e}")))?;
    tags.into_iter().map(Technology::new).collect()
}

impl Project {
    /// Combines the row with its media rows, ordering the gallery.
    pub fn into_domain(
        self,
        media: Vec<ProjectMedia>,
    ) -> Result<DomainProject, TypeConstraintError> {
        let mut media = media
            .into_iter()
            .map(DomainMedia::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        media.sort_by_key(|m| m.sequence);

        Ok(DomainProject {
            id: ProjectId::new(self.id)?,
            title: ProjectTitle::new(self.title)?,
            description: self.description,
            category_id: self.category_id.map(CategoryId::new).transpose()?,
            technologies: decode_technologies(&self.technologies)?,
            media,
            sequence: self.display_order.map(Sequence::new),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<&DomainProject> for NewProject {
    fn from(project: &DomainProject) -> Self {
        Self {
            id: project.id.as_str().to_string(),
            title: project.title.as_str().to_string(),
            description: project.description.clone(),
            category_id: project.category_id.as_ref().map(|id| id.as_str().to_string()),
            technologies: encode_technologies(&project.technologies),
            display_order: project.sequence.map(Sequence::get),
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

impl TryFrom<ProjectMedia> for DomainMedia {
    type Error = TypeConstraintError;

    fn try_from(media: ProjectMedia) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MediaId::new(media.id)?,
            project_id: ProjectId::new(media.project_id)?,
            url: MediaUrl::new(media.url)?,
            kind: MediaKind::try_from(media.media_type)?,
            sequence: Sequence::new(media.display_order),
        })
    }
}

impl From<&DomainMedia> for ProjectMedia {
    fn from(media: &DomainMedia) -> Self {
        Self {
            id: media.id.as_str().to_string(),
            project_id: media.project_id.as_str().to_string(),
            url: media.url.as_str().to_string(),
            media_type: media.kind.as_str().to_string(),
            display_order: media.sequence.get(),
        }
    }
}
