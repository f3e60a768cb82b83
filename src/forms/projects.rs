use std::path::Path;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::project::ProjectChanges;
use crate::domain::types::{
    CategoryId, MediaKind, ProjectTitle, Technology, TypeConstraintError,
};
use crate::forms::non_blank;

/// New project with its first batch of media.
#[derive(MultipartForm)]
pub struct CreateProjectForm {
    pub title: Text<String>,
    pub description: Option<Text<String>>,
    pub category_id: Option<Text<String>>,
    /// Comma separated tags.
    pub technologies: Option<Text<String>>,
    #[multipart(limit = "100MB")]
    pub media: Vec<TempFile>,
}

#[derive(MultipartForm)]
pub struct AddMediaForm {
    #[multipart(limit = "100MB")]
    pub media: Vec<TempFile>,
}

#[derive(Deserialize, Validate)]
pub struct UpdateProjectForm {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub technologies: Option<String>,
}

/// File read from a multipart upload, not stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaUpload {
    pub file_name: String,
    pub kind: MediaKind,
    pub bytes: Vec<u8>,
}

impl MediaUpload {
    /// Lower-case extension of the original file name, if it has a sane one.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(str::to_ascii_lowercase)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateProjectFormPayload {
    pub title: ProjectTitle,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub technologies: Vec<Technology>,
    pub uploads: Vec<MediaUpload>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProjectFormPayload {
    pub title: ProjectTitle,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub technologies: Vec<Technology>,
}

impl UpdateProjectFormPayload {
    pub fn into_changes(self) -> ProjectChanges {
        ProjectChanges {
            title: self.title,
            description: self.description,
            category_id: self.category_id,
            technologies: self.technologies,
            updated_at: Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddMediaFormPayload {
    pub uploads: Vec<MediaUpload>,
}

#[derive(Debug, Error)]
pub enum ProjectFormError {
    #[error("Project form validation failed: {0}")]
    Validation(String),
    #[error("Project form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Failed to read uploaded file: {0}")]
    Upload(String),
}

impl From<ValidationErrors> for ProjectFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ProjectFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

/// Splits a comma separated tag list, dropping blanks and repeats.
pub fn parse_technologies(raw: Option<&str>) -> Result<Vec<Technology>, TypeConstraintError> {
    let mut technologies: Vec<Technology> = Vec::new();
    for tag in raw.unwrap_or_default().split(',') {
        if tag.trim().is_empty() {
            continue;
        }
        let tag = Technology::new(tag)?;
        if !technologies.contains(&tag) {
            technologies.push(tag);
        }
    }
    Ok(technologies)
}

fn parse_category(raw: Option<String>) -> Result<Option<CategoryId>, TypeConstraintError> {
    non_blank(raw).map(CategoryId::new).transpose()
}

/// Validates one uploaded part. Empty parts (no file chosen) yield `None`.
pub fn parse_upload(
    file_name: Option<&str>,
    content_type: Option<&str>,
    bytes: Vec<u8>,
) -> Result<Option<MediaUpload>, ProjectFormError> {
    if bytes.is_empty() {
        return Ok(None);
    }
    let kind = MediaKind::from_content_type(content_type.unwrap_or_default())?;
    Ok(Some(MediaUpload {
        file_name: file_name.unwrap_or("upload").to_string(),
        kind,
        bytes,
    }))
}

fn read_uploads(files: Vec<TempFile>) -> Result<Vec<MediaUpload>, ProjectFormError> {
    let mut uploads = Vec::with_capacity(files.len());
    for file in files {
        if file.size == 0 {
            continue;
        }
        let bytes = std::fs::read(file.file.path())
            .map_err(|e| ProjectFormError::Upload(e.to_string()))?;
        let content_type = file.content_type.as_ref().map(|m| m.essence_str().to_string());
        if let Some(upload) =
            parse_upload(file.file_name.as_deref(), content_type.as_deref(), bytes)?
        {
            uploads.push(upload);
        }
    }
    Ok(uploads)
}

impl TryFrom<CreateProjectForm> for CreateProjectFormPayload {
    type Error = ProjectFormError;

    fn try_from(value: CreateProjectForm) -> Result<Self, Self::Error> {
        let description = value
            .description
            .map(|d| d.into_inner().trim().to_string())
            .unwrap_or_default();

        Ok(Self {
            title: ProjectTitle::new(value.title.into_inner())?,
            description,
            category_id: parse_category(value.category_id.map(Text::into_inner))?,
            technologies: parse_technologies(
                value.technologies.as_ref().map(|t| t.as_str()),
            )?,
            uploads: read_uploads(value.media)?,
        })
    }
}

impl TryFrom<UpdateProjectForm> for UpdateProjectFormPayload {
    type Error = ProjectFormError;

    fn try_from(value: UpdateProjectForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            title: ProjectTitle::new(value.title)?,
            description: value.description.unwrap_or_default().trim().to_string(),
            category_id: parse_category(value.category_id)?,
            technologies: parse_technologies(value.technologies.as_deref())?,
        })
    }
}

impl TryFrom<AddMediaForm> for AddMediaFormPayload {
    type Error = ProjectFormError;

    fn try_from(value: AddMediaForm) -> Result<Self, Self::Error> {
        let uploads = read_uploads(value.media)?;
        if uploads.is_empty() {
            return Err(ProjectFormError::Validation(
                "choose at least one file".to_string(),
            ));
        }
        Ok(Self { uploads })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technologies_are_trimmed_and_deduplicated() {
        let tags = parse_technologies(Some(" Rust, Actix ,,Rust ")).unwrap();
        let tags: Vec<&str> = tags.iter().map(|t| t.as_str()).collect();
        assert_eq!(tags, vec!["Rust", "Actix"]);
        assert!(parse_technologies(None).unwrap().is_empty());
    }

    #[test]
    fn upload_kind_comes_from_content_type() {
        let upload = parse_upload(Some("Shot.PNG"), Some("image/png"), vec![1, 2])
            .unwrap()
            .unwrap();
        assert_eq!(upload.kind, MediaKind::Image);
        assert_eq!(upload.extension().as_deref(), Some("png"));

        let clip = parse_upload(Some("clip.mp4"), Some("video/mp4"), vec![1])
            .unwrap()
            .unwrap();
        assert_eq!(clip.kind, MediaKind::Video);
    }

    #[test]
    fn unsupported_uploads_are_rejected_and_empty_parts_skipped() {
        assert!(matches!(
            parse_upload(Some("notes.pdf"), Some("application/pdf"), vec![1]),
            Err(ProjectFormError::TypeConstraint(_))
        ));
        assert_eq!(parse_upload(Some(""), None, vec![]).unwrap(), None);
    }

    #[test]
    fn update_form_clears_blank_category() {
        let form = UpdateProjectForm {
            title: " Portfolio ".into(),
            description: Some("  Site  ".into()),
            category_id: Some("  ".into()),
            technologies: Some("Rust".into()),
        };

        let payload: UpdateProjectFormPayload = form.try_into().unwrap();
        assert_eq!(payload.title.as_str(), "Portfolio");
        assert_eq!(payload.description, "Site");
        assert_eq!(payload.category_id, None);
        assert_eq!(payload.technologies.len(), 1);
    }
}
