use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CategoryId, MediaId, MediaKind, MediaUrl, ProjectId, ProjectTitle, Sequence, Technology,
};

/// A portfolio entry together with its media gallery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    pub title: ProjectTitle,
    pub description: String,
    /// May point at a category that no longer exists.
    pub category_id: Option<CategoryId>,
    pub technologies: Vec<Technology>,
    /// Ordered by `Media::sequence`.
    pub media: Vec<Media>,
    /// Manual ordering, higher values first. Projects without one sort last.
    pub sequence: Option<Sequence>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Image or video owned by exactly one project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Media {
    pub id: MediaId,
    pub project_id: ProjectId,
    pub url: MediaUrl,
    pub kind: MediaKind,
    pub sequence: Sequence,
}

/// Media uploaded but not yet attached to a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMedia {
    pub url: MediaUrl,
    pub kind: MediaKind,
}

/// Information required to create a new [`Project`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProject {
    pub title: ProjectTitle,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub technologies: Vec<Technology>,
    pub media: Vec<NewMedia>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Editable project fields. Media and ordering have their own operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectChanges {
    pub title: ProjectTitle,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub technologies: Vec<Technology>,
    pub updated_at: NaiveDateTime,
}

impl NewMedia {
    /// Attaches the media to a project at the given gallery position.
    pub fn into_media(self, project_id: ProjectId, sequence: Sequence) -> Media {
        Media {
            id: MediaId::generate(),
            project_id,
            url: self.url,
            kind: self.kind,
            sequence,
        }
    }
}

impl NewProject {
    /// Materialises the project and its media with fresh identifiers.
    ///
    /// Media sequences follow upload order starting at 0.
    pub fn into_project(self, id: ProjectId, sequence: Sequence) -> Project {
        let media = attach_media(&id, self.media, Sequence::new(0));
        Project {
            id,
            title: self.title,
            description: self.description,
            category_id: self.category_id,
            technologies: self.technologies,
            media,
            sequence: Some(sequence),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Project {
    /// Gallery position for the next appended media item.
    pub fn next_media_sequence(&self) -> Sequence {
        self.media
            .iter()
            .map(|m| m.sequence)
            .max()
            .map_or(Sequence::new(0), Sequence::next)
    }

    /// First image in the gallery, used as a thumbnail.
    pub fn cover(&self) -> Option<&Media> {
        self.media.iter().find(|m| m.kind == MediaKind::Image)
    }
}

/// Assigns consecutive gallery positions starting at `first`.
pub fn attach_media(project_id: &ProjectId, media: Vec<NewMedia>, first: Sequence) -> Vec<Media> {
    let mut sequence = first;
    media
        .into_iter()
        .map(|item| {
            let media = item.into_media(project_id.clone(), sequence);
            sequence = sequence.next();
            media
        })
        .collect()
}
