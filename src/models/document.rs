//! Document shapes stored by the document adapter.
//!
//! Documents use camelCase field names (`displayOrder`, `categoryId`), unlike
//! the snake_case columns of the relational schema.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::category::Category as DomainCategory;
use crate::domain::message::Message as DomainMessage;
use crate::domain::project::{Media as DomainMedia, Project as DomainProject};
use crate::domain::review::Review as DomainReview;
use crate::domain::types::{
    CategoryId, CategoryName, CompanyName, EmailAddress, MediaId, MediaKind, MediaUrl,
    MessageBody, MessageId, PersonName, PhoneNumber, ProjectId, ProjectTitle, Rating, ReviewBody,
    ReviewId, ReviewStatus, Sequence, Technology, TypeConstraintError,
};

pub const CATEGORIES: &str = "categories";
pub const PROJECTS: &str = "projects";
pub const PROJECT_MEDIA: &str = "projectMedia";
pub const MESSAGES: &str = "messages";
pub const REVIEWS: &str = "reviews";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDocument {
    pub id: String,
    pub name: String,
    pub display_order: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub display_order: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDocument {
    pub id: String,
    pub project_id: String,
    pub url: String,
    pub media_type: String,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDocument {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: NaiveDateTime,
}

/// `approved` is written for older readers of the collection and ignored on
/// load; `status` decides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDocument {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    pub rating: i32,
    pub review: String,
    pub status: String,
    #[serde(default)]
    pub approved: bool,
    pub created_at: NaiveDateTime,
}

impl TryFrom<CategoryDocument> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(doc: CategoryDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CategoryId::new(doc.id)?,
            name: CategoryName::new(doc.name)?,
            sequence: Sequence::new(doc.display_order),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

impl From<&DomainCategory> for CategoryDocument {
    fn from(category: &DomainCategory) -> Self {
        Self {
            id: category.id.as_str().to_string(),
            name: category.name.as_str().to_string(),
            display_order: category.sequence.get(),
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

impl ProjectDocument {
    pub fn into_domain(
        self,
        media: Vec<MediaDocument>,
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
            technologies: self
                .technologies
                .into_iter()
                .map(Technology::new)
                .collect::<Result<Vec<_>, _>>()?,
            media,
            sequence: self.display_order.map(Sequence::new),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<&DomainProject> for ProjectDocument {
    fn from(project: &DomainProject) -> Self {
        Self {
            id: project.id.as_str().to_string(),
            title: project.title.as_str().to_string(),
            description: project.description.clone(),
            category_id: project.category_id.as_ref().map(|id| id.as_str().to_string()),
            technologies: project
                .technologies
                .iter()
                .map(|t| t.as_str().to_string())
                .collect(),
            display_order: project.sequence.map(Sequence::get),
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

impl TryFrom<MediaDocument> for DomainMedia {
    type Error = TypeConstraintError;

    fn try_from(doc: MediaDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MediaId::new(doc.id)?,
            project_id: ProjectId::new(doc.project_id)?,
            url: MediaUrl::new(doc.url)?,
            kind: MediaKind::try_from(doc.media_type)?,
            sequence: Sequence::new(doc.display_order),
        })
    }
}

impl From<&DomainMedia> for MediaDocument {
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

impl TryFrom<MessageDocument> for DomainMessage {
    type Error = TypeConstraintError;

    fn try_from(doc: MessageDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MessageId::new(doc.id)?,
            name: PersonName::new(doc.name)?,
            email: doc.email.map(EmailAddress::new).transpose()?,
            phone: doc.phone.map(PhoneNumber::new).transpose()?,
            body: MessageBody::new(doc.message)?,
            read: doc.read,
            created_at: doc.created_at,
        })
    }
}

impl From<&DomainMessage> for MessageDocument {
    fn from(message: &DomainMessage) -> Self {
        Self {
            id: message.id.as_str().to_string(),
            name: message.name.as_str().to_string(),
            email: message.email.as_ref().map(|e| e.as_str().to_string()),
            phone: message.phone.as_ref().map(|p| p.as_str().to_string()),
            message: message.body.as_str().to_string(),
            read: message.read,
            created_at: message.created_at,
        }
    }
}

impl TryFrom<ReviewDocument> for DomainReview {
    type Error = TypeConstraintError;

    fn try_from(doc: ReviewDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ReviewId::new(doc.id)?,
            name: PersonName::new(doc.name)?,
            email: EmailAddress::new(doc.email)?,
            company: doc.company.map(CompanyName::new).transpose()?,
            rating: Rating::new(doc.rating)?,
            body: ReviewBody::new(doc.review)?,
            status: ReviewStatus::try_from(doc.status)?,
            created_at: doc.created_at,
        })
    }
}

impl From<&DomainReview> for ReviewDocument {
    fn from(review: &DomainReview) -> Self {
        Self {
            id: review.id.as_str().to_string(),
            name: review.name.as_str().to_string(),
            email: review.email.as_str().to_string(),
            company: review.company.as_ref().map(|c| c.as_str().to_string()),
            rating: review.rating.get(),
            review: review.body.as_str().to_string(),
            status: review.status.as_str().to_string(),
            approved: review.status.is_approved(),
            created_at: review.created_at,
        }
    }
}
