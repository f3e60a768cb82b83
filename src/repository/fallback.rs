//! Local fallback for category data.
//!
//! [`CategoryFallback`] forwards everything to the primary store. When a
//! category call fails with [`RepositoryError::Unavailable`] the call is
//! served from a JSON array kept in [`LocalStorage`] instead, seeded with
//! [`DEFAULT_CATEGORIES`] the first time it is read.

use chrono::Utc;

use crate::clients::local_storage::LocalStorage;
use crate::domain::category::{Category, NewCategory};
use crate::domain::message::{Message, NewMessage};
use crate::domain::project::{Media, NewMedia, NewProject, Project, ProjectChanges};
use crate::domain::review::{NewReview, Review};
use crate::domain::types::{
    CategoryId, CategoryName, MediaId, MessageId, ProjectId, ProjectTitle, ReviewId,
    ReviewStatus, Sequence,
};
use crate::models::document::CategoryDocument;
use crate::ordering::SequenceUpdate;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    CategoryReader, CategoryWriter, MessageListQuery, MessageReader, MessageWriter,
    ProjectListQuery, ProjectReader, ProjectWriter, ReviewListQuery, ReviewReader, ReviewWriter,
};

/// Well-known key of the category array.
pub const CATEGORIES_KEY: &str = "portfolio.categories";

/// Categories written on first use of an empty fallback.
pub const DEFAULT_CATEGORIES: [&str; 4] =
    ["Web Development", "Mobile Apps", "UI/UX Design", "Other"];

pub struct CategoryFallback<R> {
    inner: R,
    local: LocalStorage,
}

impl<R> CategoryFallback<R> {
    pub fn new(inner: R, local: LocalStorage) -> Self {
        Self { inner, local }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    fn load(&self) -> RepositoryResult<Vec<Category>> {
        let stored: Option<Vec<CategoryDocument>> = self.local.get_item(CATEGORIES_KEY)?;
        let Some(stored) = stored else {
            return self.seed();
        };

        let mut categories = stored
            .into_iter()
            .map(Category::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        categories.sort_by_key(|c| c.sequence);
        Ok(categories)
    }

    fn seed(&self) -> RepositoryResult<Vec<Category>> {
        let now = Utc::now().naive_utc();
        let mut categories = Vec::with_capacity(DEFAULT_CATEGORIES.len());
        for (name, sequence) in DEFAULT_CATEGORIES.iter().zip(1..) {
            categories.push(Category {
                id: CategoryId::generate(),
                name: CategoryName::new(*name)?,
                sequence: Sequence::new(sequence),
                created_at: now,
                updated_at: now,
            });
        }
        self.save(&categories)?;
        Ok(categories)
    }

    fn save(&self, categories: &[Category]) -> RepositoryResult<()> {
        let stored: Vec<CategoryDocument> = categories.iter().map(Into::into).collect();
        self.local.set_item(CATEGORIES_KEY, &stored)
    }

    /// Runs `primary`; on an unavailable store runs `local` instead.
    fn with_fallback<T>(
        &self,
        operation: &str,
        primary: impl FnOnce(&R) -> RepositoryResult<T>,
        local: impl FnOnce(&Self) -> RepositoryResult<T>,
    ) -> RepositoryResult<T> {
        match primary(&self.inner) {
            Err(RepositoryError::Unavailable(reason)) => {
                log::warn!("Primary store unavailable for {operation} ({reason}); using local categories");
                local(self)
            }
            result => result,
        }
    }
}

impl<R: CategoryReader> CategoryReader for CategoryFallback<R> {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        self.with_fallback("list_categories", |r| r.list_categories(), Self::load)
    }

    fn get_category_by_id(&self, id: &CategoryId) -> RepositoryResult<Option<Category>> {
        self.with_fallback(
            "get_category_by_id",
            |r| r.get_category_by_id(id),
            |this| Ok(this.load()?.into_iter().find(|c| &c.id == id)),
        )
    }
}

impl<R: CategoryWriter> CategoryWriter for CategoryFallback<R> {
    fn create_category(
        &self,
        category: &NewCategory,
        sequence: Sequence,
    ) -> RepositoryResult<Category> {
        self.with_fallback(
            "create_category",
            |r| r.create_category(category, sequence),
            |this| {
                let mut categories = this.load()?;
                let created = category.clone().into_category(CategoryId::generate(), sequence);
                categories.push(created.clone());
                this.save(&categories)?;
                Ok(created)
            },
        )
    }

    fn rename_category(&self, id: &CategoryId, name: &CategoryName) -> RepositoryResult<usize> {
        self.with_fallback(
            "rename_category",
            |r| r.rename_category(id, name),
            |this| {
                let mut categories = this.load()?;
                let Some(category) = categories.iter_mut().find(|c| &c.id == id) else {
                    return Ok(0);
                };
                category.name = name.clone();
                category.updated_at = Utc::now().naive_utc();
                this.save(&categories)?;
                Ok(1)
            },
        )
    }

    fn set_category_sequences(
        &self,
        updates: &[SequenceUpdate<CategoryId>],
    ) -> RepositoryResult<()> {
        self.with_fallback(
            "set_category_sequences",
            |r| r.set_category_sequences(updates),
            |this| {
                let mut categories = this.load()?;
                for update in updates {
                    let category = categories
                        .iter_mut()
                        .find(|c| c.id == update.id)
                        .ok_or(RepositoryError::NotFound)?;
                    category.sequence = update.to;
                }
                // Single write of the whole array: all updates land or none.
                this.save(&categories)
            },
        )
    }

    fn delete_category(&self, id: &CategoryId) -> RepositoryResult<usize> {
        self.with_fallback(
            "delete_category",
            |r| r.delete_category(id),
            |this| {
                let mut categories = this.load()?;
                let before = categories.len();
                categories.retain(|c| &c.id != id);
                if categories.len() == before {
                    return Ok(0);
                }
                this.save(&categories)?;
                Ok(1)
            },
        )
    }
}

impl<R: ProjectReader> ProjectReader for CategoryFallback<R> {
    fn list_projects(&self, query: ProjectListQuery) -> RepositoryResult<Vec<Project>> {
        self.inner.list_projects(query)
    }

    fn get_project_by_id(&self, id: &ProjectId) -> RepositoryResult<Option<Project>> {
        self.inner.get_project_by_id(id)
    }
}

impl<R: ProjectWriter> ProjectWriter for CategoryFallback<R> {
    fn create_project(
        &self,
        project: &NewProject,
        sequence: Sequence,
    ) -> RepositoryResult<Project> {
        self.inner.create_project(project, sequence)
    }

    fn update_project(
        &self,
        id: &ProjectId,
        changes: &ProjectChanges,
    ) -> RepositoryResult<usize> {
        self.inner.update_project(id, changes)
    }

    fn rename_project(&self, id: &ProjectId, title: &ProjectTitle) -> RepositoryResult<usize> {
        self.inner.rename_project(id, title)
    }

    fn set_project_sequences(
        &self,
        updates: &[SequenceUpdate<ProjectId>],
    ) -> RepositoryResult<()> {
        self.inner.set_project_sequences(updates)
    }

    fn add_project_media(
        &self,
        project_id: &ProjectId,
        media: &[NewMedia],
    ) -> RepositoryResult<Vec<Media>> {
        self.inner.add_project_media(project_id, media)
    }

    fn delete_project_media(
        &self,
        project_id: &ProjectId,
        media_id: &MediaId,
    ) -> RepositoryResult<usize> {
        self.inner.delete_project_media(project_id, media_id)
    }

    fn delete_project(&self, id: &ProjectId) -> RepositoryResult<usize> {
        self.inner.delete_project(id)
    }
}

impl<R: MessageReader> MessageReader for CategoryFallback<R> {
    fn list_messages(&self, query: MessageListQuery) -> RepositoryResult<Vec<Message>> {
        self.inner.list_messages(query)
    }

    fn get_message_by_id(&self, id: &MessageId) -> RepositoryResult<Option<Message>> {
        self.inner.get_message_by_id(id)
    }
}

impl<R: MessageWriter> MessageWriter for CategoryFallback<R> {
    fn create_message(&self, message: &NewMessage) -> RepositoryResult<Message> {
        self.inner.create_message(message)
    }

    fn set_message_read(&self, id: &MessageId, read: bool) -> RepositoryResult<usize> {
        self.inner.set_message_read(id, read)
    }

    fn delete_message(&self, id: &MessageId) -> RepositoryResult<usize> {
        self.inner.delete_message(id)
    }
}

impl<R: ReviewReader> ReviewReader for CategoryFallback<R> {
    fn list_reviews(&self, query: ReviewListQuery) -> RepositoryResult<Vec<Review>> {
        self.inner.list_reviews(query)
    }

    fn get_review_by_id(&self, id: &ReviewId) -> RepositoryResult<Option<Review>> {
        self.inner.get_review_by_id(id)
    }
}

impl<R: ReviewWriter> ReviewWriter for CategoryFallback<R> {
    fn create_review(&self, review: &NewReview) -> RepositoryResult<Review> {
        self.inner.create_review(review)
    }

    fn set_review_status(&self, id: &ReviewId, status: ReviewStatus) -> RepositoryResult<usize> {
        self.inner.set_review_status(id, status)
    }

    fn delete_review(&self, id: &ReviewId) -> RepositoryResult<usize> {
        self.inner.delete_review(id)
    }
}
