use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, NewCategory};
use crate::domain::message::{Message, NewMessage};
use crate::domain::project::{Media, NewMedia, NewProject, Project, ProjectChanges};
use crate::domain::review::{NewReview, Review};
use crate::domain::types::{
    CategoryId, CategoryName, MediaId, MessageId, ProjectId, ProjectTitle, ReviewId,
    ReviewStatus, Sequence,
};
use crate::ordering::SequenceUpdate;

use self::errors::RepositoryResult;

pub mod category;
pub mod document;
pub mod errors;
pub mod fallback;
pub mod message;
pub mod project;
pub mod review;
#[cfg(test)]
pub mod test;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters used when listing projects.
#[derive(Debug, Clone, Default)]
pub struct ProjectListQuery {
    /// Restrict to projects assigned to this category.
    pub category_id: Option<CategoryId>,
}

impl ProjectListQuery {
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Query parameters used when listing messages.
#[derive(Debug, Clone, Default)]
pub struct MessageListQuery {
    /// Restrict to read (`true`) or unread (`false`) messages.
    pub read: Option<bool>,
}

impl MessageListQuery {
    pub fn read(mut self, read: bool) -> Self {
        self.read = Some(read);
        self
    }
}

/// Query parameters used when listing reviews.
#[derive(Debug, Clone, Default)]
pub struct ReviewListQuery {
    /// Restrict to a single moderation state.
    pub status: Option<ReviewStatus>,
}

impl ReviewListQuery {
    pub fn status(mut self, status: ReviewStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List every category by ascending sequence.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: &CategoryId) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category at the given sequence.
    fn create_category(
        &self,
        category: &NewCategory,
        sequence: Sequence,
    ) -> RepositoryResult<Category>;
    /// Update the category name.
    fn rename_category(&self, id: &CategoryId, name: &CategoryName) -> RepositoryResult<usize>;
    /// Persist all sequence updates or none.
    fn set_category_sequences(
        &self,
        updates: &[SequenceUpdate<CategoryId>],
    ) -> RepositoryResult<()>;
    /// Delete a category. Projects referencing it are left untouched.
    fn delete_category(&self, id: &CategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for project entities.
pub trait ProjectReader {
    /// List projects with their media, highest sequence first, then newest.
    fn list_projects(&self, query: ProjectListQuery) -> RepositoryResult<Vec<Project>>;
    /// Retrieve a project and its media by identifier.
    fn get_project_by_id(&self, id: &ProjectId) -> RepositoryResult<Option<Project>>;
}

/// Write operations for projects and the media they own.
pub trait ProjectWriter {
    /// Persist a new project together with its media batch.
    fn create_project(&self, project: &NewProject, sequence: Sequence)
    -> RepositoryResult<Project>;
    /// Replace the editable project fields.
    fn update_project(&self, id: &ProjectId, changes: &ProjectChanges)
    -> RepositoryResult<usize>;
    /// Update only the title.
    fn rename_project(&self, id: &ProjectId, title: &ProjectTitle) -> RepositoryResult<usize>;
    /// Persist all sequence updates or none.
    fn set_project_sequences(&self, updates: &[SequenceUpdate<ProjectId>])
    -> RepositoryResult<()>;
    /// Append media after the project's current gallery.
    fn add_project_media(
        &self,
        project_id: &ProjectId,
        media: &[NewMedia],
    ) -> RepositoryResult<Vec<Media>>;
    /// Remove a single media item from a project.
    fn delete_project_media(
        &self,
        project_id: &ProjectId,
        media_id: &MediaId,
    ) -> RepositoryResult<usize>;
    /// Delete a project and every media row it owns.
    fn delete_project(&self, id: &ProjectId) -> RepositoryResult<usize>;
}

/// Read-only operations for contact messages.
pub trait MessageReader {
    /// List messages, newest first.
    fn list_messages(&self, query: MessageListQuery) -> RepositoryResult<Vec<Message>>;
    fn get_message_by_id(&self, id: &MessageId) -> RepositoryResult<Option<Message>>;
}

/// Write operations for contact messages.
pub trait MessageWriter {
    fn create_message(&self, message: &NewMessage) -> RepositoryResult<Message>;
    fn set_message_read(&self, id: &MessageId, read: bool) -> RepositoryResult<usize>;
    fn delete_message(&self, id: &MessageId) -> RepositoryResult<usize>;
}

/// Read-only operations for reviews.
pub trait ReviewReader {
    /// List reviews, newest first.
    fn list_reviews(&self, query: ReviewListQuery) -> RepositoryResult<Vec<Review>>;
    fn get_review_by_id(&self, id: &ReviewId) -> RepositoryResult<Option<Review>>;
}

/// Write operations for reviews.
pub trait ReviewWriter {
    fn create_review(&self, review: &NewReview) -> RepositoryResult<Review>;
    fn set_review_status(&self, id: &ReviewId, status: ReviewStatus) -> RepositoryResult<usize>;
    fn delete_review(&self, id: &ReviewId) -> RepositoryResult<usize>;
}

/// Everything the HTTP layer needs from a backing store.
///
/// Implemented by [`DieselRepository`], [`document::DocumentRepository`] and
/// [`fallback::CategoryFallback`] so handlers never name a concrete adapter.
pub trait PortfolioStore:
    CategoryReader
    + CategoryWriter
    + ProjectReader
    + ProjectWriter
    + MessageReader
    + MessageWriter
    + ReviewReader
    + ReviewWriter
    + Send
    + Sync
{
}

impl<T> PortfolioStore for T where
    T: CategoryReader
        + CategoryWriter
        + ProjectReader
        + ProjectWriter
        + MessageReader
        + MessageWriter
        + ReviewReader
        + ReviewWriter
        + Send
        + Sync
{
}
