use std::cell::{Cell, RefCell};
use std::cmp::Ordering;

use crate::domain::category::{Category, NewCategory};
use crate::domain::message::{Message, NewMessage};
use crate::domain::project::{
    Media, NewMedia, NewProject, Project, ProjectChanges, attach_media,
};
use crate::domain::review::{NewReview, Review};
use crate::domain::types::{
    CategoryId, CategoryName, MediaId, MessageId, ProjectId, ProjectTitle, ReviewId,
    ReviewStatus, Sequence,
};
use crate::ordering::{SequenceUpdate, apply_with_rollback};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    CategoryReader, CategoryWriter, MessageListQuery, MessageReader, MessageWriter,
    ProjectListQuery, ProjectReader, ProjectWriter, ReviewListQuery, ReviewReader, ReviewWriter,
};

/// Simple in-memory repository used for unit tests.
///
/// Sequence batches are applied one write at a time with rollback, like the
/// document adapter, so individual writes can be failed on purpose.
#[derive(Default)]
pub struct TestRepository {
    categories: RefCell<Vec<Category>>,
    projects: RefCell<Vec<Project>>,
    messages: RefCell<Vec<Message>>,
    reviews: RefCell<Vec<Review>>,
    unavailable: Cell<bool>,
    failing_writes: Cell<bool>,
    failing_sequence_writes: RefCell<Vec<usize>>,
    sequence_writes: Cell<usize>,
    write_calls: Cell<usize>,
}

impl TestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(self, categories: Vec<Category>) -> Self {
        self.categories.replace(categories);
        self
    }

    pub fn with_projects(self, projects: Vec<Project>) -> Self {
        self.projects.replace(projects);
        self
    }

    pub fn with_messages(self, messages: Vec<Message>) -> Self {
        self.messages.replace(messages);
        self
    }

    pub fn with_reviews(self, reviews: Vec<Review>) -> Self {
        self.reviews.replace(reviews);
        self
    }

    /// Every call fails with [`RepositoryError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    /// Writer calls fail with [`RepositoryError::Unavailable`]; reads work.
    pub fn set_failing_writes(&self, failing: bool) {
        self.failing_writes.set(failing);
    }

    /// Fails the individual sequence writes with these zero-based indices,
    /// counted across every batch including rollback writes.
    pub fn fail_sequence_writes(&self, indices: &[usize]) {
        self.failing_sequence_writes.replace(indices.to_vec());
    }

    pub fn sequence_writes(&self) -> usize {
        self.sequence_writes.get()
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.get()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.categories.borrow().clone()
    }

    pub fn projects(&self) -> Vec<Project> {
        self.projects.borrow().clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.borrow().clone()
    }

    pub fn reviews(&self) -> Vec<Review> {
        self.reviews.borrow().clone()
    }

    fn check_read(&self) -> RepositoryResult<()> {
        if self.unavailable.get() {
            return Err(RepositoryError::Unavailable("test store offline".into()));
        }
        Ok(())
    }

    fn check_write(&self) -> RepositoryResult<()> {
        self.write_calls.set(self.write_calls.get() + 1);
        if self.unavailable.get() || self.failing_writes.get() {
            return Err(RepositoryError::Unavailable("test store rejected write".into()));
        }
        Ok(())
    }

    fn sequence_write(&self) -> RepositoryResult<()> {
        let index = self.sequence_writes.get();
        self.sequence_writes.set(index + 1);
        if self.failing_sequence_writes.borrow().contains(&index) {
            return Err(RepositoryError::Unavailable(format!(
                "sequence write {index} failed"
            )));
        }
        Ok(())
    }
}

fn count(found: bool) -> usize {
    usize::from(found)
}

impl CategoryReader for TestRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        self.check_read()?;
        let mut items = self.categories();
        items.sort_by(|a, b| {
            a.sequence
                .cmp(&b.sequence)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(items)
    }

    fn get_category_by_id(&self, id: &CategoryId) -> RepositoryResult<Option<Category>> {
        self.check_read()?;
        Ok(self.categories.borrow().iter().find(|c| &c.id == id).cloned())
    }
}

impl CategoryWriter for TestRepository {
    fn create_category(
        &self,
        category: &NewCategory,
        sequence: Sequence,
    ) -> RepositoryResult<Category> {
        self.check_write()?;
        let category = category.clone().into_category(CategoryId::generate(), sequence);
        self.categories.borrow_mut().push(category.clone());
        Ok(category)
    }

    fn rename_category(&self, id: &CategoryId, name: &CategoryName) -> RepositoryResult<usize> {
        self.check_write()?;
        let mut categories = self.categories.borrow_mut();
        let category = categories.iter_mut().find(|c| &c.id == id);
        let found = category.is_some();
        if let Some(category) = category {
            category.name = name.clone();
        }
        Ok(count(found))
    }

    fn set_category_sequences(
        &self,
        updates: &[SequenceUpdate<CategoryId>],
    ) -> RepositoryResult<()> {
        self.check_write()?;
        apply_with_rollback(updates, |id, sequence| {
            self.sequence_write()?;
            let mut categories = self.categories.borrow_mut();
            let category = categories
                .iter_mut()
                .find(|c| &c.id == id)
                .ok_or(RepositoryError::NotFound)?;
            category.sequence = sequence;
            Ok(())
        })
    }

    fn delete_category(&self, id: &CategoryId) -> RepositoryResult<usize> {
        self.check_write()?;
        let mut categories = self.categories.borrow_mut();
        let before = categories.len();
        categories.retain(|c| &c.id != id);
        Ok(before - categories.len())
    }
}

fn compare_projects(a: &Project, b: &Project) -> Ordering {
    match (a.sequence, b.sequence) {
        (Some(a_seq), Some(b_seq)) => b_seq.cmp(&a_seq),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| b.created_at.cmp(&a.created_at))
}

impl ProjectReader for TestRepository {
    fn list_projects(&self, query: ProjectListQuery) -> RepositoryResult<Vec<Project>> {
        self.check_read()?;
        let mut items = self.projects();
        if let Some(category_id) = query.category_id {
            items.retain(|p| p.category_id.as_ref() == Some(&category_id));
        }
        items.sort_by(compare_projects);
        Ok(items)
    }

    fn get_project_by_id(&self, id: &ProjectId) -> RepositoryResult<Option<Project>> {
        self.check_read()?;
        Ok(self.projects.borrow().iter().find(|p| &p.id == id).cloned())
    }
}

impl ProjectWriter for TestRepository {
    fn create_project(
        &self,
        project: &NewProject,
        sequence: Sequence,
    ) -> RepositoryResult<Project> {
        self.check_write()?;
        let project = project.clone().into_project(ProjectId::generate(), sequence);
        self.projects.borrow_mut().push(project.clone());
        Ok(project)
    }

    fn update_project(
        &self,
        id: &ProjectId,
        changes: &ProjectChanges,
    ) -> RepositoryResult<usize> {
        self.check_write()?;
        let mut projects = self.projects.borrow_mut();
        let Some(project) = projects.iter_mut().find(|p| &p.id == id) else {
            return Ok(0);
        };
        project.title = changes.title.clone();
        project.description = changes.description.clone();
        project.category_id = changes.category_id.clone();
        project.technologies = changes.technologies.clone();
        project.updated_at = changes.updated_at;
        Ok(1)
    }

    fn rename_project(&self, id: &ProjectId, title: &ProjectTitle) -> RepositoryResult<usize> {
        self.check_write()?;
        let mut projects = self.projects.borrow_mut();
        let project = projects.iter_mut().find(|p| &p.id == id);
        let found = project.is_some();
        if let Some(project) = project {
            project.title = title.clone();
        }
        Ok(count(found))
    }

    fn set_project_sequences(
        &self,
        updates: &[SequenceUpdate<ProjectId>],
    ) -> RepositoryResult<()> {
        self.check_write()?;
        apply_with_rollback(updates, |id, sequence| {
            self.sequence_write()?;
            let mut projects = self.projects.borrow_mut();
            let project = projects
                .iter_mut()
                .find(|p| &p.id == id)
                .ok_or(RepositoryError::NotFound)?;
            project.sequence = Some(sequence);
            Ok(())
        })
    }

    fn add_project_media(
        &self,
        project_id: &ProjectId,
        media: &[NewMedia],
    ) -> RepositoryResult<Vec<Media>> {
        self.check_write()?;
        let mut projects = self.projects.borrow_mut();
        let project = projects
            .iter_mut()
            .find(|p| &p.id == project_id)
            .ok_or(RepositoryError::NotFound)?;
        let attached = attach_media(project_id, media.to_vec(), project.next_media_sequence());
        project.media.extend(attached.iter().cloned());
        Ok(attached)
    }

    fn delete_project_media(
        &self,
        project_id: &ProjectId,
        media_id: &MediaId,
    ) -> RepositoryResult<usize> {
        self.check_write()?;
        let mut projects = self.projects.borrow_mut();
        let Some(project) = projects.iter_mut().find(|p| &p.id == project_id) else {
            return Ok(0);
        };
        let before = project.media.len();
        project.media.retain(|m| &m.id != media_id);
        Ok(before - project.media.len())
    }

    fn delete_project(&self, id: &ProjectId) -> RepositoryResult<usize> {
        self.check_write()?;
        let mut projects = self.projects.borrow_mut();
        let before = projects.len();
        projects.retain(|p| &p.id != id);
        Ok(before - projects.len())
    }
}

impl MessageReader for TestRepository {
    fn list_messages(&self, query: MessageListQuery) -> RepositoryResult<Vec<Message>> {
        self.check_read()?;
        let mut items = self.messages();
        if let Some(read) = query.read {
            items.retain(|m| m.read == read);
        }
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    fn get_message_by_id(&self, id: &MessageId) -> RepositoryResult<Option<Message>> {
        self.check_read()?;
        Ok(self.messages.borrow().iter().find(|m| &m.id == id).cloned())
    }
}

impl MessageWriter for TestRepository {
    fn create_message(&self, message: &NewMessage) -> RepositoryResult<Message> {
        self.check_write()?;
        let message = message.clone().into_message(MessageId::generate());
        self.messages.borrow_mut().push(message.clone());
        Ok(message)
    }

    fn set_message_read(&self, id: &MessageId, read: bool) -> RepositoryResult<usize> {
        self.check_write()?;
        let mut messages = self.messages.borrow_mut();
        let message = messages.iter_mut().find(|m| &m.id == id);
        let found = message.is_some();
        if let Some(message) = message {
            message.read = read;
        }
        Ok(count(found))
    }

    fn delete_message(&self, id: &MessageId) -> RepositoryResult<usize> {
        self.check_write()?;
        let mut messages = self.messages.borrow_mut();
        let before = messages.len();
        messages.retain(|m| &m.id != id);
        Ok(before - messages.len())
    }
}

impl ReviewReader for TestRepository {
    fn list_reviews(&self, query: ReviewListQuery) -> RepositoryResult<Vec<Review>> {
        self.check_read()?;
        let mut items = self.reviews();
        if let Some(status) = query.status {
            items.retain(|r| r.status == status);
        }
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    fn get_review_by_id(&self, id: &ReviewId) -> RepositoryResult<Option<Review>> {
        self.check_read()?;
        Ok(self.reviews.borrow().iter().find(|r| &r.id == id).cloned())
    }
}

impl ReviewWriter for TestRepository {
    fn create_review(&self, review: &NewReview) -> RepositoryResult<Review> {
        self.check_write()?;
        let review = review.clone().into_review(ReviewId::generate());
        self.reviews.borrow_mut().push(review.clone());
        Ok(review)
    }

    fn set_review_status(&self, id: &ReviewId, status: ReviewStatus) -> RepositoryResult<usize> {
        self.check_write()?;
        let mut reviews = self.reviews.borrow_mut();
        let review = reviews.iter_mut().find(|r| &r.id == id);
        let found = review.is_some();
        if let Some(review) = review {
            review.status = status;
        }
        Ok(count(found))
    }

    fn delete_review(&self, id: &ReviewId) -> RepositoryResult<usize> {
        self.check_write()?;
        let mut reviews = self.reviews.borrow_mut();
        let before = reviews.len();
        reviews.retain(|r| &r.id != id);
        Ok(before - reviews.len())
    }
}
