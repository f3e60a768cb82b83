//! Repository backed by the file document store.
//!
//! The store has no transactions. Multi-document writes undo what they already
//! applied when a later step fails and report
//! [`RepositoryError::PartialFailure`] when the undo fails too.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::clients::document::{Document, DocumentStore, FieldNaming};
use crate::domain::category::{Category, NewCategory};
use crate::domain::message::{Message, NewMessage};
use crate::domain::project::{
    Media, NewMedia, NewProject, Project, ProjectChanges, attach_media,
};
use crate::domain::review::{NewReview, Review};
use crate::domain::types::{
    CategoryId, CategoryName, MediaId, MessageId, ProjectId, ProjectTitle, ReviewId,
    ReviewStatus, Sequence, SortDirection,
};
use crate::models::document::{
    CATEGORIES, CategoryDocument, MESSAGES, MediaDocument, MessageDocument, PROJECT_MEDIA,
    PROJECTS, ProjectDocument, REVIEWS, ReviewDocument,
};
use crate::ordering::{SequenceUpdate, apply_with_rollback};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    CategoryReader, CategoryWriter, MessageListQuery, MessageReader, MessageWriter,
    ProjectListQuery, ProjectReader, ProjectWriter, ReviewListQuery, ReviewReader, ReviewWriter,
};

/// Document-store adapter with camelCase field names.
#[derive(Debug)]
pub struct DocumentRepository {
    store: DocumentStore,
}

impl DocumentRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Opens a camelCase store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> RepositoryResult<Self> {
        Ok(Self::new(DocumentStore::open(root, FieldNaming::CamelCase)?))
    }

    fn load_media(&self) -> RepositoryResult<HashMap<String, Vec<MediaDocument>>> {
        let mut grouped: HashMap<String, Vec<MediaDocument>> = HashMap::new();
        for doc in self
            .store
            .list_all(PROJECT_MEDIA, None, SortDirection::Ascending)?
        {
            let media: MediaDocument = from_document(doc)?;
            grouped.entry(media.project_id.clone()).or_default().push(media);
        }
        Ok(grouped)
    }

    fn project_media(&self, project_id: &ProjectId) -> RepositoryResult<Vec<MediaDocument>> {
        self.store
            .find_where(PROJECT_MEDIA, "project_id", &json!(project_id.as_str()))?
            .into_iter()
            .map(from_document)
            .collect()
    }

    /// Inserts media one by one, removing the ones already written when a
    /// later insert fails.
    fn insert_media(&self, media: &[Media]) -> RepositoryResult<()> {
        for (index, item) in media.iter().enumerate() {
            let Err(err) = self
                .store
                .insert(PROJECT_MEDIA, to_document(&MediaDocument::from(item))?)
            else {
                continue;
            };

            for inserted in &media[..index] {
                if let Err(undo_err) = self.store.delete(PROJECT_MEDIA, inserted.id.as_str()) {
                    log::error!("Failed to remove media {}: {undo_err}", inserted.id);
                    return Err(RepositoryError::PartialFailure(format!(
                        "media {} left behind after failed upload ({err})",
                        inserted.id
                    )));
                }
            }
            return Err(err);
        }
        Ok(())
    }
}

fn to_document<T: Serialize>(value: &T) -> RepositoryResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(RepositoryError::Serialization(format!(
            "expected an object, got {other}"
        ))),
    }
}

fn from_document<T: DeserializeOwned>(document: Document) -> RepositoryResult<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

/// Maps a single-document write to an affected-row count.
fn affected(result: RepositoryResult<()>) -> RepositoryResult<usize> {
    match result {
        Ok(()) => Ok(1),
        Err(RepositoryError::NotFound) => Ok(0),
        Err(err) => Err(err),
    }
}

fn partial(fields: Value) -> Document {
    match fields {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

fn parse_category(document: Document) -> RepositoryResult<Category> {
    Ok(from_document::<CategoryDocument>(document)?.try_into()?)
}

fn parse_message(document: Document) -> RepositoryResult<Message> {
    Ok(from_document::<MessageDocument>(document)?.try_into()?)
}

fn parse_review(document: Document) -> RepositoryResult<Review> {
    Ok(from_document::<ReviewDocument>(document)?.try_into()?)
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

impl CategoryReader for DocumentRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        self.store
            .list_all(CATEGORIES, Some("display_order"), SortDirection::Ascending)?
            .into_iter()
            .map(parse_category)
            .collect()
    }

    fn get_category_by_id(&self, id: &CategoryId) -> RepositoryResult<Option<Category>> {
        self.store
            .get(CATEGORIES, id.as_str())?
            .map(parse_category)
            .transpose()
    }
}

impl CategoryWriter for DocumentRepository {
    fn create_category(
        &self,
        category: &NewCategory,
        sequence: Sequence,
    ) -> RepositoryResult<Category> {
        let category = category.clone().into_category(CategoryId::generate(), sequence);
        self.store
            .insert(CATEGORIES, to_document(&CategoryDocument::from(&category))?)?;
        Ok(category)
    }

    fn rename_category(&self, id: &CategoryId, name: &CategoryName) -> RepositoryResult<usize> {
        affected(self.store.update(
            CATEGORIES,
            id.as_str(),
            partial(json!({
                "name": name.as_str(),
                "updated_at": Utc::now().naive_utc(),
            })),
        ))
    }

    fn set_category_sequences(
        &self,
        updates: &[SequenceUpdate<CategoryId>],
    ) -> RepositoryResult<()> {
        apply_with_rollback(updates, |id, sequence| {
            self.store.update(
                CATEGORIES,
                id.as_str(),
                partial(json!({ "display_order": sequence.get() })),
            )
        })
    }

    fn delete_category(&self, id: &CategoryId) -> RepositoryResult<usize> {
        affected(self.store.delete(CATEGORIES, id.as_str()))
    }
}

impl ProjectReader for DocumentRepository {
    fn list_projects(&self, query: ProjectListQuery) -> RepositoryResult<Vec<Project>> {
        let mut media = self.load_media()?;

        let mut projects = Vec::new();
        for doc in self
            .store
            .list_all(PROJECTS, None, SortDirection::Descending)?
        {
            let doc: ProjectDocument = from_document(doc)?;
            if let Some(category_id) = &query.category_id {
                if doc.category_id.as_deref() != Some(category_id.as_str()) {
                    continue;
                }
            }
            let gallery = media.remove(&doc.id).unwrap_or_default();
            projects.push(doc.into_domain(gallery)?);
        }

        projects.sort_by(compare_projects);
        Ok(projects)
    }

    fn get_project_by_id(&self, id: &ProjectId) -> RepositoryResult<Option<Project>> {
        let Some(doc) = self.store.get(PROJECTS, id.as_str())? else {
            return Ok(None);
        };
        let doc: ProjectDocument = from_document(doc)?;
        let media = self.project_media(id)?;
        Ok(Some(doc.into_domain(media)?))
    }
}

impl ProjectWriter for DocumentRepository {
    fn create_project(
        &self,
        project: &NewProject,
        sequence: Sequence,
    ) -> RepositoryResult<Project> {
        let project = project.clone().into_project(ProjectId::generate(), sequence);
        self.store
            .insert(PROJECTS, to_document(&ProjectDocument::from(&project))?)?;

        if let Err(err) = self.insert_media(&project.media) {
            if let Err(undo_err) = self.store.delete(PROJECTS, project.id.as_str()) {
                log::error!("Failed to remove project {}: {undo_err}", project.id);
                return Err(RepositoryError::PartialFailure(format!(
                    "project {} saved without its media ({err})",
                    project.id
                )));
            }
            return Err(err);
        }

        Ok(project)
    }

    fn update_project(
        &self,
        id: &ProjectId,
        changes: &ProjectChanges,
    ) -> RepositoryResult<usize> {
        let technologies: Vec<&str> = changes.technologies.iter().map(|t| t.as_str()).collect();
        affected(self.store.update(
            PROJECTS,
            id.as_str(),
            partial(json!({
                "title": changes.title.as_str(),
                "description": changes.description,
                "category_id": changes.category_id.as_ref().map(|c| c.as_str()),
                "technologies": technologies,
                "updated_at": changes.updated_at,
            })),
        ))
    }

    fn rename_project(&self, id: &ProjectId, title: &ProjectTitle) -> RepositoryResult<usize> {
        affected(self.store.update(
            PROJECTS,
            id.as_str(),
            partial(json!({
                "title": title.as_str(),
                "updated_at": Utc::now().naive_utc(),
            })),
        ))
    }

    fn set_project_sequences(
        &self,
        updates: &[SequenceUpdate<ProjectId>],
    ) -> RepositoryResult<()> {
        apply_with_rollback(updates, |id, sequence| {
            self.store.update(
                PROJECTS,
                id.as_str(),
                partial(json!({ "display_order": sequence.get() })),
            )
        })
    }

    fn add_project_media(
        &self,
        project_id: &ProjectId,
        media: &[NewMedia],
    ) -> RepositoryResult<Vec<Media>> {
        if self.store.get(PROJECTS, project_id.as_str())?.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let first = self
            .project_media(project_id)?
            .iter()
            .map(|m| Sequence::new(m.display_order))
            .max()
            .map_or(Sequence::new(0), Sequence::next);

        let attached = attach_media(project_id, media.to_vec(), first);
        self.insert_media(&attached)?;
        Ok(attached)
    }

    fn delete_project_media(
        &self,
        project_id: &ProjectId,
        media_id: &MediaId,
    ) -> RepositoryResult<usize> {
        let Some(doc) = self.store.get(PROJECT_MEDIA, media_id.as_str())? else {
            return Ok(0);
        };
        let media: MediaDocument = from_document(doc)?;
        if media.project_id != project_id.as_str() {
            return Ok(0);
        }
        affected(self.store.delete(PROJECT_MEDIA, media_id.as_str()))
    }

    fn delete_project(&self, id: &ProjectId) -> RepositoryResult<usize> {
        if self.store.get(PROJECTS, id.as_str())?.is_none() {
            return Ok(0);
        }

        let removed = self
            .store
            .delete_where(PROJECT_MEDIA, "project_id", &json!(id.as_str()))?;

        // Media is gone at this point and cannot be restored.
        match self.store.delete(PROJECTS, id.as_str()) {
            Ok(()) => Ok(1),
            Err(err) if removed > 0 => Err(RepositoryError::PartialFailure(format!(
                "removed {removed} media of project {id} but kept the project: {err}"
            ))),
            Err(err) => Err(err),
        }
    }
}

impl MessageReader for DocumentRepository {
    fn list_messages(&self, query: MessageListQuery) -> RepositoryResult<Vec<Message>> {
        self.store
            .list_all(MESSAGES, Some("created_at"), SortDirection::Descending)?
            .into_iter()
            .map(parse_message)
            .filter(|message| match (query.read, message) {
                (Some(read), Ok(message)) => message.read == read,
                _ => true,
            })
            .collect()
    }

    fn get_message_by_id(&self, id: &MessageId) -> RepositoryResult<Option<Message>> {
        self.store
            .get(MESSAGES, id.as_str())?
            .map(parse_message)
            .transpose()
    }
}

impl MessageWriter for DocumentRepository {
    fn create_message(&self, message: &NewMessage) -> RepositoryResult<Message> {
        let message = message.clone().into_message(MessageId::generate());
        self.store
            .insert(MESSAGES, to_document(&MessageDocument::from(&message))?)?;
        Ok(message)
    }

    fn set_message_read(&self, id: &MessageId, read: bool) -> RepositoryResult<usize> {
        affected(
            self.store
                .update(MESSAGES, id.as_str(), partial(json!({ "read": read }))),
        )
    }

    fn delete_message(&self, id: &MessageId) -> RepositoryResult<usize> {
        affected(self.store.delete(MESSAGES, id.as_str()))
    }
}

impl ReviewReader for DocumentRepository {
    fn list_reviews(&self, query: ReviewListQuery) -> RepositoryResult<Vec<Review>> {
        self.store
            .list_all(REVIEWS, Some("created_at"), SortDirection::Descending)?
            .into_iter()
            .map(parse_review)
            .filter(|review| match (query.status, review) {
                (Some(status), Ok(review)) => review.status == status,
                _ => true,
            })
            .collect()
    }

    fn get_review_by_id(&self, id: &ReviewId) -> RepositoryResult<Option<Review>> {
        self.store
            .get(REVIEWS, id.as_str())?
            .map(parse_review)
            .transpose()
    }
}

impl ReviewWriter for DocumentRepository {
    fn create_review(&self, review: &NewReview) -> RepositoryResult<Review> {
        let review = review.clone().into_review(ReviewId::generate());
        self.store
            .insert(REVIEWS, to_document(&ReviewDocument::from(&review))?)?;
        Ok(review)
    }

    fn set_review_status(&self, id: &ReviewId, status: ReviewStatus) -> RepositoryResult<usize> {
        affected(self.store.update(
            REVIEWS,
            id.as_str(),
            partial(json!({
                "status": status.as_str(),
                "approved": status.is_approved(),
            })),
        ))
    }

    fn delete_review(&self, id: &ReviewId) -> RepositoryResult<usize> {
        affected(self.store.delete(REVIEWS, id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::NaiveDateTime;

    use super::*;
    use crate::domain::types::{
        EmailAddress, MediaKind, MediaUrl, PersonName, Rating, ReviewBody,
    };

    fn now() -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    fn new_category(name: &str) -> NewCategory {
        NewCategory {
            name: CategoryName::new(name).unwrap(),
            created_at: now(),
            updated_at: now(),
        }
    }

    fn new_project(title: &str, media: usize) -> NewProject {
        NewProject {
            title: ProjectTitle::new(title).unwrap(),
            description: String::new(),
            category_id: None,
            technologies: Vec::new(),
            media: (0..media)
                .map(|i| NewMedia {
                    url: MediaUrl::new(format!("/uploads/{title}-{i}.png")).unwrap(),
                    kind: MediaKind::Image,
                })
                .collect(),
            created_at: now(),
            updated_at: now(),
        }
    }

    fn read_collection(dir: &std::path::Path, name: &str) -> Value {
        let raw = fs::read_to_string(dir.join(format!("{name}.json"))).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn categories_are_stored_with_camel_case_fields() {
        let dir = tempfile::tempdir().unwrap();
        let repo = DocumentRepository::open(dir.path()).unwrap();
        let category = repo
            .create_category(&new_category("Web"), Sequence::new(1))
            .unwrap();

        let stored = read_collection(dir.path(), CATEGORIES);
        assert_eq!(stored[0]["id"], json!(category.id.as_str()));
        assert_eq!(stored[0]["displayOrder"], json!(1));
        assert!(stored[0].get("display_order").is_none());
    }

    #[test]
    fn sequence_swap_is_written_to_both_documents() {
        let dir = tempfile::tempdir().unwrap();
        let repo = DocumentRepository::open(dir.path()).unwrap();
        let a = repo.create_category(&new_category("A"), Sequence::new(1)).unwrap();
        let b = repo.create_category(&new_category("B"), Sequence::new(2)).unwrap();

        repo.set_category_sequences(&[
            SequenceUpdate {
                id: a.id.clone(),
                from: Sequence::new(1),
                to: Sequence::new(2),
            },
            SequenceUpdate {
                id: b.id.clone(),
                from: Sequence::new(2),
                to: Sequence::new(1),
            },
        ])
        .unwrap();

        let names: Vec<String> = repo
            .list_categories()
            .unwrap()
            .into_iter()
            .map(|c| c.name.into_inner())
            .collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn failed_sequence_write_rolls_back_applied_updates() {
        let dir = tempfile::tempdir().unwrap();
        let repo = DocumentRepository::open(dir.path()).unwrap();
        let a = repo.create_category(&new_category("A"), Sequence::new(1)).unwrap();

        let err = repo
            .set_category_sequences(&[
                SequenceUpdate {
                    id: a.id.clone(),
                    from: Sequence::new(1),
                    to: Sequence::new(2),
                },
                SequenceUpdate {
                    id: CategoryId::new("missing").unwrap(),
                    from: Sequence::new(2),
                    to: Sequence::new(1),
                },
            ])
            .unwrap_err();

        assert_eq!(err, RepositoryError::NotFound);
        let stored = repo.get_category_by_id(&a.id).unwrap().unwrap();
        assert_eq!(stored.sequence, Sequence::new(1));
    }

    #[test]
    fn projects_list_by_sequence_descending_with_media() {
        let dir = tempfile::tempdir().unwrap();
        let repo = DocumentRepository::open(dir.path()).unwrap();
        repo.create_project(&new_project("low", 0), Sequence::new(1))
            .unwrap();
        let high = repo
            .create_project(&new_project("high", 2), Sequence::new(5))
            .unwrap();

        let projects = repo.list_projects(ProjectListQuery::default()).unwrap();
        assert_eq!(projects[0].id, high.id);
        assert_eq!(projects[0].media.len(), 2);
        assert_eq!(projects[0].media[0].sequence, Sequence::new(0));
        assert_eq!(projects[1].title, "low");

        let stored = read_collection(dir.path(), PROJECT_MEDIA);
        assert_eq!(stored[0]["projectId"], json!(high.id.as_str()));
        assert_eq!(stored[0]["mediaType"], json!("image"));
    }

    #[test]
    fn deleting_project_removes_its_media() {
        let dir = tempfile::tempdir().unwrap();
        let repo = DocumentRepository::open(dir.path()).unwrap();
        let keep = repo
            .create_project(&new_project("keep", 1), Sequence::new(1))
            .unwrap();
        let drop = repo
            .create_project(&new_project("drop", 3), Sequence::new(2))
            .unwrap();

        assert_eq!(repo.delete_project(&drop.id).unwrap(), 1);
        assert_eq!(repo.delete_project(&drop.id).unwrap(), 0);

        let stored = read_collection(dir.path(), PROJECT_MEDIA);
        let stored = stored.as_array().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0]["projectId"], json!(keep.id.as_str()));
    }

    fn block_writes(dir: &std::path::Path, collection: &str) {
        // The store writes through `<collection>.json.tmp`; a directory there
        // makes every write fail while reads keep working.
        fs::create_dir(dir.join(format!("{collection}.json.tmp"))).unwrap();
    }

    #[test]
    fn project_kept_after_media_delete_is_a_partial_failure() {
        let dir = tempfile::tempdir().unwrap();
        let repo = DocumentRepository::open(dir.path()).unwrap();
        let project = repo
            .create_project(&new_project("site", 2), Sequence::new(1))
            .unwrap();
        block_writes(dir.path(), PROJECTS);

        let result = repo.delete_project(&project.id);

        assert!(matches!(result, Err(RepositoryError::PartialFailure(_))));
        let stored = repo.get_project_by_id(&project.id).unwrap().unwrap();
        assert!(stored.media.is_empty());
    }

    #[test]
    fn failed_delete_without_media_is_a_plain_failure() {
        let dir = tempfile::tempdir().unwrap();
        let repo = DocumentRepository::open(dir.path()).unwrap();
        let project = repo
            .create_project(&new_project("bare", 0), Sequence::new(1))
            .unwrap();
        block_writes(dir.path(), PROJECTS);

        let result = repo.delete_project(&project.id);

        assert!(matches!(result, Err(RepositoryError::Unavailable(_))));
        assert!(repo.get_project_by_id(&project.id).unwrap().is_some());
    }

    #[test]
    fn appended_media_continue_the_gallery() {
        let dir = tempfile::tempdir().unwrap();
        let repo = DocumentRepository::open(dir.path()).unwrap();
        let project = repo
            .create_project(&new_project("p", 2), Sequence::new(1))
            .unwrap();

        let added = repo
            .add_project_media(
                &project.id,
                &[NewMedia {
                    url: MediaUrl::new("/uploads/clip.mp4").unwrap(),
                    kind: MediaKind::Video,
                }],
            )
            .unwrap();
        assert_eq!(added[0].sequence, Sequence::new(2));

        let missing = ProjectId::new("missing").unwrap();
        assert_eq!(
            repo.add_project_media(&missing, &[]).unwrap_err(),
            RepositoryError::NotFound
        );
    }

    #[test]
    fn review_status_updates_derived_flag() {
        let dir = tempfile::tempdir().unwrap();
        let repo = DocumentRepository::open(dir.path()).unwrap();
        let review = repo
            .create_review(&NewReview {
                name: PersonName::new("Ann").unwrap(),
                email: EmailAddress::new("ann@example.com").unwrap(),
                company: None,
                rating: Rating::new(5).unwrap(),
                body: ReviewBody::new("Great work").unwrap(),
                created_at: now(),
            })
            .unwrap();

        let stored = read_collection(dir.path(), REVIEWS);
        assert_eq!(stored[0]["approved"], json!(false));

        repo.set_review_status(&review.id, ReviewStatus::Approved)
            .unwrap();
        let stored = read_collection(dir.path(), REVIEWS);
        assert_eq!(stored[0]["status"], json!("approved"));
        assert_eq!(stored[0]["approved"], json!(true));

        let approved = repo
            .list_reviews(ReviewListQuery::default().status(ReviewStatus::Approved))
            .unwrap();
        assert_eq!(approved.len(), 1);
    }
}
