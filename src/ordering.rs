//! User-orderable collections backed by a repository.
//!
//! [`OrderedCollection`] keeps an in-memory list sorted by each entity's
//! `sequence` and turns admin actions (add, rename, move up/down, remove) into
//! the minimum set of writes. Moving swaps the sequence values of two
//! neighbours; new entries get `max + 1` so gaps left by deletions are
//! harmless.
//!
//! Operations are not queued. Two collections loaded from the same store that
//! both move the same neighbours before either reloads will overwrite each
//! other's swap (lost update). Handlers keep one collection per request and
//! the admin pages disable a form's buttons once it is submitted.

use std::fmt::Display;

use thiserror::Error;

use crate::domain::category::{Category, NewCategory};
use crate::domain::project::{NewProject, Project};
use crate::domain::types::{
    CategoryId, CategoryName, ProjectId, ProjectTitle, Sequence, SortDirection,
    TypeConstraintError,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    CategoryReader, CategoryWriter, ProjectListQuery, ProjectReader, ProjectWriter,
};

/// One step towards the front (`Up`) or the back (`Down`) of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

impl TryFrom<&str> for MoveDirection {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "move direction: {other}"
            ))),
        }
    }
}

/// What happens to the in-memory list when a write fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Local state stays exactly as it was before the operation.
    KeepLocal,
    /// Local state is replaced by a fresh load from the store.
    Reload,
}

/// Change of one entry's sequence; `from` is kept for rollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceUpdate<I> {
    pub id: I,
    pub from: Sequence,
    pub to: Sequence,
}

/// Entity that can live in an [`OrderedCollection`].
pub trait Sequenced: Clone {
    type Id: Clone + PartialEq + Display;
    type Label;
    type New;

    /// Display order of the collection.
    const ORDER: SortDirection;
    /// Local-state policy applied after a failed write.
    const ON_FAILURE: FailurePolicy;

    fn id(&self) -> &Self::Id;
    fn sequence(&self) -> Sequence;
    fn set_sequence(&mut self, sequence: Sequence);
    fn set_label(&mut self, label: Self::Label);
    fn parse_label(raw: &str) -> Result<Self::Label, TypeConstraintError>;
}

/// Persistence operations an [`OrderedCollection`] needs.
pub trait SequenceStore<T: Sequenced> {
    fn list_ordered(&self) -> RepositoryResult<Vec<T>>;
    fn insert_ordered(&self, item: &T::New, sequence: Sequence) -> RepositoryResult<T>;
    fn rename_ordered(&self, id: &T::Id, label: &T::Label) -> RepositoryResult<()>;
    /// Persists every update or, failing that, none of them.
    ///
    /// Stores without transactions undo applied updates and report
    /// [`RepositoryError::PartialFailure`] when the undo itself fails.
    fn write_sequences(&self, updates: &[SequenceUpdate<T::Id>]) -> RepositoryResult<()>;
    fn delete_ordered(&self, id: &T::Id) -> RepositoryResult<()>;
}

/// Errors returned by [`OrderedCollection`] operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderingError {
    #[error("{0}")]
    Validation(String),
    #[error("entry not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("partial failure: {0}")]
    PartialFailure(String),
}

pub type OrderingResult<T> = Result<T, OrderingError>;

impl From<RepositoryError> for OrderingError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::ValidationError(message) => Self::Validation(message),
            RepositoryError::PartialFailure(message) => Self::PartialFailure(message),
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<TypeConstraintError> for OrderingError {
    fn from(value: TypeConstraintError) -> Self {
        Self::Validation(value.to_string())
    }
}

/// Applies `updates` one by one through `write`, undoing applied updates in
/// reverse order when a later one fails.
pub fn apply_with_rollback<I, F>(updates: &[SequenceUpdate<I>], mut write: F) -> RepositoryResult<()>
where
    I: Display,
    F: FnMut(&I, Sequence) -> RepositoryResult<()>,
{
    for (index, update) in updates.iter().enumerate() {
        let Err(err) = write(&update.id, update.to) else {
            continue;
        };

        for applied in updates[..index].iter().rev() {
            if let Err(rollback_err) = write(&applied.id, applied.from) {
                log::error!(
                    "Failed to roll back sequence of {} from {} to {}: {rollback_err}",
                    applied.id,
                    applied.to,
                    applied.from
                );
                return Err(RepositoryError::PartialFailure(format!(
                    "sequence of {} left at {} after failed write ({err}); rollback failed: {rollback_err}",
                    applied.id, applied.to
                )));
            }
        }
        return Err(err);
    }
    Ok(())
}

/// In-memory ordered view over a [`SequenceStore`].
pub struct OrderedCollection<'a, T, S: ?Sized> {
    store: &'a S,
    items: Vec<T>,
}

impl<'a, T, S> OrderedCollection<'a, T, S>
where
    T: Sequenced,
    S: SequenceStore<T> + ?Sized,
{
    /// Fetches every entry and sorts it in the entity's display order.
    pub fn load(store: &'a S) -> OrderingResult<Self> {
        let mut items = store.list_ordered()?;
        sort_items(&mut items);
        Ok(Self { store, items })
    }

    /// Replaces the local list with the store's. On error the previous list is
    /// left untouched.
    pub fn reload(&mut self) -> OrderingResult<()> {
        let mut items = self.store.list_ordered()?;
        sort_items(&mut items);
        self.items = items;
        Ok(())
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// `max(existing) + 1`, or 1 for an empty collection.
    pub fn next_sequence(&self) -> OrderingResult<Sequence> {
        match self.items.iter().map(Sequenced::sequence).max() {
            Some(max) => Ok(max.try_next()?),
            None => Ok(Sequence::new(1)),
        }
    }

    /// Persists a new entry after every existing one in sequence terms.
    pub fn add(&mut self, item: T::New) -> OrderingResult<T> {
        let sequence = self.next_sequence()?;
        match self.store.insert_ordered(&item, sequence) {
            Ok(created) => {
                self.items.push(created.clone());
                sort_items(&mut self.items);
                Ok(created)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Validates `name` and renames the entry. The sequence is unchanged.
    pub fn rename(&mut self, id: &T::Id, name: &str) -> OrderingResult<()> {
        let label = T::parse_label(name)?;
        let index = self.position(id)?;
        match self.store.rename_ordered(id, &label) {
            Ok(()) => {
                self.items[index].set_label(label);
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Moves the entry one step. Returns `false` without touching the store
    /// when it already sits at that end of the list.
    pub fn move_one(&mut self, id: &T::Id, direction: MoveDirection) -> OrderingResult<bool> {
        let index = self.position(id)?;
        let neighbour = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => Some(index + 1).filter(|n| *n < self.items.len()),
        };
        let Some(neighbour) = neighbour else {
            return Ok(false);
        };

        let current = &self.items[index];
        let other = &self.items[neighbour];
        let updates = if current.sequence() != other.sequence() {
            vec![
                SequenceUpdate {
                    id: current.id().clone(),
                    from: current.sequence(),
                    to: other.sequence(),
                },
                SequenceUpdate {
                    id: other.id().clone(),
                    from: other.sequence(),
                    to: current.sequence(),
                },
            ]
        } else {
            // Equal neighbours cannot be swapped; renumber once instead.
            self.renumbered_with_swap(index, neighbour)
        };

        if let Err(err) = self.store.write_sequences(&updates) {
            return Err(self.fail(err));
        }

        for update in &updates {
            if let Some(item) = self.items.iter_mut().find(|item| item.id() == &update.id) {
                item.set_sequence(update.to);
            }
        }
        sort_items(&mut self.items);
        Ok(true)
    }

    /// Deletes an already confirmed entry. Remaining sequences keep their gaps.
    pub fn remove(&mut self, id: &T::Id) -> OrderingResult<()> {
        let index = self.position(id)?;
        match self.store.delete_ordered(id) {
            Ok(()) => {
                self.items.remove(index);
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn position(&self, id: &T::Id) -> OrderingResult<usize> {
        self.items
            .iter()
            .position(|item| item.id() == id)
            .ok_or(OrderingError::NotFound)
    }

    /// Distinct sequences for the whole list with `a` and `b` exchanged.
    fn renumbered_with_swap(&self, a: usize, b: usize) -> Vec<SequenceUpdate<T::Id>> {
        let mut order: Vec<&T> = self.items.iter().collect();
        order.swap(a, b);
        let len = i32::try_from(order.len()).unwrap_or(i32::MAX);

        order
            .into_iter()
            .zip(0..)
            .filter_map(|(item, position)| {
                let to = match T::ORDER {
                    SortDirection::Ascending => Sequence::new(position + 1),
                    SortDirection::Descending => Sequence::new(len - position),
                };
                (item.sequence() != to).then(|| SequenceUpdate {
                    id: item.id().clone(),
                    from: item.sequence(),
                    to,
                })
            })
            .collect()
    }

    fn fail(&mut self, err: RepositoryError) -> OrderingError {
        log::error!("Ordered collection write failed: {err}");
        if T::ON_FAILURE == FailurePolicy::Reload {
            if let Err(reload_err) = self.reload() {
                log::error!("Failed to reload ordered collection: {reload_err}");
            }
        }
        err.into()
    }
}

fn sort_items<T: Sequenced>(items: &mut [T]) {
    items.sort_by(|a, b| T::ORDER.apply(a.sequence().cmp(&b.sequence())));
}

fn require_affected(affected: usize) -> RepositoryResult<()> {
    if affected == 0 {
        Err(RepositoryError::NotFound)
    } else {
        Ok(())
    }
}

/// Categories list ascending; a failed write leaves the list as it was.
impl Sequenced for Category {
    type Id = CategoryId;
    type Label = CategoryName;
    type New = NewCategory;

    const ORDER: SortDirection = SortDirection::Ascending;
    const ON_FAILURE: FailurePolicy = FailurePolicy::KeepLocal;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn sequence(&self) -> Sequence {
        self.sequence
    }

    fn set_sequence(&mut self, sequence: Sequence) {
        self.sequence = sequence;
    }

    fn set_label(&mut self, label: Self::Label) {
        self.name = label;
    }

    fn parse_label(raw: &str) -> Result<Self::Label, TypeConstraintError> {
        CategoryName::new(raw)
    }
}

/// Projects list descending (highest sequence first); a failed write forces
/// a reload so a half-applied swap is never shown.
impl Sequenced for Project {
    type Id = ProjectId;
    type Label = ProjectTitle;
    type New = NewProject;

    const ORDER: SortDirection = SortDirection::Descending;
    const ON_FAILURE: FailurePolicy = FailurePolicy::Reload;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn sequence(&self) -> Sequence {
        self.sequence.unwrap_or_default()
    }

    fn set_sequence(&mut self, sequence: Sequence) {
        self.sequence = Some(sequence);
    }

    fn set_label(&mut self, label: Self::Label) {
        self.title = label;
    }

    fn parse_label(raw: &str) -> Result<Self::Label, TypeConstraintError> {
        ProjectTitle::new(raw)
    }
}

impl<R> SequenceStore<Category> for R
where
    R: CategoryReader + CategoryWriter + ?Sized,
{
    fn list_ordered(&self) -> RepositoryResult<Vec<Category>> {
        self.list_categories()
    }

    fn insert_ordered(&self, item: &NewCategory, sequence: Sequence) -> RepositoryResult<Category> {
        self.create_category(item, sequence)
    }

    fn rename_ordered(
        &self,
        id: &CategoryId,
        label: &CategoryName,
    ) -> RepositoryResult<()> {
        self.rename_category(id, label).and_then(require_affected)
    }

    fn write_sequences(
        &self,
        updates: &[SequenceUpdate<CategoryId>],
    ) -> RepositoryResult<()> {
        self.set_category_sequences(updates)
    }

    fn delete_ordered(&self, id: &CategoryId) -> RepositoryResult<()> {
        self.delete_category(id).and_then(require_affected)
    }
}

impl<R> SequenceStore<Project> for R
where
    R: ProjectReader + ProjectWriter + ?Sized,
{
    fn list_ordered(&self) -> RepositoryResult<Vec<Project>> {
        self.list_projects(ProjectListQuery::default())
    }

    fn insert_ordered(&self, item: &NewProject, sequence: Sequence) -> RepositoryResult<Project> {
        self.create_project(item, sequence)
    }

    fn rename_ordered(
        &self,
        id: &ProjectId,
        label: &ProjectTitle,
    ) -> RepositoryResult<()> {
        self.rename_project(id, label).and_then(require_affected)
    }

    fn write_sequences(
        &self,
        updates: &[SequenceUpdate<ProjectId>],
    ) -> RepositoryResult<()> {
        self.set_project_sequences(updates)
    }

    fn delete_ordered(&self, id: &ProjectId) -> RepositoryResult<()> {
        self.delete_project(id).and_then(require_affected)
    }
}
