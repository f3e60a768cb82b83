use crate::domain::category::Category;
use crate::domain::types::CategoryId;
use crate::dto::categories::CategoryDto;
use crate::forms::categories::{AddCategoryFormPayload, RenameCategoryFormPayload};
use crate::ordering::{MoveDirection, OrderedCollection};
use crate::repository::{CategoryReader, CategoryWriter};

use super::ServiceResult;

pub fn show_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader + ?Sized,
{
    match repo.list_categories() {
        Ok(categories) => Ok(categories.into_iter().map(CategoryDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(e.into())
        }
    }
}

/// Appends a category after the current last one.
pub fn add_category<R>(payload: AddCategoryFormPayload, repo: &R) -> ServiceResult<CategoryDto>
where
    R: CategoryReader + CategoryWriter + ?Sized,
{
    let mut categories = OrderedCollection::<Category, R>::load(repo).inspect_err(|e| {
        log::error!("Failed to load categories: {e}");
    })?;

    match categories.add(payload.into_new_category()) {
        Ok(category) => Ok(category.into()),
        Err(e) => {
            log::error!("Failed to add category: {e}");
            Err(e.into())
        }
    }
}

pub fn rename_category<R>(
    id: &CategoryId,
    payload: RenameCategoryFormPayload,
    repo: &R,
) -> ServiceResult<()>
where
    R: CategoryReader + CategoryWriter + ?Sized,
{
    let mut categories = OrderedCollection::<Category, R>::load(repo).inspect_err(|e| {
        log::error!("Failed to load categories: {e}");
    })?;

    categories
        .rename(id, payload.name.as_str())
        .inspect_err(|e| log::error!("Failed to rename category {id}: {e}"))
        .map_err(Into::into)
}

/// Returns `false` when the category already sits at that end of the list.
pub fn move_category<R>(
    id: &CategoryId,
    direction: MoveDirection,
    repo: &R,
) -> ServiceResult<bool>
where
    R: CategoryReader + CategoryWriter + ?Sized,
{
    let mut categories = OrderedCollection::<Category, R>::load(repo).inspect_err(|e| {
        log::error!("Failed to load categories: {e}");
    })?;

    categories
        .move_one(id, direction)
        .inspect_err(|e| log::error!("Failed to move category {id}: {e}"))
        .map_err(Into::into)
}

/// Deletes the category. Projects pointing at it are left as they are and
/// show up as uncategorized.
pub fn delete_category<R>(id: &CategoryId, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader + CategoryWriter + ?Sized,
{
    let mut categories = OrderedCollection::<Category, R>::load(repo).inspect_err(|e| {
        log::error!("Failed to load categories: {e}");
    })?;

    categories
        .remove(id)
        .inspect_err(|e| log::error!("Failed to delete category {id}: {e}"))
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::domain::project::Project;
    use crate::domain::types::{CategoryName, ProjectId, ProjectTitle, Sequence};
    use crate::repository::test::TestRepository;
    use crate::services::ServiceError;

    fn category(id: &str, name: &str, sequence: i32) -> Category {
        Category {
            id: CategoryId::new(id).unwrap(),
            name: CategoryName::new(name).unwrap(),
            sequence: Sequence::new(sequence),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    fn sample_repo() -> TestRepository {
        TestRepository::new().with_categories(vec![
            category("a", "A", 1),
            category("b", "B", 2),
            category("c", "C", 3),
        ])
    }

    fn names(repo: &TestRepository) -> Vec<String> {
        show_categories(repo)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect()
    }

    #[test]
    fn moving_last_category_up_swaps_with_its_neighbour() {
        let repo = sample_repo();

        let moved = move_category(&CategoryId::new("c").unwrap(), MoveDirection::Up, &repo);

        assert_eq!(moved, Ok(true));
        assert_eq!(names(&repo), vec!["A", "C", "B"]);
    }

    #[test]
    fn moving_first_category_up_is_a_no_op() {
        let repo = sample_repo();

        let moved = move_category(&CategoryId::new("a").unwrap(), MoveDirection::Up, &repo);

        assert_eq!(moved, Ok(false));
        assert_eq!(repo.write_calls(), 0);
    }

    #[test]
    fn added_category_goes_last() {
        let repo = sample_repo();
        let payload = AddCategoryFormPayload {
            name: CategoryName::new("D").unwrap(),
        };

        let created = add_category(payload, &repo).unwrap();

        assert_eq!(created.sequence, 4);
        assert_eq!(names(&repo), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn deleting_a_category_keeps_its_projects() {
        let repo = sample_repo().with_projects(vec![Project {
            id: ProjectId::new("p").unwrap(),
            title: ProjectTitle::new("Site").unwrap(),
            description: String::new(),
            category_id: Some(CategoryId::new("b").unwrap()),
            technologies: vec![],
            media: vec![],
            sequence: Some(Sequence::new(1)),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }]);

        delete_category(&CategoryId::new("b").unwrap(), &repo).unwrap();

        assert_eq!(names(&repo), vec!["A", "C"]);
        let projects = repo.projects();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].category_id.as_ref().unwrap().as_str(), "b");
    }

    #[test]
    fn unknown_category_is_not_found() {
        let repo = sample_repo();
        let payload = RenameCategoryFormPayload {
            name: CategoryName::new("X").unwrap(),
        };

        assert_eq!(
            rename_category(&CategoryId::new("zzz").unwrap(), payload, &repo),
            Err(ServiceError::NotFound)
        );
    }

    #[test]
    fn unavailable_store_is_reported() {
        let repo = sample_repo();
        repo.set_unavailable(true);

        assert!(matches!(
            show_categories(&repo),
            Err(ServiceError::StoreUnavailable(_))
        ));
    }
}
