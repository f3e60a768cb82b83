use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::NewCategory;
use crate::domain::types::{CategoryName, TypeConstraintError};

#[derive(Deserialize, Validate)]
pub struct AddCategoryForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddCategoryFormPayload {
    pub name: CategoryName,
}

impl AddCategoryFormPayload {
    pub fn into_new_category(self) -> NewCategory {
        let now = Utc::now().naive_utc();
        NewCategory {
            name: self.name,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct RenameCategoryForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenameCategoryFormPayload {
    pub name: CategoryName,
}

#[derive(Debug, Error)]
pub enum CategoryFormError {
    #[error("Category form validation failed: {0}")]
    Validation(String),
    #[error("Category form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<AddCategoryForm> for AddCategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: AddCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: CategoryName::new(value.name)?,
        })
    }
}

impl TryFrom<RenameCategoryForm> for RenameCategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: RenameCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: CategoryName::new(value.name)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_category_trims_name() {
        let form = AddCategoryForm {
            name: "  Web Development ".to_string(),
        };

        let payload: AddCategoryFormPayload = form.try_into().unwrap();
        assert_eq!(payload.name.as_str(), "Web Development");
    }

    #[test]
    fn whitespace_only_name_is_rejected() {
        let form = AddCategoryForm {
            name: "   ".to_string(),
        };

        let payload: Result<AddCategoryFormPayload, _> = form.try_into();
        assert!(matches!(payload, Err(CategoryFormError::TypeConstraint(_))));
    }

    #[test]
    fn empty_rename_is_rejected() {
        let form = RenameCategoryForm {
            name: String::new(),
        };

        let payload: Result<RenameCategoryFormPayload, _> = form.try_into();
        assert!(matches!(payload, Err(CategoryFormError::Validation(_))));
    }
}
