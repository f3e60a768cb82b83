//! Raw HTML forms and their validated payloads.

use serde::Deserialize;

use crate::domain::types::TypeConstraintError;
use crate::ordering::MoveDirection;

pub mod auth;
pub mod categories;
pub mod messages;
pub mod projects;
pub mod reviews;

/// Up/down buttons on the ordered admin lists.
#[derive(Deserialize)]
pub struct MoveForm {
    pub direction: String,
}

impl TryFrom<MoveForm> for MoveDirection {
    type Error = TypeConstraintError;

    fn try_from(value: MoveForm) -> Result<Self, Self::Error> {
        MoveDirection::try_from(value.direction.as_str())
    }
}

/// Treats blank optional inputs as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
