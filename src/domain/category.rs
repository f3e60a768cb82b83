use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CategoryName, Sequence};

/// Admin-managed grouping for projects, ordered by `sequence` ascending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub sequence: Sequence,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`Category`].
///
/// The sequence is assigned by the ordered collection, not by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewCategory {
    /// Materialises the category once an identifier and sequence are known.
    pub fn into_category(self, id: CategoryId, sequence: Sequence) -> Category {
        Category {
            id,
            name: self.name,
            sequence,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
