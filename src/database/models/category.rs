use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored category as exposed over the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub status: bool,
}

/// The mutable fields of a category. Used for both inserts and updates;
/// the id always comes from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    pub status: bool,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>, status: bool) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }

    pub fn with_id(self, id: i32) -> Category {
        Category {
            id,
            name: self.name,
            status: self.status,
        }
    }
}

/// Row shape of the `categories` table
#[derive(Debug, FromRow)]
pub struct CategoryRow {
    pub category_id: i32,
    pub category_name: String,
    pub category_status: bool,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.category_id,
            name: row.category_name,
            status: row.category_status,
        }
    }
}
