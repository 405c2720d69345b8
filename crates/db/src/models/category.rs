//! Category models: live tree nodes and their archive snapshots.

use serde::Serialize;
use sqlx::FromRow;

use carta_core::types::{Brand, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A category row from the `categories` table.
///
/// `path` is the materialized ancestor-id chain with a trailing separator
/// (`"/"` for roots); `level` is 1 for roots and `parent.level + 1` below.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub brand_id: DbId,
    pub parent_id: Option<DbId>,
    pub path: String,
    pub level: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for inserting a category. The service derives `path` and `level`
/// from the resolved parent before building this.
#[derive(Debug, Clone)]
pub struct CreateCategory {
    pub name: String,
    pub brand_id: DbId,
    pub parent_id: Option<DbId>,
    pub path: String,
    pub level: i32,
}

// ---------------------------------------------------------------------------
// Update DTO
// ---------------------------------------------------------------------------

/// Input for the composite category update.
///
/// `None` leaves a field unchanged. For `parent`, `Some(None)` moves the
/// node to the brand root and `Some(Some(id))` under the given category.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub parent: Option<Option<DbId>>,
    pub brand: Option<Brand>,
}

// ---------------------------------------------------------------------------
// Tree response
// ---------------------------------------------------------------------------

/// A category with its recursively attached children.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTree {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<CategoryTree>,
}

// ---------------------------------------------------------------------------
// Archive
// ---------------------------------------------------------------------------

/// A snapshot row from the `category_archive` table.
///
/// `path` here is the *name path* at archival time, brand segment included
/// (`"/Brand/Drinks/Soda/"`); the exact string is the restore key.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CategoryArchive {
    pub id: DbId,
    pub original_category_id: DbId,
    pub brand_id: DbId,
    pub parent_id: Option<DbId>,
    pub name: String,
    pub path: String,
    pub level: i32,
    pub archived_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for inserting a category archive snapshot.
#[derive(Debug, Clone)]
pub struct CreateCategoryArchive {
    pub original_category_id: DbId,
    pub brand_id: DbId,
    pub parent_id: Option<DbId>,
    pub name: String,
    pub path: String,
    pub level: i32,
    pub archived_at: Timestamp,
}
