//! Catalog item models and their archive snapshots.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use carta_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// An item row from the `items` table.
///
/// `category_id = None` means the item sits at the brand root.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Item {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub promo_price: Option<Decimal>,
    pub brand_id: DbId,
    pub category_id: Option<DbId>,
    pub visible: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for creating a new item under a category or at the brand root.
#[derive(Debug, Clone)]
pub struct CreateItem {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub promo_price: Option<Decimal>,
    pub category_id: Option<DbId>,
    pub visible: bool,
}

// ---------------------------------------------------------------------------
// Update DTO
// ---------------------------------------------------------------------------

/// Input for updating an existing item. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub promo_price: Option<Decimal>,
    pub visible: Option<bool>,
}

// ---------------------------------------------------------------------------
// Archive
// ---------------------------------------------------------------------------

/// A snapshot row from the `item_archive` table.
///
/// `group_path` is the containing category's name path at archival time
/// (brand segment included), or `"/"` when the item was at the brand root.
/// `created_at`/`updated_at` carry the archived item's original
/// timestamps, not the archive row's.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ItemArchive {
    pub id: DbId,
    pub original_item_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub promo_price: Option<Decimal>,
    pub brand_id: DbId,
    pub category_id: Option<DbId>,
    pub group_path: String,
    pub visible: bool,
    pub archived_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for inserting an item archive snapshot.
#[derive(Debug, Clone)]
pub struct CreateItemArchive {
    pub original_item_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub promo_price: Option<Decimal>,
    pub brand_id: DbId,
    pub category_id: Option<DbId>,
    pub group_path: String,
    pub visible: bool,
    pub archived_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
