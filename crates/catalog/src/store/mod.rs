//! Storage abstraction for the catalog services.
//!
//! The traits list exactly the lookups the services need; everything else
//! about persistence (pooling, transactions, isolation) belongs to the
//! embedding application. Postgres unique-index violations must be
//! surfaced as [`carta_core::error::CoreError::AlreadyExists`] so callers
//! never see a raw driver error for a name collision.

use async_trait::async_trait;

use carta_core::error::CoreResult;
use carta_core::types::{DbId, Page, Timestamp};
use carta_db::models::category::{
    Category, CategoryArchive, CreateCategory, CreateCategoryArchive,
};
use carta_db::models::item::{CreateItem, CreateItemArchive, Item, ItemArchive};

mod memory;
mod postgres;

pub use memory::MemoryCatalogStore;
pub use postgres::PgCatalogStore;

/// Persistence of live category tree nodes.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Insert a node with precomputed path/level, returning it with its id.
    async fn insert_category(&self, input: &CreateCategory) -> CoreResult<Category>;

    /// Find a node by id, in any brand. Callers enforce tenant scope.
    async fn find_category(&self, id: DbId) -> CoreResult<Option<Category>>;

    /// Find a node by `(brand, name, parent)`; `None` parent means a root.
    async fn find_category_by_name(
        &self,
        brand_id: DbId,
        name: &str,
        parent_id: Option<DbId>,
    ) -> CoreResult<Option<Category>>;

    /// Direct children of a parent (brand roots when `None`), name order.
    async fn list_children(
        &self,
        brand_id: DbId,
        parent_id: Option<DbId>,
    ) -> CoreResult<Vec<Category>>;

    /// Every node of a brand, parents before children.
    async fn list_categories(&self, brand_id: DbId) -> CoreResult<Vec<Category>>;

    /// Every descendant of the node owning the id-path prefix, parents
    /// before children.
    async fn list_subtree(&self, brand_id: DbId, path_prefix: &str) -> CoreResult<Vec<Category>>;

    /// Persist a node's mutable fields (name, parent, path, level, brand).
    async fn update_category(&self, category: &Category) -> CoreResult<Category>;

    /// Remove a node. Returns `false` when it was already gone.
    async fn delete_category(&self, id: DbId) -> CoreResult<bool>;
}

/// Persistence of archived category snapshots.
#[async_trait]
pub trait CategoryArchiveStore: Send + Sync {
    async fn insert_category_archive(
        &self,
        input: &CreateCategoryArchive,
    ) -> CoreResult<CategoryArchive>;

    async fn find_category_archive(&self, id: DbId) -> CoreResult<Option<CategoryArchive>>;

    /// Exact name-path lookup; the newest snapshot wins when the same
    /// position was archived more than once.
    async fn find_category_archive_by_path(
        &self,
        brand_id: DbId,
        path: &str,
    ) -> CoreResult<Option<CategoryArchive>>;

    /// Archive rows of a brand, newest first.
    async fn list_category_archive(
        &self,
        brand_id: DbId,
        page: Page,
    ) -> CoreResult<Vec<CategoryArchive>>;

    async fn delete_category_archive(&self, id: DbId) -> CoreResult<bool>;

    /// Remove rows archived strictly before the cutoff; returns the count.
    async fn purge_category_archive(&self, cutoff: Timestamp) -> CoreResult<u64>;

    /// Count rows archived strictly before the cutoff.
    async fn count_category_archive_older_than(&self, cutoff: Timestamp) -> CoreResult<i64>;
}

/// Persistence of live catalog items.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn insert_item(&self, brand_id: DbId, input: &CreateItem) -> CoreResult<Item>;

    /// Find an item by id, in any brand. Callers enforce tenant scope.
    async fn find_item(&self, id: DbId) -> CoreResult<Option<Item>>;

    /// Items of a brand in a category (brand root when `None`), name
    /// order, optionally visible ones only.
    async fn list_items(
        &self,
        brand_id: DbId,
        category_id: Option<DbId>,
        visible_only: bool,
    ) -> CoreResult<Vec<Item>>;

    async fn update_item(&self, item: &Item) -> CoreResult<Item>;

    async fn delete_item(&self, id: DbId) -> CoreResult<bool>;
}

/// Persistence of archived item snapshots.
#[async_trait]
pub trait ItemArchiveStore: Send + Sync {
    async fn insert_item_archive(&self, input: &CreateItemArchive) -> CoreResult<ItemArchive>;

    async fn find_item_archive(&self, id: DbId) -> CoreResult<Option<ItemArchive>>;

    /// Archive rows of a brand, newest first.
    async fn list_item_archive(&self, brand_id: DbId, page: Page) -> CoreResult<Vec<ItemArchive>>;

    async fn delete_item_archive(&self, id: DbId) -> CoreResult<bool>;

    /// Remove rows archived strictly before the cutoff; returns the count.
    async fn purge_item_archive(&self, cutoff: Timestamp) -> CoreResult<u64>;
}

/// Umbrella trait the services are generic over.
pub trait CatalogStore:
    CategoryStore + CategoryArchiveStore + ItemStore + ItemArchiveStore
{
}

impl<T> CatalogStore for T where
    T: CategoryStore + CategoryArchiveStore + ItemStore + ItemArchiveStore
{
}
