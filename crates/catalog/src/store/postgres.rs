//! Postgres-backed [`crate::store::CatalogStore`] over the `carta-db`
//! repositories.

use async_trait::async_trait;
use sqlx::PgPool;

use carta_core::error::{CoreError, CoreResult};
use carta_core::types::{DbId, Page, Timestamp};
use carta_db::models::category::{
    Category, CategoryArchive, CreateCategory, CreateCategoryArchive,
};
use carta_db::models::item::{CreateItem, CreateItemArchive, Item, ItemArchive};
use carta_db::repositories::{CategoryArchiveRepo, CategoryRepo, ItemArchiveRepo, ItemRepo};

use super::{CategoryArchiveStore, CategoryStore, ItemArchiveStore, ItemStore};

/// Store adapter over a Postgres pool.
///
/// The pool is cheap to clone; embedders usually build one adapter per
/// application and share it.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Classify a sqlx error into a domain error.
///
/// Unique-index violations (constraint names starting with `uq_`) become
/// `AlreadyExists`; everything else is logged and sanitized to `Internal`.
fn classify_sqlx_error(err: sqlx::Error) -> CoreError {
    match &err {
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return CoreError::AlreadyExists(format!(
                        "Duplicate value violates unique constraint: {constraint}"
                    ));
                }
            }
            tracing::error!(error = %db_err, "Database error");
            CoreError::Internal("A database error occurred".to_string())
        }
        other => {
            tracing::error!(error = %other, "Database error");
            CoreError::Internal("A database error occurred".to_string())
        }
    }
}

#[async_trait]
impl CategoryStore for PgCatalogStore {
    async fn insert_category(&self, input: &CreateCategory) -> CoreResult<Category> {
        CategoryRepo::create(&self.pool, input)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn find_category(&self, id: DbId) -> CoreResult<Option<Category>> {
        CategoryRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn find_category_by_name(
        &self,
        brand_id: DbId,
        name: &str,
        parent_id: Option<DbId>,
    ) -> CoreResult<Option<Category>> {
        CategoryRepo::find_by_name(&self.pool, brand_id, name, parent_id)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn list_children(
        &self,
        brand_id: DbId,
        parent_id: Option<DbId>,
    ) -> CoreResult<Vec<Category>> {
        CategoryRepo::list_children(&self.pool, brand_id, parent_id)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn list_categories(&self, brand_id: DbId) -> CoreResult<Vec<Category>> {
        CategoryRepo::list_by_brand(&self.pool, brand_id)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn list_subtree(&self, brand_id: DbId, path_prefix: &str) -> CoreResult<Vec<Category>> {
        CategoryRepo::list_subtree(&self.pool, brand_id, path_prefix)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn update_category(&self, category: &Category) -> CoreResult<Category> {
        CategoryRepo::update(&self.pool, category)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn delete_category(&self, id: DbId) -> CoreResult<bool> {
        CategoryRepo::delete(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)
    }
}

#[async_trait]
impl CategoryArchiveStore for PgCatalogStore {
    async fn insert_category_archive(
        &self,
        input: &CreateCategoryArchive,
    ) -> CoreResult<CategoryArchive> {
        CategoryArchiveRepo::create(&self.pool, input)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn find_category_archive(&self, id: DbId) -> CoreResult<Option<CategoryArchive>> {
        CategoryArchiveRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn find_category_archive_by_path(
        &self,
        brand_id: DbId,
        path: &str,
    ) -> CoreResult<Option<CategoryArchive>> {
        CategoryArchiveRepo::find_by_path(&self.pool, brand_id, path)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn list_category_archive(
        &self,
        brand_id: DbId,
        page: Page,
    ) -> CoreResult<Vec<CategoryArchive>> {
        CategoryArchiveRepo::list_by_brand(&self.pool, brand_id, page.limit, page.offset)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn delete_category_archive(&self, id: DbId) -> CoreResult<bool> {
        CategoryArchiveRepo::delete(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn purge_category_archive(&self, cutoff: Timestamp) -> CoreResult<u64> {
        CategoryArchiveRepo::delete_older_than(&self.pool, cutoff)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn count_category_archive_older_than(&self, cutoff: Timestamp) -> CoreResult<i64> {
        CategoryArchiveRepo::count_older_than(&self.pool, cutoff)
            .await
            .map_err(classify_sqlx_error)
    }
}

#[async_trait]
impl ItemStore for PgCatalogStore {
    async fn insert_item(&self, brand_id: DbId, input: &CreateItem) -> CoreResult<Item> {
        ItemRepo::create(&self.pool, brand_id, input)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn find_item(&self, id: DbId) -> CoreResult<Option<Item>> {
        ItemRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn list_items(
        &self,
        brand_id: DbId,
        category_id: Option<DbId>,
        visible_only: bool,
    ) -> CoreResult<Vec<Item>> {
        ItemRepo::list_by_category(&self.pool, brand_id, category_id, visible_only)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn update_item(&self, item: &Item) -> CoreResult<Item> {
        ItemRepo::update(&self.pool, item)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn delete_item(&self, id: DbId) -> CoreResult<bool> {
        ItemRepo::delete(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)
    }
}

#[async_trait]
impl ItemArchiveStore for PgCatalogStore {
    async fn insert_item_archive(&self, input: &CreateItemArchive) -> CoreResult<ItemArchive> {
        ItemArchiveRepo::create(&self.pool, input)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn find_item_archive(&self, id: DbId) -> CoreResult<Option<ItemArchive>> {
        ItemArchiveRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn list_item_archive(&self, brand_id: DbId, page: Page) -> CoreResult<Vec<ItemArchive>> {
        ItemArchiveRepo::list_by_brand(&self.pool, brand_id, page.limit, page.offset)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn delete_item_archive(&self, id: DbId) -> CoreResult<bool> {
        ItemArchiveRepo::delete(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn purge_item_archive(&self, cutoff: Timestamp) -> CoreResult<u64> {
        ItemArchiveRepo::delete_older_than(&self.pool, cutoff)
            .await
            .map_err(classify_sqlx_error)
    }
}
