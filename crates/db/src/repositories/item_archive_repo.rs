//! Repository for the `item_archive` table.

use sqlx::PgPool;

use carta_core::types::{DbId, Timestamp};

use crate::models::item::{CreateItemArchive, ItemArchive};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, original_item_id, name, description, price, promo_price, brand_id, category_id, \
     group_path, visible, archived_at, created_at, updated_at";

/// Provides operations on archived item snapshots.
pub struct ItemArchiveRepo;

impl ItemArchiveRepo {
    /// Insert an archive snapshot, returning the created row.
    ///
    /// `created_at`/`updated_at` are written from the snapshot so the
    /// archived item's original timestamps survive the round trip.
    pub async fn create(
        pool: &PgPool,
        input: &CreateItemArchive,
    ) -> Result<ItemArchive, sqlx::Error> {
        let query = format!(
            "INSERT INTO item_archive
                (original_item_id, name, description, price, promo_price, brand_id,
                 category_id, group_path, visible, archived_at, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ItemArchive>(&query)
            .bind(input.original_item_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.promo_price)
            .bind(input.brand_id)
            .bind(input.category_id)
            .bind(&input.group_path)
            .bind(input.visible)
            .bind(input.archived_at)
            .bind(input.created_at)
            .bind(input.updated_at)
            .fetch_one(pool)
            .await
    }

    /// Find an archive row by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ItemArchive>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM item_archive WHERE id = $1");
        sqlx::query_as::<_, ItemArchive>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List archive rows for a brand, newest first, with a limit/offset
    /// window.
    pub async fn list_by_brand(
        pool: &PgPool,
        brand_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ItemArchive>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM item_archive
             WHERE brand_id = $1
             ORDER BY archived_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ItemArchive>(&query)
            .bind(brand_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Delete an archive row by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM item_archive WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every archive row archived strictly before the cutoff.
    /// Returns the number of rows removed.
    pub async fn delete_older_than(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM item_archive WHERE archived_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
