//! Repository for the `category_archive` table.

use sqlx::PgPool;

use carta_core::types::{DbId, Timestamp};

use crate::models::category::{CategoryArchive, CreateCategoryArchive};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, original_category_id, brand_id, parent_id, name, path, level, \
     archived_at, created_at, updated_at";

/// Provides operations on archived category snapshots.
pub struct CategoryArchiveRepo;

impl CategoryArchiveRepo {
    /// Insert an archive snapshot, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCategoryArchive,
    ) -> Result<CategoryArchive, sqlx::Error> {
        let query = format!(
            "INSERT INTO category_archive
                (original_category_id, brand_id, parent_id, name, path, level, archived_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CategoryArchive>(&query)
            .bind(input.original_category_id)
            .bind(input.brand_id)
            .bind(input.parent_id)
            .bind(&input.name)
            .bind(&input.path)
            .bind(input.level)
            .bind(input.archived_at)
            .fetch_one(pool)
            .await
    }

    /// Find an archive row by its primary key.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CategoryArchive>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM category_archive WHERE id = $1");
        sqlx::query_as::<_, CategoryArchive>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an archive row by its exact name path within a brand.
    ///
    /// The same position can be archived more than once (archive, recreate,
    /// archive again); the newest snapshot wins.
    pub async fn find_by_path(
        pool: &PgPool,
        brand_id: DbId,
        path: &str,
    ) -> Result<Option<CategoryArchive>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM category_archive
             WHERE brand_id = $1 AND path = $2
             ORDER BY archived_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, CategoryArchive>(&query)
            .bind(brand_id)
            .bind(path)
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
    ) -> Result<Vec<CategoryArchive>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM category_archive
             WHERE brand_id = $1
             ORDER BY archived_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, CategoryArchive>(&query)
            .bind(brand_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Delete an archive row by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM category_archive WHERE id = $1")
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
        let result = sqlx::query("DELETE FROM category_archive WHERE archived_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Count archive rows archived strictly before the cutoff.
    pub async fn count_older_than(pool: &PgPool, cutoff: Timestamp) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM category_archive WHERE archived_at < $1")
                .bind(cutoff)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }
}
