//! Repository for the `categories` table.

use sqlx::PgPool;

use carta_core::types::DbId;

use crate::models::category::{Category, CreateCategory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, brand_id, parent_id, path, level, created_at, updated_at";

/// Provides CRUD operations for category tree nodes.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, brand_id, parent_id, path, level)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(input.brand_id)
            .bind(input.parent_id)
            .bind(&input.path)
            .bind(input.level)
            .fetch_one(pool)
            .await
    }

    /// Find a category by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a category by its name under a given parent within a brand.
    ///
    /// `IS NOT DISTINCT FROM` makes the NULL parent (brand root) case use
    /// the same query as the nested one.
    pub async fn find_by_name(
        pool: &PgPool,
        brand_id: DbId,
        name: &str,
        parent_id: Option<DbId>,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE brand_id = $1 AND name = $2 AND parent_id IS NOT DISTINCT FROM $3"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(brand_id)
            .bind(name)
            .bind(parent_id)
            .fetch_optional(pool)
            .await
    }

    /// List direct children of a parent (brand roots when `parent_id` is
    /// `None`), ordered by name ascending.
    pub async fn list_children(
        pool: &PgPool,
        brand_id: DbId,
        parent_id: Option<DbId>,
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE brand_id = $1 AND parent_id IS NOT DISTINCT FROM $2
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(brand_id)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// List every category of a brand, parents before children.
    pub async fn list_by_brand(pool: &PgPool, brand_id: DbId) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE brand_id = $1
             ORDER BY level ASC, name ASC"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(brand_id)
            .fetch_all(pool)
            .await
    }

    /// List every descendant of a node via its id-path prefix, parents
    /// before children. The prefix is `node.path + node.id + "/"`.
    pub async fn list_subtree(
        pool: &PgPool,
        brand_id: DbId,
        path_prefix: &str,
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE brand_id = $1 AND path LIKE $2 || '%'
             ORDER BY level ASC, name ASC"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(brand_id)
            .bind(path_prefix)
            .fetch_all(pool)
            .await
    }

    /// Persist a category's mutable fields (name, parent, path, level,
    /// brand), returning the updated row.
    pub async fn update(pool: &PgPool, category: &Category) -> Result<Category, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                name = $2,
                brand_id = $3,
                parent_id = $4,
                path = $5,
                level = $6,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(category.id)
            .bind(&category.name)
            .bind(category.brand_id)
            .bind(category.parent_id)
            .bind(&category.path)
            .bind(category.level)
            .fetch_one(pool)
            .await
    }

    /// Delete a category by ID. Returns `true` if a row was removed.
    ///
    /// Children reference their parent, so subtrees must be deleted
    /// children-first; the service layer owns that ordering.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
