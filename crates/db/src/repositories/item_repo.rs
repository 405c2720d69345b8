//! Repository for the `items` table.

use sqlx::PgPool;

use carta_core::types::DbId;

use crate::models::item::{CreateItem, Item};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, description, price, promo_price, brand_id, category_id, visible, \
     created_at, updated_at";

/// Provides CRUD operations for catalog items.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a new item for a brand, returning the created row.
    pub async fn create(
        pool: &PgPool,
        brand_id: DbId,
        input: &CreateItem,
    ) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items
                (name, description, price, promo_price, brand_id, category_id, visible)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.promo_price)
            .bind(brand_id)
            .bind(input.category_id)
            .bind(input.visible)
            .fetch_one(pool)
            .await
    }

    /// Find an item by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List items of a brand in a category (the brand root when
    /// `category_id` is `None`), optionally restricted to visible ones.
    pub async fn list_by_category(
        pool: &PgPool,
        brand_id: DbId,
        category_id: Option<DbId>,
        visible_only: bool,
    ) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM items
             WHERE brand_id = $1
               AND category_id IS NOT DISTINCT FROM $2
               AND ($3 = false OR visible = true)
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(brand_id)
            .bind(category_id)
            .bind(visible_only)
            .fetch_all(pool)
            .await
    }

    /// Persist an item's mutable fields, returning the updated row.
    pub async fn update(pool: &PgPool, item: &Item) -> Result<Item, sqlx::Error> {
        let query = format!(
            "UPDATE items SET
                name = $2,
                description = $3,
                price = $4,
                promo_price = $5,
                brand_id = $6,
                category_id = $7,
                visible = $8,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(item.id)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.price)
            .bind(item.promo_price)
            .bind(item.brand_id)
            .bind(item.category_id)
            .bind(item.visible)
            .fetch_one(pool)
            .await
    }

    /// Delete an item by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
