//! In-memory [`crate::store::CatalogStore`] used by the test suites and
//! by embedders that do not need Postgres.
//!
//! Mirrors the Postgres schema's observable behavior: BIGSERIAL-style id
//! sequences, `(brand, name, parent)` uniqueness surfaced as
//! `AlreadyExists`, and the same result ordering as the repository
//! queries.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use carta_core::error::{CoreError, CoreResult};
use carta_core::types::{DbId, Page, Timestamp};
use carta_db::models::category::{
    Category, CategoryArchive, CreateCategory, CreateCategoryArchive,
};
use carta_db::models::item::{CreateItem, CreateItemArchive, Item, ItemArchive};

use super::{CategoryArchiveStore, CategoryStore, ItemArchiveStore, ItemStore};

#[derive(Default)]
struct State {
    categories: BTreeMap<DbId, Category>,
    category_archive: BTreeMap<DbId, CategoryArchive>,
    items: BTreeMap<DbId, Item>,
    item_archive: BTreeMap<DbId, ItemArchive>,
    category_seq: DbId,
    category_archive_seq: DbId,
    item_seq: DbId,
    item_archive_seq: DbId,
}

/// In-process store with BTreeMap tables behind an async RwLock.
#[derive(Default)]
pub struct MemoryCatalogStore {
    state: RwLock<State>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next(seq: &mut DbId) -> DbId {
    *seq += 1;
    *seq
}

fn duplicate_category_error(parent_id: Option<DbId>) -> CoreError {
    let constraint = if parent_id.is_some() {
        "uq_categories_brand_name_parent"
    } else {
        "uq_categories_brand_name_root"
    };
    CoreError::AlreadyExists(format!(
        "Duplicate value violates unique constraint: {constraint}"
    ))
}

fn page_window<T>(mut rows: Vec<T>, page: Page) -> Vec<T> {
    let offset = page.offset.max(0) as usize;
    let limit = page.limit.max(0) as usize;
    if offset >= rows.len() {
        return Vec::new();
    }
    rows.drain(..offset);
    rows.truncate(limit);
    rows
}

#[async_trait]
impl CategoryStore for MemoryCatalogStore {
    async fn insert_category(&self, input: &CreateCategory) -> CoreResult<Category> {
        let mut state = self.state.write().await;
        let collision = state.categories.values().any(|c| {
            c.brand_id == input.brand_id && c.name == input.name && c.parent_id == input.parent_id
        });
        if collision {
            return Err(duplicate_category_error(input.parent_id));
        }
        let now = Utc::now();
        let id = next(&mut state.category_seq);
        let category = Category {
            id,
            name: input.name.clone(),
            brand_id: input.brand_id,
            parent_id: input.parent_id,
            path: input.path.clone(),
            level: input.level,
            created_at: now,
            updated_at: now,
        };
        state.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn find_category(&self, id: DbId) -> CoreResult<Option<Category>> {
        let state = self.state.read().await;
        Ok(state.categories.get(&id).cloned())
    }

    async fn find_category_by_name(
        &self,
        brand_id: DbId,
        name: &str,
        parent_id: Option<DbId>,
    ) -> CoreResult<Option<Category>> {
        let state = self.state.read().await;
        Ok(state
            .categories
            .values()
            .find(|c| c.brand_id == brand_id && c.name == name && c.parent_id == parent_id)
            .cloned())
    }

    async fn list_children(
        &self,
        brand_id: DbId,
        parent_id: Option<DbId>,
    ) -> CoreResult<Vec<Category>> {
        let state = self.state.read().await;
        let mut rows: Vec<Category> = state
            .categories
            .values()
            .filter(|c| c.brand_id == brand_id && c.parent_id == parent_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn list_categories(&self, brand_id: DbId) -> CoreResult<Vec<Category>> {
        let state = self.state.read().await;
        let mut rows: Vec<Category> = state
            .categories
            .values()
            .filter(|c| c.brand_id == brand_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.name.cmp(&b.name)));
        Ok(rows)
    }

    async fn list_subtree(&self, brand_id: DbId, path_prefix: &str) -> CoreResult<Vec<Category>> {
        let state = self.state.read().await;
        let mut rows: Vec<Category> = state
            .categories
            .values()
            .filter(|c| c.brand_id == brand_id && c.path.starts_with(path_prefix))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.name.cmp(&b.name)));
        Ok(rows)
    }

    async fn update_category(&self, category: &Category) -> CoreResult<Category> {
        let mut state = self.state.write().await;
        if !state.categories.contains_key(&category.id) {
            return Err(CoreError::not_found("Category", category.id));
        }
        let collision = state.categories.values().any(|c| {
            c.id != category.id
                && c.brand_id == category.brand_id
                && c.name == category.name
                && c.parent_id == category.parent_id
        });
        if collision {
            return Err(duplicate_category_error(category.parent_id));
        }
        let mut updated = category.clone();
        updated.updated_at = Utc::now();
        state.categories.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn delete_category(&self, id: DbId) -> CoreResult<bool> {
        let mut state = self.state.write().await;
        Ok(state.categories.remove(&id).is_some())
    }
}

#[async_trait]
impl CategoryArchiveStore for MemoryCatalogStore {
    async fn insert_category_archive(
        &self,
        input: &CreateCategoryArchive,
    ) -> CoreResult<CategoryArchive> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let id = next(&mut state.category_archive_seq);
        let row = CategoryArchive {
            id,
            original_category_id: input.original_category_id,
            brand_id: input.brand_id,
            parent_id: input.parent_id,
            name: input.name.clone(),
            path: input.path.clone(),
            level: input.level,
            archived_at: input.archived_at,
            created_at: now,
            updated_at: now,
        };
        state.category_archive.insert(id, row.clone());
        Ok(row)
    }

    async fn find_category_archive(&self, id: DbId) -> CoreResult<Option<CategoryArchive>> {
        let state = self.state.read().await;
        Ok(state.category_archive.get(&id).cloned())
    }

    async fn find_category_archive_by_path(
        &self,
        brand_id: DbId,
        path: &str,
    ) -> CoreResult<Option<CategoryArchive>> {
        let state = self.state.read().await;
        Ok(state
            .category_archive
            .values()
            .filter(|a| a.brand_id == brand_id && a.path == path)
            .max_by_key(|a| (a.archived_at, a.id))
            .cloned())
    }

    async fn list_category_archive(
        &self,
        brand_id: DbId,
        page: Page,
    ) -> CoreResult<Vec<CategoryArchive>> {
        let state = self.state.read().await;
        let mut rows: Vec<CategoryArchive> = state
            .category_archive
            .values()
            .filter(|a| a.brand_id == brand_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.archived_at, b.id).cmp(&(a.archived_at, a.id)));
        Ok(page_window(rows, page))
    }

    async fn delete_category_archive(&self, id: DbId) -> CoreResult<bool> {
        let mut state = self.state.write().await;
        Ok(state.category_archive.remove(&id).is_some())
    }

    async fn purge_category_archive(&self, cutoff: Timestamp) -> CoreResult<u64> {
        let mut state = self.state.write().await;
        let before = state.category_archive.len();
        state.category_archive.retain(|_, a| a.archived_at >= cutoff);
        Ok((before - state.category_archive.len()) as u64)
    }

    async fn count_category_archive_older_than(&self, cutoff: Timestamp) -> CoreResult<i64> {
        let state = self.state.read().await;
        Ok(state
            .category_archive
            .values()
            .filter(|a| a.archived_at < cutoff)
            .count() as i64)
    }
}

#[async_trait]
impl ItemStore for MemoryCatalogStore {
    async fn insert_item(&self, brand_id: DbId, input: &CreateItem) -> CoreResult<Item> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let id = next(&mut state.item_seq);
        let item = Item {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            promo_price: input.promo_price,
            brand_id,
            category_id: input.category_id,
            visible: input.visible,
            created_at: now,
            updated_at: now,
        };
        state.items.insert(id, item.clone());
        Ok(item)
    }

    async fn find_item(&self, id: DbId) -> CoreResult<Option<Item>> {
        let state = self.state.read().await;
        Ok(state.items.get(&id).cloned())
    }

    async fn list_items(
        &self,
        brand_id: DbId,
        category_id: Option<DbId>,
        visible_only: bool,
    ) -> CoreResult<Vec<Item>> {
        let state = self.state.read().await;
        let mut rows: Vec<Item> = state
            .items
            .values()
            .filter(|i| {
                i.brand_id == brand_id
                    && i.category_id == category_id
                    && (!visible_only || i.visible)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn update_item(&self, item: &Item) -> CoreResult<Item> {
        let mut state = self.state.write().await;
        if !state.items.contains_key(&item.id) {
            return Err(CoreError::not_found("Item", item.id));
        }
        let mut updated = item.clone();
        updated.updated_at = Utc::now();
        state.items.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn delete_item(&self, id: DbId) -> CoreResult<bool> {
        let mut state = self.state.write().await;
        Ok(state.items.remove(&id).is_some())
    }
}

#[async_trait]
impl ItemArchiveStore for MemoryCatalogStore {
    async fn insert_item_archive(&self, input: &CreateItemArchive) -> CoreResult<ItemArchive> {
        let mut state = self.state.write().await;
        let id = next(&mut state.item_archive_seq);
        let row = ItemArchive {
            id,
            original_item_id: input.original_item_id,
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            promo_price: input.promo_price,
            brand_id: input.brand_id,
            category_id: input.category_id,
            group_path: input.group_path.clone(),
            visible: input.visible,
            archived_at: input.archived_at,
            created_at: input.created_at,
            updated_at: input.updated_at,
        };
        state.item_archive.insert(id, row.clone());
        Ok(row)
    }

    async fn find_item_archive(&self, id: DbId) -> CoreResult<Option<ItemArchive>> {
        let state = self.state.read().await;
        Ok(state.item_archive.get(&id).cloned())
    }

    async fn list_item_archive(&self, brand_id: DbId, page: Page) -> CoreResult<Vec<ItemArchive>> {
        let state = self.state.read().await;
        let mut rows: Vec<ItemArchive> = state
            .item_archive
            .values()
            .filter(|a| a.brand_id == brand_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.archived_at, b.id).cmp(&(a.archived_at, a.id)));
        Ok(page_window(rows, page))
    }

    async fn delete_item_archive(&self, id: DbId) -> CoreResult<bool> {
        let mut state = self.state.write().await;
        Ok(state.item_archive.remove(&id).is_some())
    }

    async fn purge_item_archive(&self, cutoff: Timestamp) -> CoreResult<u64> {
        let mut state = self.state.write().await;
        let before = state.item_archive.len();
        state.item_archive.retain(|_, a| a.archived_at >= cutoff);
        Ok((before - state.item_archive.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Duration;

    fn new_category(brand_id: DbId, name: &str, parent_id: Option<DbId>) -> CreateCategory {
        CreateCategory {
            name: name.to_string(),
            brand_id,
            parent_id,
            path: "/".to_string(),
            level: 1,
        }
    }

    fn new_archive_row(brand_id: DbId, path: &str, archived_at: Timestamp) -> CreateCategoryArchive {
        CreateCategoryArchive {
            original_category_id: 1,
            brand_id,
            parent_id: None,
            name: "Old".to_string(),
            path: path.to_string(),
            level: 1,
            archived_at,
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = MemoryCatalogStore::new();

        let a = store.insert_category(&new_category(1, "A", None)).await.unwrap();
        let b = store.insert_category(&new_category(1, "B", None)).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn duplicate_name_in_same_location_is_rejected() {
        let store = MemoryCatalogStore::new();
        store.insert_category(&new_category(1, "A", None)).await.unwrap();

        let err = store
            .insert_category(&new_category(1, "A", None))
            .await
            .unwrap_err();

        assert_matches!(err, CoreError::AlreadyExists(_));
    }

    #[tokio::test]
    async fn same_name_is_allowed_in_other_brand_or_location() {
        let store = MemoryCatalogStore::new();
        let root = store.insert_category(&new_category(1, "A", None)).await.unwrap();

        assert!(store.insert_category(&new_category(2, "A", None)).await.is_ok());
        assert!(store
            .insert_category(&new_category(1, "A", Some(root.id)))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn purge_uses_a_strict_cutoff() {
        let store = MemoryCatalogStore::new();
        let cutoff = Utc::now();

        store
            .insert_category_archive(&new_archive_row(1, "/B/Old/", cutoff - Duration::seconds(1)))
            .await
            .unwrap();
        let at_cutoff = store
            .insert_category_archive(&new_archive_row(1, "/B/Edge/", cutoff))
            .await
            .unwrap();

        let purged = store.purge_category_archive(cutoff).await.unwrap();

        assert_eq!(purged, 1);
        // The row exactly at the cutoff survives.
        assert!(store
            .find_category_archive(at_cutoff.id)
            .await
            .unwrap()
            .is_some());
        assert_eq!(
            store.count_category_archive_older_than(cutoff).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn archive_path_lookup_prefers_the_newest_snapshot() {
        let store = MemoryCatalogStore::new();
        let now = Utc::now();

        store
            .insert_category_archive(&new_archive_row(1, "/B/X/", now - Duration::days(2)))
            .await
            .unwrap();
        let newer = store
            .insert_category_archive(&new_archive_row(1, "/B/X/", now - Duration::days(1)))
            .await
            .unwrap();

        let hit = store
            .find_category_archive_by_path(1, "/B/X/")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.id, newer.id);
    }
}
