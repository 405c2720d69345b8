//! Catalog item lifecycle: CRUD, visibility, and archive/restore.

use chrono::{Duration, Utc};

use carta_core::error::{CoreError, CoreResult};
use carta_core::item as rules;
use carta_core::path;
use carta_core::types::{Brand, DbId, Page, Timestamp};
use carta_db::models::category::Category;
use carta_db::models::item::{CreateItem, CreateItemArchive, Item, ItemArchive, UpdateItem};

use crate::resolver::{ChainScope, OnMissing, PathResolver};
use crate::store::CatalogStore;

/// Item operations for a brand's catalog.
///
/// Every method takes the acting [`Brand`]; entities of other brands are
/// reported as `NotFound`.
pub struct ItemService;

impl ItemService {
    /// Load an item and enforce tenant scope.
    async fn require_item<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        id: DbId,
    ) -> CoreResult<Item> {
        store
            .find_item(id)
            .await?
            .filter(|i| i.brand_id == brand.id)
            .ok_or(CoreError::not_found("Item", id))
    }

    /// Load the target category for an attach/move and check its brand.
    async fn require_attachable_category<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        category_id: DbId,
    ) -> CoreResult<Category> {
        let category = store
            .find_category(category_id)
            .await?
            .ok_or(CoreError::not_found("Category", category_id))?;
        if category.brand_id != brand.id {
            return Err(CoreError::InvalidArgument(
                "Category belongs to a different brand".to_string(),
            ));
        }
        Ok(category)
    }

    /// Create an item under a category or at the brand root.
    pub async fn create<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        input: &CreateItem,
    ) -> CoreResult<Item> {
        rules::validate_item_name(&input.name)?;
        rules::validate_item_description(input.description.as_deref())?;
        rules::validate_item_prices(input.price, input.promo_price)?;
        if let Some(cid) = input.category_id {
            Self::require_attachable_category(store, brand, cid).await?;
        }
        store.insert_item(brand.id, input).await
    }

    /// Fetch a single item.
    pub async fn get<S: CatalogStore>(store: &S, brand: &Brand, id: DbId) -> CoreResult<Item> {
        Self::require_item(store, brand, id).await
    }

    /// Items of a category (the brand root when `None`), optionally
    /// restricted to visible ones.
    pub async fn list<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        category_id: Option<DbId>,
        visible_only: bool,
    ) -> CoreResult<Vec<Item>> {
        if let Some(cid) = category_id {
            store
                .find_category(cid)
                .await?
                .filter(|c| c.brand_id == brand.id)
                .ok_or(CoreError::not_found("Category", cid))?;
        }
        store.list_items(brand.id, category_id, visible_only).await
    }

    /// Update an item's descriptive fields. `None` leaves a field as is.
    pub async fn update<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        id: DbId,
        input: &UpdateItem,
    ) -> CoreResult<Item> {
        let mut item = Self::require_item(store, brand, id).await?;
        if let Some(name) = &input.name {
            item.name = name.clone();
        }
        if let Some(description) = &input.description {
            item.description = Some(description.clone());
        }
        if let Some(price) = input.price {
            item.price = price;
        }
        if let Some(promo_price) = input.promo_price {
            item.promo_price = Some(promo_price);
        }
        if let Some(visible) = input.visible {
            item.visible = visible;
        }
        rules::validate_item_name(&item.name)?;
        rules::validate_item_description(item.description.as_deref())?;
        rules::validate_item_prices(item.price, item.promo_price)?;
        store.update_item(&item).await
    }

    /// Show or hide an item.
    pub async fn update_visibility<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        id: DbId,
        visible: bool,
    ) -> CoreResult<Item> {
        let mut item = Self::require_item(store, brand, id).await?;
        item.visible = visible;
        store.update_item(&item).await
    }

    /// Move an item to another category (the brand root when `None`).
    pub async fn move_to_category<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        id: DbId,
        target_category_id: Option<DbId>,
    ) -> CoreResult<Item> {
        let mut item = Self::require_item(store, brand, id).await?;
        if let Some(cid) = target_category_id {
            Self::require_attachable_category(store, brand, cid).await?;
        }
        item.category_id = target_category_id;
        store.update_item(&item).await
    }

    /// Reassign an item to another brand.
    ///
    /// The category reference survives only when it already belongs to
    /// the new brand; otherwise the item drops to the new brand's root.
    pub async fn change_brand<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        id: DbId,
        new_brand: &Brand,
    ) -> CoreResult<Item> {
        let mut item = Self::require_item(store, brand, id).await?;
        if let Some(cid) = item.category_id {
            let keeps_category = store
                .find_category(cid)
                .await?
                .is_some_and(|c| c.brand_id == new_brand.id);
            if !keeps_category {
                item.category_id = None;
            }
        }
        item.brand_id = new_brand.id;
        store.update_item(&item).await
    }

    /// Archive an item: snapshot every field plus the containing
    /// category's name path, then delete the live row.
    pub async fn archive<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        id: DbId,
    ) -> CoreResult<ItemArchive> {
        let item = Self::require_item(store, brand, id).await?;
        let group_path = match item.category_id {
            Some(cid) => {
                let category = store.find_category(cid).await?.ok_or_else(|| {
                    CoreError::Internal(format!("Dangling category reference: {cid}"))
                })?;
                PathResolver::name_path_of(store, brand, &category).await?
            }
            None => path::SEPARATOR.to_string(),
        };
        Self::archive_record(store, &item, group_path, Utc::now()).await
    }

    /// Snapshot an item into the archive and delete the live row.
    ///
    /// Shared with category deletion, which archives the items of a
    /// subtree with the subtree's own timestamps and precomputed paths.
    pub(crate) async fn archive_record<S: CatalogStore>(
        store: &S,
        item: &Item,
        group_path: String,
        archived_at: Timestamp,
    ) -> CoreResult<ItemArchive> {
        let snapshot = store
            .insert_item_archive(&CreateItemArchive {
                original_item_id: item.id,
                name: item.name.clone(),
                description: item.description.clone(),
                price: item.price,
                promo_price: item.promo_price,
                brand_id: item.brand_id,
                category_id: item.category_id,
                group_path,
                visible: item.visible,
                archived_at,
                created_at: item.created_at,
                updated_at: item.updated_at,
            })
            .await?;
        store.delete_item(item.id).await?;
        tracing::debug!(item_id = item.id, archive_id = snapshot.id, "Archived item");
        Ok(snapshot)
    }

    /// Recreate an item from its archive snapshot.
    ///
    /// A usable explicit target category wins; otherwise the snapshot's
    /// recorded category if still alive in-brand; otherwise the archived
    /// group path is resolved — first without creating anything, then in
    /// create-missing mode — so deleted ancestor categories come back
    /// from their own archive rows. An empty group path restores to the
    /// brand root. The archive row is removed only after the item exists.
    pub async fn restore<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        archive_id: DbId,
        target_category_id: Option<DbId>,
    ) -> CoreResult<Item> {
        let snapshot = store
            .find_item_archive(archive_id)
            .await?
            .filter(|a| a.brand_id == brand.id)
            .ok_or(CoreError::not_found("ItemArchive", archive_id))?;

        let mut category: Option<Category> = None;
        if let Some(cid) = target_category_id.or(snapshot.category_id) {
            category = store
                .find_category(cid)
                .await?
                .filter(|c| c.brand_id == brand.id);
        }
        if category.is_none() && !path::names_after_brand(&snapshot.group_path).is_empty() {
            category = PathResolver::resolve_chain(
                store,
                brand,
                &snapshot.group_path,
                ChainScope::Full,
                OnMissing::Stop,
            )
            .await?;
            if category.is_none() {
                category = PathResolver::resolve_chain(
                    store,
                    brand,
                    &snapshot.group_path,
                    ChainScope::Full,
                    OnMissing::Create,
                )
                .await?;
            }
        }

        let restored = store
            .insert_item(
                brand.id,
                &CreateItem {
                    name: snapshot.name.clone(),
                    description: snapshot.description.clone(),
                    price: snapshot.price,
                    promo_price: snapshot.promo_price,
                    category_id: category.as_ref().map(|c| c.id),
                    visible: snapshot.visible,
                },
            )
            .await?;
        store.delete_item_archive(snapshot.id).await?;
        tracing::debug!(archive_id, item_id = restored.id, "Restored item from archive");
        Ok(restored)
    }

    /// Archived snapshots of a brand, newest first.
    pub async fn list_archive<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        page: Page,
    ) -> CoreResult<Vec<ItemArchive>> {
        store.list_item_archive(brand.id, page).await
    }

    /// Drop an archive snapshot without restoring it.
    pub async fn delete_archive_entry<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        archive_id: DbId,
    ) -> CoreResult<()> {
        let snapshot = store
            .find_item_archive(archive_id)
            .await?
            .filter(|a| a.brand_id == brand.id)
            .ok_or(CoreError::not_found("ItemArchive", archive_id))?;
        store.delete_item_archive(snapshot.id).await?;
        Ok(())
    }

    /// Permanently remove archive rows older than the given number of
    /// days. Strictly-before comparison, like the category purge.
    pub async fn purge_archive<S: CatalogStore>(
        store: &S,
        older_than_days: i64,
    ) -> CoreResult<u64> {
        if older_than_days < 0 {
            return Err(CoreError::InvalidArgument(
                "Retention days must not be negative".to_string(),
            ));
        }
        let cutoff = Utc::now() - Duration::days(older_than_days);
        let deleted = store.purge_item_archive(cutoff).await?;
        tracing::info!(deleted, older_than_days, "Purged item archive");
        Ok(deleted)
    }
}
