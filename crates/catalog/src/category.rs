//! Category tree maintenance and the archive/restore protocol.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, Utc};

use carta_core::category as rules;
use carta_core::error::{CoreError, CoreResult};
use carta_core::path;
use carta_core::types::{Brand, DbId, Page};
use carta_db::models::category::{
    Category, CategoryArchive, CategoryTree, CreateCategory, CreateCategoryArchive,
    UpdateCategory,
};

use crate::item::ItemService;
use crate::resolver::{ChainScope, OnMissing, PathResolver};
use crate::store::CatalogStore;

/// What happens to the items of a category subtree when it is deleted.
///
/// Category deletion never decides this implicitly; the caller must.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemPolicy {
    /// Snapshot each item to the item archive alongside its category.
    Archive,
    /// Detach the items to the brand root and keep them live.
    MoveToRoot,
}

/// Tree CRUD and archive operations for categories.
///
/// Every method takes the acting [`Brand`]; entities of other brands are
/// reported as `NotFound`.
pub struct CategoryService;

impl CategoryService {
    /// Load a category and enforce tenant scope.
    async fn require_category<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        id: DbId,
    ) -> CoreResult<Category> {
        store
            .find_category(id)
            .await?
            .filter(|c| c.brand_id == brand.id)
            .ok_or(CoreError::not_found("Category", id))
    }

    /// Create a category under a parent (the brand root when `None`).
    pub async fn create<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        name: &str,
        parent_id: Option<DbId>,
    ) -> CoreResult<Category> {
        rules::validate_category_name(name)?;
        let parent = match parent_id {
            Some(pid) => Some(Self::require_category(store, brand, pid).await?),
            None => None,
        };
        if store
            .find_category_by_name(brand.id, name, parent_id)
            .await?
            .is_some()
        {
            return Err(CoreError::AlreadyExists(format!(
                "Category '{name}' already exists in this location"
            )));
        }
        store
            .insert_category(&CreateCategory {
                name: name.to_string(),
                brand_id: brand.id,
                parent_id,
                path: rules::child_path(parent.as_ref().map(|p| (p.path.as_str(), p.id))),
                level: rules::child_level(parent.as_ref().map(|p| p.level)),
            })
            .await
    }

    /// Rename a category, re-validating uniqueness under its parent.
    pub async fn rename<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        id: DbId,
        new_name: &str,
    ) -> CoreResult<Category> {
        rules::validate_category_name(new_name)?;
        let mut node = Self::require_category(store, brand, id).await?;
        if let Some(existing) = store
            .find_category_by_name(brand.id, new_name, node.parent_id)
            .await?
        {
            if existing.id != node.id {
                return Err(CoreError::AlreadyExists(format!(
                    "Category '{new_name}' already exists in this location"
                )));
            }
        }
        node.name = new_name.to_string();
        store.update_category(&node).await
    }

    /// Move a category under a new parent (the brand root when `None`).
    ///
    /// Rejects cross-brand parents and moves into the node's own subtree.
    /// The node's and every descendant's path/level are recomputed
    /// eagerly.
    pub async fn move_to<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        id: DbId,
        new_parent_id: Option<DbId>,
    ) -> CoreResult<Category> {
        let node = Self::require_category(store, brand, id).await?;
        let new_parent = match new_parent_id {
            Some(pid) => {
                let parent = store
                    .find_category(pid)
                    .await?
                    .ok_or(CoreError::not_found("Category", pid))?;
                if parent.brand_id != node.brand_id {
                    return Err(CoreError::InvalidArgument(
                        "Parent category belongs to a different brand".to_string(),
                    ));
                }
                let prefix = rules::subtree_prefix(&node.path, node.id);
                if parent.id == node.id || rules::is_within_subtree(&parent.path, &prefix) {
                    return Err(CoreError::InvalidArgument(
                        "Cannot move a category into its own subtree".to_string(),
                    ));
                }
                Some(parent)
            }
            None => None,
        };
        if let Some(existing) = store
            .find_category_by_name(brand.id, &node.name, new_parent_id)
            .await?
        {
            if existing.id != node.id {
                return Err(CoreError::AlreadyExists(format!(
                    "Category '{}' already exists in the target location",
                    node.name
                )));
            }
        }

        let old_prefix = rules::subtree_prefix(&node.path, node.id);
        let descendants = store.list_subtree(brand.id, &old_prefix).await?;

        let mut moved = node;
        moved.parent_id = new_parent.as_ref().map(|p| p.id);
        moved.path = rules::child_path(new_parent.as_ref().map(|p| (p.path.as_str(), p.id)));
        moved.level = rules::child_level(new_parent.as_ref().map(|p| p.level));
        let moved = store.update_category(&moved).await?;

        Self::recompute_subtree(store, &moved, descendants, moved.brand_id).await?;
        Ok(moved)
    }

    /// Move a whole subtree to another brand.
    ///
    /// The node becomes a root of the new brand, its descendants follow,
    /// and the items under every subtree node are reassigned so
    /// `item.brand_id` matches their category's brand again.
    pub async fn change_brand<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        id: DbId,
        new_brand: &Brand,
    ) -> CoreResult<Category> {
        let node = Self::require_category(store, brand, id).await?;
        if new_brand.id == node.brand_id {
            return Ok(node);
        }
        if store
            .find_category_by_name(new_brand.id, &node.name, None)
            .await?
            .is_some()
        {
            return Err(CoreError::AlreadyExists(format!(
                "Category '{}' already exists at the root of the target brand",
                node.name
            )));
        }

        let old_brand_id = node.brand_id;
        let old_prefix = rules::subtree_prefix(&node.path, node.id);
        let descendants = store.list_subtree(old_brand_id, &old_prefix).await?;
        let mut subtree_ids = vec![node.id];
        subtree_ids.extend(descendants.iter().map(|d| d.id));

        let mut moved = node;
        moved.parent_id = None;
        moved.path = rules::ROOT_PATH.to_string();
        moved.level = rules::ROOT_LEVEL;
        moved.brand_id = new_brand.id;
        let moved = store.update_category(&moved).await?;

        Self::recompute_subtree(store, &moved, descendants, new_brand.id).await?;

        // Items follow their category into the new brand.
        for category_id in subtree_ids {
            let items = store.list_items(old_brand_id, Some(category_id), false).await?;
            for mut item in items {
                item.brand_id = new_brand.id;
                store.update_item(&item).await?;
            }
        }
        Ok(moved)
    }

    /// Composite update: brand change, then move, then rename, each only
    /// when requested and different from the current state.
    pub async fn update<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        id: DbId,
        input: &UpdateCategory,
    ) -> CoreResult<Category> {
        let mut acting = brand.clone();
        let mut node = Self::require_category(store, &acting, id).await?;

        if let Some(new_brand) = &input.brand {
            if new_brand.id != node.brand_id {
                node = Self::change_brand(store, &acting, id, new_brand).await?;
                acting = new_brand.clone();
            }
        }
        if let Some(new_parent) = input.parent {
            if new_parent != node.parent_id {
                node = Self::move_to(store, &acting, id, new_parent).await?;
            }
        }
        if let Some(new_name) = &input.name {
            if !new_name.trim().is_empty() && *new_name != node.name {
                node = Self::rename(store, &acting, id, new_name).await?;
            }
        }
        Ok(node)
    }

    /// Direct children of a parent (brand roots when `None`).
    pub async fn list_children<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        parent_id: Option<DbId>,
    ) -> CoreResult<Vec<Category>> {
        if let Some(pid) = parent_id {
            Self::require_category(store, brand, pid).await?;
        }
        store.list_children(brand.id, parent_id).await
    }

    /// The whole category tree of a brand, assembled recursively.
    pub async fn tree<S: CatalogStore>(store: &S, brand: &Brand) -> CoreResult<Vec<CategoryTree>> {
        let nodes = store.list_categories(brand.id).await?;
        Ok(Self::assemble_tree(nodes))
    }

    /// Ancestor chain of a category, root first, the node itself last.
    pub async fn breadcrumbs<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        id: DbId,
    ) -> CoreResult<Vec<Category>> {
        let node = Self::require_category(store, brand, id).await?;
        let mut chain = vec![node];
        while let Some(pid) = chain.last().and_then(|c| c.parent_id) {
            let parent = store
                .find_category(pid)
                .await?
                .ok_or_else(|| CoreError::Internal(format!("Dangling parent reference: {pid}")))?;
            chain.push(parent);
        }
        chain.reverse();
        Ok(chain)
    }

    /// Archive a category subtree and delete the live nodes.
    ///
    /// Items under the subtree are handled first, according to the
    /// caller's [`ItemPolicy`]. One archive row is written per node with
    /// its name path at deletion time; the whole subtree shares one
    /// `archived_at`.
    pub async fn delete_with_archive<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        id: DbId,
        item_policy: ItemPolicy,
    ) -> CoreResult<()> {
        let root = Self::require_category(store, brand, id).await?;
        let prefix = rules::subtree_prefix(&root.path, root.id);
        let descendants = store.list_subtree(brand.id, &prefix).await?;

        let mut subtree = Vec::with_capacity(descendants.len() + 1);
        subtree.push(root.clone());
        subtree.extend(descendants);

        // Name path per node: the root's from its live ancestors, each
        // descendant's from its parent's (parents precede children here).
        let mut name_paths: HashMap<DbId, String> = HashMap::new();
        name_paths.insert(root.id, PathResolver::name_path_of(store, brand, &root).await?);
        for node in subtree.iter().skip(1) {
            let mut node_path = node
                .parent_id
                .and_then(|pid| name_paths.get(&pid))
                .cloned()
                .ok_or_else(|| {
                    CoreError::Internal(format!("Subtree order violated at category {}", node.id))
                })?;
            path::push_segment(&mut node_path, &path::safe_segment(&node.name));
            name_paths.insert(node.id, node_path);
        }

        let archived_at = Utc::now();

        for node in &subtree {
            let items = store.list_items(brand.id, Some(node.id), false).await?;
            for mut item in items {
                match item_policy {
                    ItemPolicy::Archive => {
                        let group_path = name_paths[&node.id].clone();
                        ItemService::archive_record(store, &item, group_path, archived_at).await?;
                    }
                    ItemPolicy::MoveToRoot => {
                        item.category_id = None;
                        store.update_item(&item).await?;
                    }
                }
            }
        }

        // Snapshot and delete bottom-up so a child row never outlives its
        // parent's archive entry.
        for node in subtree.iter().rev() {
            store
                .insert_category_archive(&CreateCategoryArchive {
                    original_category_id: node.id,
                    brand_id: brand.id,
                    parent_id: node.parent_id,
                    name: node.name.clone(),
                    path: name_paths[&node.id].clone(),
                    level: node.level,
                    archived_at,
                })
                .await?;
            store.delete_category(node.id).await?;
        }
        tracing::debug!(category_id = id, nodes = subtree.len(), "Archived category subtree");
        Ok(())
    }

    /// Recreate a category from its archive snapshot.
    ///
    /// A usable explicit target parent wins; otherwise the snapshot's
    /// recorded parent; otherwise the parent chain is rebuilt from the
    /// archived name path in create-missing mode (brand root when the
    /// path holds nothing beyond brand and leaf). The archive row is
    /// removed only after the node exists, so a failed restore stays
    /// retryable.
    pub async fn restore_from_archive<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        archive_id: DbId,
        target_parent_id: Option<DbId>,
    ) -> CoreResult<Category> {
        let snapshot = store
            .find_category_archive(archive_id)
            .await?
            .filter(|a| a.brand_id == brand.id)
            .ok_or(CoreError::not_found("CategoryArchive", archive_id))?;

        // An explicit or recorded parent is only used while it is alive
        // and in-brand; otherwise fall back to the archived path.
        let mut parent: Option<Category> = None;
        if let Some(pid) = target_parent_id.or(snapshot.parent_id) {
            parent = store
                .find_category(pid)
                .await?
                .filter(|p| p.brand_id == brand.id);
        }
        if parent.is_none() {
            parent = PathResolver::resolve_chain(
                store,
                brand,
                &snapshot.path,
                ChainScope::ParentsOnly,
                OnMissing::Create,
            )
            .await?;
        }

        let parent_id = parent.as_ref().map(|p| p.id);
        if store
            .find_category_by_name(brand.id, &snapshot.name, parent_id)
            .await?
            .is_some()
        {
            return Err(CoreError::AlreadyExists(format!(
                "Category '{}' already exists in the restore location",
                snapshot.name
            )));
        }

        let restored = store
            .insert_category(&CreateCategory {
                name: snapshot.name.clone(),
                brand_id: brand.id,
                parent_id,
                path: rules::child_path(parent.as_ref().map(|p| (p.path.as_str(), p.id))),
                level: rules::child_level(parent.as_ref().map(|p| p.level)),
            })
            .await?;
        store.delete_category_archive(snapshot.id).await?;
        tracing::debug!(
            archive_id,
            category_id = restored.id,
            "Restored category from archive"
        );
        Ok(restored)
    }

    /// Archived snapshots of a brand, newest first.
    pub async fn list_archive<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        page: Page,
    ) -> CoreResult<Vec<CategoryArchive>> {
        store.list_category_archive(brand.id, page).await
    }

    /// Drop an archive snapshot without restoring it.
    pub async fn delete_archive_entry<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        archive_id: DbId,
    ) -> CoreResult<()> {
        let snapshot = store
            .find_category_archive(archive_id)
            .await?
            .filter(|a| a.brand_id == brand.id)
            .ok_or(CoreError::not_found("CategoryArchive", archive_id))?;
        store.delete_category_archive(snapshot.id).await?;
        Ok(())
    }

    /// Permanently remove archive rows older than the given number of
    /// days. Strictly-before comparison: a row exactly at the cutoff is
    /// retained. Irreversible.
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
        let deleted = store.purge_category_archive(cutoff).await?;
        let remaining = store.count_category_archive_older_than(cutoff).await?;
        if remaining > 0 {
            return Err(CoreError::Internal(format!(
                "Archive purge verification failed: {remaining} rows remain"
            )));
        }
        tracing::info!(deleted, older_than_days, "Purged category archive");
        Ok(deleted)
    }

    /// Whether the category or any of its descendants contains a visible
    /// item. Lets menu surfaces hide empty branches.
    pub async fn has_visible_items_in_subtree<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        id: DbId,
    ) -> CoreResult<bool> {
        let node = Self::require_category(store, brand, id).await?;
        if !store.list_items(brand.id, Some(node.id), true).await?.is_empty() {
            return Ok(true);
        }
        let prefix = rules::subtree_prefix(&node.path, node.id);
        for descendant in store.list_subtree(brand.id, &prefix).await? {
            if !store
                .list_items(brand.id, Some(descendant.id), true)
                .await?
                .is_empty()
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Recompute brand/path/level for a subtree whose root was just
    /// updated. `descendants` must be ordered parents-first.
    async fn recompute_subtree<S: CatalogStore>(
        store: &S,
        root: &Category,
        descendants: Vec<Category>,
        new_brand_id: DbId,
    ) -> CoreResult<()> {
        let mut updated: HashMap<DbId, Category> = HashMap::new();
        updated.insert(root.id, root.clone());
        for mut node in descendants {
            let parent = node
                .parent_id
                .and_then(|pid| updated.get(&pid))
                .cloned()
                .ok_or_else(|| {
                    CoreError::Internal(format!("Subtree order violated at category {}", node.id))
                })?;
            node.brand_id = new_brand_id;
            node.path = rules::child_path(Some((parent.path.as_str(), parent.id)));
            node.level = rules::child_level(Some(parent.level));
            let saved = store.update_category(&node).await?;
            updated.insert(saved.id, saved);
        }
        Ok(())
    }

    /// Assemble a flat, parents-first node list into a forest. Nodes with
    /// a dangling parent reference surface as roots instead of vanishing.
    fn assemble_tree(nodes: Vec<Category>) -> Vec<CategoryTree> {
        let ids: HashSet<DbId> = nodes.iter().map(|c| c.id).collect();
        let mut by_parent: HashMap<Option<DbId>, Vec<Category>> = HashMap::new();
        for node in nodes {
            let key = node.parent_id.filter(|pid| ids.contains(pid));
            by_parent.entry(key).or_default().push(node);
        }

        fn attach(
            parent: Option<DbId>,
            by_parent: &mut HashMap<Option<DbId>, Vec<Category>>,
        ) -> Vec<CategoryTree> {
            by_parent
                .remove(&parent)
                .unwrap_or_default()
                .into_iter()
                .map(|node| {
                    let id = node.id;
                    CategoryTree {
                        category: node,
                        children: attach(Some(id), by_parent),
                    }
                })
                .collect()
        }

        attach(None, &mut by_parent)
    }
}
