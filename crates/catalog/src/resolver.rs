//! Rebuilds category chains from archived name paths.
//!
//! Each segment of a name path is resolved in three tiers: a live node
//! under the current parent, then an archived snapshot keyed by the exact
//! path prefix walked so far, then (when allowed) a freshly created node.
//! The archive tier means a chain deleted in the middle is stitched back
//! together from its snapshots instead of being recreated blank.

use carta_core::category as rules;
use carta_core::error::{CoreError, CoreResult};
use carta_core::path;
use carta_core::types::Brand;
use carta_db::models::category::{Category, CreateCategory};

use crate::store::CatalogStore;

/// Outcome of resolving a single path segment.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// A live node matched the segment.
    Found(Category),
    /// The segment was rebuilt from an archive snapshot (now consumed).
    Restored(Category),
    /// No live or archived node existed; a new one was created.
    Created(Category),
    /// Nothing matched and creation was not allowed.
    Unresolved,
}

impl Resolution {
    /// The resolved node, if any.
    pub fn node(&self) -> Option<&Category> {
        match self {
            Resolution::Found(c) | Resolution::Restored(c) | Resolution::Created(c) => Some(c),
            Resolution::Unresolved => None,
        }
    }

    /// Consume the resolution, keeping the node.
    pub fn into_node(self) -> Option<Category> {
        match self {
            Resolution::Found(c) | Resolution::Restored(c) | Resolution::Created(c) => Some(c),
            Resolution::Unresolved => None,
        }
    }
}

/// Which segments of a path a chain walk covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainScope {
    /// Every segment after the brand, leaf included.
    Full,
    /// Every segment after the brand except the leaf. For callers that
    /// already know the leaf's identity (e.g. restoring its own archive
    /// row) and only need the ancestors back.
    ParentsOnly,
}

/// What to do with a segment that is neither live nor archived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnMissing {
    /// Create a node by the segment name and continue.
    Create,
    /// Stop: the segment stays [`Resolution::Unresolved`] and a chain
    /// walk aborts as a whole.
    Stop,
}

/// Stateless resolver over a [`CatalogStore`].
pub struct PathResolver;

impl PathResolver {
    /// Resolve one segment under `current_parent`, extending `prefix`.
    ///
    /// `prefix` must hold the name path of `current_parent` (brand segment
    /// included) and is extended by this segment *even on a live miss*:
    /// the archive key must reflect the intended position, not just the
    /// part of the chain that happened to resolve.
    pub async fn resolve_segment<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        current_parent: Option<&Category>,
        segment_name: &str,
        prefix: &mut String,
        on_missing: OnMissing,
    ) -> CoreResult<Resolution> {
        if segment_name.trim().is_empty() {
            return Err(CoreError::InvalidArgument(
                "Path segment must not be blank".to_string(),
            ));
        }
        let parent_id = current_parent.map(|p| p.id);

        // 1) live node under the current parent
        if let Some(existing) = store
            .find_category_by_name(brand.id, segment_name, parent_id)
            .await?
        {
            path::push_segment(prefix, segment_name);
            return Ok(Resolution::Found(existing));
        }

        // 2) archived snapshot at this exact position
        path::push_segment(prefix, segment_name);
        if let Some(snapshot) = store
            .find_category_archive_by_path(brand.id, prefix)
            .await?
        {
            let restored = store
                .insert_category(&Self::child_record(brand, current_parent, &snapshot.name))
                .await?;
            store.delete_category_archive(snapshot.id).await?;
            tracing::debug!(
                archive_id = snapshot.id,
                category_id = restored.id,
                path = %prefix,
                "Restored category segment from archive"
            );
            return Ok(Resolution::Restored(restored));
        }

        // 3) create by name, or give up
        match on_missing {
            OnMissing::Create => {
                let created = store
                    .insert_category(&Self::child_record(brand, current_parent, segment_name))
                    .await?;
                Ok(Resolution::Created(created))
            }
            OnMissing::Stop => Ok(Resolution::Unresolved),
        }
    }

    /// Walk a name path segment by segment and return the terminal node.
    ///
    /// The first segment is the brand and is only used to seed the prefix
    /// (taken from the path itself, so archived chains survive a brand
    /// rename). A path with fewer than two segments resolves to `None`
    /// ("no parent", the brand root). Under [`ChainScope::Full`] any
    /// unresolved segment aborts the whole walk with `None`.
    pub async fn resolve_chain<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        group_path: &str,
        scope: ChainScope,
        on_missing: OnMissing,
    ) -> CoreResult<Option<Category>> {
        let parts = path::segments(group_path);
        if parts.len() < 2 {
            return Ok(None);
        }
        let end = match scope {
            ChainScope::Full => parts.len(),
            ChainScope::ParentsOnly => parts.len() - 1,
        };

        let mut prefix = String::with_capacity(group_path.len());
        prefix.push(path::SEPARATOR);
        path::push_segment(&mut prefix, parts[0]);

        let mut current: Option<Category> = None;
        for segment in parts[1..end].iter().copied() {
            let resolution = Self::resolve_segment(
                store,
                brand,
                current.as_ref(),
                segment,
                &mut prefix,
                on_missing,
            )
            .await?;
            match resolution.into_node() {
                Some(node) => current = Some(node),
                None => return Ok(None),
            }
        }
        Ok(current)
    }

    /// Name path of a live category: brand segment, ancestor names, the
    /// node's own name, trailing separator.
    pub async fn name_path_of<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        category: &Category,
    ) -> CoreResult<String> {
        let mut names = vec![category.name.clone()];
        let mut parent_id = category.parent_id;
        while let Some(pid) = parent_id {
            let parent = store.find_category(pid).await?.ok_or_else(|| {
                CoreError::Internal(format!("Dangling parent reference: {pid}"))
            })?;
            names.push(parent.name.clone());
            parent_id = parent.parent_id;
        }
        names.reverse();
        Ok(path::name_path(&brand.name, names.iter().map(String::as_str)))
    }

    /// Name-path prefix for resolving segments under `parent`
    /// (`"/<brand>/"` when `parent` is `None`).
    pub async fn name_prefix_for<S: CatalogStore>(
        store: &S,
        brand: &Brand,
        parent: Option<&Category>,
    ) -> CoreResult<String> {
        match parent {
            Some(node) => Self::name_path_of(store, brand, node).await,
            None => Ok(path::name_path(&brand.name, std::iter::empty::<&str>())),
        }
    }

    fn child_record(brand: &Brand, parent: Option<&Category>, name: &str) -> CreateCategory {
        CreateCategory {
            name: name.to_string(),
            brand_id: brand.id,
            parent_id: parent.map(|p| p.id),
            path: rules::child_path(parent.map(|p| (p.path.as_str(), p.id))),
            level: rules::child_level(parent.map(|p| p.level)),
        }
    }
}
