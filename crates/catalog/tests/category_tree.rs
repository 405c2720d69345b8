//! Integration tests for category tree maintenance.
//!
//! Exercises the service layer against the in-memory store to verify that:
//! - Levels and materialized paths follow the parent chain
//! - (brand, name, parent) uniqueness holds across create/rename/move
//! - Cross-brand and cycle-creating moves are rejected
//! - Brand changes cascade to the subtree and its items
//! - Tree, breadcrumb, and children listings reflect the structure

use assert_matches::assert_matches;
use rust_decimal::Decimal;

use carta_catalog::category::{CategoryService, ItemPolicy};
use carta_catalog::item::ItemService;
use carta_catalog::store::MemoryCatalogStore;
use carta_core::error::CoreError;
use carta_core::types::{Brand, DbId};
use carta_db::models::category::UpdateCategory;
use carta_db::models::item::CreateItem;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn brand_one() -> Brand {
    Brand::new(1, "BrandOne")
}

fn brand_two() -> Brand {
    Brand::new(2, "BrandTwo")
}

fn new_item(category_id: Option<DbId>, name: &str) -> CreateItem {
    CreateItem {
        name: name.to_string(),
        description: None,
        price: Decimal::new(990, 2),
        promo_price: None,
        category_id,
        visible: true,
    }
}

// ---------------------------------------------------------------------------
// Test: create derives level and path from the parent chain
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_derives_level_and_path() {
    let store = MemoryCatalogStore::new();
    let brand = brand_one();

    let root = CategoryService::create(&store, &brand, "Drinks", None)
        .await
        .unwrap();
    let child = CategoryService::create(&store, &brand, "Soda", Some(root.id))
        .await
        .unwrap();
    let grandchild = CategoryService::create(&store, &brand, "Cola", Some(child.id))
        .await
        .unwrap();

    assert_eq!(root.level, 1);
    assert_eq!(root.path, "/");
    assert_eq!(child.level, 2);
    assert_eq!(child.path, format!("/{}/", root.id));
    assert_eq!(grandchild.level, 3);
    assert_eq!(grandchild.path, format!("/{}/{}/", root.id, child.id));
}

// ---------------------------------------------------------------------------
// Test: duplicate names in the same location are rejected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_name_in_same_location_is_rejected() {
    let store = MemoryCatalogStore::new();
    let brand = brand_one();

    CategoryService::create(&store, &brand, "Drinks", None)
        .await
        .unwrap();
    let err = CategoryService::create(&store, &brand, "Drinks", None)
        .await
        .unwrap_err();

    assert_matches!(err, CoreError::AlreadyExists(_));
}

// ---------------------------------------------------------------------------
// Test: the same name is fine under another parent or brand
// ---------------------------------------------------------------------------

#[tokio::test]
async fn same_name_elsewhere_is_allowed() {
    let store = MemoryCatalogStore::new();
    let brand = brand_one();

    let root = CategoryService::create(&store, &brand, "Drinks", None)
        .await
        .unwrap();
    assert!(CategoryService::create(&store, &brand, "Drinks", Some(root.id))
        .await
        .is_ok());
    assert!(CategoryService::create(&store, &brand_two(), "Drinks", None)
        .await
        .is_ok());
}

// ---------------------------------------------------------------------------
// Test: rename re-validates uniqueness under the same parent
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rename_checks_uniqueness() {
    let store = MemoryCatalogStore::new();
    let brand = brand_one();

    CategoryService::create(&store, &brand, "Drinks", None)
        .await
        .unwrap();
    let food = CategoryService::create(&store, &brand, "Food", None)
        .await
        .unwrap();

    let err = CategoryService::rename(&store, &brand, food.id, "Drinks")
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::AlreadyExists(_));

    let renamed = CategoryService::rename(&store, &brand, food.id, "Meals")
        .await
        .unwrap();
    assert_eq!(renamed.name, "Meals");
}

// ---------------------------------------------------------------------------
// Test: blank and untrimmed names are rejected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_names_are_rejected() {
    let store = MemoryCatalogStore::new();
    let brand = brand_one();

    assert_matches!(
        CategoryService::create(&store, &brand, "  ", None)
            .await
            .unwrap_err(),
        CoreError::InvalidArgument(_)
    );
    assert_matches!(
        CategoryService::create(&store, &brand, " Drinks", None)
            .await
            .unwrap_err(),
        CoreError::InvalidArgument(_)
    );
}

// ---------------------------------------------------------------------------
// Test: move recomputes level and path for the node and its descendants
// ---------------------------------------------------------------------------

#[tokio::test]
async fn move_recomputes_subtree_eagerly() {
    let store = MemoryCatalogStore::new();
    let brand = brand_one();

    let drinks = CategoryService::create(&store, &brand, "Drinks", None)
        .await
        .unwrap();
    let soda = CategoryService::create(&store, &brand, "Soda", Some(drinks.id))
        .await
        .unwrap();
    let cola = CategoryService::create(&store, &brand, "Cola", Some(soda.id))
        .await
        .unwrap();

    // Detach "Soda" (with "Cola" below it) to the brand root.
    let moved = CategoryService::move_to(&store, &brand, soda.id, None)
        .await
        .unwrap();
    assert_eq!(moved.level, 1);
    assert_eq!(moved.path, "/");
    assert_eq!(moved.parent_id, None);

    let cola_after = CategoryService::breadcrumbs(&store, &brand, cola.id)
        .await
        .unwrap();
    let leaf = cola_after.last().unwrap();
    assert_eq!(leaf.level, 2);
    assert_eq!(leaf.path, format!("/{}/", soda.id));
}

// ---------------------------------------------------------------------------
// Test: cross-brand moves always fail with InvalidArgument
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cross_brand_move_is_invalid() {
    let store = MemoryCatalogStore::new();
    let brand = brand_one();
    let other = brand_two();

    let node = CategoryService::create(&store, &brand, "Drinks", None)
        .await
        .unwrap();
    let foreign_parent = CategoryService::create(&store, &other, "Imports", None)
        .await
        .unwrap();

    let err = CategoryService::move_to(&store, &brand, node.id, Some(foreign_parent.id))
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::InvalidArgument(_));
}

// ---------------------------------------------------------------------------
// Test: moving a node into its own subtree is rejected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn move_into_own_subtree_is_invalid() {
    let store = MemoryCatalogStore::new();
    let brand = brand_one();

    let drinks = CategoryService::create(&store, &brand, "Drinks", None)
        .await
        .unwrap();
    let soda = CategoryService::create(&store, &brand, "Soda", Some(drinks.id))
        .await
        .unwrap();

    let into_child = CategoryService::move_to(&store, &brand, drinks.id, Some(soda.id))
        .await
        .unwrap_err();
    assert_matches!(into_child, CoreError::InvalidArgument(_));

    let into_self = CategoryService::move_to(&store, &brand, drinks.id, Some(drinks.id))
        .await
        .unwrap_err();
    assert_matches!(into_self, CoreError::InvalidArgument(_));
}

// ---------------------------------------------------------------------------
// Test: change_brand carries the subtree and its items along
// ---------------------------------------------------------------------------

#[tokio::test]
async fn change_brand_cascades_to_subtree_and_items() {
    let store = MemoryCatalogStore::new();
    let brand = brand_one();
    let other = brand_two();

    let drinks = CategoryService::create(&store, &brand, "Drinks", None)
        .await
        .unwrap();
    let soda = CategoryService::create(&store, &brand, "Soda", Some(drinks.id))
        .await
        .unwrap();
    let cola = ItemService::create(&store, &brand, &new_item(Some(soda.id), "Cola"))
        .await
        .unwrap();

    let moved = CategoryService::change_brand(&store, &brand, drinks.id, &other)
        .await
        .unwrap();
    assert_eq!(moved.brand_id, other.id);
    assert_eq!(moved.parent_id, None);
    assert_eq!(moved.level, 1);

    // The child node followed, with its path rebuilt in the new brand.
    let soda_after = CategoryService::breadcrumbs(&store, &other, soda.id)
        .await
        .unwrap();
    assert_eq!(soda_after.len(), 2);
    assert_eq!(soda_after[1].brand_id, other.id);
    assert_eq!(soda_after[1].level, 2);

    // The item kept its category and now matches its brand.
    let cola_after = ItemService::get(&store, &other, cola.id).await.unwrap();
    assert_eq!(cola_after.brand_id, other.id);
    assert_eq!(cola_after.category_id, Some(soda.id));

    // The old brand no longer sees the node.
    let err = CategoryService::breadcrumbs(&store, &brand, drinks.id)
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::NotFound { .. });
}

// ---------------------------------------------------------------------------
// Test: the composite update applies move and rename in one call
// ---------------------------------------------------------------------------

#[tokio::test]
async fn composite_update_moves_and_renames() {
    let store = MemoryCatalogStore::new();
    let brand = brand_one();

    let drinks = CategoryService::create(&store, &brand, "Drinks", None)
        .await
        .unwrap();
    let soda = CategoryService::create(&store, &brand, "Soda", Some(drinks.id))
        .await
        .unwrap();

    let updated = CategoryService::update(
        &store,
        &brand,
        soda.id,
        &UpdateCategory {
            name: Some("Soft Drinks".to_string()),
            parent: Some(None),
            brand: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.name, "Soft Drinks");
    assert_eq!(updated.parent_id, None);
    assert_eq!(updated.level, 1);
}

// ---------------------------------------------------------------------------
// Test: breadcrumbs run from the root to the node itself
// ---------------------------------------------------------------------------

#[tokio::test]
async fn breadcrumbs_are_root_first() {
    let store = MemoryCatalogStore::new();
    let brand = brand_one();

    let drinks = CategoryService::create(&store, &brand, "Drinks", None)
        .await
        .unwrap();
    let soda = CategoryService::create(&store, &brand, "Soda", Some(drinks.id))
        .await
        .unwrap();
    let cola = CategoryService::create(&store, &brand, "Cola", Some(soda.id))
        .await
        .unwrap();

    let chain = CategoryService::breadcrumbs(&store, &brand, cola.id)
        .await
        .unwrap();
    let names: Vec<&str> = chain.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Drinks", "Soda", "Cola"]);
}

// ---------------------------------------------------------------------------
// Test: the tree listing nests children under their parents
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tree_nests_children() {
    let store = MemoryCatalogStore::new();
    let brand = brand_one();

    let drinks = CategoryService::create(&store, &brand, "Drinks", None)
        .await
        .unwrap();
    CategoryService::create(&store, &brand, "Food", None)
        .await
        .unwrap();
    CategoryService::create(&store, &brand, "Soda", Some(drinks.id))
        .await
        .unwrap();

    let forest = CategoryService::tree(&store, &brand).await.unwrap();
    assert_eq!(forest.len(), 2);
    let drinks_tree = forest
        .iter()
        .find(|t| t.category.name == "Drinks")
        .unwrap();
    assert_eq!(drinks_tree.children.len(), 1);
    assert_eq!(drinks_tree.children[0].category.name, "Soda");
}

// ---------------------------------------------------------------------------
// Test: children listings are scoped to the acting brand
// ---------------------------------------------------------------------------

#[tokio::test]
async fn listing_children_of_foreign_parent_is_not_found() {
    let store = MemoryCatalogStore::new();
    let brand = brand_one();
    let other = brand_two();

    let foreign = CategoryService::create(&store, &other, "Imports", None)
        .await
        .unwrap();

    let err = CategoryService::list_children(&store, &brand, Some(foreign.id))
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::NotFound { .. });
}

// ---------------------------------------------------------------------------
// Test: visible-item probing spans the whole subtree
// ---------------------------------------------------------------------------

#[tokio::test]
async fn visible_item_probe_spans_subtree() {
    let store = MemoryCatalogStore::new();
    let brand = brand_one();

    let drinks = CategoryService::create(&store, &brand, "Drinks", None)
        .await
        .unwrap();
    let soda = CategoryService::create(&store, &brand, "Soda", Some(drinks.id))
        .await
        .unwrap();

    assert!(!CategoryService::has_visible_items_in_subtree(&store, &brand, drinks.id)
        .await
        .unwrap());

    // A hidden item deep in the subtree does not count.
    let hidden = ItemService::create(&store, &brand, &new_item(Some(soda.id), "Cola"))
        .await
        .unwrap();
    ItemService::update_visibility(&store, &brand, hidden.id, false)
        .await
        .unwrap();
    assert!(!CategoryService::has_visible_items_in_subtree(&store, &brand, drinks.id)
        .await
        .unwrap());

    // A visible one does.
    ItemService::update_visibility(&store, &brand, hidden.id, true)
        .await
        .unwrap();
    assert!(CategoryService::has_visible_items_in_subtree(&store, &brand, drinks.id)
        .await
        .unwrap());
}

// ---------------------------------------------------------------------------
// Test: deleting with MoveToRoot keeps items alive at the brand root
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_with_move_to_root_detaches_items() {
    let store = MemoryCatalogStore::new();
    let brand = brand_one();

    let drinks = CategoryService::create(&store, &brand, "Drinks", None)
        .await
        .unwrap();
    let cola = ItemService::create(&store, &brand, &new_item(Some(drinks.id), "Cola"))
        .await
        .unwrap();

    CategoryService::delete_with_archive(&store, &brand, drinks.id, ItemPolicy::MoveToRoot)
        .await
        .unwrap();

    let survivor = ItemService::get(&store, &brand, cola.id).await.unwrap();
    assert_eq!(survivor.category_id, None);

    let root_items = ItemService::list(&store, &brand, None, false).await.unwrap();
    assert_eq!(root_items.len(), 1);
}
