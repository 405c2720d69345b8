//! Category tree rules: name validation and level/path derivation.
//!
//! A category's materialized path is the chain of its *ancestor ids* with a
//! trailing separator; the node's own id is not part of its path. Roots sit
//! at level 1 with path `"/"`; a child's path is the parent's path plus the
//! parent id. The path of every descendant therefore starts with the
//! node's subtree prefix, which is what the move-cycle check and the
//! subtree queries rely on.

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum allowed length for a category name.
pub const MAX_CATEGORY_NAME_LENGTH: usize = 120;

/// Level of a root category.
pub const ROOT_LEVEL: i32 = 1;

/// Materialized id path of a root category.
pub const ROOT_PATH: &str = "/";

/// Validate a category name: non-empty, trimmed, within
/// [`MAX_CATEGORY_NAME_LENGTH`].
pub fn validate_category_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidArgument(
            "Category name must not be empty".to_string(),
        ));
    }
    if trimmed.len() != name.len() {
        return Err(CoreError::InvalidArgument(
            "Category name must not have leading or trailing whitespace".to_string(),
        ));
    }
    if name.len() > MAX_CATEGORY_NAME_LENGTH {
        return Err(CoreError::InvalidArgument(format!(
            "Category name must not exceed {MAX_CATEGORY_NAME_LENGTH} characters, got {}",
            name.len()
        )));
    }
    Ok(())
}

/// Level of a node under the given parent level (root when `None`).
pub fn child_level(parent_level: Option<i32>) -> i32 {
    match parent_level {
        Some(level) => level + 1,
        None => ROOT_LEVEL,
    }
}

/// Id path of a node under the given parent (root when `None`).
pub fn child_path(parent: Option<(&str, DbId)>) -> String {
    match parent {
        Some((parent_path, parent_id)) => format!("{parent_path}{parent_id}/"),
        None => ROOT_PATH.to_string(),
    }
}

/// Id-path prefix shared by every descendant of the node.
pub fn subtree_prefix(path: &str, id: DbId) -> String {
    format!("{path}{id}/")
}

/// Whether a node with the given id path lies inside the subtree rooted
/// at the node owning `prefix` (see [`subtree_prefix`]).
pub fn is_within_subtree(candidate_path: &str, prefix: &str) -> bool {
    candidate_path.starts_with(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names_pass() {
        assert!(validate_category_name("Drinks").is_ok());
        assert!(validate_category_name("Hot & Cold").is_ok());
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(validate_category_name("").is_err());
        assert!(validate_category_name("   ").is_err());
    }

    #[test]
    fn untrimmed_name_is_rejected() {
        assert!(validate_category_name(" Drinks").is_err());
        assert!(validate_category_name("Drinks ").is_err());
    }

    #[test]
    fn overlong_name_is_rejected() {
        let name = "x".repeat(MAX_CATEGORY_NAME_LENGTH + 1);
        assert!(validate_category_name(&name).is_err());
    }

    #[test]
    fn root_nodes_get_level_one_and_slash_path() {
        assert_eq!(child_level(None), 1);
        assert_eq!(child_path(None), "/");
    }

    #[test]
    fn child_derivation_chains_from_the_parent() {
        assert_eq!(child_level(Some(1)), 2);
        assert_eq!(child_path(Some(("/", 7))), "/7/");
        assert_eq!(child_path(Some(("/7/", 12))), "/7/12/");
    }

    #[test]
    fn subtree_prefix_contains_descendants_only() {
        let prefix = subtree_prefix("/7/", 12);
        assert_eq!(prefix, "/7/12/");
        assert!(is_within_subtree("/7/12/", &prefix));
        assert!(is_within_subtree("/7/12/40/", &prefix));
        assert!(!is_within_subtree("/7/", &prefix));
        assert!(!is_within_subtree("/7/13/", &prefix));
    }
}
