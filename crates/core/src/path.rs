//! Group-path string handling.
//!
//! Two path formats coexist in the taxonomy and must not be confused:
//!
//! - **Id paths** on live categories: `"/"` for a root node, otherwise the
//!   parent's id path plus the parent id and a separator (`"/12/37/"`).
//!   Used for subtree-prefix queries; see [`crate::category`].
//! - **Name paths** on archive rows: the brand name followed by every
//!   ancestor name and the node's own name, with leading and trailing
//!   separator (`"/Brand/Drinks/Soda/"`). The exact string is the archive
//!   lookup key, so building and extending it lives here in one place.
//!
//! Name segments have separator characters replaced with `-` when a path
//! is built, which keeps the segment count stable under splitting.

/// Segment separator for both path formats.
pub const SEPARATOR: char = '/';

/// Strip surrounding whitespace and leading/trailing separators.
///
/// Interior blank segments are left alone; [`segments`] skips them.
pub fn normalize(path: &str) -> &str {
    path.trim()
        .trim_start_matches(SEPARATOR)
        .trim_end_matches(SEPARATOR)
}

/// Split a path into its non-blank segments.
///
/// `"/Brand/A/B/"` becomes `["Brand", "A", "B"]`; a blank or
/// separator-only path yields no segments.
pub fn segments(path: &str) -> Vec<&str> {
    let trimmed = normalize(path);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .split(SEPARATOR)
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// Segment names after the brand segment, i.e. the category chain.
///
/// Returns an empty list when the path holds at most the brand.
pub fn names_after_brand(path: &str) -> Vec<&str> {
    let mut parts = segments(path);
    if parts.is_empty() {
        return parts;
    }
    parts.remove(0);
    parts
}

/// Escape a name for use as a path segment.
pub fn safe_segment(name: &str) -> String {
    name.replace(SEPARATOR, "-")
}

/// Build a name path from the brand name and a root-first name chain.
///
/// `name_path("Brand", ["Drinks", "Soda"])` is `"/Brand/Drinks/Soda/"`.
/// With an empty chain the result is the brand-only path `"/Brand/"`.
pub fn name_path<'a, I>(brand_name: &str, names: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    out.push(SEPARATOR);
    out.push_str(&safe_segment(brand_name));
    out.push(SEPARATOR);
    for name in names {
        out.push_str(&safe_segment(name));
        out.push(SEPARATOR);
    }
    out
}

/// Seed a resolution prefix with a path's own brand segment.
///
/// The brand segment comes from the stored path, not from the acting
/// brand's current name, so archived chains survive a brand rename.
pub fn brand_prefix(path: &str) -> Option<String> {
    let parts = segments(path);
    let brand = parts.first()?;
    Some(format!("{SEPARATOR}{brand}{SEPARATOR}"))
}

/// Append one segment (and trailing separator) to a prefix in place.
pub fn push_segment(prefix: &mut String, name: &str) {
    prefix.push_str(name);
    prefix.push(SEPARATOR);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_outer_separators_and_whitespace() {
        assert_eq!(normalize("/Brand/A/"), "Brand/A");
        assert_eq!(normalize("  /Brand/A  "), "Brand/A");
        assert_eq!(normalize("Brand"), "Brand");
        assert_eq!(normalize("///"), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn segments_skips_blank_parts() {
        assert_eq!(segments("/Brand/A/B/"), vec!["Brand", "A", "B"]);
        assert_eq!(segments("/Brand//B/"), vec!["Brand", "B"]);
        assert!(segments("/").is_empty());
        assert!(segments("   ").is_empty());
    }

    #[test]
    fn names_after_brand_drops_the_first_segment() {
        assert_eq!(names_after_brand("/Brand/A/B/"), vec!["A", "B"]);
        assert!(names_after_brand("/Brand/").is_empty());
        assert!(names_after_brand("").is_empty());
    }

    #[test]
    fn name_path_is_round_trippable_through_segments() {
        let path = name_path("Brand", ["Drinks", "Soda"]);
        assert_eq!(path, "/Brand/Drinks/Soda/");
        assert_eq!(segments(&path), vec!["Brand", "Drinks", "Soda"]);
    }

    #[test]
    fn name_path_escapes_separators_in_names() {
        let path = name_path("Fish/Chips", ["Hot/Cold"]);
        assert_eq!(path, "/Fish-Chips/Hot-Cold/");
        assert_eq!(segments(&path).len(), 2);
    }

    #[test]
    fn brand_prefix_uses_the_stored_brand_segment() {
        assert_eq!(brand_prefix("/Brand/A/B/").as_deref(), Some("/Brand/"));
        assert_eq!(brand_prefix("/Brand/").as_deref(), Some("/Brand/"));
        assert_eq!(brand_prefix("/"), None);
    }

    #[test]
    fn push_segment_extends_with_trailing_separator() {
        let mut prefix = String::from("/Brand/");
        push_segment(&mut prefix, "A");
        assert_eq!(prefix, "/Brand/A/");
        push_segment(&mut prefix, "B");
        assert_eq!(prefix, "/Brand/A/B/");
    }
}
