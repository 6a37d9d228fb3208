//! Collection metadata and name handling
//!
//! Collection names are hierarchical: `"Future/October 2025"` is a child of
//! `"Future"`. The full name is the uniqueness key.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Separator between hierarchy segments in a collection name.
pub const HIERARCHY_SEPARATOR: char = '/';

/// What a collection is used for.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CollectionKind {
    #[default]
    Generic,
    Daily,
    Monthly,
    Tracking,
}

/// Metadata describing one collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionMeta {
    pub name: String,
    #[serde(default)]
    pub kind: CollectionKind,
}

impl CollectionMeta {
    /// Build a meta with its name canonicalized.
    pub fn new(name: impl AsRef<str>, kind: CollectionKind) -> Self {
        Self {
            name: canonical_name(name.as_ref()),
            kind,
        }
    }

    /// A generic collection.
    pub fn generic(name: impl AsRef<str>) -> Self {
        Self::new(name, CollectionKind::Generic)
    }

    /// Comparison key: trimmed and case-folded.
    pub fn key(&self) -> String {
        normalize_name(&self.name)
    }

    /// Name of the parent collection, if this one is nested.
    pub fn parent_name(&self) -> Option<&str> {
        self.name
            .rfind(HIERARCHY_SEPARATOR)
            .map(|idx| &self.name[..idx])
    }

    /// Last segment of the name.
    pub fn leaf_name(&self) -> &str {
        leaf_name(&self.name)
    }

    /// Nesting depth, zero for roots.
    pub fn depth(&self) -> usize {
        self.name.matches(HIERARCHY_SEPARATOR).count()
    }
}

/// Trim every segment and drop empty ones: `" a / /b/ "` becomes `"a/b"`.
pub fn canonical_name(name: &str) -> String {
    segments(name).collect::<Vec<_>>().join("/")
}

/// Trimmed, case-insensitive comparison form of a collection name.
pub fn normalize_name(name: &str) -> String {
    canonical_name(name).to_lowercase()
}

/// Non-empty, trimmed segments of a hierarchical name.
pub fn segments(name: &str) -> impl Iterator<Item = &str> {
    name.split(HIERARCHY_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

/// Last segment of a hierarchical name.
pub fn leaf_name(name: &str) -> &str {
    segments(name).last().unwrap_or("")
}

/// Whether two names refer to the same collection.
pub fn same_name(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}
