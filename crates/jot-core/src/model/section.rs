//! Display sections, one per collection

use serde::{Deserialize, Serialize};

use super::{
    bullet::Bullet,
    collection::{leaf_name, CollectionKind, CollectionMeta},
};

/// Title and subtitle used when a section is created lazily.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectionTemplate {
    pub title: String,
    pub subtitle: String,
}

impl SectionTemplate {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }

    /// Default template for a collection: leaf name as title, parent path
    /// (or the kind, for typed roots) as subtitle.
    pub fn for_meta(meta: &CollectionMeta) -> Self {
        let subtitle = match (meta.parent_name(), meta.kind) {
            (Some(parent), _) => parent.to_string(),
            (None, CollectionKind::Generic) => String::new(),
            (None, kind) => kind.to_string(),
        };
        Self::new(meta.leaf_name(), subtitle)
    }

    /// Default template when only the collection id is known.
    pub fn for_id(id: &str) -> Self {
        Self::for_meta(&CollectionMeta::generic(id))
    }
}

/// Display-facing projection of one collection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub rows: Vec<Bullet>,
}

impl Section {
    pub fn new(id: impl Into<String>, template: &SectionTemplate) -> Self {
        Self {
            id: id.into(),
            title: template.title.clone(),
            subtitle: template.subtitle.clone(),
            rows: Vec::new(),
        }
    }

    /// Section for a collection id with the default template.
    pub fn for_id(id: impl Into<String>) -> Self {
        let id = id.into();
        let template = SectionTemplate::for_id(&id);
        Self::new(id, &template)
    }

    #[must_use]
    pub fn with_rows(mut self, rows: Vec<Bullet>) -> Self {
        self.rows = rows;
        self
    }

    /// A section with no rows is shown as a placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.rows.is_empty()
    }

    /// Title to show, falling back to the id's leaf segment.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            leaf_name(&self.id)
        } else {
            &self.title
        }
    }
}
