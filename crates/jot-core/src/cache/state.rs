//! State guarded by the cache lock

use std::collections::{BTreeSet, HashMap};

use crate::{
    model::{canonical_name, normalize_name, CollectionMeta, Section, SectionTemplate},
    snapshot::Snapshot,
    tree::{parse_tree, ParsedCollectionTree, TreeOrder},
};

/// Everything the cache knows. Only touched behind the cache's lock.
#[derive(Debug, Default)]
pub(crate) struct CacheState {
    pub(crate) metas: Vec<CollectionMeta>,
    pub(crate) tree: ParsedCollectionTree,
    pub(crate) sections: Vec<Section>,
    /// Keyed by normalized collection name.
    pub(crate) templates: HashMap<String, SectionTemplate>,
    pub(crate) focus: Focus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Focus {
    pub(crate) collection: Option<String>,
    pub(crate) bullet: Option<String>,
}

impl CacheState {
    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            metas: self.metas.clone(),
            tree: self.tree.clone(),
            sections: self.sections.clone(),
            unreadable: BTreeSet::new(),
        }
    }

    pub(crate) fn rebuild_tree(&mut self, order: &TreeOrder) {
        self.tree = parse_tree(&self.metas, order);
    }

    pub(crate) fn meta_index(&self, name: &str) -> Option<usize> {
        let key = normalize_name(name);
        self.metas.iter().position(|meta| meta.key() == key)
    }

    pub(crate) fn section_index(&self, id: &str) -> Option<usize> {
        let key = normalize_name(id);
        self.sections
            .iter()
            .position(|section| normalize_name(&section.id) == key)
    }

    /// The name a collection is displayed under: the known meta's spelling,
    /// else the canonical form of `name`.
    pub(crate) fn resolve_name(&self, name: &str) -> String {
        self.meta_index(name)
            .and_then(|idx| self.metas.get(idx))
            .map_or_else(|| canonical_name(name), |meta| meta.name.clone())
    }

    pub(crate) fn template_for(&self, name: &str) -> SectionTemplate {
        self.templates
            .get(&normalize_name(name))
            .cloned()
            .or_else(|| {
                self.meta_index(name)
                    .and_then(|idx| self.metas.get(idx))
                    .map(SectionTemplate::for_meta)
            })
            .unwrap_or_else(|| SectionTemplate::for_id(name))
    }

    /// Index of the section for `name`, creating it from its template when
    /// missing.
    pub(crate) fn ensure_section(&mut self, name: &str) -> usize {
        if let Some(idx) = self.section_index(name) {
            return idx;
        }
        let id = self.resolve_name(name);
        let template = self.template_for(&id);
        tracing::debug!(collection = %id, "creating section lazily");
        self.sections.push(Section::new(id, &template));
        self.sections.len() - 1
    }

    pub(crate) fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        let idx = self.section_index(name)?;
        self.sections.get_mut(idx)
    }
}
