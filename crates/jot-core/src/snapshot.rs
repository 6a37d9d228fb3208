//! Snapshots: the full state at one instant
//!
//! [`SnapshotBuilder`] performs a cold read of the store. A collection whose
//! entries cannot be read is logged, shown as a placeholder section and listed
//! in [`Snapshot::unreadable`], rather than failing the whole read. Applying
//! such a snapshot keeps whatever rows the cache already holds for it.

use std::collections::{BTreeSet, HashMap};

use futures::future::join_all;

use crate::{
    model::{assemble_rows, normalize_name, CollectionMeta, Section, SectionTemplate},
    store::JournalStore,
    tree::{parse_tree, ParsedCollectionTree, TreeOrder},
    Result,
};

/// Metas, their tree, and one section per collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub metas: Vec<CollectionMeta>,
    pub tree: ParsedCollectionTree,
    pub sections: Vec<Section>,
    /// Normalized names of collections whose entries could not be read.
    pub unreadable: BTreeSet<String>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assemble a snapshot, parsing the tree from `metas`.
    pub fn from_parts(metas: Vec<CollectionMeta>, sections: Vec<Section>, order: &TreeOrder) -> Self {
        let tree = parse_tree(&metas, order);
        Self {
            metas,
            tree,
            sections,
            unreadable: BTreeSet::new(),
        }
    }

    /// Mark a collection as unreadable in this snapshot.
    #[must_use]
    pub fn with_unreadable(mut self, collection: &str) -> Self {
        self.unreadable.insert(normalize_name(collection));
        self
    }

    pub fn is_unreadable(&self, collection: &str) -> bool {
        self.unreadable.contains(&normalize_name(collection))
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        let key = normalize_name(id);
        self.sections
            .iter()
            .find(|section| normalize_name(&section.id) == key)
    }

    pub fn is_empty(&self) -> bool {
        self.metas.is_empty() && self.sections.is_empty()
    }
}

/// Cold read of the whole journal.
pub struct SnapshotBuilder<'a> {
    store: &'a dyn JournalStore,
    order: TreeOrder,
    templates: HashMap<String, SectionTemplate>,
}

impl<'a> SnapshotBuilder<'a> {
    pub fn new(store: &'a dyn JournalStore) -> Self {
        Self {
            store,
            order: TreeOrder::default(),
            templates: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_order(mut self, order: TreeOrder) -> Self {
        self.order = order;
        self
    }

    /// Section templates keyed by collection name; collections without one
    /// get [`SectionTemplate::for_meta`].
    #[must_use]
    pub fn with_templates(mut self, templates: HashMap<String, SectionTemplate>) -> Self {
        self.templates = templates
            .into_iter()
            .map(|(name, template)| (normalize_name(&name), template))
            .collect();
        self
    }

    /// Read every collection and assemble the snapshot.
    ///
    /// # Errors
    ///
    /// Fails only when the collection catalog itself cannot be listed.
    pub async fn build(self) -> Result<Snapshot> {
        let listed = self.store.list_collection_metas("").await?;
        let tree = parse_tree(&listed, &self.order);
        let metas: Vec<CollectionMeta> = tree
            .iter()
            .filter(|(_, node)| !node.implicit)
            .map(|(_, node)| node.meta.clone())
            .collect();

        let reads = metas
            .iter()
            .map(|meta| self.store.list_entries(&meta.name));
        let results = join_all(reads).await;

        let mut unreadable = BTreeSet::new();
        let sections = metas
            .iter()
            .zip(results)
            .map(|(meta, result)| {
                let template = self
                    .templates
                    .get(&meta.key())
                    .cloned()
                    .unwrap_or_else(|| SectionTemplate::for_meta(meta));
                let section = Section::new(meta.name.clone(), &template);
                match result {
                    Ok(entries) => section.with_rows(assemble_rows(&entries)),
                    Err(e) => {
                        tracing::warn!(collection = %meta.name, error = %e, "skipping unreadable collection");
                        unreadable.insert(meta.key());
                        section
                    }
                }
            })
            .collect();

        tracing::debug!(collections = metas.len(), "snapshot built");
        Ok(Snapshot {
            metas,
            tree,
            sections,
            unreadable,
        })
    }
}
