//! Diff engine
//!
//! Computes the ordered events that turn one state into another. Creates and
//! updates come first, walking the new state top-down, so a consumer never
//! sees a child before its parent. Deletes come last, leaves first.

use std::collections::{HashMap, HashSet};

use crate::{
    events::{BulletRef, CollectionRef, Event},
    model::{
        bullet::{walk, RowVisit},
        normalize_name, Bullet, CollectionMeta, Section,
    },
    snapshot::Snapshot,
};

// ═══════════════════════════════════════════════════════════════════════════
// COLLECTIONS
// ═══════════════════════════════════════════════════════════════════════════

/// Collection-level changes, split so callers can place row events between
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionDiff {
    pub upserts: Vec<Event>,
    pub deletes: Vec<Event>,
}

impl CollectionDiff {
    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.deletes.is_empty()
    }
}

/// Compare two meta lists by normalized name.
///
/// Only in `new` is a create, only in `old` a delete, and a changed kind an
/// update carrying both references. Output follows the order of each input.
pub fn diff_collections(old: &[CollectionMeta], new: &[CollectionMeta]) -> CollectionDiff {
    let old_by_key = index_metas(old);
    let new_by_key = index_metas(new);
    let mut diff = CollectionDiff::default();

    let mut seen = HashSet::new();
    for meta in new {
        let key = normalize_name(&meta.name);
        if !seen.insert(key.clone()) {
            continue;
        }
        let current = new_by_key.get(&key).copied().unwrap_or(meta);
        match old_by_key.get(&key) {
            None => diff.upserts.push(Event::CollectionCreated {
                collection: CollectionRef::from(current),
            }),
            Some(previous) if previous.kind != current.kind => {
                diff.upserts.push(Event::CollectionUpdated {
                    current: CollectionRef::from(current),
                    previous: Some(CollectionRef::from(*previous)),
                });
            }
            Some(_) => {}
        }
    }

    let mut seen = HashSet::new();
    for meta in old {
        let key = normalize_name(&meta.name);
        if !seen.insert(key.clone()) || new_by_key.contains_key(&key) {
            continue;
        }
        let gone = old_by_key.get(&key).copied().unwrap_or(meta);
        diff.deletes.push(Event::CollectionDeleted {
            collection: CollectionRef::from(gone),
        });
    }
    diff
}

/// Later entries win, matching how the tree parser treats duplicates.
fn index_metas(metas: &[CollectionMeta]) -> HashMap<String, &CollectionMeta> {
    metas
        .iter()
        .map(|meta| (normalize_name(&meta.name), meta))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// ROWS
// ═══════════════════════════════════════════════════════════════════════════

/// Pre-order index of the identified rows of one tree.
struct RowIndex<'a> {
    order: Vec<RowVisit<'a>>,
    by_id: HashMap<&'a str, RowVisit<'a>>,
}

impl<'a> RowIndex<'a> {
    fn build(rows: &'a [Bullet]) -> Self {
        let mut order = Vec::new();
        let mut by_id = HashMap::new();
        for visit in walk(rows) {
            let Some(id) = visit.bullet.id() else {
                continue;
            };
            if by_id.contains_key(id) {
                tracing::debug!(id, "ignoring duplicate bullet id in diff");
                continue;
            }
            by_id.insert(id, visit);
            order.push(visit);
        }
        Self { order, by_id }
    }
}

/// Row-level changes of one collection, split like [`CollectionDiff`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowDiff {
    /// Creates and updates, parents before children.
    pub upserts: Vec<Event>,
    /// Deletes, leaves first.
    pub deletes: Vec<Event>,
}

/// Events turning `old` rows into `new` rows for one collection.
///
/// A row is updated when its label, note, kind, signifier or parent changed.
/// Rows without an id are ignored.
pub fn diff_rows(collection: &str, old: &[Bullet], new: &[Bullet]) -> Vec<Event> {
    let RowDiff {
        mut upserts,
        deletes,
    } = diff_row_changes(collection, old, new);
    upserts.extend(deletes);
    upserts
}

/// Same as [`diff_rows`], with upserts and deletes kept apart.
pub fn diff_row_changes(collection: &str, old: &[Bullet], new: &[Bullet]) -> RowDiff {
    let old_index = RowIndex::build(old);
    let new_index = RowIndex::build(new);
    let mut diff = RowDiff::default();

    for visit in &new_index.order {
        let Some(id) = visit.bullet.id() else {
            continue;
        };
        let bullet = BulletRef::new(collection, id, visit.parent_id.map(str::to_string));
        match old_index.by_id.get(id) {
            None => diff.upserts.push(Event::BulletCreated { bullet }),
            Some(before)
                if !before.bullet.same_content(visit.bullet)
                    || before.parent_id != visit.parent_id =>
            {
                diff.upserts.push(Event::BulletUpdated { bullet });
            }
            Some(_) => {}
        }
    }

    for visit in old_index.order.iter().rev() {
        let Some(id) = visit.bullet.id() else {
            continue;
        };
        if new_index.by_id.contains_key(id) {
            continue;
        }
        diff.deletes.push(Event::BulletDeleted {
            bullet: BulletRef::new(collection, id, visit.parent_id.map(str::to_string)),
        });
    }
    diff
}

// ═══════════════════════════════════════════════════════════════════════════
// SNAPSHOTS
// ═══════════════════════════════════════════════════════════════════════════

/// Full diff between two snapshots.
///
/// Order: collection creates and updates, then row creates and updates of
/// every section in the new section order, then row deletes (leaves first
/// within a section, sections in new order followed by vanished ones), then
/// collection deletes, and finally one `OrderChanged` when the flattened tree
/// order differs. No delete precedes any create or update.
pub fn diff_snapshots(old: &Snapshot, new: &Snapshot) -> Vec<Event> {
    let collections = diff_collections(&old.metas, &new.metas);
    let mut events = collections.upserts;
    let mut deletes = Vec::new();

    let old_sections = index_sections(&old.sections);
    let new_sections = index_sections(&new.sections);

    let mut seen = HashSet::new();
    for section in &new.sections {
        let key = normalize_name(&section.id);
        if !seen.insert(key.clone()) {
            continue;
        }
        let before = old_sections
            .get(&key)
            .map(|section| section.rows.as_slice())
            .unwrap_or_default();
        let rows = diff_row_changes(&section.id, before, &section.rows);
        events.extend(rows.upserts);
        deletes.extend(rows.deletes);
    }

    let mut seen = HashSet::new();
    for section in &old.sections {
        let key = normalize_name(&section.id);
        if !seen.insert(key.clone()) || new_sections.contains_key(&key) {
            continue;
        }
        deletes.extend(diff_row_changes(&section.id, &section.rows, &[]).deletes);
    }

    events.extend(deletes);
    events.extend(collections.deletes);

    let order = new.tree.order();
    if old.tree.order() != order {
        events.push(Event::OrderChanged { order });
    }
    events
}

/// First section wins for a repeated id.
fn index_sections(sections: &[Section]) -> HashMap<String, &Section> {
    let mut index = HashMap::new();
    for section in sections {
        index.entry(normalize_name(&section.id)).or_insert(section);
    }
    index
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════
