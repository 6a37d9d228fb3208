//! Reconciling cache
//!
//! Holds the collection tree and every collection's rows for the interface.
//! Two ways to change it:
//!
//! - optimistic mutations (`create_*`, `update_*`, `delete_*`) apply one
//!   change immediately and publish its event
//! - reconciliation (`apply_snapshot`, `sync_collection`) replaces state with
//!   a fresh read and publishes the diff
//!
//! All state sits behind one reader/writer lock. Events are published while
//! the write lock is held, so the stream follows invocation order, and
//! publishing never waits: a full stream drops the newest event.

mod state;

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use tokio::sync::mpsc;

use self::state::{CacheState, Focus};
use crate::{
    config::CacheConfig,
    diff::{diff_rows, diff_snapshots},
    events::{BulletRef, CollectionRef, Event, EventPublisher},
    model::{
        assemble_rows,
        bullet::{find, find_mut, parent_of, remove},
        canonical_name, normalize_name, Bullet, CollectionMeta, Section, SectionTemplate,
    },
    snapshot::Snapshot,
    store::JournalStore,
    tree::{ParsedCollectionTree, TreeOrder},
    Error, Result,
};

// ═══════════════════════════════════════════════════════════════════════════
// TYPES
// ═══════════════════════════════════════════════════════════════════════════

/// In-memory view of the journal, kept consistent with the store.
pub struct ReconcilingCache {
    state: RwLock<CacheState>,
    order: TreeOrder,
    events: EventPublisher,
}

// ═══════════════════════════════════════════════════════════════════════════
// CONSTRUCTION & READS
// ═══════════════════════════════════════════════════════════════════════════

impl ReconcilingCache {
    /// An empty cache and the receiving end of its event stream.
    pub fn new(config: &CacheConfig, order: TreeOrder) -> (Self, mpsc::Receiver<Event>) {
        let (events, rx) = EventPublisher::channel(config.event_capacity);
        (
            Self {
                state: RwLock::new(CacheState::default()),
                order,
                events,
            },
            rx,
        )
    }

    fn read(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deep copy of the current state.
    pub fn snapshot(&self) -> Snapshot {
        self.read().snapshot()
    }

    pub fn tree(&self) -> ParsedCollectionTree {
        self.read().tree.clone()
    }

    /// One section by collection name (case-insensitive).
    pub fn section(&self, collection: &str) -> Option<Section> {
        let state = self.read();
        let idx = state.section_index(collection)?;
        state.sections.get(idx).cloned()
    }

    pub const fn order(&self) -> &TreeOrder {
        &self.order
    }

    /// Registered section templates keyed by normalized collection name.
    pub fn templates(&self) -> HashMap<String, SectionTemplate> {
        self.read().templates.clone()
    }

    /// Focused collection and bullet.
    pub fn focus(&self) -> (Option<String>, Option<String>) {
        let focus = self.read().focus.clone();
        (focus.collection, focus.bullet)
    }

    /// Events discarded because the stream was full.
    pub fn dropped_events(&self) -> u64 {
        self.events.dropped()
    }

    fn order_event(tree: &ParsedCollectionTree) -> Event {
        Event::OrderChanged {
            order: tree.order(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// BULK REPLACEMENT
// ═══════════════════════════════════════════════════════════════════════════

impl ReconcilingCache {
    /// Replace the collection list without diffing.
    pub fn set_collections(&self, metas: Vec<CollectionMeta>) -> ParsedCollectionTree {
        let mut state = self.write();
        state.metas = metas
            .into_iter()
            .map(|meta| CollectionMeta::new(&meta.name, meta.kind))
            .filter(|meta| !meta.name.is_empty())
            .collect();
        state.rebuild_tree(&self.order);
        self.events.publish(Self::order_event(&state.tree));
        state.tree.clone()
    }

    /// Replace every section without diffing.
    pub fn set_sections(&self, sections: Vec<Section>) {
        let mut state = self.write();
        state.sections = sections;
        self.events.publish(Self::order_event(&state.tree));
    }

    /// Replace all state with `snapshot`, publishing the diff first.
    ///
    /// Collections the snapshot marks unreadable keep their cached rows and
    /// produce no row events. Returns the number of events published.
    pub fn apply_snapshot(&self, snapshot: Snapshot) -> usize {
        let unreadable = snapshot.unreadable;
        let mut next = Snapshot::from_parts(snapshot.metas, snapshot.sections, &self.order);
        let mut state = self.write();
        for section in &mut next.sections {
            if !unreadable.contains(&normalize_name(&section.id)) {
                continue;
            }
            if let Some(previous) = state
                .section_index(&section.id)
                .and_then(|idx| state.sections.get(idx))
            {
                tracing::debug!(
                    collection = %section.id,
                    "keeping cached rows of unreadable collection"
                );
                section.rows.clone_from(&previous.rows);
            }
        }
        let events = diff_snapshots(&state.snapshot(), &next);
        let published = self.events.publish_all(events);

        state.metas = next.metas;
        state.tree = next.tree;
        state.sections = next.sections;
        tracing::debug!(events = published, "applied snapshot");
        published
    }

    /// Re-read one collection and reconcile only its rows.
    ///
    /// The store is read before the lock is taken. Returns the number of
    /// events published.
    pub async fn sync_collection(&self, store: &dyn JournalStore, collection: &str) -> Result<usize> {
        let name = require_collection(collection)?;
        let entries = store.list_entries(&name).await?;
        Ok(self.replace_rows(&name, assemble_rows(&entries)))
    }

    fn replace_rows(&self, collection: &str, rows: Vec<Bullet>) -> usize {
        let mut state = self.write();
        if state.section_index(collection).is_none() && rows.is_empty() {
            return 0;
        }
        let idx = state.ensure_section(collection);
        let Some(section) = state.sections.get_mut(idx) else {
            return 0;
        };
        let events = diff_rows(&section.id, &section.rows, &rows);
        section.rows = rows;
        let published = self.events.publish_all(events);
        tracing::debug!(collection, events = published, "synced collection");
        published
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COLLECTION MUTATIONS
// ═══════════════════════════════════════════════════════════════════════════

impl ReconcilingCache {
    /// Add a collection. An existing collection with the same name is
    /// updated instead.
    pub fn create_collection(&self, meta: CollectionMeta) -> Result<ParsedCollectionTree> {
        let meta = CollectionMeta::new(require_collection(&meta.name)?, meta.kind);
        let mut state = self.write();

        let event = match state.meta_index(&meta.name) {
            Some(idx) => {
                let previous = std::mem::replace(&mut state.metas[idx], meta.clone());
                Event::CollectionUpdated {
                    current: CollectionRef::from(&meta),
                    previous: Some(CollectionRef::from(&previous)),
                }
            }
            None => {
                state.metas.push(meta.clone());
                Event::CollectionCreated {
                    collection: CollectionRef::from(&meta),
                }
            }
        };
        state.ensure_section(&meta.name);
        state.rebuild_tree(&self.order);

        self.events.publish(event);
        self.events.publish(Self::order_event(&state.tree));
        Ok(state.tree.clone())
    }

    /// Update (or rename, when `previous` names another collection) a
    /// collection. A rename carries the section and its template along.
    ///
    /// A collection that is not cached is left alone.
    pub fn update_collection(
        &self,
        current: CollectionMeta,
        previous: Option<&str>,
    ) -> Result<ParsedCollectionTree> {
        let current = CollectionMeta::new(require_collection(&current.name)?, current.kind);
        let lookup = previous.map_or_else(|| current.name.clone(), canonical_name);
        let mut state = self.write();

        let Some(idx) = state.meta_index(&lookup) else {
            tracing::debug!(collection = %lookup, "update for unknown collection ignored");
            return Ok(state.tree.clone());
        };
        let renamed = normalize_name(&lookup) != current.key();
        if renamed && state.meta_index(&current.name).is_some() {
            return Err(Error::invalid_input(format!(
                "collection {} already exists",
                current.name
            )));
        }

        let before = std::mem::replace(&mut state.metas[idx], current.clone());
        if renamed {
            if let Some(template) = state.templates.remove(&normalize_name(&lookup)) {
                state.templates.insert(current.key(), template);
            }
            if let Some(section) = state.section_mut(&lookup) {
                section.id.clone_from(&current.name);
            }
        }
        state.rebuild_tree(&self.order);

        self.events.publish(Event::CollectionUpdated {
            current: CollectionRef::from(&current),
            previous: Some(CollectionRef::from(&before)),
        });
        self.events.publish(Self::order_event(&state.tree));
        Ok(state.tree.clone())
    }

    /// Remove a collection with its section. Unknown names are a no-op.
    pub fn delete_collection(&self, name: &str) -> Result<ParsedCollectionTree> {
        let name = require_collection(name)?;
        let mut state = self.write();

        let Some(idx) = state.meta_index(&name) else {
            tracing::debug!(collection = %name, "delete for unknown collection ignored");
            return Ok(state.tree.clone());
        };
        let removed = state.metas.remove(idx);
        if let Some(section_idx) = state.section_index(&name) {
            state.sections.remove(section_idx);
        }
        state.templates.remove(&removed.key());
        state.rebuild_tree(&self.order);

        self.events.publish(Event::CollectionDeleted {
            collection: CollectionRef::from(&removed),
        });
        self.events.publish(Self::order_event(&state.tree));
        Ok(state.tree.clone())
    }

    /// Title and subtitle used when the collection's section is created
    /// lazily.
    pub fn register_section_template(
        &self,
        collection: &str,
        template: SectionTemplate,
    ) -> Result<()> {
        let name = require_collection(collection)?;
        self.write().templates.insert(normalize_name(&name), template);
        Ok(())
    }

    /// Record the focused collection and bullet; publishes `FocusChanged`
    /// when either changes.
    pub fn set_focus(&self, collection: Option<&str>, bullet: Option<&str>) {
        let next = Focus {
            collection: collection.map(canonical_name),
            bullet: bullet.map(str::to_string),
        };
        let mut state = self.write();
        if state.focus == next {
            return;
        }
        state.focus = next.clone();
        self.events.publish(Event::FocusChanged {
            collection: next.collection,
            bullet: next.bullet,
        });
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// BULLET MUTATIONS
// ═══════════════════════════════════════════════════════════════════════════

impl ReconcilingCache {
    /// Append a top-level bullet, creating the section from its template if
    /// needed. A bullet without an id gets a fresh one; a bullet whose id is
    /// already in the section updates that row instead.
    ///
    /// Returns the bullet's id.
    pub fn create_bullet(&self, collection: &str, bullet: Bullet) -> Result<String> {
        let name = require_collection(collection)?;
        let (id, bullet) = prepare_new_bullet(bullet)?;

        let mut state = self.write();
        let idx = state.ensure_section(&name);
        let Some(section) = state.sections.get_mut(idx) else {
            return Ok(id);
        };

        let event = match upsert_existing(section, &id, &bullet) {
            Some(event) => event,
            None => {
                section.rows.push(bullet);
                Event::BulletCreated {
                    bullet: BulletRef::new(section.id.clone(), id.clone(), None),
                }
            }
        };
        self.events.publish(event);
        Ok(id)
    }

    /// Nest a new bullet under `parent_id`. A missing parent (or section) is
    /// a no-op and returns `None`.
    pub fn create_child_bullet(
        &self,
        collection: &str,
        parent_id: &str,
        bullet: Bullet,
    ) -> Result<Option<String>> {
        let name = require_collection(collection)?;
        let (id, bullet) = prepare_new_bullet(bullet)?;

        let mut state = self.write();
        let Some(section) = state.section_mut(&name) else {
            return Ok(None);
        };
        if find(&section.rows, parent_id).is_none() {
            tracing::debug!(collection = %name, parent_id, "parent gone, child not created");
            return Ok(None);
        }

        let event = match upsert_existing(section, &id, &bullet) {
            Some(event) => event,
            None => {
                let section_id = section.id.clone();
                let Some(parent) = find_mut(&mut section.rows, parent_id) else {
                    return Ok(None);
                };
                parent.children.push(bullet);
                Event::BulletCreated {
                    bullet: BulletRef::new(section_id, id.clone(), Some(parent_id.to_string())),
                }
            }
        };
        self.events.publish(event);
        Ok(Some(id))
    }

    /// Replace a bullet's content, keeping its children. Returns false when
    /// the bullet is not cached.
    pub fn update_bullet(&self, collection: &str, bullet: &Bullet) -> Result<bool> {
        let name = require_collection(collection)?;
        require_label(&bullet.label)?;
        let id = bullet
            .id()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| Error::invalid_input("bullet id is empty"))?;

        let mut state = self.write();
        let Some(section) = state.section_mut(&name) else {
            return Ok(false);
        };
        Ok(match upsert_existing(section, id, bullet) {
            Some(event) => {
                self.events.publish(event);
                true
            }
            None => false,
        })
    }

    /// Remove a bullet and everything nested under it. Returns false when
    /// the bullet is not cached.
    pub fn delete_bullet(&self, collection: &str, id: &str) -> Result<bool> {
        let name = require_collection(collection)?;
        if id.trim().is_empty() {
            return Err(Error::invalid_input("bullet id is empty"));
        }

        let mut state = self.write();
        let Some(section) = state.section_mut(&name) else {
            return Ok(false);
        };
        let Some((_, parent_id)) = remove(&mut section.rows, id) else {
            tracing::debug!(collection = %name, id, "delete for unknown bullet ignored");
            return Ok(false);
        };
        self.events.publish(Event::BulletDeleted {
            bullet: BulletRef::new(section.id.clone(), id, parent_id),
        });
        Ok(true)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════

fn require_collection(name: &str) -> Result<String> {
    let name = canonical_name(name);
    if name.is_empty() {
        return Err(Error::invalid_input("collection id is empty"));
    }
    Ok(name)
}

fn require_label(label: &str) -> Result<()> {
    if label.trim().is_empty() {
        return Err(Error::invalid_input("bullet label is empty"));
    }
    Ok(())
}

/// Validate a bullet for insertion and make sure it has an id.
fn prepare_new_bullet(mut bullet: Bullet) -> Result<(String, Bullet)> {
    require_label(&bullet.label)?;
    let id = match bullet.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => uuid::Uuid::new_v4().to_string(),
    };
    bullet.id = Some(id.clone());
    if bullet.created_at.is_none() {
        bullet.created_at = Some(chrono::Utc::now());
    }
    Ok((id, bullet))
}

/// Update the row with `id` in place, if present, and return its event.
fn upsert_existing(section: &mut Section, id: &str, bullet: &Bullet) -> Option<Event> {
    let parent_id = parent_of(&section.rows, id)?.map(str::to_string);
    let node = find_mut(&mut section.rows, id)?;
    node.assign_content(bullet);
    Some(Event::BulletUpdated {
        bullet: BulletRef::new(section.id.clone(), id, parent_id),
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BulletKind;

    fn cache() -> (ReconcilingCache, mpsc::Receiver<Event>) {
        ReconcilingCache::new(&CacheConfig::default(), TreeOrder::new(["Inbox"]))
    }

    fn drain(rx: &mut mpsc::Receiver<Event>) -> Vec<Event> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Test 1: Validation rejects input without events
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    #[test]
    fn test_empty_collection_or_label_rejected() {
        let (cache, mut rx) = cache();
        assert!(matches!(
            cache.create_bullet("  ", Bullet::new("b1", "label")),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            cache.create_bullet("Inbox", Bullet::new("b1", " ")),
            Err(Error::Validation(_))
        ));
        assert!(cache.create_collection(CollectionMeta::generic("/")).is_err());
        assert!(drain(&mut rx).is_empty());
        assert!(cache.snapshot().sections.is_empty());
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Test 2: Create on an existing id becomes an update
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    #[test]
    fn test_create_existing_id_updates() -> Result<()> {
        let (cache, mut rx) = cache();
        cache.create_bullet("Inbox", Bullet::new("b1", "buy milk"))?;
        cache.create_bullet("Inbox", Bullet::new("b1", "buy oat milk"))?;

        let events = drain(&mut rx);
        assert!(matches!(&events[0], Event::BulletCreated { .. }));
        assert!(matches!(&events[1], Event::BulletUpdated { .. }));
        let section = cache.section("Inbox");
        assert_eq!(section.as_ref().map(|s| s.rows.len()), Some(1));
        assert_eq!(
            section.and_then(|s| s.rows.first().map(|b| b.label.clone())),
            Some("buy oat milk".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_create_without_id_assigns_one() -> Result<()> {
        let (cache, _rx) = cache();
        let id = cache.create_bullet("Inbox", Bullet::rendering_only("call mom"))?;
        assert!(!id.is_empty());
        let section = cache.section("Inbox");
        assert!(section.is_some_and(|s| find(&s.rows, &id).is_some()));
        Ok(())
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Test 3: Child bullets
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    #[test]
    fn test_child_bullet_under_parent() -> Result<()> {
        let (cache, mut rx) = cache();
        cache.create_bullet("Inbox", Bullet::new("p", "plan trip"))?;
        let child = cache.create_child_bullet("Inbox", "p", Bullet::new("c", "book train"))?;
        assert_eq!(child.as_deref(), Some("c"));

        let events = drain(&mut rx);
        assert!(matches!(
            events.last(),
            Some(Event::BulletCreated { bullet }) if bullet.parent_id.as_deref() == Some("p")
        ));
        Ok(())
    }

    #[test]
    fn test_child_bullet_missing_parent_is_noop() -> Result<()> {
        let (cache, mut rx) = cache();
        cache.create_bullet("Inbox", Bullet::new("p", "plan trip"))?;
        let _ = drain(&mut rx);

        let child = cache.create_child_bullet("Inbox", "gone", Bullet::new("c", "orphan"))?;
        assert_eq!(child, None);
        assert!(drain(&mut rx).is_empty());
        Ok(())
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Test 4: Update keeps children
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    #[test]
    fn test_update_keeps_children() -> Result<()> {
        let (cache, _rx) = cache();
        cache.create_bullet("Inbox", Bullet::new("p", "plan trip"))?;
        cache.create_child_bullet("Inbox", "p", Bullet::new("c", "book train"))?;

        let updated = cache.update_bullet(
            "Inbox",
            &Bullet::new("p", "plan trip").with_kind(BulletKind::Completed),
        )?;
        assert!(updated);

        let section = cache.section("Inbox");
        let parent = section.as_ref().and_then(|s| find(&s.rows, "p"));
        assert_eq!(parent.map(|p| p.kind), Some(BulletKind::Completed));
        assert_eq!(parent.map(|p| p.children.len()), Some(1));
        Ok(())
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Test 5: Collection rename carries section and template
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    #[test]
    fn test_rename_carries_section() -> Result<()> {
        let (cache, mut rx) = cache();
        cache.create_collection(CollectionMeta::generic("Old"))?;
        cache.register_section_template("Old", SectionTemplate::new("Old", "kept"))?;
        cache.create_bullet("Old", Bullet::new("b1", "row"))?;
        let _ = drain(&mut rx);

        let tree = cache.update_collection(CollectionMeta::generic("New"), Some("Old"))?;
        assert!(tree.find("New").is_some());
        assert!(tree.find("Old").is_none());
        assert_eq!(cache.section("New").map(|s| s.rows.len()), Some(1));
        assert!(cache.templates().contains_key("new"));

        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            Event::CollectionUpdated { current, previous: Some(previous) }
                if current.name == "New" && previous.name == "Old"
        ));
        assert!(matches!(&events[1], Event::OrderChanged { .. }));
        Ok(())
    }

    #[test]
    fn test_rename_onto_existing_is_rejected() -> Result<()> {
        let (cache, _rx) = cache();
        cache.create_collection(CollectionMeta::generic("A"))?;
        cache.create_collection(CollectionMeta::generic("B"))?;
        let result = cache.update_collection(CollectionMeta::generic("b"), Some("A"));
        assert!(matches!(result, Err(Error::Validation(_))));
        Ok(())
    }

    #[test]
    fn test_delete_unknown_collection_is_noop() -> Result<()> {
        let (cache, mut rx) = cache();
        let tree = cache.delete_collection("Nowhere")?;
        assert!(tree.is_empty());
        assert!(drain(&mut rx).is_empty());
        Ok(())
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Test 6: Focus and backpressure
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    #[test]
    fn test_focus_emits_only_on_change() {
        let (cache, mut rx) = cache();
        cache.set_focus(Some("Inbox"), Some("b1"));
        cache.set_focus(Some("Inbox"), Some("b1"));
        assert_eq!(drain(&mut rx).len(), 1);
        assert_eq!(
            cache.focus(),
            (Some("Inbox".to_string()), Some("b1".to_string()))
        );
    }

    #[test]
    fn test_full_stream_drops_without_blocking() -> Result<()> {
        let (cache, mut rx) =
            ReconcilingCache::new(&CacheConfig { event_capacity: 1 }, TreeOrder::default());
        cache.create_bullet("Inbox", Bullet::new("a", "a"))?;
        cache.create_bullet("Inbox", Bullet::new("b", "b"))?;
        assert_eq!(cache.dropped_events(), 1);
        assert_eq!(drain(&mut rx).len(), 1);
        assert_eq!(cache.section("Inbox").map(|s| s.rows.len()), Some(2));
        Ok(())
    }

    #[test]
    fn test_snapshot_is_independent_copy() -> Result<()> {
        let (cache, _rx) = cache();
        cache.create_bullet("Inbox", Bullet::new("a", "a"))?;
        let mut copy = cache.snapshot();
        copy.sections.clear();
        assert_eq!(cache.snapshot().sections.len(), 1);
        Ok(())
    }
}
