//! Persisted journal entries
//!
//! An [`Entry`] is the flat, stored form of a [`Bullet`]. Nesting is expressed
//! through `parent_id`; [`assemble_rows`] turns a collection's entries back
//! into a row tree.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::bullet::{Bullet, BulletKind, Signifier};

/// One stored entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub collection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub label: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub kind: BulletKind,
    #[serde(default)]
    pub signifier: Signifier,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    /// A new task entry with a fresh id.
    pub fn new(collection: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            collection: collection.into(),
            parent_id: None,
            label: label.into(),
            note: String::new(),
            kind: BulletKind::default(),
            signifier: Signifier::default(),
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: BulletKind) -> Self {
        self.kind = kind;
        self
    }

    /// Rendered form without children.
    pub fn to_bullet(&self) -> Bullet {
        Bullet {
            id: Some(self.id.clone()),
            label: self.label.clone(),
            note: self.note.clone(),
            kind: self.kind,
            signifier: self.signifier,
            created_at: Some(self.created_at),
            children: Vec::new(),
        }
    }

    /// Stored form of a bullet. Rendering-only rows have no stored form.
    pub fn from_bullet(
        collection: impl Into<String>,
        parent_id: Option<String>,
        bullet: &Bullet,
    ) -> Option<Self> {
        let id = bullet.id.clone()?;
        Some(Self {
            id,
            collection: collection.into(),
            parent_id,
            label: bullet.label.clone(),
            note: bullet.note.clone(),
            kind: bullet.kind,
            signifier: bullet.signifier,
            created_at: bullet.created_at.unwrap_or_else(Utc::now),
        })
    }
}

/// Build the row tree of one collection from its flat entries.
///
/// Siblings are ordered by creation time, then id. An entry whose parent is
/// missing becomes a top-level row. Entries caught in a parent cycle are
/// broken at the first one reached in sibling order, which becomes a
/// top-level row. Duplicate ids keep the first occurrence.
pub fn assemble_rows(entries: &[Entry]) -> Vec<Bullet> {
    let mut ordered: Vec<&Entry> = Vec::with_capacity(entries.len());
    let mut seen = HashSet::new();
    for entry in entries {
        if seen.insert(entry.id.as_str()) {
            ordered.push(entry);
        } else {
            tracing::warn!(id = %entry.id, "skipping duplicate entry id");
        }
    }
    ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

    let known: HashSet<&str> = ordered.iter().map(|e| e.id.as_str()).collect();
    let mut children: HashMap<&str, Vec<&Entry>> = HashMap::new();
    let mut roots: Vec<&Entry> = Vec::new();
    for entry in ordered.iter().copied() {
        match entry.parent_id.as_deref() {
            Some(parent) if parent != entry.id && known.contains(parent) => {
                children.entry(parent).or_default().push(entry);
            }
            _ => roots.push(entry),
        }
    }

    let mut placed: HashSet<&str> = HashSet::new();
    let mut rows: Vec<Bullet> = roots
        .iter()
        .copied()
        .map(|entry| build_node(entry, &children, &mut placed))
        .collect();

    // Whatever is left is only reachable through a parent cycle.
    for entry in ordered.iter().copied() {
        if !placed.contains(entry.id.as_str()) {
            tracing::warn!(id = %entry.id, "breaking parent cycle at entry");
            rows.push(build_node(entry, &children, &mut placed));
        }
    }
    rows
}

fn build_node<'a>(
    entry: &'a Entry,
    children: &HashMap<&str, Vec<&'a Entry>>,
    placed: &mut HashSet<&'a str>,
) -> Bullet {
    placed.insert(entry.id.as_str());
    let mut bullet = entry.to_bullet();
    if let Some(kids) = children.get(entry.id.as_str()) {
        for &kid in kids {
            if placed.contains(kid.id.as_str()) {
                continue;
            }
            let node = build_node(kid, children, placed);
            bullet.children.push(node);
        }
    }
    bullet
}

/// Flatten a row tree back into entries, parents before children.
pub fn flatten_rows(collection: &str, rows: &[Bullet]) -> Vec<Entry> {
    super::bullet::walk(rows)
        .into_iter()
        .filter_map(|visit| {
            Entry::from_bullet(
                collection,
                visit.parent_id.map(str::to_string),
                visit.bullet,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn entry(id: &str, parent: Option<&str>, minute: u32) -> Entry {
        Entry {
            id: id.to_string(),
            collection: "Inbox".to_string(),
            parent_id: parent.map(str::to_string),
            label: format!("label {id}"),
            note: String::new(),
            kind: BulletKind::Task,
            signifier: Signifier::None,
            created_at: Utc
                .with_ymd_and_hms(2025, 10, 1, 9, minute, 0)
                .single()
                .unwrap_or_else(Utc::now),
        }
    }

    #[test]
    fn test_assemble_nests_children_in_time_order() {
        let entries = vec![
            entry("child-late", Some("root"), 5),
            entry("root", None, 1),
            entry("child-early", Some("root"), 2),
        ];
        let rows = assemble_rows(&entries);
        assert_eq!(rows.len(), 1);
        let kids: Vec<_> = rows[0].children.iter().filter_map(Bullet::id).collect();
        assert_eq!(kids, vec!["child-early", "child-late"]);
    }

    #[test]
    fn test_orphans_become_top_level() {
        let entries = vec![entry("orphan", Some("gone"), 1), entry("top", None, 2)];
        let rows = assemble_rows(&entries);
        let ids: Vec<_> = rows.iter().filter_map(Bullet::id).collect();
        assert_eq!(ids, vec!["orphan", "top"]);
    }

    #[test]
    fn test_parent_cycle_is_broken() {
        let entries = vec![entry("a", Some("b"), 1), entry("b", Some("a"), 2)];
        let rows = assemble_rows(&entries);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id(), Some("a"));
        assert_eq!(rows[0].children.len(), 1);
        assert_eq!(rows[0].children[0].id(), Some("b"));
        assert!(rows[0].children[0].children.is_empty());
    }

    #[test]
    fn test_self_parent_is_top_level() {
        let rows = assemble_rows(&[entry("me", Some("me"), 1)]);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].children.is_empty());
    }

    #[test]
    fn test_flatten_then_assemble_keeps_shape() {
        let entries = vec![
            entry("root", None, 1),
            entry("kid", Some("root"), 2),
            entry("grandkid", Some("kid"), 3),
        ];
        let rows = assemble_rows(&entries);
        let flat = flatten_rows("Inbox", &rows);
        assert_eq!(flat, entries);
    }
}
