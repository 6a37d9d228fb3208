//! Collection hierarchy
//!
//! [`parse_tree`] turns the flat list of [`CollectionMeta`] into a forest by
//! splitting names on `/`. Parsing is a pure function of its input: the same
//! metas always yield the same tree.
//!
//! Sibling order is decided by a [`TreeOrder`]: pinned names first, in the
//! order they were pinned, then everything else lexicographically.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::{
    collection::{normalize_name, segments},
    CollectionKind, CollectionMeta,
};

// ═══════════════════════════════════════════════════════════════════════════
// TYPES
// ═══════════════════════════════════════════════════════════════════════════

/// Caller-supplied sibling priority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeOrder {
    pinned: Vec<String>,
}

impl TreeOrder {
    pub fn new<I, S>(pinned: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            pinned: pinned
                .into_iter()
                .map(|name| normalize_name(name.as_ref()))
                .collect(),
        }
    }

    /// Lower sorts first. Unpinned names share the lowest priority.
    pub fn priority(&self, meta: &CollectionMeta) -> usize {
        let key = meta.key();
        self.pinned
            .iter()
            .position(|pinned| *pinned == key)
            .unwrap_or(self.pinned.len())
    }

    fn compare(&self, a: &CollectionMeta, b: &CollectionMeta) -> Ordering {
        self.priority(a)
            .cmp(&self.priority(b))
            .then_with(|| a.name.cmp(&b.name))
    }
}

/// One collection and its nested children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNode {
    pub meta: CollectionMeta,
    /// True when no meta with this name exists and the node was only created
    /// to hold children.
    pub implicit: bool,
    pub children: Vec<CollectionNode>,
}

impl CollectionNode {
    fn implicit(name: String) -> Self {
        Self {
            meta: CollectionMeta {
                name,
                kind: CollectionKind::Generic,
            },
            implicit: true,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }
}

/// Forest of collections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCollectionTree {
    pub roots: Vec<CollectionNode>,
}

impl ParsedCollectionTree {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes, implicit ones included.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Pre-order iteration with depth.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &CollectionNode)> {
        let mut stack: Vec<(usize, &CollectionNode)> =
            self.roots.iter().rev().map(|node| (0, node)).collect();
        std::iter::from_fn(move || {
            let (depth, node) = stack.pop()?;
            stack.extend(
                node.children
                    .iter()
                    .rev()
                    .map(|child| (depth.saturating_add(1), child)),
            );
            Some((depth, node))
        })
    }

    /// Names in display order.
    pub fn order(&self) -> Vec<String> {
        self.iter().map(|(_, node)| node.meta.name.clone()).collect()
    }

    /// Look a node up by name (case-insensitive).
    pub fn find(&self, name: &str) -> Option<&CollectionNode> {
        let key = normalize_name(name);
        self.iter()
            .map(|(_, node)| node)
            .find(|node| node.meta.key() == key)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PARSING
// ═══════════════════════════════════════════════════════════════════════════

/// Build the collection forest.
///
/// Names are canonicalized first; metas that canonicalize to an empty name
/// are dropped, and when two metas share a name the later one wins. Missing
/// intermediate parents are filled in with implicit generic nodes so every
/// node's path from its root spells its full name.
pub fn parse_tree(metas: &[CollectionMeta], order: &TreeOrder) -> ParsedCollectionTree {
    let mut canonical: Vec<CollectionMeta> = Vec::with_capacity(metas.len());
    for meta in metas {
        let meta = CollectionMeta::new(&meta.name, meta.kind);
        if meta.name.is_empty() {
            continue;
        }
        match canonical.iter_mut().find(|m| m.key() == meta.key()) {
            Some(existing) => *existing = meta,
            None => canonical.push(meta),
        }
    }
    // Parents before children so implicit nodes get replaced, not duplicated.
    canonical.sort_by_key(CollectionMeta::depth);

    let mut roots = Vec::new();
    for meta in canonical {
        insert(&mut roots, meta);
    }
    sort_nodes(&mut roots, order);
    ParsedCollectionTree { roots }
}

fn insert(level: &mut Vec<CollectionNode>, meta: CollectionMeta) {
    let parts: Vec<&str> = segments(&meta.name).collect();
    let mut level = level;
    let mut prefix = String::new();

    for (idx, part) in parts.iter().enumerate() {
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(part);
        let key = normalize_name(&prefix);
        let last = idx + 1 == parts.len();

        let position = level.iter().position(|node| node.meta.key() == key);
        let position = match position {
            Some(position) => {
                if last {
                    if let Some(node) = level.get_mut(position) {
                        node.meta = meta.clone();
                        node.implicit = false;
                    }
                }
                position
            }
            None => {
                let node = if last {
                    CollectionNode {
                        meta: meta.clone(),
                        implicit: false,
                        children: Vec::new(),
                    }
                } else {
                    CollectionNode::implicit(prefix.clone())
                };
                level.push(node);
                level.len() - 1
            }
        };

        match level.get_mut(position) {
            Some(node) => level = &mut node.children,
            None => return,
        }
    }
}

fn sort_nodes(nodes: &mut [CollectionNode], order: &TreeOrder) {
    nodes.sort_by(|a, b| order.compare(&a.meta, &b.meta));
    for node in nodes.iter_mut() {
        sort_nodes(&mut node.children, order);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════
