//! Bullets: journal entries as rendered, with nested sub-entries
//!
//! Rows form an owned tree. Every walk over it carries the set of ids on the
//! current path and refuses to descend into an id it is already inside, so a
//! malformed tree (the same id nested under itself) can never loop.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// What kind of entry a bullet is.
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
pub enum BulletKind {
    #[default]
    Task,
    Completed,
    Irrelevant,
    Note,
    Event,
}

impl BulletKind {
    /// Glyph shown in front of the label.
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Task => "•",
            Self::Completed => "✕",
            Self::Irrelevant => "~",
            Self::Note => "–",
            Self::Event => "○",
        }
    }

    /// Flip between open and completed; other kinds are left alone.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Task => Self::Completed,
            Self::Completed => Self::Task,
            other => other,
        }
    }
}

/// Marker drawn in the margin next to a bullet.
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
pub enum Signifier {
    #[default]
    None,
    Priority,
    Inspiration,
    Explore,
}

impl Signifier {
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::None => " ",
            Self::Priority => "*",
            Self::Inspiration => "!",
            Self::Explore => "?",
        }
    }
}

/// One row of a section.
///
/// A bullet without an id is a rendering-only row (a heading or spacer); it
/// is displayed but never tracked by the diff.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bullet {
    pub id: Option<String>,
    pub label: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub kind: BulletKind,
    #[serde(default)]
    pub signifier: Signifier,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub children: Vec<Bullet>,
}

impl Bullet {
    /// A task bullet with an id and label.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            label: label.into(),
            ..Self::default()
        }
    }

    /// A row that is rendered but never diffed.
    pub fn rendering_only(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: BulletKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    #[must_use]
    pub fn with_signifier(mut self, signifier: Signifier) -> Self {
        self.signifier = signifier;
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children;
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Whether the row-level fields that the diff compares are equal.
    /// Children are not part of the comparison.
    pub fn same_content(&self, other: &Self) -> bool {
        self.label == other.label
            && self.note == other.note
            && self.kind == other.kind
            && self.signifier == other.signifier
    }

    /// Copy the row-level fields of `other` into `self`, keeping children.
    pub fn assign_content(&mut self, other: &Self) {
        self.label.clone_from(&other.label);
        self.note.clone_from(&other.note);
        self.kind = other.kind;
        self.signifier = other.signifier;
        self.created_at = other.created_at;
    }
}

/// One row visited by [`walk`], with its parent id.
#[derive(Debug, Clone, Copy)]
pub struct RowVisit<'a> {
    pub bullet: &'a Bullet,
    pub parent_id: Option<&'a str>,
    pub depth: usize,
}

/// Pre-order walk over a row forest.
///
/// Subtrees whose id is already on the current path are skipped.
pub fn walk(rows: &[Bullet]) -> Vec<RowVisit<'_>> {
    let mut out = Vec::new();
    let mut path = HashSet::new();
    walk_into(rows, None, 0, &mut path, &mut out);
    out
}

fn walk_into<'a>(
    rows: &'a [Bullet],
    parent_id: Option<&'a str>,
    depth: usize,
    path: &mut HashSet<&'a str>,
    out: &mut Vec<RowVisit<'a>>,
) {
    for bullet in rows {
        let entered = match bullet.id() {
            Some(id) if path.contains(id) => {
                tracing::debug!(id, "refusing to re-enter bullet already on the current path");
                continue;
            }
            Some(id) => path.insert(id),
            None => false,
        };

        out.push(RowVisit {
            bullet,
            parent_id,
            depth,
        });
        walk_into(
            &bullet.children,
            bullet.id().or(parent_id),
            depth.saturating_add(1),
            path,
            out,
        );

        if entered {
            if let Some(id) = bullet.id() {
                path.remove(id);
            }
        }
    }
}

/// Find a row by id anywhere in the forest.
pub fn find<'a>(rows: &'a [Bullet], id: &str) -> Option<&'a Bullet> {
    walk(rows)
        .into_iter()
        .map(|visit| visit.bullet)
        .find(|bullet| bullet.id() == Some(id))
}

/// Find a row by id anywhere in the forest, mutably.
pub fn find_mut<'a>(rows: &'a mut [Bullet], id: &str) -> Option<&'a mut Bullet> {
    let mut path = HashSet::new();
    find_mut_into(rows, id, &mut path)
}

fn find_mut_into<'a>(
    rows: &'a mut [Bullet],
    id: &str,
    path: &mut HashSet<String>,
) -> Option<&'a mut Bullet> {
    for bullet in rows.iter_mut() {
        if bullet.id() == Some(id) {
            return Some(bullet);
        }
        let own = bullet.id.clone();
        if let Some(own) = own.as_ref() {
            if !path.insert(own.clone()) {
                continue;
            }
        }
        let found = find_mut_into(&mut bullet.children, id, path);
        if let Some(own) = own.as_ref() {
            path.remove(own);
        }
        if found.is_some() {
            return found;
        }
    }
    None
}

/// Remove the first row with `id` anywhere in the forest, returning it
/// together with its former parent id.
pub fn remove(rows: &mut Vec<Bullet>, id: &str) -> Option<(Bullet, Option<String>)> {
    let mut path = HashSet::new();
    remove_into(rows, id, None, &mut path)
}

fn remove_into(
    rows: &mut Vec<Bullet>,
    id: &str,
    parent_id: Option<&str>,
    path: &mut HashSet<String>,
) -> Option<(Bullet, Option<String>)> {
    if let Some(idx) = rows.iter().position(|bullet| bullet.id() == Some(id)) {
        let removed = rows.remove(idx);
        return Some((removed, parent_id.map(str::to_string)));
    }
    for bullet in rows.iter_mut() {
        let own = bullet.id.clone();
        if let Some(own) = own.as_ref() {
            if !path.insert(own.clone()) {
                continue;
            }
        }
        let scope = own.as_deref().or(parent_id);
        let found = remove_into(&mut bullet.children, id, scope, path);
        if let Some(own) = own.as_ref() {
            path.remove(own);
        }
        if found.is_some() {
            return found;
        }
    }
    None
}

/// Parent id of the row with `id`, `Some(None)` for a top-level row.
pub fn parent_of<'a>(rows: &'a [Bullet], id: &str) -> Option<Option<&'a str>> {
    walk(rows)
        .into_iter()
        .find(|visit| visit.bullet.id() == Some(id))
        .map(|visit| visit.parent_id)
}

/// Number of rows in the forest, rendering-only rows included.
pub fn count(rows: &[Bullet]) -> usize {
    walk(rows).len()
}
