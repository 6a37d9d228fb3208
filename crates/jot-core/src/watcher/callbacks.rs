//! Notification classification
//!
//! Maps a raw notification from the filesystem into change signals and
//! registry updates. Layout assumed: `<base>/<bucket>/<entry file>` for
//! entries, anything directly under `<base>` for the catalog.

use std::path::{Component, Path, PathBuf};

use notify::{event::CreateKind, Event, EventKind};

use super::{state::WatchRegistry, BucketDecoder, ChangeSignal};

// ═══════════════════════════════════════════════════════════════════════════
// TYPES
// ═══════════════════════════════════════════════════════════════════════════

/// Outcome of classifying one notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    pub signals: Vec<ChangeSignal>,
    /// Bucket directories that appeared and need a watch.
    pub new_dirs: Vec<PathBuf>,
    /// Watched bucket directories that are gone.
    pub removed_dirs: Vec<PathBuf>,
}

impl Classified {
    fn signal(&mut self, signal: ChangeSignal) {
        if !self.signals.contains(&signal) {
            self.signals.push(signal);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty() && self.new_dirs.is_empty() && self.removed_dirs.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// EVENT HANDLERS
// ═══════════════════════════════════════════════════════════════════════════

/// Classify a notification.
///
/// - access-only notifications are ignored
/// - a path inside a bucket the decoder understands ⇒ `Changed`
/// - a new or removed bucket directory ⇒ registry update plus
///   `CatalogInvalidated`
/// - anything else (the index file, unknown buckets, path-less rescans) ⇒
///   `CatalogInvalidated`
pub fn classify(
    event: &Event,
    base: &Path,
    registry: &WatchRegistry,
    decoder: &BucketDecoder,
) -> Classified {
    let mut out = Classified::default();
    if matches!(event.kind, EventKind::Access(_)) {
        return out;
    }
    if event.paths.is_empty() {
        out.signal(ChangeSignal::CatalogInvalidated);
        return out;
    }

    for path in &event.paths {
        let Some(bucket) = bucket_of(path, base) else {
            out.signal(ChangeSignal::CatalogInvalidated);
            continue;
        };

        if bucket.is_dir_itself {
            let watched = registry.contains(path);
            let removed = matches!(event.kind, EventKind::Remove(_)) || !path.exists();
            if watched && removed {
                out.removed_dirs.push(path.clone());
                out.signal(ChangeSignal::CatalogInvalidated);
                continue;
            }
            let created_dir = matches!(event.kind, EventKind::Create(CreateKind::Folder))
                || (!removed && path.is_dir());
            if !watched && created_dir {
                out.new_dirs.push(path.clone());
                out.signal(ChangeSignal::CatalogInvalidated);
                continue;
            }
            if !watched {
                // A plain file directly under the base: the catalog index.
                out.signal(ChangeSignal::CatalogInvalidated);
                continue;
            }
        }

        match decoder(&bucket.name) {
            Some(collection) => out.signal(ChangeSignal::Changed { collection }),
            None => out.signal(ChangeSignal::CatalogInvalidated),
        }
    }
    out
}

struct BucketPath {
    name: String,
    /// The path names the bucket entry itself, not something inside it.
    is_dir_itself: bool,
}

/// First path segment below `base`, or `None` for `base` itself and paths
/// outside it.
fn bucket_of(path: &Path, base: &Path) -> Option<BucketPath> {
    let relative = path.strip_prefix(base).ok()?;
    let mut components = relative.components();
    let name = match components.next()? {
        Component::Normal(name) => name.to_str()?.to_string(),
        _ => return None,
    };
    Some(BucketPath {
        name,
        is_dir_itself: components.next().is_none(),
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════
