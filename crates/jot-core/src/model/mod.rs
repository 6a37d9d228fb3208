//! Journal data model
//!
//! - `collection`: collection metadata and hierarchical names
//! - `bullet`: rendered rows and the guarded tree walks over them
//! - `entry`: the stored form of a bullet and row assembly
//! - `section`: per-collection display projection

pub mod bullet;
pub mod collection;
pub mod entry;
pub mod section;

pub use bullet::{Bullet, BulletKind, Signifier};
pub use collection::{
    canonical_name, normalize_name, same_name, CollectionKind, CollectionMeta, HIERARCHY_SEPARATOR,
};
pub use entry::{assemble_rows, flatten_rows, Entry};
pub use section::{Section, SectionTemplate};
