//! Configuration layering
//!
//! Each layer is a partial TOML document. Layers are merged table by table
//! before deserializing, so a key set in the global file survives an explicit
//! file that does not mention it. Arrays and scalars are replaced, not
//! appended.

use toml::Table;

// ═══════════════════════════════════════════════════════════════════════════
// MERGE
// ═══════════════════════════════════════════════════════════════════════════

/// Merge `overlay` into `base`; overlay values win.
pub(super) fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(src: &str) -> Table {
        src.parse::<Table>().unwrap_or_default()
    }

    #[test]
    fn test_nested_tables_merge_key_by_key() {
        let mut base = table("[watch]\nenabled = false\ndebounce_ms = 300\n");
        merge_tables(&mut base, table("[watch]\ndebounce_ms = 50\n"));

        let watch = base.get("watch").and_then(toml::Value::as_table);
        assert_eq!(
            watch.and_then(|w| w.get("enabled")).and_then(toml::Value::as_bool),
            Some(false)
        );
        assert_eq!(
            watch
                .and_then(|w| w.get("debounce_ms"))
                .and_then(toml::Value::as_integer),
            Some(50)
        );
    }

    #[test]
    fn test_arrays_are_replaced() {
        let mut base = table("[tree]\npinned = [\"Inbox\", \"Today\"]\n");
        merge_tables(&mut base, table("[tree]\npinned = [\"Work\"]\n"));
        let pinned = base
            .get("tree")
            .and_then(|t| t.get("pinned"))
            .and_then(toml::Value::as_array)
            .map(Vec::len);
        assert_eq!(pinned, Some(1));
    }
}
