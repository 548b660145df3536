//! Configuration merge logic
//!
//! Composes the root configuration (base) with a subdirectory
//! configuration (overlay):
//! - `grades`, `calculation`: one-level merge by key (overlay wins)
//! - `templates`: dropped from the result
//! - everything else: overlay replaces base per top-level key

use crate::tree::{Mapping, Node};

/// Sections handled separately from the rest of a configuration.
pub const GRADING_SECTIONS: &[&str] = &["templates", "grades", "calculation"];

/// Sections merged key by key.
const MERGED_SECTIONS: &[&str] = &["grades", "calculation"];

/// Merge a base configuration with an overlay configuration.
///
/// Inputs are not modified. Missing or null `grades`/`calculation` sections
/// count as empty mappings, so both are always present in the result.
pub fn merge_configs(base: &Mapping, overlay: &Mapping) -> Mapping {
    let mut merged = rest(base);
    merged.extend(rest(overlay));

    for name in MERGED_SECTIONS {
        merged.insert(
            (*name).to_string(),
            merge_section(base.get(*name), overlay.get(*name)),
        );
    }

    merged
}

/// Top-level keys outside the grading sections.
fn rest(config: &Mapping) -> Mapping {
    config
        .iter()
        .filter(|(key, _)| !GRADING_SECTIONS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// One-level merge of a single section.
///
/// A section that is present but not a mapping is carried through as-is
/// (overlay first) so validation still sees it.
fn merge_section(base: Option<&Node>, overlay: Option<&Node>) -> Node {
    for side in [overlay, base].into_iter().flatten() {
        if !side.is_null() && side.as_mapping().is_none() {
            return side.clone();
        }
    }

    let mut section = Mapping::new();
    for side in [base, overlay].into_iter().flatten() {
        if let Some(entries) = side.as_mapping() {
            section.extend(entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }
    Node::Mapping(section)
}
