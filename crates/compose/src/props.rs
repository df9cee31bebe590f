//! Layered prop merging.
//!
//! Final props are an explicit ordered merge, later sources overriding
//! earlier ones: spec defaults, then data-derived props, then the
//! descriptor's static overrides. The ordering is a contract: page authors
//! can always force a parameter from the page configuration regardless of
//! what the block or its data implies.

use blox_core::DataRef;
use serde_json::Value as JsonValue;

use crate::registry::BlockSpec;
use crate::section::{Props, SectionDescriptor};

/// Compute the final props for one section.
///
/// The data-derived layer is exactly one of, in priority order: the
/// descriptor's legacy `mapper` (spec normalization is never invoked when a
/// mapper is present), the spec's `normalize`, or the bare wrapper
/// `{ "data": resolvedSectionData }` (`null` when nothing resolved).
pub fn normalize_props(
    spec: Option<&BlockSpec>,
    descriptor: &SectionDescriptor,
    resolved: Option<&JsonValue>,
    page: &DataRef,
) -> Props {
    let derived = if let Some(mapper) = &descriptor.mapper {
        mapper(page)
    } else if let Some(normalize) = spec.and_then(|spec| spec.normalize.as_ref()) {
        normalize(resolved, page, descriptor)
    } else {
        let mut wrapper = Props::new();
        wrapper.insert(
            "data".into(),
            resolved.cloned().unwrap_or(JsonValue::Null),
        );
        wrapper
    };

    let defaults = spec.and_then(|spec| spec.defaults.as_ref());
    merge_layers([defaults, Some(&derived), descriptor.props.as_ref()])
}

/// Merge optional prop layers with last-write-wins semantics.
pub fn merge_layers<'a>(layers: impl IntoIterator<Item = Option<&'a Props>>) -> Props {
    let mut merged = Props::new();
    for layer in layers.into_iter().flatten() {
        for (key, value) in layer {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}
