use serde_json::Value as JsonValue;

use crate::data::DataRef;

/// Resolve a dot-separated key path against a page data tree.
///
/// Optional-chaining semantics at every segment: any missing key, a scalar
/// mid-path, or a pending (lazy/deferred) node mid-path yields `None`.
/// The empty path means "the tree itself", not "resolve an empty key".
/// Numeric segments index into arrays.
///
/// The returned node is an owned view: materialized subtrees are cloned,
/// thunks and deferred values are cheap handle clones.
pub fn lookup(tree: &DataRef, path: &str) -> Option<DataRef> {
    if path.is_empty() {
        return Some(tree.clone());
    }

    let mut node = tree;
    let mut segments = path.split('.');
    while let Some(segment) = segments.next() {
        match node {
            DataRef::Map(entries) => {
                node = entries.get(segment)?;
            }
            DataRef::Value(value) => {
                // The remaining traversal happens inside materialized JSON.
                let mut json = index_json(value, segment)?;
                for segment in segments {
                    json = index_json(json, segment)?;
                }
                return Some(DataRef::Value(json.clone()));
            }
            // A pending node mid-path cannot be descended into without
            // forcing it, which path lookup never does.
            DataRef::Lazy(_) | DataRef::Deferred(_) => return None,
        }
    }
    Some(node.clone())
}

fn index_json<'a>(value: &'a JsonValue, segment: &str) -> Option<&'a JsonValue> {
    match value {
        JsonValue::Object(map) => map.get(segment),
        JsonValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree() -> DataRef {
        DataRef::value(json!({
            "hero": {"title": "Hi"},
            "faq": {"items": [{"q": "One"}, {"q": "Two"}]},
            "video": {"enabled": false},
            "empty": null,
        }))
    }

    fn as_json(node: DataRef) -> JsonValue {
        match node {
            DataRef::Value(value) => value,
            other => panic!("expected a materialized node, got {other:?}"),
        }
    }

    #[test]
    fn resolves_nested_segments() {
        let found = lookup(&tree(), "faq.items").unwrap();
        assert_eq!(as_json(found), json!([{"q": "One"}, {"q": "Two"}]));
    }

    #[test]
    fn numeric_segments_index_arrays() {
        let found = lookup(&tree(), "faq.items.1.q").unwrap();
        assert_eq!(as_json(found), json!("Two"));
    }

    #[test]
    fn missing_segment_is_none() {
        assert!(lookup(&tree(), "hero.subtitle").is_none());
        assert!(lookup(&tree(), "nothing.at.all").is_none());
    }

    #[test]
    fn null_mid_path_is_none() {
        assert!(lookup(&tree(), "empty.anything").is_none());
    }

    #[test]
    fn scalar_mid_path_is_none() {
        assert!(lookup(&tree(), "hero.title.deeper").is_none());
    }

    #[test]
    fn empty_path_returns_whole_tree() {
        let found = lookup(&tree(), "").unwrap();
        assert_eq!(as_json(found), as_json(tree()));
    }

    #[test]
    fn boolean_leaves_are_addressable() {
        let found = lookup(&tree(), "video.enabled").unwrap();
        assert_eq!(as_json(found), json!(false));
    }

    #[test]
    fn map_nodes_participate_in_lookup() {
        let tree = DataRef::map([(
            "page",
            DataRef::map([("hero", DataRef::value(json!({"title": "Hi"})))]),
        )]);
        let found = lookup(&tree, "page.hero.title").unwrap();
        assert_eq!(as_json(found), json!("Hi"));
    }

    #[test]
    fn pending_mid_path_is_none() {
        let tree = DataRef::map([("lazy", DataRef::lazy(|| Ok(DataRef::value(json!({"a": 1})))))]);
        assert!(lookup(&tree, "lazy.a").is_none());
        // The pending node itself is addressable.
        assert!(lookup(&tree, "lazy").is_some());
    }
}
