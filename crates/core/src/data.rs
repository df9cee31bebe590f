use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use serde_json::Value as JsonValue;

use crate::error::ResolveError;

/// A zero-argument thunk producing the next step of a data reference.
///
/// Thunks are invoked only when a section actually resolves, which lets a
/// page defer an expensive load until the section is known to render.
pub type Thunk = Arc<dyn Fn() -> Result<DataRef, ResolveError> + Send + Sync>;

/// An in-flight asynchronous value, awaitable from multiple sections.
pub type SharedValue = Shared<BoxFuture<'static, Result<JsonValue, ResolveError>>>;

/// A node in the page data tree.
///
/// The tree is read-only from the engine's perspective; leaves may be
/// materialized values, nested mappings, thunks, or in-flight computations.
/// Which of these a page supplies is invisible to the renderer.
#[derive(Clone)]
pub enum DataRef {
    /// A fully materialized JSON subtree.
    Value(JsonValue),
    /// A nested mapping whose entries may themselves be lazy or deferred.
    Map(BTreeMap<String, DataRef>),
    /// A thunk invoked at resolve time.
    Lazy(Thunk),
    /// An in-flight asynchronous value.
    Deferred(SharedValue),
}

impl DataRef {
    /// Wrap a materialized JSON value.
    pub fn value(value: impl Into<JsonValue>) -> Self {
        DataRef::Value(value.into())
    }

    /// Build a nested mapping node from key/node pairs.
    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, DataRef)>,
        K: Into<String>,
    {
        DataRef::Map(
            entries
                .into_iter()
                .map(|(key, node)| (key.into(), node))
                .collect(),
        )
    }

    /// Wrap a thunk, invoked only when the section resolves.
    pub fn lazy<F>(thunk: F) -> Self
    where
        F: Fn() -> Result<DataRef, ResolveError> + Send + Sync + 'static,
    {
        DataRef::Lazy(Arc::new(thunk))
    }

    /// Wrap an in-flight computation. The future is shared, so several
    /// sections may address the same deferred subtree.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<JsonValue, ResolveError>> + Send + 'static,
    {
        DataRef::Deferred(future.boxed().shared())
    }

    /// True when resolution may suspend or run author code (thunk/deferred).
    pub fn is_pending(&self) -> bool {
        matches!(self, DataRef::Lazy(_) | DataRef::Deferred(_))
    }

    /// Materialize synchronously, returning `None` if this node or any
    /// nested entry is lazy or deferred.
    pub fn as_plain(&self) -> Option<JsonValue> {
        match self {
            DataRef::Value(value) => Some(value.clone()),
            DataRef::Map(entries) => {
                let mut object = serde_json::Map::new();
                for (key, node) in entries {
                    object.insert(key.clone(), node.as_plain()?);
                }
                Some(JsonValue::Object(object))
            }
            DataRef::Lazy(_) | DataRef::Deferred(_) => None,
        }
    }

    /// Resolve this reference to a concrete JSON value.
    ///
    /// Thunks are invoked and their results resolved again (a thunk may
    /// return a further thunk or a deferred); deferred values are awaited;
    /// mappings are resolved entry by entry. A failing thunk or rejecting
    /// deferred fails the whole resolution.
    pub fn resolve(self) -> BoxFuture<'static, Result<JsonValue, ResolveError>> {
        async move {
            let mut current = self;
            loop {
                match current {
                    DataRef::Value(value) => return Ok(value),
                    DataRef::Lazy(thunk) => current = thunk()?,
                    DataRef::Deferred(deferred) => return deferred.await,
                    DataRef::Map(entries) => {
                        let mut object = serde_json::Map::new();
                        for (key, node) in entries {
                            object.insert(key, node.resolve().await?);
                        }
                        return Ok(JsonValue::Object(object));
                    }
                }
            }
        }
        .boxed()
    }
}

impl From<JsonValue> for DataRef {
    fn from(value: JsonValue) -> Self {
        DataRef::Value(value)
    }
}

impl fmt::Debug for DataRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataRef::Value(value) => f.debug_tuple("Value").field(value).finish(),
            DataRef::Map(entries) => f
                .debug_map()
                .entries(entries.iter().map(|(key, node)| (key, node)))
                .finish(),
            DataRef::Lazy(_) => f.write_str("Lazy(..)"),
            DataRef::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Resolve an optionally-addressed reference.
///
/// A `dataKey` pointing nowhere is "no data", not an error; it maps to
/// `Ok(None)` and flows into the default visibility rule downstream.
pub async fn resolve_opt(node: Option<DataRef>) -> Result<Option<JsonValue>, ResolveError> {
    match node {
        Some(node) => Ok(Some(node.resolve().await?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn value_resolves_to_itself() {
        let node = DataRef::value(json!({"title": "Hi"}));
        let resolved = block_on(node.resolve()).unwrap();
        assert_eq!(resolved, json!({"title": "Hi"}));
    }

    #[test]
    fn lazy_is_invoked_at_resolve_time() {
        let node = DataRef::lazy(|| Ok(DataRef::value(json!([1, 2]))));
        let resolved = block_on(node.resolve()).unwrap();
        assert_eq!(resolved, json!([1, 2]));
    }

    #[test]
    fn lazy_returning_deferred_is_awaited() {
        let node = DataRef::lazy(|| Ok(DataRef::deferred(async { Ok(json!({"items": [1, 2]})) })));
        let resolved = block_on(node.resolve()).unwrap();
        assert_eq!(resolved, json!({"items": [1, 2]}));
    }

    #[test]
    fn nested_thunks_resolve_to_the_final_value() {
        let node = DataRef::lazy(|| Ok(DataRef::lazy(|| Ok(DataRef::value(json!("deep"))))));
        let resolved = block_on(node.resolve()).unwrap();
        assert_eq!(resolved, json!("deep"));
    }

    #[test]
    fn map_resolves_each_entry() {
        let node = DataRef::map([
            ("eager", DataRef::value(json!("now"))),
            ("lazy", DataRef::lazy(|| Ok(DataRef::value(json!("later"))))),
            ("deferred", DataRef::deferred(async { Ok(json!("async")) })),
        ]);
        let resolved = block_on(node.resolve()).unwrap();
        assert_eq!(
            resolved,
            json!({"eager": "now", "lazy": "later", "deferred": "async"})
        );
    }

    #[test]
    fn rejection_propagates() {
        let node = DataRef::deferred(async { Err(ResolveError::rejected("backend down")) });
        let err = block_on(node.resolve()).unwrap_err();
        assert_eq!(err, ResolveError::rejected("backend down"));
    }

    #[test]
    fn failing_thunk_propagates() {
        let node = DataRef::lazy(|| Err(ResolveError::thunk("load failed")));
        let err = block_on(node.resolve()).unwrap_err();
        assert_eq!(err, ResolveError::thunk("load failed"));
    }

    #[test]
    fn shared_deferred_can_be_awaited_twice() {
        let node = DataRef::deferred(async { Ok(json!(42)) });
        let clone = node.clone();
        assert_eq!(block_on(node.resolve()).unwrap(), json!(42));
        assert_eq!(block_on(clone.resolve()).unwrap(), json!(42));
    }

    #[test]
    fn as_plain_fails_on_pending_leaves() {
        let plain = DataRef::map([("a", DataRef::value(json!(1)))]);
        assert_eq!(plain.as_plain(), Some(json!({"a": 1})));

        let pending = DataRef::map([
            ("a", DataRef::value(json!(1))),
            ("b", DataRef::lazy(|| Ok(DataRef::value(json!(2))))),
        ]);
        assert_eq!(pending.as_plain(), None);
    }

    #[test]
    fn resolve_opt_maps_absent_to_none() {
        assert_eq!(block_on(resolve_opt(None)).unwrap(), None);
        let some = block_on(resolve_opt(Some(DataRef::value(json!(true))))).unwrap();
        assert_eq!(some, Some(json!(true)));
    }
}
