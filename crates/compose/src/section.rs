use std::fmt;
use std::sync::Arc;

use blox_core::DataRef;
use serde_json::Value as JsonValue;

/// Final parameter set handed to a block's render function.
pub type Props = serde_json::Map<String, JsonValue>;

/// A predicate over the full page data tree; authoritative for visibility
/// when present on a descriptor.
pub type ConditionFn = Arc<dyn Fn(&DataRef) -> bool + Send + Sync>;

/// Legacy per-section prop transform `(pageData) -> props`.
///
/// When present it bypasses spec-driven normalization entirely.
pub type MapperFn = Arc<dyn Fn(&DataRef) -> Props + Send + Sync>;

/// Describes one slot in a page's composition.
///
/// Descriptor ids must be unique within one page; the id doubles as the
/// stable render key of the emitted instruction.
#[derive(Clone)]
pub struct SectionDescriptor {
    /// Stable render key, unique within a page.
    pub id: String,
    /// Block identifier resolved against the registry.
    pub block: String,
    /// Dot-separated path into the page data tree. Absent means "the whole
    /// page data tree".
    pub data_key: Option<String>,
    /// Static override props, applied last in the merge order.
    pub props: Option<Props>,
    /// Custom visibility predicate over the page data tree.
    pub condition: Option<ConditionFn>,
    /// Legacy prop mapper; wins over spec-driven normalization.
    pub mapper: Option<MapperFn>,
}

impl SectionDescriptor {
    /// Create a descriptor for a block with no data key, props, or guards.
    pub fn new(id: impl Into<String>, block: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            block: block.into(),
            data_key: None,
            props: None,
            condition: None,
            mapper: None,
        }
    }

    /// Address a subtree of the page data via a dot-separated path.
    pub fn with_data_key(mut self, data_key: impl Into<String>) -> Self {
        self.data_key = Some(data_key.into());
        self
    }

    /// Attach static override props (highest merge priority).
    pub fn with_props(mut self, props: Props) -> Self {
        self.props = Some(props);
        self
    }

    /// Attach a custom visibility condition.
    pub fn with_condition<F>(mut self, condition: F) -> Self
    where
        F: Fn(&DataRef) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(condition));
        self
    }

    /// Attach a legacy prop mapper, bypassing spec normalization.
    pub fn with_mapper<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&DataRef) -> Props + Send + Sync + 'static,
    {
        self.mapper = Some(Arc::new(mapper));
        self
    }
}

impl fmt::Debug for SectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionDescriptor")
            .field("id", &self.id)
            .field("block", &self.block)
            .field("data_key", &self.data_key)
            .field("props", &self.props)
            .field("condition", &self.condition.is_some())
            .field("mapper", &self.mapper.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_sets_fields() {
        let mut props = Props::new();
        props.insert("variant".into(), json!("gold"));

        let descriptor = SectionDescriptor::new("faq", "section.faq")
            .with_data_key("faq")
            .with_props(props)
            .with_condition(|_| true);

        assert_eq!(descriptor.id, "faq");
        assert_eq!(descriptor.block, "section.faq");
        assert_eq!(descriptor.data_key.as_deref(), Some("faq"));
        assert!(descriptor.condition.is_some());
        assert!(descriptor.mapper.is_none());
        assert_eq!(descriptor.props.unwrap()["variant"], json!("gold"));
    }
}
