//! Block specification types.

use std::fmt;
use std::sync::Arc;

use blox_core::DataRef;
use serde_json::Value as JsonValue;

use crate::section::{Props, SectionDescriptor};

/// A block's render function: normalized props in, displayable unit out.
///
/// The engine never inspects the output; markup quality is the block
/// catalog's concern.
pub type BlockFn = Arc<dyn Fn(&Props) -> String + Send + Sync>;

/// Spec-level prop derivation:
/// `(resolvedSectionData, pageData, descriptor) -> props`.
pub type NormalizeFn =
    Arc<dyn Fn(Option<&JsonValue>, &DataRef, &SectionDescriptor) -> Props + Send + Sync>;

/// Spec-level render guard:
/// `(pageData, resolvedSectionData, descriptor) -> bool`.
///
/// Consulted only when the descriptor carries no `condition` of its own,
/// and never against unforced lazy/deferred data.
pub type ShouldRenderFn =
    Arc<dyn Fn(&DataRef, Option<&JsonValue>, &SectionDescriptor) -> bool + Send + Sync>;

/// Behavioral contract registered alongside a block's render function.
///
/// Every field is optional; a block without a spec is legal and falls back
/// to raw data passthrough.
#[derive(Clone, Default)]
pub struct BlockSpec {
    /// Shapes resolved section data into props (unless a legacy mapper is
    /// present on the descriptor).
    pub normalize: Option<NormalizeFn>,
    /// Props merged in under all other sources.
    pub defaults: Option<Props>,
    /// Prop names whose absence triggers a development-time diagnostic.
    pub required: Vec<String>,
    /// Render guard used when the descriptor has no `condition`.
    pub should_render: Option<ShouldRenderFn>,
}

impl BlockSpec {
    /// Create an empty spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the normalize function.
    pub fn with_normalize<F>(mut self, normalize: F) -> Self
    where
        F: Fn(Option<&JsonValue>, &DataRef, &SectionDescriptor) -> Props + Send + Sync + 'static,
    {
        self.normalize = Some(Arc::new(normalize));
        self
    }

    /// Set default props (lowest merge priority).
    pub fn with_defaults(mut self, defaults: Props) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Declare required prop names.
    pub fn with_required<I, S>(mut self, required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = required.into_iter().map(Into::into).collect();
        self
    }

    /// Set the render guard.
    pub fn with_should_render<F>(mut self, should_render: F) -> Self
    where
        F: Fn(&DataRef, Option<&JsonValue>, &SectionDescriptor) -> bool + Send + Sync + 'static,
    {
        self.should_render = Some(Arc::new(should_render));
        self
    }
}

impl fmt::Debug for BlockSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockSpec")
            .field("normalize", &self.normalize.is_some())
            .field("defaults", &self.defaults)
            .field("required", &self.required)
            .field("should_render", &self.should_render.is_some())
            .finish()
    }
}
