//! The section renderer orchestration loop.
//!
//! One render pass is a pure function of (descriptor list, page data tree,
//! options): descriptors are processed independently and concurrently, data
//! resolution fans out and is gathered, and the output preserves input
//! order with suppressed sections represented as `None` slots. The engine
//! holds no state between passes.

use blox_core::{DataRef, Diagnostic, Diagnostics, ResolveError, lookup, resolve_opt};
use futures::future;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::props::normalize_props;
use crate::registry::{BlockFn, BlockRegistry};
use crate::section::{Props, SectionDescriptor};
use crate::visibility;

/// Render-call-level visibility override, applied to every section in the
/// pass ahead of all other rules. Used for page-wide preview/testing hooks.
pub type OverrideFn = Arc<dyn Fn(&DataRef, &SectionDescriptor) -> bool + Send + Sync>;

/// Options for one render pass.
#[derive(Clone, Default)]
pub struct ComposeOptions {
    /// Optional page-wide visibility override predicate.
    pub should_render: Option<OverrideFn>,
}

impl ComposeOptions {
    /// Set a page-wide visibility override.
    pub fn with_should_render<F>(mut self, check: F) -> Self
    where
        F: Fn(&DataRef, &SectionDescriptor) -> bool + Send + Sync + 'static,
    {
        self.should_render = Some(Arc::new(check));
        self
    }
}

impl fmt::Debug for ComposeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposeOptions")
            .field("should_render", &self.should_render.is_some())
            .finish()
    }
}

/// One emitted render instruction: the section's stable key, its final
/// props, and the block's render function.
#[derive(Clone)]
pub struct SectionInstruction {
    /// Stable render key from the descriptor.
    pub id: String,
    /// Final merged props.
    pub props: Props,
    block: BlockFn,
}

impl SectionInstruction {
    /// Invoke the block's render function with the final props.
    pub fn render(&self) -> String {
        (self.block)(&self.props)
    }
}

impl fmt::Debug for SectionInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionInstruction")
            .field("id", &self.id)
            .field("props", &self.props)
            .finish()
    }
}

/// Result of one render pass: an ordered, `None`-punctuated slot list plus
/// the diagnostics gathered along the way.
#[derive(Debug, Default)]
pub struct Composition {
    /// One slot per input descriptor, in input order; `None` marks a
    /// suppressed section.
    pub slots: Vec<Option<SectionInstruction>>,
    /// Non-fatal conditions recorded during the pass.
    pub diagnostics: Diagnostics,
}

impl Composition {
    /// The surviving instructions, in input order.
    pub fn instructions(&self) -> impl Iterator<Item = &SectionInstruction> {
        self.slots.iter().flatten()
    }

    /// Render every surviving instruction, in input order.
    pub fn rendered(&self) -> Vec<String> {
        self.instructions()
            .map(SectionInstruction::render)
            .collect()
    }
}

/// Fatal errors for a render pass.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A section's data source failed. Not caught internally: an empty page
    /// region must stay distinguishable from a real content/backend fault.
    #[error("section \"{section}\" failed to resolve its data: {source}")]
    Resolve {
        /// Section id from the descriptor.
        section: String,
        /// The underlying resolution failure.
        #[source]
        source: ResolveError,
    },
}

/// Run one render pass.
///
/// All descriptors are processed concurrently; output order always matches
/// descriptor order because each slot's position is fixed by its index, not
/// by completion time. A single resolution failure fails the whole pass.
pub async fn compose(
    registry: &BlockRegistry,
    sections: &[SectionDescriptor],
    data: &DataRef,
    options: &ComposeOptions,
) -> Result<Composition, ComposeError> {
    let results = future::try_join_all(
        sections
            .iter()
            .map(|descriptor| render_section(registry, descriptor, data, options)),
    )
    .await?;

    let mut composition = Composition::default();
    for (slot, diagnostics) in results {
        composition.slots.push(slot);
        composition.diagnostics.merge(diagnostics);
    }
    Ok(composition)
}

async fn render_section(
    registry: &BlockRegistry,
    descriptor: &SectionDescriptor,
    data: &DataRef,
    options: &ComposeOptions,
) -> Result<(Option<SectionInstruction>, Diagnostics), ComposeError> {
    let mut diagnostics = Diagnostics::new();

    let raw = match &descriptor.data_key {
        Some(path) => lookup(data, path),
        None => Some(data.clone()),
    };

    let spec = registry.spec(&descriptor.block);
    if !visibility::evaluate(
        descriptor,
        spec,
        data,
        raw.as_ref(),
        options.should_render.as_ref(),
    ) {
        log::debug!("section \"{}\" suppressed by visibility rules", descriptor.id);
        return Ok((None, diagnostics));
    }

    let Some(block) = registry.block(&descriptor.block) else {
        let diagnostic = Diagnostic::UnknownBlock {
            section: descriptor.id.clone(),
            block: descriptor.block.clone(),
        };
        log::warn!("{diagnostic}");
        diagnostics.push(diagnostic);
        return Ok((None, diagnostics));
    };

    let resolved = resolve_opt(raw)
        .await
        .map_err(|source| ComposeError::Resolve {
            section: descriptor.id.clone(),
            source,
        })?;

    let props = normalize_props(spec, descriptor, resolved.as_ref(), data);

    #[cfg(debug_assertions)]
    if let Some(spec) = spec {
        for name in &spec.required {
            if !props.contains_key(name) {
                let diagnostic = Diagnostic::MissingRequiredProp {
                    section: descriptor.id.clone(),
                    block: descriptor.block.clone(),
                    prop: name.clone(),
                };
                log::warn!("{diagnostic}");
                diagnostics.push(diagnostic);
            }
        }
    }

    Ok((
        Some(SectionInstruction {
            id: descriptor.id.clone(),
            props,
            block: block.clone(),
        }),
        diagnostics,
    ))
}
