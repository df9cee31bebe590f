//! The visibility precedence chain.
//!
//! Whether a section renders is decided by the first applicable rule:
//!
//! 1. the render-call override predicate (page-wide preview/testing hook);
//! 2. the descriptor's own `condition` over the page data tree;
//! 3. the block spec's `should_render`, evaluated against resolved data —
//!    except that lazy/deferred data short-circuits to "render", so a
//!    section is never suppressed by forcing its data early;
//! 4. the default rule over the addressed raw node: empty arrays and
//!    mappings are hidden, pending nodes are visible, everything else uses
//!    ordinary truthiness, and an absent path is hidden.
//!
//! The empty-container rule exists because content trees routinely carry
//! `[]` or `{}` for "no data supplied", and the common case should omit
//! the section rather than render an empty shell.

use blox_core::DataRef;
use serde_json::Value as JsonValue;

use crate::conditions::truthy;
use crate::registry::BlockSpec;
use crate::renderer::OverrideFn;
use crate::section::SectionDescriptor;

/// Evaluate the precedence chain for one section.
///
/// `raw` is the node addressed by the descriptor's `data_key` (or the whole
/// tree), before any resolution.
pub fn evaluate(
    descriptor: &SectionDescriptor,
    spec: Option<&BlockSpec>,
    page: &DataRef,
    raw: Option<&DataRef>,
    override_check: Option<&OverrideFn>,
) -> bool {
    if let Some(check) = override_check {
        return check(page, descriptor);
    }

    if let Some(condition) = &descriptor.condition {
        return condition(page);
    }

    if let Some(should_render) = spec.and_then(|spec| spec.should_render.as_ref()) {
        return match raw {
            Some(node) => match node.as_plain() {
                Some(value) => should_render(page, Some(&value), descriptor),
                // Lazy data is resolved and then rendered unconditionally
                // at this tier, never suppressed pre-emptively.
                None => true,
            },
            None => should_render(page, None, descriptor),
        };
    }

    default_visibility(raw)
}

fn default_visibility(raw: Option<&DataRef>) -> bool {
    match raw {
        None => false,
        Some(DataRef::Lazy(_) | DataRef::Deferred(_)) => true,
        Some(DataRef::Map(entries)) => !entries.is_empty(),
        Some(DataRef::Value(value)) => match value {
            JsonValue::Array(items) => !items.is_empty(),
            JsonValue::Object(map) => !map.is_empty(),
            other => truthy(other),
        },
    }
}
