#![deny(missing_docs)]
//! blox composition engine.
//!
//! Pages are rendered as an ordered composition of independently-defined
//! blocks, driven entirely by data: a page supplies a data tree and an
//! ordered list of section descriptors, and [`compose`] turns them into an
//! ordered sequence of render instructions. Blocks are looked up in a
//! [`BlockRegistry`] populated once at startup; visibility, prop merging,
//! and data resolution follow fixed, auditable precedence rules.

/// Reusable predicates for section `condition` functions.
pub mod conditions;
/// Layered prop merging.
pub mod props;
/// Block registry and block specifications.
pub mod registry;
/// The section renderer orchestration loop.
pub mod renderer;
/// Section descriptors.
pub mod section;
/// The visibility precedence chain.
pub mod visibility;

pub use blox_core::{DataRef, Diagnostic, Diagnostics, ResolveError};
pub use props::{merge_layers, normalize_props};
pub use registry::{BlockFn, BlockRegistry, BlockSpec, NormalizeFn, ShouldRenderFn};
pub use renderer::{
    ComposeError, ComposeOptions, Composition, OverrideFn, SectionInstruction, compose,
};
pub use section::{ConditionFn, MapperFn, Props, SectionDescriptor};
