#![deny(missing_docs)]
//! blox core: page data trees, path lookup, and async data resolution.

/// Page data tree nodes and the data resolver.
pub mod data;
/// Core error and diagnostic types.
pub mod error;
/// Dot-path lookup over a page data tree.
pub mod path;

pub use data::{DataRef, SharedValue, Thunk, resolve_opt};
pub use error::{Diagnostic, Diagnostics, ResolveError};
pub use path::lookup;
