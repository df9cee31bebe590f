//! The block registry: a one-time, process-wide table mapping block
//! identifiers to render functions and their behavioral contracts.

use std::collections::HashMap;
use std::sync::Arc;

use crate::section::Props;

/// Pre-populated registry of standard blocks.
pub mod defaults;
mod types;

pub use types::{BlockFn, BlockSpec, NormalizeFn, ShouldRenderFn};

/// Lookup table from block identifier to render function and optional spec.
///
/// Populated before any render and read-only during rendering; the engine
/// never mutates it once composition starts. Looking up an unknown id is
/// not an error here — the renderer surfaces it as a diagnostic.
#[derive(Clone, Default)]
pub struct BlockRegistry {
    blocks: HashMap<String, BlockFn>,
    specs: HashMap<String, BlockSpec>,
}

impl BlockRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block render function without a spec.
    pub fn register<F>(&mut self, id: impl Into<String>, render: F)
    where
        F: Fn(&Props) -> String + Send + Sync + 'static,
    {
        self.blocks.insert(id.into(), Arc::new(render));
    }

    /// Register a block render function together with its spec.
    pub fn register_with_spec<F>(&mut self, id: impl Into<String>, render: F, spec: BlockSpec)
    where
        F: Fn(&Props) -> String + Send + Sync + 'static,
    {
        let id = id.into();
        self.specs.insert(id.clone(), spec);
        self.blocks.insert(id, Arc::new(render));
    }

    /// Get a block's render function by id.
    pub fn block(&self, id: &str) -> Option<&BlockFn> {
        self.blocks.get(id)
    }

    /// Get a block's spec by id.
    pub fn spec(&self, id: &str) -> Option<&BlockSpec> {
        self.specs.get(id)
    }

    /// Check whether a block id is registered.
    pub fn has_block(&self, id: &str) -> bool {
        self.blocks.contains_key(id)
    }

    /// All registered block ids, sorted for stable output.
    pub fn block_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.blocks.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl std::fmt::Debug for BlockRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockRegistry")
            .field("blocks", &self.block_ids())
            .finish()
    }
}
