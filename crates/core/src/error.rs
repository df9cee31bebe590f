use serde::Serialize;
use thiserror::Error;

/// Errors emitted while resolving a section's data reference.
///
/// Resolution failures are fatal to the render pass: a section whose data
/// source failed must not silently disappear as if no content was configured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A deferred value rejected.
    #[error("deferred value rejected: {0}")]
    Rejected(String),
    /// A thunk returned an error instead of a data reference.
    #[error("thunk failed: {0}")]
    Thunk(String),
}

impl ResolveError {
    /// Create a rejection error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Create a thunk failure error.
    pub fn thunk(message: impl Into<String>) -> Self {
        Self::Thunk(message.into())
    }
}

/// Non-fatal conditions surfaced during a render pass.
///
/// These never stop rendering; the affected section is skipped or rendered
/// with the props it has, and siblings are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// A section referenced a block id that is not in the registry.
    UnknownBlock {
        /// Section id from the descriptor.
        section: String,
        /// The unresolved block id.
        block: String,
    },
    /// A prop declared as required by the block spec was absent from the
    /// final props (checked in development builds only).
    MissingRequiredProp {
        /// Section id from the descriptor.
        section: String,
        /// Block id the spec belongs to.
        block: String,
        /// Name of the missing prop.
        prop: String,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UnknownBlock { section, block } => {
                write!(
                    f,
                    "section \"{section}\" has no valid block reference: \"{block}\""
                )
            }
            Diagnostic::MissingRequiredProp {
                section,
                block,
                prop,
            } => {
                write!(
                    f,
                    "section \"{section}\" ({block}) is missing required prop \"{prop}\""
                )
            }
        }
    }
}

/// Collection of diagnostics gathered across one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create a new empty diagnostics collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic to the collection.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Absorb another collection, preserving order.
    pub fn merge(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Check if any diagnostics were recorded.
    pub fn has_any(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Total count of recorded diagnostics.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over recorded diagnostics in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_block_names_section_and_block() {
        let diagnostic = Diagnostic::UnknownBlock {
            section: "hero".into(),
            block: "hero.landing".into(),
        };
        assert_eq!(
            diagnostic.to_string(),
            "section \"hero\" has no valid block reference: \"hero.landing\""
        );
    }

    #[test]
    fn diagnostics_merge_preserves_order() {
        let mut first = Diagnostics::new();
        first.push(Diagnostic::UnknownBlock {
            section: "a".into(),
            block: "x".into(),
        });
        let mut second = Diagnostics::new();
        second.push(Diagnostic::MissingRequiredProp {
            section: "b".into(),
            block: "y".into(),
            prop: "data".into(),
        });
        first.merge(second);
        assert_eq!(first.count(), 2);
        let kinds: Vec<_> = first.iter().collect();
        assert!(matches!(kinds[0], Diagnostic::UnknownBlock { .. }));
        assert!(matches!(kinds[1], Diagnostic::MissingRequiredProp { .. }));
    }
}
