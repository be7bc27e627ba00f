// ---------------------------------------------------------------------------
// Error types for the codec and template capture
// ---------------------------------------------------------------------------

use std::fmt;

use crate::objects::ObjectKind;

/// Failure to turn an element into host action arguments (or back).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The qualifier has no match among the currently loaded objects.
    Unresolved { kind: ObjectKind, qualifier: String },
    /// A numeric object index in tile storage has no loaded object.
    UnknownIndex { kind: ObjectKind, index: u32 },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Unresolved { kind, qualifier } => {
                write!(f, "no loaded {kind:?} object matches '{qualifier}'")
            }
            CodecError::UnknownIndex { kind, index } => {
                write!(f, "no loaded {kind:?} object at index {index}")
            }
        }
    }
}

impl std::error::Error for CodecError {}

/// User-facing precondition failures when producing a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// No region is selected, or the selection covers no tiles.
    EmptySelection,
    /// The selection holds no element that could be captured.
    NothingToCopy,
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::EmptySelection => write!(f, "Nothing is selected"),
            TemplateError::NothingToCopy => write!(f, "The selection contains no scenery"),
        }
    }
}

impl std::error::Error for TemplateError {}
