// ---------------------------------------------------------------------------
// BuilderError: user-facing precondition failures of the placement tool
// ---------------------------------------------------------------------------

use std::fmt;

use scenery::TemplateError;
use template_io::TemplateIoError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// Paste or build requested with nothing on the clipboard.
    EmptyClipboard,
    /// The operation needs an active tool session.
    NotActive,
    /// Copying the selection failed.
    Template(TemplateError),
    /// Importing or exporting a template failed.
    Io(TemplateIoError),
}

impl fmt::Display for BuilderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuilderError::EmptyClipboard => write!(f, "The clipboard is empty"),
            BuilderError::NotActive => write!(f, "The template tool is not active"),
            BuilderError::Template(e) => write!(f, "{e}"),
            BuilderError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for BuilderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuilderError::Template(e) => Some(e),
            BuilderError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TemplateError> for BuilderError {
    fn from(e: TemplateError) -> Self {
        BuilderError::Template(e)
    }
}

impl From<TemplateIoError> for BuilderError {
    fn from(e: TemplateIoError) -> Self {
        BuilderError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_empty_clipboard() {
        let msg = format!("{}", BuilderError::EmptyClipboard);
        assert!(msg.contains("clipboard"), "got: {msg}");
    }

    #[test]
    fn test_from_template_error_keeps_source() {
        let err: BuilderError = TemplateError::NothingToCopy.into();
        assert!(matches!(err, BuilderError::Template(TemplateError::NothingToCopy)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
