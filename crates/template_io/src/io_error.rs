// ---------------------------------------------------------------------------
// TemplateIoError: failures while reading or writing persisted templates
// ---------------------------------------------------------------------------

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateIoError {
    /// Malformed JSON or a shape that does not match the template file.
    Json(String),
    /// JSON encoding failed.
    Encode(String),
    /// Bitcode decoding failed or the blob is truncated.
    Decode(String),
    /// Library blob failed its checksum.
    Corrupt { expected: u32, computed: u32 },
    /// The file was written by a newer build.
    VersionMismatch { expected_max: u32, found: u32 },
    /// Objects referenced by the template are not loaded (strict policy).
    UnresolvableObjects(Vec<String>),
}

impl fmt::Display for TemplateIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateIoError::Json(msg) => write!(f, "Template JSON error: {msg}"),
            TemplateIoError::Encode(msg) => write!(f, "Template JSON encoding error: {msg}"),
            TemplateIoError::Decode(msg) => write!(f, "Decoding error: {msg}"),
            TemplateIoError::Corrupt { expected, computed } => write!(
                f,
                "Template library is corrupted: checksum mismatch (expected {expected:#010X}, got {computed:#010X})"
            ),
            TemplateIoError::VersionMismatch {
                expected_max,
                found,
            } => write!(
                f,
                "Version mismatch: template is v{found}, but this build only supports up to v{expected_max}"
            ),
            TemplateIoError::UnresolvableObjects(missing) => {
                write!(f, "Objects not loaded: {}", missing.join(", "))
            }
        }
    }
}

impl std::error::Error for TemplateIoError {}

impl From<serde_json::Error> for TemplateIoError {
    fn from(e: serde_json::Error) -> Self {
        TemplateIoError::Json(e.to_string())
    }
}

impl From<bitcode::Error> for TemplateIoError {
    fn from(e: bitcode::Error) -> Self {
        TemplateIoError::Decode(e.to_string())
    }
}

impl From<lz4_flex::block::DecompressError> for TemplateIoError {
    fn from(e: lz4_flex::block::DecompressError) -> Self {
        TemplateIoError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_version_mismatch() {
        let err = TemplateIoError::VersionMismatch {
            expected_max: 1,
            found: 7,
        };
        let msg = format!("{err}");
        assert!(msg.contains("v7"), "got: {msg}");
        assert!(msg.contains("v1"), "got: {msg}");
    }

    #[test]
    fn test_display_lists_missing_objects() {
        let err = TemplateIoError::UnresolvableObjects(vec![
            "rct2.scenery_small.tl0".to_string(),
            "rct2.banner.bn1".to_string(),
        ]);
        let msg = format!("{err}");
        assert!(msg.contains("rct2.scenery_small.tl0, rct2.banner.bn1"), "got: {msg}");
    }

    #[test]
    fn test_from_json_error() {
        let parse: Result<u32, _> = serde_json::from_str("not json");
        let err: TemplateIoError = parse.unwrap_err().into();
        assert!(matches!(err, TemplateIoError::Json(_)));
    }

    #[test]
    fn test_display_encode_names_json() {
        let msg = format!("{}", TemplateIoError::Encode("key must be a string".to_string()));
        assert!(msg.contains("JSON"), "got: {msg}");
        assert!(msg.contains("key must be a string"), "got: {msg}");
    }
}
