//! Persistence for scenery templates.
//!
//! - [`format`]: the JSON template file handed to the storage layer.
//! - [`policy`]: what to do with objects that are not loaded on import.
//! - [`library`]: compact binary blob holding a list of templates.

pub mod format;
pub mod library;
pub mod policy;

mod io_error;

pub use format::{from_json, to_json, ExtentFile, TemplateFile, FORMAT_VERSION};
pub use io_error::TemplateIoError;
pub use library::{decode_library, encode_library, LIBRARY_VERSION};
pub use policy::{apply_policy, load_template, LoadPolicy, LoadedTemplate};
