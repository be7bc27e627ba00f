//! Handling of templates that reference objects which are not loaded.

use bevy::prelude::*;

use scenery::{ObjectResolver, Template};

use crate::format::from_json;
use crate::io_error::TemplateIoError;

/// What to do when a loaded template references unloaded objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Refuse the template.
    Error,
    /// Drop the affected elements and log which objects were missing.
    #[default]
    Warn,
    /// Drop the affected elements silently.
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTemplate {
    /// Template with every unresolvable element removed.
    pub template: Template,
    /// Qualifiers that could not be resolved, sorted.
    pub missing: Vec<String>,
}

/// Check `template` against the loaded objects and apply `policy`.
pub fn apply_policy(
    template: Template,
    objects: &dyn ObjectResolver,
    policy: LoadPolicy,
) -> Result<LoadedTemplate, TemplateIoError> {
    let missing = template.missing_objects(objects);
    if missing.is_empty() {
        return Ok(LoadedTemplate { template, missing });
    }
    match policy {
        LoadPolicy::Error => return Err(TemplateIoError::UnresolvableObjects(missing)),
        LoadPolicy::Warn => warn!(
            "Template load: {} object(s) not loaded, dropping their elements: {}",
            missing.len(),
            missing.join(", ")
        ),
        LoadPolicy::Ignore => {}
    }
    Ok(LoadedTemplate {
        template: template.filter_available(objects),
        missing,
    })
}

/// Parse a JSON template file and apply `policy`.
pub fn load_template(
    json: &str,
    objects: &dyn ObjectResolver,
    policy: LoadPolicy,
) -> Result<LoadedTemplate, TemplateIoError> {
    apply_policy(from_json(json)?, objects, policy)
}
