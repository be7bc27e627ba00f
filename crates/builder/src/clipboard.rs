//! Clipboard: history of copied templates with a cursor on the one being
//! pasted. Persisted across sessions through the template library blob.

use bevy::prelude::*;

use scenery::host::MapService;
use scenery::{ElementFilter, ObjectResolver, Template};
use template_io::{decode_library, encode_library, load_template, to_json, LoadPolicy};

use crate::error::BuilderError;

#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct Clipboard {
    items: Vec<Template>,
    /// Index into `items`; meaningless while empty.
    cursor: usize,
}

impl Clipboard {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn templates(&self) -> &[Template] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Append `template` and make it current.
    pub fn add(&mut self, template: Template) {
        self.items.push(template);
        self.cursor = self.items.len() - 1;
        info!(
            "Clipboard: added template {} of {}",
            self.cursor + 1,
            self.items.len()
        );
    }

    pub fn current(&self) -> Option<&Template> {
        self.items.get(self.cursor)
    }

    /// Step back through the history, wrapping to the newest entry.
    pub fn prev(&mut self) -> Option<&Template> {
        if self.items.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + self.items.len() - 1) % self.items.len();
        self.current()
    }

    /// Step forward through the history, wrapping to the oldest entry.
    pub fn next(&mut self) -> Option<&Template> {
        if self.items.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.items.len();
        self.current()
    }

    /// Remove the current template. The cursor stays on the same index, or
    /// the new last entry when the removed one was last.
    pub fn remove_current(&mut self) -> Option<Template> {
        if self.cursor >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(self.cursor);
        self.cursor = self.cursor.min(self.items.len().saturating_sub(1));
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.cursor = 0;
    }

    /// Capture the host's current tile selection and add it to the history.
    pub fn copy_selection(
        &mut self,
        map: &dyn MapService,
        objects: &dyn ObjectResolver,
        filter: &ElementFilter,
    ) -> Result<&Template, BuilderError> {
        let selection = map.tile_selection();
        let template = Template::capture(map, selection.as_ref(), objects, filter)?;
        self.add(template);
        self.current().ok_or(BuilderError::EmptyClipboard)
    }

    /// Copy of the current template, ready to hand to the builder.
    pub fn paste(&self) -> Result<Template, BuilderError> {
        self.current().cloned().ok_or(BuilderError::EmptyClipboard)
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    /// Library blob of the whole history; `None` when there is nothing to
    /// save.
    pub fn save_to_bytes(&self) -> Option<Vec<u8>> {
        if self.items.is_empty() {
            return None;
        }
        Some(encode_library(&self.items))
    }

    /// Restore a history saved with [`Clipboard::save_to_bytes`]. A blob
    /// that fails to decode is logged and yields an empty clipboard.
    pub fn load_from_bytes(bytes: &[u8]) -> Self {
        match decode_library(bytes) {
            Ok(items) => {
                let cursor = items.len().saturating_sub(1);
                Self { items, cursor }
            }
            Err(e) => {
                warn!(
                    "Clipboard: failed to decode {} bytes, starting empty: {}",
                    bytes.len(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Current template as a JSON template file.
    pub fn export_json(&self) -> Result<String, BuilderError> {
        let template = self.current().ok_or(BuilderError::EmptyClipboard)?;
        Ok(to_json(template)?)
    }

    /// Load a JSON template file, apply `policy` to unloaded objects, and add
    /// the result to the history.
    pub fn import_json(
        &mut self,
        json: &str,
        objects: &dyn ObjectResolver,
        policy: LoadPolicy,
    ) -> Result<&Template, BuilderError> {
        let loaded = load_template(json, objects, policy)?;
        self.add(loaded.template);
        self.current().ok_or(BuilderError::EmptyClipboard)
    }
}
