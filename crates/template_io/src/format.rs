//! JSON template file.
//!
//! ```json
//! {
//!   "version": 1,
//!   "elements": [{ "type": "wall", "x": 0, "y": 32, "z": 16, ... }],
//!   "extent": { "start": [0, 0], "end": [32, 32] },
//!   "surfaceHeight": 16
//! }
//! ```
//!
//! `extent` may instead be a list of `[x, y]` tile origins.

use bevy::math::IVec2;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use scenery::{Element, Extent, Template};

use crate::io_error::TemplateIoError;

/// Newest file version this build writes and understands.
pub const FORMAT_VERSION: u32 = 1;

fn default_version() -> u32 {
    FORMAT_VERSION
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(untagged)]
pub enum ExtentFile {
    // Listed first: serde would also accept a two-item array as a `Rect`.
    Tiles(Vec<[i32; 2]>),
    Rect { start: [i32; 2], end: [i32; 2] },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFile {
    #[serde(default = "default_version")]
    pub version: u32,
    pub elements: Vec<Element>,
    pub extent: ExtentFile,
    #[serde(alias = "referenceSurfaceHeight")]
    pub surface_height: i32,
}

fn pair(v: IVec2) -> [i32; 2] {
    [v.x, v.y]
}

fn vec(p: [i32; 2]) -> IVec2 {
    IVec2::new(p[0], p[1])
}

impl From<&Extent> for ExtentFile {
    fn from(extent: &Extent) -> Self {
        match extent {
            Extent::Rect { start, end } => ExtentFile::Rect {
                start: pair(*start),
                end: pair(*end),
            },
            Extent::Tiles(tiles) => ExtentFile::Tiles(tiles.iter().copied().map(pair).collect()),
        }
    }
}

impl From<ExtentFile> for Extent {
    fn from(file: ExtentFile) -> Self {
        match file {
            ExtentFile::Tiles(tiles) => Extent::Tiles(tiles.into_iter().map(vec).collect()),
            ExtentFile::Rect { start, end } => Extent::rect(vec(start), vec(end)),
        }
    }
}

impl From<&Template> for TemplateFile {
    fn from(template: &Template) -> Self {
        TemplateFile {
            version: FORMAT_VERSION,
            elements: template.elements.clone(),
            extent: (&template.extent).into(),
            surface_height: template.surface_height,
        }
    }
}

impl TemplateFile {
    /// Convert into a [`Template`], rejecting files from a newer build.
    pub fn into_template(self) -> Result<Template, TemplateIoError> {
        if self.version > FORMAT_VERSION {
            return Err(TemplateIoError::VersionMismatch {
                expected_max: FORMAT_VERSION,
                found: self.version,
            });
        }
        Ok(Template::new(
            self.elements,
            self.extent.into(),
            self.surface_height,
        ))
    }
}

pub fn to_json(template: &Template) -> Result<String, TemplateIoError> {
    serde_json::to_string(&TemplateFile::from(template))
        .map_err(|e| TemplateIoError::Encode(e.to_string()))
}

pub fn from_json(json: &str) -> Result<Template, TemplateIoError> {
    let file: TemplateFile = serde_json::from_str(json)?;
    file.into_template()
}
