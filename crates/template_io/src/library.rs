// ---------------------------------------------------------------------------
// library – binary blob holding an ordered list of templates
// ---------------------------------------------------------------------------
//
// Layout (16-byte header, little-endian):
//   [0..4]   Magic bytes: "SCNT"
//   [4..8]   Blob format version (u32)
//   [8..12]  Flags (u32: bit 0 = lz4 compressed)
//   [12..16] xxHash32 checksum of the payload (everything after the header)
//
// Payload: bitcode-encoded `LibraryBlob`, lz4 compressed with the
// uncompressed size prepended when the compressed flag is set.

use bitcode::{Decode, Encode};
use xxhash_rust::xxh32::xxh32;

use scenery::Template;

use crate::format::TemplateFile;
use crate::io_error::TemplateIoError;

pub const MAGIC: [u8; 4] = *b"SCNT";

/// Version of the blob layout, independent of the JSON template format.
pub const LIBRARY_VERSION: u32 = 1;

pub const HEADER_SIZE: usize = 16;

const FLAG_COMPRESSED: u32 = 1;

const XXHASH_SEED: u32 = 0;

#[derive(Encode, Decode, Default)]
struct LibraryBlob {
    templates: Vec<TemplateFile>,
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Encode `templates` into a checksummed, compressed blob.
pub fn encode_library(templates: &[Template]) -> Vec<u8> {
    let blob = LibraryBlob {
        templates: templates.iter().map(TemplateFile::from).collect(),
    };
    let payload = lz4_flex::compress_prepend_size(&bitcode::encode(&blob));

    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&LIBRARY_VERSION.to_le_bytes());
    out.extend_from_slice(&FLAG_COMPRESSED.to_le_bytes());
    out.extend_from_slice(&xxh32(&payload, XXHASH_SEED).to_le_bytes());
    out.extend_from_slice(&payload);
    out
}

/// Decode a blob written by [`encode_library`].
///
/// # Errors
///
/// Fails on a missing header, a newer blob version, a checksum mismatch,
/// or a payload that does not decompress and decode.
pub fn decode_library(bytes: &[u8]) -> Result<Vec<Template>, TemplateIoError> {
    if bytes.len() < HEADER_SIZE || bytes[..4] != MAGIC {
        return Err(TemplateIoError::Decode(format!(
            "not a template library ({} bytes, missing header)",
            bytes.len()
        )));
    }
    let version = read_u32(bytes, 4);
    if version > LIBRARY_VERSION {
        return Err(TemplateIoError::VersionMismatch {
            expected_max: LIBRARY_VERSION,
            found: version,
        });
    }
    let flags = read_u32(bytes, 8);
    let expected = read_u32(bytes, 12);
    let payload = &bytes[HEADER_SIZE..];
    let computed = xxh32(payload, XXHASH_SEED);
    if computed != expected {
        return Err(TemplateIoError::Corrupt { expected, computed });
    }

    let blob: LibraryBlob = if flags & FLAG_COMPRESSED != 0 {
        bitcode::decode(&lz4_flex::decompress_size_prepended(payload)?)?
    } else {
        bitcode::decode(payload)?
    };
    blob.templates
        .into_iter()
        .map(TemplateFile::into_template)
        .collect()
}
