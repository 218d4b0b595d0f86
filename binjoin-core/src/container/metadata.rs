use memchr::memmem;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::{JoinError, Result};
use crate::signature::FileKind;

pub const META_START: &[u8] = b"FMETA";
pub const META_END: &[u8] = b"ENDMETA";
pub const TOOL_VERSION: &str = concat!("binjoin/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
    pub kind: FileKind,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub tool_version: String,
    pub file_count: usize,
    pub total_size: u64,
    pub generated_at: String,
    pub files: Vec<FileMeta>,
}

impl Metadata {
    /// `total_size` is the sum of the listed file sizes, framing excluded.
    pub fn new(files: Vec<FileMeta>, deterministic: bool) -> Result<Self> {
        let at = if deterministic {
            OffsetDateTime::UNIX_EPOCH
        } else {
            OffsetDateTime::now_utc()
        };
        let generated_at = at
            .format(&Rfc3339)
            .map_err(|e| JoinError::Metadata(format!("timestamp format: {e}")))?;
        Ok(Self {
            tool_version: TOOL_VERSION.to_string(),
            file_count: files.len(),
            total_size: files.iter().map(|f| f.size).sum(),
            generated_at,
            files,
        })
    }

    /// `FMETA` + compact JSON + `ENDMETA`.
    pub fn encode_header(&self) -> Result<Vec<u8>> {
        let json = serde_json::to_vec(self)
            .map_err(|e| JoinError::Metadata(format!("metadata encode: {e}")))?;
        let mut out = Vec::with_capacity(META_START.len() + json.len() + META_END.len());
        out.extend_from_slice(META_START);
        out.extend_from_slice(&json);
        out.extend_from_slice(META_END);
        Ok(out)
    }
}

/// Split a joined blob into its metadata header and the payload after it.
///
/// Returns `Ok(None)` when the blob does not start with `FMETA`. The first
/// `ENDMETA` after the start marker ends the header; there is no escaping, so
/// a JSON string containing that literal cuts the header short and fails to
/// parse.
pub fn split_header(blob: &[u8]) -> Result<Option<(Metadata, &[u8])>> {
    if !blob.starts_with(META_START) {
        return Ok(None);
    }
    let body = &blob[META_START.len()..];
    let end = memmem::find(body, META_END)
        .ok_or_else(|| JoinError::Metadata("header start marker without ENDMETA".into()))?;
    let meta: Metadata = serde_json::from_slice(&body[..end])
        .map_err(|e| JoinError::Metadata(format!("metadata decode: {e}")))?;
    Ok(Some((meta, &body[end + META_END.len()..])))
}
