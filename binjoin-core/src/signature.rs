//! Leading-signature detection for the formats the joiner cares about.
//!
//! Only the magic bytes are inspected; nothing here parses the containers.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const PDF_MAGIC: &[u8] = b"%PDF-";
pub const ZIP_MAGIC: &[u8] = &[0x50, 0x4B, 0x03, 0x04];
pub const RAR_MAGIC: &[u8] = b"Rar!\x1A\x07";
pub const SEVEN_ZIP_MAGIC: &[u8] = &[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C];
pub const GZIP_MAGIC: &[u8] = &[0x1F, 0x8B];
pub const TAR_MAGIC: &[u8] = b"ustar";
pub const TAR_MAGIC_OFFSET: usize = 257;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Zip,
    Rar,
    #[serde(rename = "7z")]
    SevenZip,
    Gzip,
    Tar,
    Unknown,
}

impl FileKind {
    pub fn detect(data: &[u8]) -> FileKind {
        if data.starts_with(PDF_MAGIC) {
            FileKind::Pdf
        } else if data.starts_with(ZIP_MAGIC) {
            FileKind::Zip
        } else if data.starts_with(RAR_MAGIC) {
            FileKind::Rar
        } else if data.starts_with(SEVEN_ZIP_MAGIC) {
            FileKind::SevenZip
        } else if data.starts_with(GZIP_MAGIC) {
            FileKind::Gzip
        } else if data
            .get(TAR_MAGIC_OFFSET..TAR_MAGIC_OFFSET + TAR_MAGIC.len())
            .is_some_and(|m| m == TAR_MAGIC)
        {
            FileKind::Tar
        } else {
            FileKind::Unknown
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Zip => "zip",
            FileKind::Rar => "rar",
            FileKind::SevenZip => "7z",
            FileKind::Gzip => "gz",
            FileKind::Tar => "tar",
            FileKind::Unknown => "bin",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.extension())
    }
}

/// Acceptance rule for one slot of the fixed two-kind layout.
#[derive(Debug, Clone, Copy)]
pub struct SlotRule {
    pub label: &'static str,
    /// Lower-case extensions without the dot.
    pub extensions: &'static [&'static str],
    /// Bytes the content must start with at combine time.
    pub magic: &'static [u8],
}

pub const DOCUMENT_RULE: SlotRule = SlotRule {
    label: "PDF",
    extensions: &["pdf"],
    magic: PDF_MAGIC,
};

pub const ARCHIVE_RULE: SlotRule = SlotRule {
    label: "archive",
    extensions: &["zip", "rar", "7z", "tar", "gz"],
    magic: ZIP_MAGIC,
};

impl SlotRule {
    pub fn accepts_name(&self, name: &str) -> bool {
        match name.rsplit_once('.') {
            Some((_, ext)) => {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            }
            None => false,
        }
    }

    pub fn matches_header(&self, data: &[u8]) -> bool {
        data.starts_with(self.magic)
    }
}
