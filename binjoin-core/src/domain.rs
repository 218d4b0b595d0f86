// binjoin_core/src/domain.rs
use std::sync::Arc;

use crate::error::JoinError;
use crate::source::ByteSource;

pub type FileId = u64;

#[derive(Clone)]
pub struct InputFile {
    pub id: FileId,
    pub name: String,
    pub size: u64,
    /// Dense 0..n-1 ordering key.
    pub position: usize,
    pub source: Arc<dyn ByteSource>,
}

impl std::fmt::Debug for InputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputFile")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("size", &self.size)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombineResult {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub byte_size: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    FilesSelected,
    ReadyToCombine,
    Combining,
    Combined,
}

#[derive(Debug)]
pub struct Rejection {
    pub name: String,
    pub error: JoinError,
}

#[derive(Debug, Default)]
pub struct AddSummary {
    pub added: usize,
    pub rejected: Vec<Rejection>,
}

impl AddSummary {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}
