#![forbid(unsafe_code)]

pub mod config;
pub mod domain;
pub mod error;
pub mod signature;
pub mod source;

pub mod container {
    pub mod frame;
    pub mod metadata;
}

pub mod pair;
pub mod session;

// Re-exports: stable API surface
pub use config::CombineConfig;
pub use container::metadata::{Metadata, split_header};
pub use domain::{AddSummary, CombineResult, FileId, InputFile, SessionState};
pub use error::{JoinError, Result};
pub use pair::{PairSession, Slot};
pub use session::Session;
pub use signature::FileKind;
pub use source::{ByteSource, Candidate, FsSource, MemorySource};
