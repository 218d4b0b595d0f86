use thiserror::Error;

#[derive(Error, Debug)]
pub enum JoinError {
    #[error("capacity exceeded: {name} ({size} bytes) would bring the total to {total} bytes, limit is {limit}")]
    Capacity {
        name: String,
        size: u64,
        total: u64,
        limit: u64,
    },

    #[error("duplicate file: {name} ({size} bytes) is already selected")]
    Duplicate { name: String, size: u64 },

    #[error("format error: {name}: {reason}")]
    Format { name: String, reason: String },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("I/O error reading {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metadata error: {0}")]
    Metadata(String),
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, JoinError>;
