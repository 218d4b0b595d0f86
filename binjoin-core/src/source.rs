use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where a candidate's bytes come from. Reads happen at combine time.
pub trait ByteSource: Send + Sync {
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_all(&self) -> std::io::Result<Vec<u8>>;

    /// Up to `n` leading bytes; shorter when the source is shorter.
    fn read_prefix(&self, n: usize) -> std::io::Result<Vec<u8>>;
}

#[derive(Clone, Debug)]
pub struct MemorySource {
    bytes: Arc<[u8]>,
}

impl MemorySource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            bytes: Arc::from(bytes),
        }
    }
}

impl ByteSource for MemorySource {
    fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn read_all(&self) -> std::io::Result<Vec<u8>> {
        Ok(self.bytes.to_vec())
    }

    fn read_prefix(&self, n: usize) -> std::io::Result<Vec<u8>> {
        Ok(self.bytes[..n.min(self.bytes.len())].to_vec())
    }
}

/// A file on disk; the size is captured when the source is opened.
#[derive(Clone, Debug)]
pub struct FsSource {
    path: PathBuf,
    len: u64,
}

impl FsSource {
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let md = std::fs::metadata(path)?;
        if !md.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        Ok(Self {
            path: path.to_path_buf(),
            len: md.len(),
        })
    }
}

impl ByteSource for FsSource {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_all(&self) -> std::io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }

    fn read_prefix(&self, n: usize) -> std::io::Result<Vec<u8>> {
        let f = File::open(&self.path)?;
        let mut buf = Vec::with_capacity(n);
        f.take(n as u64).read_to_end(&mut buf)?;
        Ok(buf)
    }
}

/// A user-supplied file normalized to (name, size, source).
#[derive(Clone)]
pub struct Candidate {
    pub name: String,
    pub size: u64,
    pub source: Arc<dyn ByteSource>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, source: Arc<dyn ByteSource>) -> Self {
        Self {
            name: name.into(),
            size: source.len(),
            source,
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(name, Arc::new(MemorySource::new(bytes)))
    }

    /// Display name is the final path component.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let src = FsSource::open(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, Arc::new(src)))
    }
}

impl std::fmt::Debug for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Candidate")
            .field("name", &self.name)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
