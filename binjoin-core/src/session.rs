use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::CombineConfig;
use crate::container::frame::assemble;
use crate::container::metadata::{FileMeta, Metadata};
use crate::domain::{AddSummary, CombineResult, FileId, InputFile, Rejection, SessionState};
use crate::error::{JoinError, Result};
use crate::signature::{FileKind, SlotRule};
use crate::source::{ByteSource, Candidate};

/// Fewest files a free-order combine accepts.
pub const MIN_FILES: usize = 2;

/// Ordered file selection plus the last combine result.
///
/// `files[i].position == i` holds after every mutation.
pub struct Session {
    files: Vec<InputFile>,
    total_bytes: u64,
    max_total_bytes: u64,
    next_id: FileId,
    combining: bool,
    result: Option<CombineResult>,
}

impl Session {
    pub fn new(max_total_bytes: u64) -> Self {
        Self {
            files: Vec::new(),
            total_bytes: 0,
            max_total_bytes,
            next_id: 1,
            combining: false,
            result: None,
        }
    }

    pub fn from_config(config: &CombineConfig) -> Self {
        Self::new(config.max_total_bytes)
    }

    pub fn files(&self) -> &[InputFile] {
        &self.files
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn max_total_bytes(&self) -> u64 {
        self.max_total_bytes
    }

    pub fn result(&self) -> Option<&CombineResult> {
        self.result.as_ref()
    }

    /// Move the result out; the session falls back to its pre-combine state.
    pub fn take_result(&mut self) -> Option<CombineResult> {
        self.result.take()
    }

    pub fn state(&self) -> SessionState {
        if self.combining {
            SessionState::Combining
        } else if self.result.is_some() {
            SessionState::Combined
        } else {
            match self.files.len() {
                0 => SessionState::Idle,
                n if n < MIN_FILES => SessionState::FilesSelected,
                _ => SessionState::ReadyToCombine,
            }
        }
    }

    /// Pure check; the caller decides whether to add.
    pub fn validate_candidate(&self, candidate: &Candidate, rule: Option<&SlotRule>) -> Result<()> {
        self.admit(candidate, rule).map(|_| ())
    }

    /// Running total after accepting `candidate`.
    fn admit(&self, candidate: &Candidate, rule: Option<&SlotRule>) -> Result<u64> {
        let total = check_capacity(candidate, self.total_bytes, self.max_total_bytes)?;
        check_duplicate(
            candidate,
            self.files.iter().map(|f| (f.name.as_str(), f.size)),
        )?;
        if let Some(rule) = rule {
            check_rule(candidate, rule)?;
        }
        Ok(total)
    }

    /// Append every acceptable candidate in order; rejections do not stop the batch.
    pub fn add_files<I>(&mut self, candidates: I) -> AddSummary
    where
        I: IntoIterator<Item = Candidate>,
    {
        let mut summary = AddSummary::default();
        for c in candidates {
            let total = match self.admit(&c, None) {
                Ok(total) => total,
                Err(error) => {
                    debug!(name = %c.name, size = c.size, %error, "candidate rejected");
                    summary.rejected.push(Rejection {
                        name: c.name,
                        error,
                    });
                    continue;
                }
            };
            let id = self.next_id;
            self.next_id += 1;
            self.total_bytes = total;
            debug!(id, name = %c.name, size = c.size, total = self.total_bytes, "file added");
            self.files.push(InputFile {
                id,
                name: c.name,
                size: c.size,
                position: self.files.len(),
                source: c.source,
            });
            summary.added += 1;
        }
        if summary.added > 0 {
            self.result = None;
        }
        summary
    }

    /// Move `id` to `to` (clamped to the last position). Unknown ids are ignored.
    pub fn reorder(&mut self, id: FileId, to: usize) -> bool {
        let Some(from) = self.index_of(id) else {
            debug!(id, "reorder of unknown file ignored");
            return false;
        };
        let f = self.files.remove(from);
        let to = to.min(self.files.len());
        self.files.insert(to, f);
        self.renumber();
        self.result = None;
        true
    }

    pub fn remove(&mut self, id: FileId) -> Option<InputFile> {
        let idx = self.index_of(id)?;
        let f = self.files.remove(idx);
        self.total_bytes -= f.size;
        self.renumber();
        self.result = None;
        debug!(id, name = %f.name, total = self.total_bytes, "file removed");
        Some(f)
    }

    /// Back to `Idle`: drops every file and any result.
    pub fn reset(&mut self) {
        self.files.clear();
        self.total_bytes = 0;
        self.combining = false;
        self.result = None;
    }

    /// Read every file and join them in position order.
    ///
    /// Any previous result is discarded first; on error nothing is kept.
    pub fn combine(&mut self, config: &CombineConfig) -> Result<&CombineResult> {
        self.result = None;
        if self.files.len() < MIN_FILES {
            return Err(JoinError::Validation(format!(
                "at least {MIN_FILES} files are required, {} selected",
                self.files.len()
            )));
        }
        check_selection(
            self.files.iter().map(|f| (f.name.as_str(), f.size)),
            config.max_total_bytes,
        )?;

        self.combining = true;
        let built = self.build(config);
        self.combining = false;

        let result = built?;
        info!(
            files = self.files.len(),
            bytes = result.byte_size,
            file_name = %result.file_name,
            "combine finished"
        );
        Ok(&*self.result.insert(result))
    }

    fn build(&self, config: &CombineConfig) -> Result<CombineResult> {
        // Reads may finish in any order; collect keeps position order.
        let parts = self
            .files
            .par_iter()
            .map(|f| read_checked(&f.name, f.size, f.source.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let names: Vec<&str> = self.files.iter().map(|f| f.name.as_str()).collect();
        finish(&names, &parts, config)
    }

    fn index_of(&self, id: FileId) -> Option<usize> {
        self.files.iter().position(|f| f.id == id)
    }

    fn renumber(&mut self) {
        for (i, f) in self.files.iter_mut().enumerate() {
            f.position = i;
        }
    }
}

/// New running total, or `Capacity` when it would pass `limit` or overflow.
pub(crate) fn check_capacity(c: &Candidate, current: u64, limit: u64) -> Result<u64> {
    capacity(&c.name, c.size, current, limit)
}

/// Re-check a whole selection against the limit of the config used to combine.
pub(crate) fn check_selection<'a>(
    files: impl Iterator<Item = (&'a str, u64)>,
    limit: u64,
) -> Result<u64> {
    let mut total = 0u64;
    for (name, size) in files {
        total = capacity(name, size, total, limit)?;
    }
    Ok(total)
}

fn capacity(name: &str, size: u64, current: u64, limit: u64) -> Result<u64> {
    match current.checked_add(size) {
        Some(total) if total <= limit => Ok(total),
        total => Err(JoinError::Capacity {
            name: name.to_string(),
            size,
            total: total.unwrap_or(u64::MAX),
            limit,
        }),
    }
}

pub(crate) fn check_duplicate<'a>(
    c: &Candidate,
    mut existing: impl Iterator<Item = (&'a str, u64)>,
) -> Result<()> {
    if existing.any(|(name, size)| name == c.name && size == c.size) {
        return Err(JoinError::Duplicate {
            name: c.name.clone(),
            size: c.size,
        });
    }
    Ok(())
}

pub(crate) fn check_rule(c: &Candidate, rule: &SlotRule) -> Result<()> {
    if rule.accepts_name(&c.name) {
        return Ok(());
    }
    Err(JoinError::Format {
        name: c.name.clone(),
        reason: format!(
            "expected a {} file (.{})",
            rule.label,
            rule.extensions.join(", .")
        ),
    })
}

/// Full read that also insists the source still has its declared size.
pub(crate) fn read_checked(name: &str, size: u64, source: &dyn ByteSource) -> Result<Vec<u8>> {
    let bytes = source.read_all().map_err(|e| JoinError::Read {
        name: name.to_string(),
        source: e,
    })?;
    if bytes.len() as u64 != size {
        return Err(JoinError::Read {
            name: name.to_string(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("size changed since selection: expected {size} bytes, read {}", bytes.len()),
            ),
        });
    }
    Ok(bytes)
}

/// Frame already-read parts into a result.
pub(crate) fn finish(names: &[&str], parts: &[Vec<u8>], config: &CombineConfig) -> Result<CombineResult> {
    let header = if config.include_metadata_header {
        let files = names
            .iter()
            .zip(parts)
            .map(|(name, p)| FileMeta {
                name: name.to_string(),
                size: p.len() as u64,
                kind: FileKind::detect(p),
            })
            .collect();
        Some(Metadata::new(files, config.deterministic)?.encode_header()?)
    } else {
        None
    };
    let bytes = assemble(header.as_deref(), parts, config.insert_separators);
    Ok(CombineResult {
        byte_size: bytes.len() as u64,
        file_name: config.file_name(),
        bytes,
    })
}
