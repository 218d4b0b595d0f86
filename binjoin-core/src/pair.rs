//! Fixed two-slot layout: a PDF document followed by a ZIP-family archive.
//!
//! Readers that scan from the front see the PDF, readers that scan from the
//! back (ZIP central directory) see the archive.

use tracing::{info, warn};

use crate::config::CombineConfig;
use crate::domain::{CombineResult, SessionState};
use crate::error::{JoinError, Result};
use crate::session::{
    check_capacity, check_duplicate, check_rule, check_selection, finish, read_checked,
};
use crate::signature::{ARCHIVE_RULE, DOCUMENT_RULE, SlotRule};
use crate::source::Candidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Document,
    Archive,
}

impl Slot {
    pub fn rule(&self) -> &'static SlotRule {
        match self {
            Slot::Document => &DOCUMENT_RULE,
            Slot::Archive => &ARCHIVE_RULE,
        }
    }

    fn index(&self) -> usize {
        match self {
            Slot::Document => 0,
            Slot::Archive => 1,
        }
    }

    fn other(&self) -> Slot {
        match self {
            Slot::Document => Slot::Archive,
            Slot::Archive => Slot::Document,
        }
    }
}

pub struct PairSession {
    slots: [Option<Candidate>; 2],
    max_total_bytes: u64,
    combining: bool,
    result: Option<CombineResult>,
}

impl PairSession {
    pub fn new(max_total_bytes: u64) -> Self {
        Self {
            slots: [None, None],
            max_total_bytes,
            combining: false,
            result: None,
        }
    }

    pub fn get(&self, slot: Slot) -> Option<&Candidate> {
        self.slots[slot.index()].as_ref()
    }

    pub fn total_bytes(&self) -> u64 {
        self.slots.iter().flatten().map(|c| c.size).sum()
    }

    pub fn result(&self) -> Option<&CombineResult> {
        self.result.as_ref()
    }

    pub fn take_result(&mut self) -> Option<CombineResult> {
        self.result.take()
    }

    pub fn state(&self) -> SessionState {
        if self.combining {
            SessionState::Combining
        } else if self.result.is_some() {
            SessionState::Combined
        } else {
            match self.slots.iter().flatten().count() {
                0 => SessionState::Idle,
                1 => SessionState::FilesSelected,
                _ => SessionState::ReadyToCombine,
            }
        }
    }

    /// Check a candidate for `slot`; the file it would replace does not count.
    pub fn validate_candidate(&self, slot: Slot, candidate: &Candidate) -> Result<()> {
        let other = self.get(slot.other());
        check_capacity(
            candidate,
            other.map_or(0, |c| c.size),
            self.max_total_bytes,
        )?;
        check_duplicate(candidate, other.map(|c| (c.name.as_str(), c.size)).into_iter())?;
        check_rule(candidate, slot.rule())
    }

    /// Put `candidate` into `slot`, replacing what was there.
    pub fn place(&mut self, slot: Slot, candidate: Candidate) -> Result<()> {
        self.validate_candidate(slot, &candidate)?;
        self.slots[slot.index()] = Some(candidate);
        self.result = None;
        Ok(())
    }

    pub fn clear(&mut self, slot: Slot) -> Option<Candidate> {
        let prev = self.slots[slot.index()].take();
        if prev.is_some() {
            self.result = None;
        }
        prev
    }

    pub fn reset(&mut self) {
        self.slots = [None, None];
        self.combining = false;
        self.result = None;
    }

    /// Document bytes first, archive bytes second, each signature-checked.
    ///
    /// A bad document signature fails before the archive is read.
    pub fn combine(&mut self, config: &CombineConfig) -> Result<&CombineResult> {
        self.result = None;
        let (Some(doc), Some(arc)) = (self.get(Slot::Document), self.get(Slot::Archive)) else {
            return Err(JoinError::Validation(
                "both a PDF document and an archive are required".into(),
            ));
        };
        check_selection(
            [(doc.name.as_str(), doc.size), (arc.name.as_str(), arc.size)].into_iter(),
            config.max_total_bytes,
        )?;
        let (doc, arc) = (doc.clone(), arc.clone());

        self.combining = true;
        let built = build(&doc, &arc, config);
        self.combining = false;

        let result = built?;
        info!(
            bytes = result.byte_size,
            file_name = %result.file_name,
            "pair combine finished"
        );
        Ok(&*self.result.insert(result))
    }
}

fn build(doc: &Candidate, arc: &Candidate, config: &CombineConfig) -> Result<CombineResult> {
    // Both signatures before either full read; the archive is untouched if the document fails.
    check_signature(doc, Slot::Document)?;
    check_signature(arc, Slot::Archive)?;
    let doc_bytes = read_checked(&doc.name, doc.size, doc.source.as_ref())?;
    let arc_bytes = read_checked(&arc.name, arc.size, arc.source.as_ref())?;
    finish(
        &[doc.name.as_str(), arc.name.as_str()],
        &[doc_bytes, arc_bytes],
        config,
    )
}

fn check_signature(c: &Candidate, slot: Slot) -> Result<()> {
    let rule = slot.rule();
    let head = c
        .source
        .read_prefix(rule.magic.len())
        .map_err(|e| JoinError::Read {
            name: c.name.clone(),
            source: e,
        })?;
    if !rule.matches_header(&head) {
        warn!(name = %c.name, slot = ?slot, "leading signature mismatch");
        return Err(JoinError::Format {
            name: c.name.clone(),
            reason: format!(
                "{} content must start with {:02X?}",
                rule.label, rule.magic
            ),
        });
    }
    Ok(())
}
