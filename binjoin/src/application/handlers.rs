use std::path::{Path, PathBuf};

use binjoin_core::error::{JoinError, Result};
use binjoin_core::{
    Candidate, CombineResult, FileId, Metadata, PairSession, Session, Slot, split_header,
};
use humansize::{BINARY, format_size};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::presentation::cli::OutputArgs;

/// Files named on the command line; directories expand to their files, sorted.
fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for root in inputs {
        if root.is_dir() {
            let mut files = Vec::new();
            for e in WalkDir::new(root).follow_links(false) {
                let e = e.map_err(|e| JoinError::Read {
                    name: root.display().to_string(),
                    source: e.into(),
                })?;
                if e.file_type().is_file() {
                    files.push(e.into_path());
                }
            }
            files.sort();
            out.extend(files);
        } else {
            out.push(root.clone());
        }
    }
    Ok(out)
}

fn candidate(path: &Path) -> Result<Candidate> {
    Candidate::from_path(path).map_err(|e| JoinError::Read {
        name: path.display().to_string(),
        source: e,
    })
}

fn write_result(out_dir: &Path, result: &CombineResult) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)?;
    let dest = out_dir.join(&result.file_name);
    std::fs::write(&dest, &result.bytes)?;
    println!(
        "{}  {} ({} bytes)",
        dest.display(),
        format_size(result.byte_size, BINARY),
        result.byte_size
    );
    Ok(dest)
}

pub fn handle_combine(
    inputs: Vec<PathBuf>,
    drops: Vec<FileId>,
    moves: Vec<(FileId, usize)>,
    output: OutputArgs,
) -> Result<PathBuf> {
    let config = output.config(binjoin_core::config::DEFAULT_EXTENSION);
    let paths = expand_inputs(&inputs)?;
    let candidates = paths
        .iter()
        .map(|p| candidate(p))
        .collect::<Result<Vec<_>>>()?;

    let mut session = Session::from_config(&config);
    let summary = session.add_files(candidates);
    for r in &summary.rejected {
        warn!(name = %r.name, "skipped: {}", r.error);
    }
    info!(
        added = summary.added,
        rejected = summary.rejected_count(),
        total = %format_size(session.total_bytes(), BINARY),
        "inputs selected"
    );

    for id in drops {
        if session.remove(id).is_none() {
            warn!(id, "--drop: no such input");
        }
    }
    for (id, pos) in moves {
        if !session.reorder(id, pos) {
            warn!(id, "--move: no such input");
        }
    }
    for f in session.files() {
        info!(id = f.id, position = f.position, size = f.size, "{}", f.name);
    }

    let result = session.combine(&config)?;
    write_result(&output.out_dir, result)
}

pub fn handle_pair(document: PathBuf, archive: PathBuf, output: OutputArgs) -> Result<PathBuf> {
    let config = output.config("pdf");
    let mut pair = PairSession::new(config.max_total_bytes);
    pair.place(Slot::Document, candidate(&document)?)?;
    pair.place(Slot::Archive, candidate(&archive)?)?;
    info!(
        total = %format_size(pair.total_bytes(), BINARY),
        "document and archive selected"
    );
    let result = pair.combine(&config)?;
    write_result(&output.out_dir, result)
}

fn read_framed(file: &Path) -> Result<Vec<u8>> {
    std::fs::read(file).map_err(|e| JoinError::Read {
        name: file.display().to_string(),
        source: e,
    })
}

fn no_header(file: &Path) -> JoinError {
    JoinError::Format {
        name: file.display().to_string(),
        reason: "no FMETA header at start of file".into(),
    }
}

/// Human-readable listing of a header: one line per file, in output order.
pub fn describe_header(meta: &Metadata) -> String {
    let mut out = format!(
        "binjoin {} at {}: {} files, {}\n",
        meta.tool_version,
        meta.generated_at,
        meta.file_count,
        format_size(meta.total_size, BINARY)
    );
    for (i, f) in meta.files.iter().enumerate() {
        out.push_str(&format!("{:>4}  {:<5} {:>12}  {}\n", i + 1, f.kind, f.size, f.name));
    }
    out
}

pub fn handle_inspect(file: PathBuf) -> Result<()> {
    let blob = read_framed(&file)?;
    let (meta, payload) = split_header(&blob)?.ok_or_else(|| no_header(&file))?;
    print!("{}", describe_header(&meta));
    println!(
        "payload: {} ({} bytes)",
        format_size(payload.len() as u64, BINARY),
        payload.len()
    );
    Ok(())
}

pub fn handle_strip(file: PathBuf, out: PathBuf) -> Result<()> {
    let blob = read_framed(&file)?;
    let (meta, payload) = split_header(&blob)?.ok_or_else(|| no_header(&file))?;
    std::fs::write(&out, payload)?;
    eprintln!(
        "strip: {} -> {} ({} files, {} bytes)",
        file.display(),
        out.display(),
        meta.file_count,
        payload.len()
    );
    Ok(())
}
