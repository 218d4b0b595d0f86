use binjoin::application::handlers::{
    describe_header, handle_combine, handle_inspect, handle_pair, handle_strip,
};
use binjoin::presentation::cli::OutputArgs;
use binjoin_core::JoinError;
use std::path::{Path, PathBuf};

fn output(dir: &Path, name: &str) -> OutputArgs {
    OutputArgs {
        out_dir: dir.join("out"),
        name: name.to_string(),
        ext: None,
        separators: false,
        metadata: false,
        max_total: 1 << 20,
        deterministic: true,
    }
}

fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let p = dir.join(name);
    if let Some(parent) = p.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&p, bytes).unwrap();
    p
}

#[test]
fn combine_writes_into_out_dir() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.txt", b"AAAA");
    let b = write(dir.path(), "b.txt", b"BB");
    let dest = handle_combine(vec![a, b], vec![], vec![], output(dir.path(), "joined")).unwrap();
    assert_eq!(dest, dir.path().join("out").join("joined.bin"));
    assert_eq!(std::fs::read(dest).unwrap(), b"AAAABB");
}

#[test]
fn combine_applies_moves_and_drops() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.txt", b"A");
    let b = write(dir.path(), "b.txt", b"B");
    let c = write(dir.path(), "c.txt", b"C");
    let dest = handle_combine(
        vec![a, b, c],
        vec![2],
        vec![(3, 0)],
        output(dir.path(), "moved"),
    )
    .unwrap();
    assert_eq!(std::fs::read(dest).unwrap(), b"CA");
}

#[test]
fn directories_expand_sorted() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "parts/2.txt", b"two");
    write(dir.path(), "parts/1.txt", b"one");
    let dest = handle_combine(
        vec![dir.path().join("parts")],
        vec![],
        vec![],
        output(dir.path(), "dir"),
    )
    .unwrap();
    assert_eq!(std::fs::read(dest).unwrap(), b"onetwo");
}

#[test]
fn combine_with_single_input_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.txt", b"A");
    let err = handle_combine(vec![a], vec![], vec![], output(dir.path(), "x")).unwrap_err();
    assert!(matches!(err, JoinError::Validation(_)));
    assert!(!dir.path().join("out").join("x.bin").exists());
}

#[test]
fn pair_then_strip_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write(dir.path(), "doc.pdf", b"%PDF-1.7 body");
    let zip = write(dir.path(), "data.zip", &[0x50, 0x4B, 0x03, 0x04, 0xFF]);
    let mut out = output(dir.path(), "both");
    out.metadata = true;
    let dest = handle_pair(pdf, zip, out).unwrap();
    assert_eq!(dest.extension().unwrap(), "pdf");

    handle_inspect(dest.clone()).unwrap();
    let blob = std::fs::read(&dest).unwrap();
    let (meta, _) = binjoin_core::split_header(&blob).unwrap().unwrap();
    let listing = describe_header(&meta);
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 3);
    let row = |l: &str| l.split_whitespace().map(str::to_string).collect::<Vec<_>>();
    assert_eq!(row(lines[1]), ["1", "pdf", "13", "doc.pdf"]);
    assert_eq!(row(lines[2]), ["2", "zip", "5", "data.zip"]);

    let stripped = dir.path().join("payload.bin");
    handle_strip(dest, stripped.clone()).unwrap();
    let mut want = b"%PDF-1.7 body".to_vec();
    want.extend_from_slice(&[0x50, 0x4B, 0x03, 0x04, 0xFF]);
    assert_eq!(std::fs::read(stripped).unwrap(), want);
}

#[test]
fn strip_without_header_is_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let plain = write(dir.path(), "plain.bin", b"AAAABB");
    let err = handle_strip(plain, dir.path().join("o")).unwrap_err();
    assert!(matches!(err, JoinError::Format { .. }));
}

#[test]
fn pair_rejects_wrong_extension() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write(dir.path(), "doc.txt", b"%PDF-1.7");
    let zip = write(dir.path(), "data.zip", &[0x50, 0x4B, 0x03, 0x04]);
    let err = handle_pair(pdf, zip, output(dir.path(), "x")).unwrap_err();
    assert!(matches!(err, JoinError::Format { .. }));
}

#[test]
fn inspect_without_header_is_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let plain = write(dir.path(), "plain.bin", b"AAAABB");
    assert!(matches!(
        handle_inspect(plain),
        Err(JoinError::Format { .. })
    ));
}
