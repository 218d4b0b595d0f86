/// Marker emitted before file `index` (0-based) when separators are on.
pub fn separator(index: usize) -> Vec<u8> {
    format!("--- FILE {} SEPARATOR ---", index + 1).into_bytes()
}

/// Exact output length for the given framing; no padding is ever added.
pub fn framed_len(header: Option<&[u8]>, parts: &[Vec<u8>], separators: bool) -> usize {
    let mut n = header.map_or(0, <[u8]>::len);
    for (i, p) in parts.iter().enumerate() {
        if separators && i > 0 {
            n += separator(i).len();
        }
        n += p.len();
    }
    n
}

/// `[header] part0 [sep2] part1 [sep3] part2 ...`, allocated once.
pub fn assemble(header: Option<&[u8]>, parts: &[Vec<u8>], separators: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(framed_len(header, parts, separators));
    if let Some(h) = header {
        out.extend_from_slice(h);
    }
    for (i, p) in parts.iter().enumerate() {
        if separators && i > 0 {
            out.extend_from_slice(&separator(i));
        }
        out.extend_from_slice(p);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts() -> Vec<Vec<u8>> {
        vec![b"AAAA".to_vec(), b"BB".to_vec(), b"C".to_vec()]
    }

    #[test]
    fn plain_concatenation() {
        assert_eq!(assemble(None, &parts()[..2], false), b"AAAABB");
    }

    #[test]
    fn separators_are_numbered_from_two() {
        let out = assemble(None, &parts(), true);
        assert_eq!(
            out,
            b"AAAA--- FILE 2 SEPARATOR ---BB--- FILE 3 SEPARATOR ---C".to_vec()
        );
    }

    #[test]
    fn header_goes_first_without_separator() {
        let out = assemble(Some(b"HDR"), &parts()[..2], true);
        assert_eq!(out, b"HDRAAAA--- FILE 2 SEPARATOR ---BB".to_vec());
    }

    #[test]
    fn framed_len_matches_output() {
        let ps = parts();
        for sep in [false, true] {
            for hdr in [None, Some(&b"xyz"[..])] {
                assert_eq!(framed_len(hdr, &ps, sep), assemble(hdr, &ps, sep).len());
            }
        }
    }
}
