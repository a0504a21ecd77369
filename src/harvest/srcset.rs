//! `srcset` list parsing

/// URLs of a `srcset`/`data-srcset` value, descriptors discarded
///
/// Follows the HTML candidate-string rules: a URL runs up to the next
/// whitespace, so commas inside it (`data:` URIs) stay part of the URL.
/// Trailing commas end the candidate; otherwise descriptors are skipped up
/// to the next comma outside parentheses.
pub fn urls(srcset: &str) -> impl Iterator<Item = &str> {
    let bytes = srcset.as_bytes();
    let len = bytes.len();
    let mut out = Vec::new();
    let mut pos = 0;

    loop {
        while pos < len && (bytes[pos].is_ascii_whitespace() || bytes[pos] == b',') {
            pos += 1;
        }
        if pos >= len {
            break;
        }

        let start = pos;
        while pos < len && !bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let token = &srcset[start..pos];

        let url = if token.ends_with(',') {
            token.trim_end_matches(',')
        } else {
            let mut depth = 0usize;
            while pos < len {
                match bytes[pos] {
                    b'(' => depth += 1,
                    b')' => depth = depth.saturating_sub(1),
                    b',' if depth == 0 => break,
                    _ => {}
                }
                pos += 1;
            }
            token
        };

        if !url.is_empty() {
            out.push(url);
        }
    }

    out.into_iter()
}
