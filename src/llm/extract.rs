//! Structured-block extraction from free-form replies
//!
//! Generation replies often wrap the requested JSON object in prose or code
//! fences. Extraction returns the first balanced `{...}` span; braces inside
//! JSON string literals do not count towards the balance.

/// First balanced `{...}` span in `text`, if any
pub fn extract_json_block(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut start = 0;

    while let Some(offset) = text[start..].find('{') {
        let open = start + offset;
        if let Some(close) = balanced_end(bytes, open) {
            return Some(&text[open..=close]);
        }
        start = open + 1;
    }

    None
}

/// Index of the brace closing the one at `open`
fn balanced_end(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &byte) in bytes.iter().enumerate().skip(open) {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}
