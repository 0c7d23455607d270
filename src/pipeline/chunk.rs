//! Fixed-size text chunking for the chunked-summary fallback.

/// Split `text` into consecutive chunks of `size` characters.
///
/// Sizes count Unicode scalar values, so multi-byte characters are never cut.
/// Every chunk but the last holds exactly `size` characters; concatenating the
/// chunks reproduces `text`. An empty input yields no chunks.
///
/// # Panics
/// Never; a `size` of zero is treated as one. Configuration rejects zero
/// before it gets here.
pub fn split_chunks(text: &str, size: usize) -> Vec<String> {
    let size = size.max(1);
    let mut chunks = Vec::with_capacity(text.len() / size + 1);
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == size {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
