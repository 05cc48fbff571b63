//! Contiguous, bounded-size slicing of converted rows

/// Split `items` into contiguous chunks of at most `chunk_size` elements
///
/// Every chunk but the last holds exactly `chunk_size` elements, and
/// concatenating the chunks reproduces the input. An empty input yields no
/// chunks. A `chunk_size` of zero is treated as one.
pub fn into_chunks<T>(items: Vec<T>, chunk_size: usize) -> Vec<Vec<T>> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::with_capacity(items.len().div_ceil(chunk_size));
    let mut iter = items.into_iter().peekable();

    while iter.peek().is_some() {
        chunks.push(iter.by_ref().take(chunk_size).collect());
    }

    chunks
}
