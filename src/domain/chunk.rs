use std::num::NonZeroUsize;

/// Maximum number of characters the gateway accepts in one call.
pub const MAX_CHUNK_LENGTH: NonZeroUsize = match NonZeroUsize::new(999) {
    Some(length) => length,
    None => unreachable!(),
};

/// Split `text` into consecutive pieces of `length` characters.
///
/// Offsets count Unicode scalar values. Every piece except the last holds exactly
/// `length` characters, and joining the pieces in order gives back `text`. Slicing
/// ignores words and grapheme clusters, so a multi-character symbol can straddle
/// two pieces. Empty input yields no pieces.
pub fn chunk(text: &str, length: NonZeroUsize) -> Vec<&str> {
    let length = length.get();
    let mut chunks = Vec::with_capacity(text.len().div_ceil(length));
    let mut start = 0;

    for (count, (offset, _)) in text.char_indices().enumerate() {
        if count > 0 && count % length == 0 {
            chunks.push(&text[start..offset]);
            start = offset;
        }
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}
