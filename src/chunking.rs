//! Transcript chunking for embedding and retrieval.
//!
//! Splits raw transcript text into overlapping segments small enough to
//! embed, preferring natural boundaries (paragraphs, lines, sentences,
//! words) over hard character cuts.

use serde::{Deserialize, Serialize};

/// Default chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default overlap between consecutive chunks in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Boundary candidates, coarsest first. A piece that still exceeds the
/// chunk size after the last separator is cut at raw character offsets.
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " "];

/// A bounded segment of transcript text, addressed by its source file and
/// position within that source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content of this chunk.
    pub text: String,
    /// Source file the chunk was ingested from.
    pub source: String,
    /// Zero-based position of this chunk within its source.
    pub index: usize,
}

impl Chunk {
    pub fn new(text: impl Into<String>, source: impl Into<String>, index: usize) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            index,
        }
    }

    /// Stable external key, unique per `(source, index)`.
    pub fn id(&self) -> String {
        format!("{}_{}", self.source, self.index)
    }
}

/// Recursive character splitter.
///
/// Tries the coarsest separator first and recurses into finer ones for any
/// piece still longer than the chunk size. Separators stay attached to the
/// preceding piece, so joining the pieces reproduces the input exactly.
/// Consecutive chunks share up to `chunk_overlap` characters of trailing
/// context. Sizes are measured in characters, not bytes.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

impl TextChunker {
    /// Create a chunker with the given size and overlap, in characters.
    /// The overlap must leave room for new content in every chunk, so it is
    /// capped just below the chunk size.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Split `text` into an ordered sequence of chunks.
    ///
    /// Same input, size, and overlap always produce the identical sequence.
    /// Text at or under the chunk size comes back as a single chunk equal to
    /// the input; empty text yields no chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        if char_len(text) <= self.chunk_size {
            return vec![text.to_string()];
        }
        let pieces = self.split_pieces(text, SEPARATORS);
        self.merge(pieces)
    }

    /// Recursively break `text` into pieces no longer than the chunk size.
    /// Concatenating the returned pieces reproduces `text` exactly.
    fn split_pieces(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let Some((separator, finer)) = separators.split_first() else {
            return split_at_char_offsets(text, self.chunk_size);
        };

        let mut pieces = Vec::new();
        for part in split_keeping_separator(text, separator) {
            if char_len(&part) <= self.chunk_size {
                pieces.push(part);
            } else {
                pieces.extend(self.split_pieces(&part, finer));
            }
        }
        pieces
    }

    /// Greedily pack pieces into chunks of at most `chunk_size` characters,
    /// carrying trailing pieces of each finished chunk into the next as
    /// overlap. Every piece lands in exactly one chunk as new content, so the
    /// non-overlapping cores concatenate back to the original text.
    fn merge(&self, pieces: Vec<String>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut current_len = 0usize;

        for piece in pieces {
            let piece_len = char_len(&piece);

            if !current.is_empty() && current_len + piece_len > self.chunk_size {
                chunks.push(current.concat());

                let mut carried = Vec::new();
                let mut carried_len = 0usize;
                for prev in current.iter().rev() {
                    let prev_len = char_len(prev);
                    if carried_len + prev_len > self.chunk_overlap {
                        break;
                    }
                    carried_len += prev_len;
                    carried.push(prev.clone());
                }
                carried.reverse();
                current = carried;
                current_len = carried_len;

                // A large incoming piece may not fit next to the full
                // overlap; shed carried pieces from the front until it does.
                while !current.is_empty() && current_len + piece_len > self.chunk_size {
                    let dropped = current.remove(0);
                    current_len -= char_len(&dropped);
                }
            }

            current_len += piece_len;
            current.push(piece);
        }

        if !current.is_empty() {
            chunks.push(current.concat());
        }
        chunks
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split on `separator`, keeping each separator attached to the piece before
/// it. `"a\n\nb"` splits on `"\n\n"` into `["a\n\n", "b"]`.
fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut rest = text;
    while let Some(found) = rest.find(separator) {
        let end = found + separator.len();
        parts.push(rest[..end].to_string());
        rest = &rest[end..];
    }
    if parts.is_empty() {
        parts.push(rest.to_string());
    } else if !rest.is_empty() {
        parts.push(rest.to_string());
    }
    parts
}

/// Last-resort split into windows of exactly `size` characters (the final
/// window may be shorter).
fn split_at_char_offsets(text: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(size)
        .map(|window| window.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Remove the longest prefix of `next` that is a suffix of `prev`.
    fn strip_overlap(prev: &str, next: &str) -> String {
        let mut offsets: Vec<usize> = next.char_indices().map(|(i, _)| i).collect();
        offsets.push(next.len());
        for &k in offsets.iter().rev() {
            if k <= prev.len() && prev.ends_with(&next[..k]) {
                return next[k..].to_string();
            }
        }
        next.to_string()
    }

    fn reconstruct(chunks: &[String]) -> String {
        let mut rebuilt = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                rebuilt.push_str(chunk);
            } else {
                rebuilt.push_str(&strip_overlap(&chunks[i - 1], chunk));
            }
        }
        rebuilt
    }

    /// Text made of distinct tokens, so overlap stripping is unambiguous.
    fn distinct_word_text(words: usize) -> String {
        (0..words)
            .map(|i| format!("token{i}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunker = TextChunker::default();
        let text = "Alice called about the invoice. Bob confirmed payment.";
        assert_eq!(chunker.split(text), vec![text.to_string()]);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let chunker = TextChunker::default();
        assert!(chunker.split("").is_empty());
    }

    #[test]
    fn split_is_deterministic() {
        let chunker = TextChunker::new(120, 30);
        let text = distinct_word_text(200);
        assert_eq!(chunker.split(&text), chunker.split(&text));
    }

    #[test]
    fn chunks_respect_the_size_limit() {
        let chunker = TextChunker::new(150, 40);
        let text = distinct_word_text(300);
        for chunk in chunker.split(&text) {
            assert!(chunk.chars().count() <= 150, "chunk too long: {chunk:?}");
        }
    }

    #[test]
    fn consecutive_chunks_share_trailing_context() {
        let chunker = TextChunker::new(150, 40);
        let text = distinct_word_text(300);
        let chunks = chunker.split(&text);
        assert!(chunks.len() > 2);
        for pair in chunks.windows(2) {
            let stripped = strip_overlap(&pair[0], &pair[1]);
            assert!(
                stripped.len() < pair[1].len(),
                "no shared context between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn cores_reconstruct_the_original_text() {
        let chunker = TextChunker::new(150, 40);
        let text = distinct_word_text(300);
        let chunks = chunker.split(&text);
        assert_eq!(reconstruct(&chunks), text);
    }

    #[test]
    fn multi_paragraph_text_reconstructs_exactly() {
        let chunker = TextChunker::new(200, 50);
        let paragraphs: Vec<String> = (0..8)
            .map(|p| {
                (0..30)
                    .map(|w| format!("p{p}w{w}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        let text = paragraphs.join("\n\n");
        let chunks = chunker.split(&text);
        assert!(chunks.len() > 1);
        assert_eq!(reconstruct(&chunks), text);
    }

    #[test]
    fn paragraph_breaks_are_preferred_boundaries() {
        let first: String = std::iter::repeat('a').take(80).collect();
        let second: String = std::iter::repeat('b').take(80).collect();
        let text = format!("{first}\n\n{second}");
        let chunker = TextChunker::new(100, 0);
        let chunks = chunker.split(&text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], format!("{first}\n\n"));
        assert_eq!(chunks[1], second);
    }

    #[test]
    fn unbroken_text_falls_back_to_character_cuts() {
        let text: String = std::iter::repeat('x').take(950).collect();
        let chunker = TextChunker::new(400, 0);
        let chunks = chunker.split(&text);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 400);
        assert_eq!(chunks[1].chars().count(), 400);
        assert_eq!(chunks[2].chars().count(), 150);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn multibyte_text_splits_on_character_boundaries() {
        let text: String = std::iter::repeat('ø').take(90).collect();
        let chunker = TextChunker::new(40, 10);
        let chunks = chunker.split(&text);
        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 40);
        }
        // Character windows of 40 exceed the overlap of 10, so nothing is
        // carried between chunks and plain concatenation restores the text.
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn overlap_is_capped_below_chunk_size() {
        let chunker = TextChunker::new(50, 500);
        let text = distinct_word_text(100);
        // Must terminate and still cover the whole text.
        let chunks = chunker.split(&text);
        assert_eq!(reconstruct(&chunks), text);
    }

    #[test]
    fn chunk_ids_use_source_and_index() {
        let chunk = Chunk::new("hello", "call1.m4a", 0);
        assert_eq!(chunk.id(), "call1.m4a_0");
        assert_eq!(Chunk::new("x", "call1.m4a", 7).id(), "call1.m4a_7");
    }
}
