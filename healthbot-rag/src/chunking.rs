//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`RecursiveChunker`], which
//! splits hierarchically by paragraphs, lines, sentences, then words, and
//! carries a configurable overlap between consecutive chunks.
//!
//! All lengths are measured in characters (Unicode scalar values), never bytes,
//! so multi-byte text is never cut inside a code point.

use std::collections::VecDeque;

use crate::document::{Chunk, Document};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text but no embeddings.
/// Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has no non-whitespace text.
    /// Each returned chunk has an empty embedding vector.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

/// Splits text hierarchically: paragraphs → lines → sentences → words → characters.
///
/// Segments no longer than `chunk_size` are merged greedily into chunks; when a
/// chunk is emitted, trailing segments totalling at most `chunk_overlap`
/// characters are carried into the next one.
///
/// # Example
///
/// ```rust
/// use healthbot_rag::{Chunker, Document, RecursiveChunker};
///
/// let chunker = RecursiveChunker::new(500, 50);
/// let chunks = chunker.chunk(&Document::new("flu.txt", "Influenza is a viral infection."));
/// assert_eq!(chunks.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size`: maximum number of characters per chunk (clamped to at least 1)
    /// * `chunk_overlap`: number of overlapping characters between consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self { chunk_size, chunk_overlap: chunk_overlap.min(chunk_size - 1) }
    }

    /// Split raw text into chunk strings without wrapping them in [`Chunk`]s.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        split_recursive(text, self.chunk_size, self.chunk_overlap, &SEPARATORS)
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.trim().is_empty() {
            return Vec::new();
        }

        self.split_text(&document.text)
            .into_iter()
            .enumerate()
            .map(|(i, text)| Chunk {
                id: format!("{}_{i}", document.id),
                text,
                document_id: document.id.clone(),
                chunk_index: i,
                embedding: Vec::new(),
            })
            .collect()
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split `text` by the first separator that occurs in it, recursing into
/// oversized segments with the remaining separators.
fn split_recursive(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    if char_len(text) <= chunk_size {
        return vec![text.to_string()];
    }

    let Some(pos) = separators.iter().position(|sep| text.contains(sep)) else {
        return split_by_size(text, chunk_size, chunk_overlap);
    };
    let separator = separators[pos];
    let remaining = &separators[pos + 1..];

    let mut chunks = Vec::new();
    let mut pending: Vec<&str> = Vec::new();

    for segment in split_keeping_separator(text, separator) {
        if char_len(segment) <= chunk_size {
            pending.push(segment);
        } else {
            chunks.extend(merge_segments(&pending, chunk_size, chunk_overlap));
            pending.clear();
            chunks.extend(split_recursive(segment, chunk_size, chunk_overlap, remaining));
        }
    }
    chunks.extend(merge_segments(&pending, chunk_size, chunk_overlap));

    chunks
}

/// Greedily merge segments into chunks of at most `chunk_size` characters,
/// seeding each new chunk with up to `chunk_overlap` characters of trailing
/// segments from the previous one.
fn merge_segments(segments: &[&str], chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut window: VecDeque<(&str, usize)> = VecDeque::new();
    let mut total = 0;

    for segment in segments {
        let len = char_len(segment);
        if total + len > chunk_size && !window.is_empty() {
            chunks.push(window.iter().map(|(s, _)| *s).collect::<String>());
            while total > chunk_overlap || (total + len > chunk_size && total > 0) {
                let Some((_, front)) = window.pop_front() else { break };
                total -= front;
            }
        }
        window.push_back((segment, len));
        total += len;
    }

    if !window.is_empty() {
        chunks.push(window.iter().map(|(s, _)| *s).collect::<String>());
    }

    chunks
}

/// Split text at a separator while keeping the separator attached to the preceding segment.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        result.push(&text[start..]);
    }

    result
}

/// Character-window splitting with overlap, used when no separator applies.
fn split_by_size(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let step = chunk_size.saturating_sub(chunk_overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_chunk() {
        let doc = Document::new("a.txt", "  Rest and fluids help.  ");
        let chunks = RecursiveChunker::new(100, 10).chunk(&doc);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Rest and fluids help.");
        assert_eq!(chunks[0].id, "a.txt_0");
        assert!(chunks[0].embedding.is_empty());
    }

    #[test]
    fn whitespace_only_document_yields_nothing() {
        let doc = Document::new("blank.txt", " \n\n ");
        assert!(RecursiveChunker::new(100, 10).chunk(&doc).is_empty());
    }

    #[test]
    fn chunks_respect_size_and_overlap() {
        let text = (0..60).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
        let chunker = RecursiveChunker::new(50, 12);
        let chunks = chunker.split_text(&text);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= 50));

        // The last word of a chunk reappears at the start of the next one.
        for pair in chunks.windows(2) {
            let tail = pair[0].split(' ').next_back().unwrap();
            assert!(pair[1].contains(tail), "{tail:?} not carried into {:?}", pair[1]);
        }
    }

    #[test]
    fn prefers_paragraph_boundaries() {
        let text = format!("{}\n\n{}", "a".repeat(30), "b".repeat(30));
        let chunks = RecursiveChunker::new(40, 0).split_text(&text);
        assert_eq!(chunks, vec!["a".repeat(30), "b".repeat(30)]);
    }

    #[test]
    fn long_unbroken_text_falls_back_to_character_windows() {
        let chunks = split_by_size(&"x".repeat(25), 10, 2);
        assert_eq!(chunks.iter().map(|c| c.len()).collect::<Vec<_>>(), vec![10, 10, 9]);
    }

    #[test]
    fn multibyte_text_is_split_on_char_boundaries() {
        let text = "é".repeat(30);
        let chunks = RecursiveChunker::new(8, 2).split_text(&text);
        assert!(chunks.iter().all(|c| c.chars().count() <= 8));
    }
}
