/*!
 * Greedy grouping of strings into request-sized chunks.
 *
 * Lengths are counted in Unicode scalar values. A string is never split: one
 * longer than the budget travels alone as an oversized chunk.
 */

use std::ops::Range;

/// A contiguous run of input strings sent in one provider request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the chunk in dispatch order
    pub index: usize,
    /// Indices of the strings covered, in the slice given to `Chunker::chunk`
    pub range: Range<usize>,
    /// Combined character count of the covered strings
    pub char_count: usize,
    /// Whether a single string alone exceeds the budget
    pub oversized: bool,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Splits strings into chunks under a character budget
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    max_chars: usize,
}

impl Chunker {
    /// A budget of zero is treated as one character.
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Group `texts` greedily, preserving order
    pub fn chunk<T: AsRef<str>>(&self, texts: &[T]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut start = 0;
        let mut current_chars = 0;

        for (i, text) in texts.iter().enumerate() {
            let chars = text.as_ref().chars().count();

            if i > start && current_chars + chars > self.max_chars {
                chunks.push(self.close(chunks.len(), start..i, current_chars));
                start = i;
                current_chars = 0;
            }
            current_chars += chars;
        }

        if start < texts.len() {
            chunks.push(self.close(chunks.len(), start..texts.len(), current_chars));
        }

        chunks
    }

    fn close(&self, index: usize, range: Range<usize>, char_count: usize) -> Chunk {
        Chunk {
            index,
            oversized: range.len() == 1 && char_count > self.max_chars,
            range,
            char_count,
        }
    }
}
