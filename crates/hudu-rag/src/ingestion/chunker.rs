//! Text chunking with boundary-aware splitting and offset tracking

use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::{Chunk, DocumentUnit};

/// Split boundaries, coarsest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Paragraph,
    Line,
    Sentence,
    Word,
}

impl Boundary {
    fn finer(self) -> Option<Boundary> {
        match self {
            Boundary::Paragraph => Some(Boundary::Line),
            Boundary::Line => Some(Boundary::Sentence),
            Boundary::Sentence => Some(Boundary::Word),
            Boundary::Word => None,
        }
    }

    /// Contiguous segments of `text` as relative byte ranges
    fn segments(self, text: &str) -> Vec<(usize, usize)> {
        match self {
            Boundary::Paragraph => inclusive_ranges(text.split_inclusive("\n\n")),
            Boundary::Line => inclusive_ranges(text.split_inclusive('\n')),
            Boundary::Sentence => text
                .split_sentence_bound_indices()
                .map(|(start, s)| (start, start + s.len()))
                .collect(),
            Boundary::Word => inclusive_ranges(text.split_inclusive(' ')),
        }
    }
}

fn inclusive_ranges<'a>(parts: impl Iterator<Item = &'a str>) -> Vec<(usize, usize)> {
    let mut offset = 0;
    parts
        .map(|part| {
            let range = (offset, offset + part.len());
            offset += part.len();
            range
        })
        .collect()
}

/// Text chunker with configurable size and overlap
///
/// Sizes are counted in characters. Chunks are exact slices of the unit
/// text, so `byte_start..byte_end` always indexes back into the source.
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Maximum chunk length in characters
    chunk_size: usize,
    /// Maximum overlap between neighbouring chunks
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            overlap,
        }
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Chunk document units, preserving unit order
    pub fn chunk_units(&self, units: &[DocumentUnit]) -> Result<Vec<Chunk>> {
        let mut chunks = Vec::new();

        for (unit_index, unit) in units.iter().enumerate() {
            for (start, end) in self.split_ranges(&unit.text) {
                chunks.push(Chunk {
                    index: chunks.len() as u32,
                    unit_index,
                    text: unit.text[start..end].to_string(),
                    byte_start: start,
                    byte_end: end,
                    metadata: unit.metadata.clone(),
                });
            }
        }

        if chunks.is_empty() {
            return Err(Error::EmptyCorpus(
                "document produced no non-blank chunks".to_string(),
            ));
        }

        tracing::debug!(
            "Split {} units into {} chunks (size {}, overlap {})",
            units.len(),
            chunks.len(),
            self.chunk_size,
            self.overlap
        );

        Ok(chunks)
    }

    /// Byte ranges of the chunks for a single text
    pub fn split_ranges(&self, text: &str) -> Vec<(usize, usize)> {
        let mut pieces = Vec::new();
        self.collect_pieces(text, 0, Boundary::Paragraph, &mut pieces);

        let lens: Vec<usize> = pieces
            .iter()
            .map(|&(s, e)| text[s..e].chars().count())
            .collect();

        let mut ranges = Vec::new();
        let mut start = 0;

        while start < pieces.len() {
            let mut end = start;
            let mut len = 0;
            while end < pieces.len() && len + lens[end] <= self.chunk_size {
                len += lens[end];
                end += 1;
            }

            let range = (pieces[start].0, pieces[end - 1].1);
            if !text[range.0..range.1].trim().is_empty() {
                ranges.push(range);
            }

            if end == pieces.len() {
                break;
            }

            // Back off over trailing pieces that fit in the overlap budget
            // while leaving room for the next new piece.
            let mut next = end;
            let mut carried = 0;
            while next > start + 1
                && carried + lens[next - 1] <= self.overlap
                && carried + lens[next - 1] + lens[end] <= self.chunk_size
            {
                carried += lens[next - 1];
                next -= 1;
            }
            start = next;
        }

        ranges
    }

    /// Break `text` into contiguous pieces of at most `chunk_size` characters
    fn collect_pieces(
        &self,
        text: &str,
        offset: usize,
        boundary: Boundary,
        out: &mut Vec<(usize, usize)>,
    ) {
        for (s, e) in boundary.segments(text) {
            let segment = &text[s..e];
            if segment.chars().count() <= self.chunk_size {
                out.push((offset + s, offset + e));
                continue;
            }

            match boundary.finer() {
                Some(finer) => self.collect_pieces(segment, offset + s, finer, out),
                None => self.cut_characters(segment, offset + s, out),
            }
        }
    }

    fn cut_characters(&self, text: &str, offset: usize, out: &mut Vec<(usize, usize)>) {
        let mut start = 0;
        let mut count = 0;
        for (i, _) in text.char_indices() {
            if count == self.chunk_size {
                out.push((offset + start, offset + i));
                start = i;
                count = 0;
            }
            count += 1;
        }
        if start < text.len() {
            out.push((offset + start, offset + text.len()));
        }
    }
}
