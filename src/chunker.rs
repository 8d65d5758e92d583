//! Sentence-aware transcript chunking.
//!
//! Units are split on the period-plus-space heuristic. This is not real
//! sentence segmentation: abbreviations like "Dr. Smith" produce two units,
//! and sentences ending in `?` or `!` do not split at all.

use tracing::debug;

/// Boundary between two units.
pub const UNIT_DELIMITER: &str = ". ";

/// Split text into sentence-like units.
///
/// Every unit but the last keeps the period that terminated it, so joining
/// the units with a single space restores the input up to trailing
/// whitespace. Repeated delimiters yield units that are only a period
/// (`"A. . B."` gives `["A.", ".", "B."]`); these are kept so nothing is lost.
/// A trailing empty or blank piece is dropped.
pub fn split_into_units(text: &str) -> Vec<String> {
    let mut pieces: Vec<&str> = text.split(UNIT_DELIMITER).collect();
    let last = pieces.pop();

    let mut units: Vec<String> = pieces.into_iter().map(|p| format!("{}.", p)).collect();

    if let Some(last) = last {
        let last = last.trim_end();
        if !last.is_empty() {
            units.push(last.to_string());
        }
    }

    units
}

/// Pack units into chunks of at most `max_chunk_capacity` bytes.
///
/// A unit longer than the capacity is never split; it becomes a chunk of its
/// own. Empty input yields no chunks.
pub fn chunk_text(text: &str, max_chunk_capacity: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for unit in split_into_units(text) {
        let needed = if current.is_empty() {
            unit.len()
        } else {
            current.len() + 1 + unit.len()
        };

        if needed <= max_chunk_capacity || current.is_empty() {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&unit);
            continue;
        }

        push_chunk(&mut chunks, &current);
        current = unit;
    }

    push_chunk(&mut chunks, &current);

    debug!(
        "Split {} chars into {} chunks (capacity {})",
        text.len(),
        chunks.len(),
        max_chunk_capacity
    );

    chunks
}

fn push_chunk(chunks: &mut Vec<String>, buffer: &str) {
    let trimmed = buffer.trim_end();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}
