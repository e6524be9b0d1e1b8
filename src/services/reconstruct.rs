//! Paragraph reconstruction over raw PDF blocks.
//!
//! Two passes: lines inside a block are joined with hyphenation handling,
//! then paragraphs that start lowercase are merged into their predecessor.
//! The second pass exists because block boundaries follow the layout
//! engine's segmentation, not sentence structure, so a hyphenated word or
//! a paragraph can span two blocks or two pages.

use crate::models::{BlockKind, RawBlock};

/// Reconstructed text: ordered paragraphs plus a whitespace-token count
/// over all of them.
#[derive(Debug, Default)]
pub struct ReconstructedText {
    pub paragraphs: Vec<String>,
    pub word_count: usize,
}

/// Turns an ordered block stream into finished paragraphs. Non-text blocks
/// contribute nothing. Empty input yields an empty result, not an error.
pub fn reconstruct(blocks: &[RawBlock]) -> ReconstructedText {
    let mut paragraphs = Vec::new();
    for block in blocks {
        if block.kind != BlockKind::Text {
            continue;
        }
        paragraphs.extend(join_block_lines(&block.text));
    }
    let paragraphs = merge_continuations(paragraphs);
    let word_count = paragraphs
        .iter()
        .map(|p| p.split_whitespace().count())
        .sum();
    ReconstructedText {
        paragraphs,
        word_count,
    }
}

fn starts_lowercase(s: &str) -> bool {
    s.chars().next().is_some_and(char::is_lowercase)
}

/// Joins the lines of one block into paragraphs. A blank line flushes the
/// accumulator. A line following a trailing hyphen is glued on directly
/// when it starts lowercase (hyphenated word continuation); otherwise
/// lines are joined with a single space.
///
/// The lowercase test is a fixed heuristic: a sentence or proper noun
/// opening a line after a hyphen defeats it.
fn join_block_lines(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        let stripped = line.trim();
        if stripped.is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
            continue;
        }
        if current.ends_with('-') && starts_lowercase(stripped) {
            current.pop();
            current.push_str(stripped);
        } else if !current.is_empty() {
            current.push(' ');
            current.push_str(stripped);
        } else {
            current.push_str(stripped);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }
    paragraphs
}

/// Second pass: a paragraph whose first character is lowercase continues
/// the previous paragraph, joined with the same hyphen-drop rule as line
/// joining. Merging only ever reduces the paragraph count; order is
/// preserved.
fn merge_continuations(paragraphs: Vec<String>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for para in paragraphs {
        match merged.last_mut() {
            Some(prev) if starts_lowercase(&para) => {
                if prev.ends_with('-') {
                    prev.pop();
                } else {
                    prev.push(' ');
                }
                prev.push_str(&para);
            }
            _ => merged.push(para),
        }
    }
    merged
}

/// Renders paragraphs as escaped `<p>` elements, one per line.
pub fn paragraphs_to_html(paragraphs: &[String]) -> String {
    paragraphs
        .iter()
        .map(|p| format!("<p>{}</p>", html_escape::encode_text(p)))
        .collect::<Vec<_>>()
        .join("\n")
}
