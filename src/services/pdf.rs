//! PDF decoding and block extraction.
//!
//! `pdf-extract` returns the whole document as one string with form feeds
//! between pages, so pages are recovered by splitting on `\x0C` and blocks
//! by splitting each page on blank lines.

use crate::error::DigestError;
use crate::models::{BlockKind, RawBlock};
use crate::services::reconstruct;

/// A decoded, page-oriented document. Implementations enumerate blocks in
/// the source's native reading order.
pub trait DocumentSource {
    fn page_count(&self) -> usize;

    /// Blocks on one page, in source order.
    fn page_blocks(&self, page_index: usize) -> Result<Vec<RawBlock>, DigestError>;
}

/// Text-only PDF source backed by `pdf-extract`. Image and vector content
/// is invisible to this decoder, so it emits only `Text` blocks.
pub struct PdfSource {
    pages: Vec<String>,
}

impl PdfSource {
    pub fn decode(data: &[u8]) -> Result<Self, DigestError> {
        let text =
            pdf_extract::extract_text_from_mem(data).map_err(|e| DigestError::DocumentParse {
                page: None,
                message: e.to_string(),
            })?;
        let pages = text.split('\x0C').map(str::to_string).collect();
        Ok(Self { pages })
    }
}

impl DocumentSource for PdfSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_blocks(&self, page_index: usize) -> Result<Vec<RawBlock>, DigestError> {
        let page = self
            .pages
            .get(page_index)
            .ok_or_else(|| DigestError::DocumentParse {
                page: Some(page_index),
                message: "page index out of range".to_string(),
            })?;
        Ok(page
            .split("\n\n")
            .filter(|chunk| !chunk.trim().is_empty())
            .map(|chunk| RawBlock {
                page_index,
                kind: BlockKind::Text,
                text: chunk.trim().to_string(),
            })
            .collect())
    }
}

/// Flattens a document into one ordered block stream, page by page.
pub fn extract_blocks(source: &dyn DocumentSource) -> Result<Vec<RawBlock>, DigestError> {
    let mut blocks = Vec::new();
    for page_index in 0..source.page_count() {
        blocks.extend(source.page_blocks(page_index)?);
    }
    Ok(blocks)
}

/// Extracted PDF content as served by the upload endpoint.
#[derive(Debug)]
pub struct PdfContent {
    pub html_content: String,
    pub word_count: usize,
}

/// Full PDF path: decode, extract blocks, reconstruct paragraphs, render
/// them as `<p>` elements for the sanitizer downstream.
pub fn extract_pdf_content(data: &[u8]) -> Result<PdfContent, DigestError> {
    let source = PdfSource::decode(data)?;
    let blocks = extract_blocks(&source)?;
    let text = reconstruct::reconstruct(&blocks);
    Ok(PdfContent {
        html_content: reconstruct::paragraphs_to_html(&text.paragraphs),
        word_count: text.word_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSource {
        pages: Vec<Vec<RawBlock>>,
    }

    impl DocumentSource for FakeSource {
        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn page_blocks(&self, page_index: usize) -> Result<Vec<RawBlock>, DigestError> {
            self.pages
                .get(page_index)
                .cloned()
                .ok_or_else(|| DigestError::DocumentParse {
                    page: Some(page_index),
                    message: "missing page".to_string(),
                })
        }
    }

    fn block(page_index: usize, kind: BlockKind, text: &str) -> RawBlock {
        RawBlock {
            page_index,
            kind,
            text: text.to_string(),
        }
    }

    #[test]
    fn flattens_pages_in_order() {
        let source = FakeSource {
            pages: vec![
                vec![
                    block(0, BlockKind::Text, "first"),
                    block(0, BlockKind::NonText, ""),
                    block(0, BlockKind::Text, "second"),
                ],
                vec![block(1, BlockKind::Text, "third")],
            ],
        };
        let blocks = extract_blocks(&source).unwrap();
        let texts: Vec<&str> = blocks
            .iter()
            .filter(|b| b.kind == BlockKind::Text)
            .map(|b| b.text.as_str())
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        // Non-text blocks stay in the stream without disturbing order.
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[1].kind, BlockKind::NonText);
    }

    #[test]
    fn pdf_source_splits_pages_and_blocks() {
        let source = PdfSource {
            pages: vec![
                "One block.\n\nTwo block.".to_string(),
                "\n  \n".to_string(),
                "Last page.".to_string(),
            ],
        };
        assert_eq!(source.page_count(), 3);
        let first = source.page_blocks(0).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].text, "One block.");
        assert_eq!(first[1].text, "Two block.");
        assert!(source.page_blocks(1).unwrap().is_empty());
        assert_eq!(source.page_blocks(2).unwrap()[0].page_index, 2);
    }

    #[test]
    fn out_of_range_page_reports_index() {
        let source = PdfSource { pages: vec![] };
        match source.page_blocks(5) {
            Err(DigestError::DocumentParse { page, .. }) => assert_eq!(page, Some(5)),
            other => panic!("expected DocumentParse, got {other:?}"),
        }
    }
}
