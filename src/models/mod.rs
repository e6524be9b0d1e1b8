use serde::{Deserialize, Serialize};

/// How the source layout engine classified a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Text,
    NonText,
}

/// One layout block as reported by the document decoder, in the source's
/// native reading order.
#[derive(Debug, Clone)]
pub struct RawBlock {
    pub page_index: usize,
    pub kind: BlockKind,
    pub text: String,
}

/// A sanitized chapter ready for packaging. The body is a complete,
/// self-contained XHTML document.
#[derive(Debug, Clone)]
pub struct ChapterDocument {
    pub title: String,
    pub author: Option<String>,
    pub body: Vec<u8>,
}

/// Digest title plus the file name derived from it. Recomputed per build.
#[derive(Debug, Clone)]
pub struct DigestTitle {
    pub display_title: String,
    pub file_name: String,
}

/// An article as consumed by the digest build: fetched from Readwise or
/// produced by the PDF upload path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub html_content: String,
}

/// List-endpoint projection of a Readwise document.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleSummary {
    pub id: String,
    pub title: String,
    pub author: String,
    pub published_date: Option<serde_json::Value>,
    pub word_count: u64,
    pub reading_time: f64,
    pub summary: String,
    pub site_name: String,
    pub source_url: String,
    pub location: String,
    pub created_at: String,
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEpubRequest {
    #[serde(default)]
    pub article_ids: Vec<String>,
    #[serde(default)]
    pub pdf_articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub filepath: String,
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub filepath: String,
    pub filename: String,
    #[serde(default)]
    pub digest_title: Option<String>,
}
