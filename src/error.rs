use thiserror::Error;

/// Errors that abort a single digest build.
#[derive(Debug, Error)]
pub enum DigestError {
    /// The source document could not be decoded. `page` is the page index
    /// reached before the failure, if any page was read.
    #[error("failed to decode document{}: {message}", .page.map(|p| format!(" (page {p})")).unwrap_or_default())]
    DocumentParse {
        page: Option<usize>,
        message: String,
    },

    /// The caller asked for a package with zero chapters. Rejected rather
    /// than emitting an empty, malformed EPUB.
    #[error("cannot assemble a package with no chapters")]
    EmptyPackage,

    /// epub-builder reports failures as `eyre::Report`, which carries no
    /// `std::error::Error` impl; only the message is kept.
    #[error("epub assembly failed: {0}")]
    Epub(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
