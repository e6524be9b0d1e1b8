//! EPUB package assembly.
//!
//! Chapters are added in input order; `epub-builder` derives both the
//! spine and the table of contents from that order, so no other key ever
//! reorders them.

use crate::error::DigestError;
use crate::models::{ChapterDocument, DigestTitle};
use chrono::Local;
use epub_builder::{EpubBuilder, EpubContent, ReferenceType, ZipLibrary};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Fixed publisher recorded as the package author.
const PUBLISHER: &str = "Readwise";
/// Fixed package language.
const LANGUAGE: &str = "en";

const STYLESHEET: &str = "\
body { font-family: serif; line-height: 1.6; padding: 1em; }
h1 { margin-bottom: 0.5em; }
img { max-width: 100%; height: auto; }
pre, code { font-family: monospace; background: #f4f4f4; padding: 0.2em; }
blockquote { border-left: 3px solid #ccc; margin-left: 0; padding-left: 1em; }
";

/// A finished package on disk.
#[derive(Debug)]
pub struct BuiltPackage {
    pub path: PathBuf,
    pub file_name: String,
}

/// Identifier unique per build: collision-resistant for same-day rebuilds,
/// not globally unique. `set_uuid` wants a real `Uuid`, so the readable
/// date-plus-discriminator string is hashed into a v5 UUID.
fn build_identifier() -> Uuid {
    let discriminator = Uuid::new_v4().simple().to_string();
    let name = format!(
        "r2k-digest-{}-{}",
        Local::now().format("%Y-%m-%d"),
        &discriminator[..8]
    );
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}

/// Assembles the chapters into one EPUB under `out_dir`, named by the
/// digest title. The package is generated into a temporary file and only
/// persisted under its final name once generation succeeds, so a failed
/// build never leaves a half-written artifact behind.
pub fn assemble(
    chapters: &[ChapterDocument],
    digest: &DigestTitle,
    out_dir: &Path,
) -> Result<BuiltPackage, DigestError> {
    if chapters.is_empty() {
        return Err(DigestError::EmptyPackage);
    }

    let epub_err = |e| DigestError::Epub(format!("{e}"));

    let zip = ZipLibrary::new().map_err(epub_err)?;
    let mut book = EpubBuilder::new(zip).map_err(epub_err)?;
    book.set_uuid(build_identifier());
    book.metadata("title", digest.display_title.as_str())
        .map_err(epub_err)?;
    book.metadata("lang", LANGUAGE).map_err(epub_err)?;
    book.metadata("author", PUBLISHER).map_err(epub_err)?;
    book.stylesheet(STYLESHEET.as_bytes()).map_err(epub_err)?;
    book.inline_toc();

    for (index, chapter) in chapters.iter().enumerate() {
        book.add_content(
            EpubContent::new(
                format!("chapter_{}.xhtml", index + 1),
                chapter.body.as_slice(),
            )
            .title(chapter.title.as_str())
            .reftype(ReferenceType::Text),
        )
        .map_err(epub_err)?;
    }

    let mut tmp = tempfile::NamedTempFile::new_in(out_dir)?;
    book.generate(tmp.as_file_mut()).map_err(epub_err)?;

    let path = out_dir.join(&digest.file_name);
    tmp.persist(&path).map_err(|e| DigestError::Io(e.error))?;

    tracing::info!(path = %path.display(), chapters = chapters.len(), "wrote digest package");
    Ok(BuiltPackage {
        path,
        file_name: digest.file_name.clone(),
    })
}
