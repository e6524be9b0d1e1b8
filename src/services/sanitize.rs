//! Chapter sanitization.
//!
//! Third-party article HTML is parsed permissively, then re-serialized by
//! an explicit tree walk that drops script and style subtrees entirely and
//! re-escapes every text node and attribute value. The surviving content
//! is wrapped in a standalone XHTML shell with a title header.

use crate::models::ChapterDocument;
use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};

const EMPTY_FALLBACK: &str = "<p>No content available.</p>";

/// Elements whose entire subtree is removed, content included.
fn is_stripped(name: &str) -> bool {
    matches!(name, "script" | "style")
}

/// Void elements serialized self-closing for XHTML.
fn is_void(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

fn write_node(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => {
            let text: &str = text;
            out.push_str(&html_escape::encode_text(text));
        }
        Node::Element(element) => {
            let name = element.name();
            if is_stripped(name) {
                return;
            }
            out.push('<');
            out.push_str(name);
            for (key, value) in element.attrs() {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(value));
                out.push('"');
            }
            if is_void(name) {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in node.children() {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        // Comments, doctypes and processing instructions are dropped.
        _ => {}
    }
}

/// Serializes the sanitized inner content of the fragment: the body's
/// children when a body exists, the whole tree otherwise.
fn sanitized_body(fragment: &str) -> String {
    let doc = Html::parse_document(fragment);
    if !doc.errors.is_empty() {
        tracing::warn!(
            errors = doc.errors.len(),
            "recovered from malformed chapter HTML"
        );
    }

    let mut out = String::new();
    let body = Selector::parse("body")
        .ok()
        .and_then(|sel| doc.select(&sel).next());
    match body {
        Some(body) => {
            for child in body.children() {
                write_node(child, &mut out);
            }
        }
        None => {
            for child in doc.tree.root().children() {
                write_node(child, &mut out);
            }
        }
    }
    out
}

/// Cleans an HTML fragment and wraps it into a self-contained chapter
/// document. Empty input is replaced by a single "no content" paragraph.
pub fn sanitize_chapter(html_content: &str, title: &str, author: Option<&str>) -> ChapterDocument {
    let fragment = if html_content.trim().is_empty() {
        EMPTY_FALLBACK
    } else {
        html_content
    };
    let body = sanitized_body(fragment);

    let author = author.filter(|a| !a.is_empty());
    let mut header = format!("<h1>{}</h1>", html_escape::encode_text(title));
    if let Some(author) = author {
        header.push_str(&format!(
            "<p><em>By {}</em></p><hr/>",
            html_escape::encode_text(author)
        ));
    }

    let document = format!(
        "<html xmlns=\"http://www.w3.org/1999/xhtml\">\n<head><title>{}</title></head>\n<body>\n{}\n{}\n</body>\n</html>",
        html_escape::encode_text(title),
        header,
        body,
    );

    ChapterDocument {
        title: title.to_string(),
        author: author.map(str::to_string),
        body: document.into_bytes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitize_to_string(html: &str, title: &str, author: Option<&str>) -> String {
        let chapter = sanitize_chapter(html, title, author);
        String::from_utf8(chapter.body).unwrap()
    }

    #[test]
    fn strips_script_and_style_with_content() {
        let out = sanitize_to_string(
            "<div><script>alert('x')</script><style>p{}</style><p>Keep me</p></div>",
            "T",
            None,
        );
        assert!(!out.contains("script"));
        assert!(!out.contains("alert"));
        assert!(!out.contains("style>"));
        assert!(out.contains("<p>Keep me</p>"));
    }

    #[test]
    fn sanitizing_twice_reintroduces_nothing() {
        let once = sanitize_to_string("<p>hi</p><script>bad()</script>", "T", None);
        let twice = sanitize_to_string(&once, "T", None);
        assert!(!twice.contains("<script"));
        assert!(!twice.contains("bad()"));
        assert!(twice.contains("hi"));
    }

    #[test]
    fn empty_content_gets_placeholder() {
        let out = sanitize_to_string("", "Empty", None);
        assert!(out.contains("<p>No content available.</p>"));
    }

    #[test]
    fn header_carries_title_and_optional_byline() {
        let with_author = sanitize_to_string("<p>x</p>", "My Title", Some("Jane Doe"));
        assert!(with_author.contains("<h1>My Title</h1>"));
        assert!(with_author.contains("<p><em>By Jane Doe</em></p><hr/>"));

        let without = sanitize_to_string("<p>x</p>", "My Title", None);
        assert!(without.contains("<h1>My Title</h1>"));
        assert!(!without.contains("By "));

        let blank_author = sanitize_to_string("<p>x</p>", "My Title", Some(""));
        assert!(!blank_author.contains("<em>"));
    }

    #[test]
    fn title_is_escaped_in_shell() {
        let out = sanitize_to_string("<p>x</p>", "Tom & Jerry <3", None);
        assert!(out.contains("<title>Tom &amp; Jerry &lt;3</title>"));
        assert!(out.contains("<h1>Tom &amp; Jerry &lt;3</h1>"));
    }

    #[test]
    fn body_content_is_extracted_from_full_documents() {
        let out = sanitize_to_string(
            "<html><head><style>ignored</style></head><body><p>inner</p></body></html>",
            "T",
            None,
        );
        assert!(out.contains("<p>inner</p>"));
        assert!(!out.contains("ignored"));
    }

    #[test]
    fn malformed_html_is_recovered() {
        let out = sanitize_to_string("<p>unclosed <em>nested", "T", None);
        assert!(out.contains("unclosed"));
        assert!(out.contains("nested"));
    }

    #[test]
    fn void_elements_are_self_closed() {
        let out = sanitize_to_string("<p>a<br>b</p><img src=\"x.png\">", "T", None);
        assert!(out.contains("<br/>"));
        assert!(out.contains("<img src=\"x.png\"/>"));
    }
}
