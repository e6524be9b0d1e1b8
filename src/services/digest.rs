//! Digest title derivation.

use crate::models::DigestTitle;
use chrono::{Local, NaiveDate};

/// Fixed tag opening every digest title.
pub const TITLE_TAG: &str = "R2K";
/// Hard ceiling on the display title length, in characters.
pub const MAX_TITLE_CHARS: usize = 80;

/// Derives the digest title from the article titles plus optional
/// keywords, one per title. A missing or mismatched keyword list falls
/// back to the bare date-stamped prefix; the display title never exceeds
/// [`MAX_TITLE_CHARS`].
pub fn build_digest_title(titles: &[String], keywords: Option<Vec<String>>) -> DigestTitle {
    build_with_date(titles, keywords, Local::now().date_naive())
}

fn build_with_date(
    titles: &[String],
    keywords: Option<Vec<String>>,
    date: NaiveDate,
) -> DigestTitle {
    let prefix = format!("{} - {}", TITLE_TAG, date.format("%Y%m%d"));
    let keywords = keywords.filter(|kws| kws.len() == titles.len());

    let display_title = match keywords {
        Some(kws) => {
            // Greedy append, stopping before the first keyword that would
            // push the title past the budget. Partial results stand.
            let mut parts: Vec<String> = Vec::new();
            let mut length = prefix.chars().count();
            for kw in kws {
                let addition = kw.chars().count() + " - ".len();
                if length + addition > MAX_TITLE_CHARS {
                    break;
                }
                length += addition;
                parts.push(kw);
            }
            if parts.is_empty() {
                prefix
            } else {
                format!("{} - {}", prefix, parts.join(" - "))
            }
        }
        None => prefix,
    };

    DigestTitle {
        file_name: format!("{}.epub", display_title.replace(' ', "-")),
        display_title,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn titles(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Article {i}")).collect()
    }

    #[test]
    fn fallback_is_exactly_the_prefix() {
        let digest = build_with_date(&titles(3), None, date());
        assert_eq!(digest.display_title, "R2K - 20250115");
    }

    #[test]
    fn mismatched_keyword_count_falls_back() {
        let kws = Some(vec!["one".to_string(), "two".to_string()]);
        let digest = build_with_date(&titles(3), kws, date());
        assert_eq!(digest.display_title, "R2K - 20250115");
    }

    #[test]
    fn keywords_are_appended_in_order() {
        let kws = Some(vec!["Rust".to_string(), "Kindle".to_string()]);
        let digest = build_with_date(&titles(2), kws, date());
        assert_eq!(digest.display_title, "R2K - 20250115 - Rust - Kindle");
    }

    #[test]
    fn overflowing_keyword_stops_the_append_but_keeps_earlier_ones() {
        let kws = Some(vec![
            "Short".to_string(),
            "x".repeat(70),
            "Late".to_string(),
        ]);
        let digest = build_with_date(&titles(3), kws, date());
        // The oversized keyword breaks the loop; nothing after it is used.
        assert_eq!(digest.display_title, "R2K - 20250115 - Short");
    }

    #[test]
    fn title_never_exceeds_the_budget() {
        for count in 1..20 {
            let kws = Some(vec!["keyword pair".to_string(); count]);
            let digest = build_with_date(&titles(count), kws, date());
            assert!(digest.display_title.chars().count() <= MAX_TITLE_CHARS);
        }
    }

    #[test]
    fn oversized_first_keyword_leaves_the_bare_prefix() {
        let kws = Some(vec!["y".repeat(100)]);
        let digest = build_with_date(&titles(1), kws, date());
        assert_eq!(digest.display_title, "R2K - 20250115");
    }

    #[test]
    fn file_name_replaces_spaces_and_adds_extension() {
        let kws = Some(vec!["Web Dev".to_string()]);
        let digest = build_with_date(&titles(1), kws, date());
        assert_eq!(digest.display_title, "R2K - 20250115 - Web Dev");
        assert_eq!(digest.file_name, "R2K---20250115---Web-Dev.epub");
    }
}
