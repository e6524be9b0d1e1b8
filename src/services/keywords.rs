//! Groq-backed keyword generation for digest titles.
//!
//! A best-effort collaborator: every failure mode (missing key, timeout,
//! bad response shape, wrong keyword count) yields `None` and the digest
//! title falls back to its date-stamped prefix. Nothing here can fail a
//! build.

use crate::config::Config;
use regex::Regex;
use serde_json::json;
use std::time::Duration;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Leading list markers ("1.", "-", "3)") some models prepend anyway.
const LIST_MARKER: &str = r"^[\d.\-)\s]+";

pub struct KeywordClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    list_marker: Regex,
}

impl KeywordClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()?,
            api_key: config.groq_api_key.clone(),
            model: config.groq_model.clone(),
            list_marker: Regex::new(LIST_MARKER)?,
        })
    }

    /// One 1-2 word keyword per title, in title order, or `None` when the
    /// collaborator is unconfigured or misbehaves.
    pub async fn generate(&self, titles: &[String]) -> Option<Vec<String>> {
        let api_key = self.api_key.as_ref()?;
        if titles.is_empty() {
            return None;
        }

        let titles_text = titles
            .iter()
            .map(|t| format!("- {t}"))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "For each article title below, produce exactly one keyword (1-2 words) \
             that captures its core topic. Output one keyword per line, no numbering, \
             no extra text.\n\n{titles_text}"
        );

        let response = self
            .client
            .post(GROQ_API_URL)
            .bearer_auth(api_key)
            .json(&json!({
                "model": self.model,
                "messages": [{"role": "user", "content": prompt}],
                "temperature": 0.0,
            }))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| tracing::warn!("keyword generation failed: {e}"))
            .ok()?;

        let body: serde_json::Value = response.json().await.ok()?;
        let content = body["choices"][0]["message"]["content"].as_str()?;
        parse_keywords(content, titles.len(), &self.list_marker)
    }
}

/// Parses model output: one keyword per line, list markers stripped,
/// capped at two words. The keyword count must match the title count
/// exactly or the whole result is discarded.
fn parse_keywords(text: &str, expected: usize, list_marker: &Regex) -> Option<Vec<String>> {
    let mut keywords = Vec::new();
    for line in text.lines() {
        let line = list_marker.replace(line.trim(), "");
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let words: Vec<&str> = line.split_whitespace().take(2).collect();
        keywords.push(words.join(" "));
    }
    (keywords.len() == expected).then_some(keywords)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker() -> Regex {
        Regex::new(LIST_MARKER).unwrap()
    }

    #[test]
    fn strips_numbering_and_caps_at_two_words() {
        let parsed = parse_keywords("1. Rust\n2) Web Dev Stuff\n- Kindle\n", 3, &marker());
        assert_eq!(
            parsed,
            Some(vec![
                "Rust".to_string(),
                "Web Dev".to_string(),
                "Kindle".to_string()
            ])
        );
    }

    #[test]
    fn blank_lines_are_skipped() {
        let parsed = parse_keywords("Alpha\n\n\nBeta", 2, &marker());
        assert_eq!(parsed, Some(vec!["Alpha".to_string(), "Beta".to_string()]));
    }

    #[test]
    fn count_mismatch_discards_everything() {
        assert_eq!(parse_keywords("Only One", 2, &marker()), None);
        assert_eq!(parse_keywords("One\nTwo\nThree", 2, &marker()), None);
    }
}
