//! Thin Readwise Reader API client.

use crate::models::{Article, ArticleSummary};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::time::Duration;

const API_BASE: &str = "https://readwise.io/api/v3";

pub struct ReadwiseClient {
    client: reqwest::Client,
    token: Option<String>,
}

impl ReadwiseClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()?,
            token,
        })
    }

    fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .context("READWISE_API_TOKEN is not configured")
    }

    /// Lists readable documents, newest first. Highlights and notes are
    /// not readable content and are filtered out.
    pub async fn list_articles(&self, location: Option<&str>) -> Result<Vec<ArticleSummary>> {
        let token = self.token()?;
        let mut params = vec![
            ("pageSize".to_string(), "50".to_string()),
            ("withHtmlContent".to_string(), "false".to_string()),
        ];
        if let Some(location) = location {
            params.push(("location".to_string(), location.to_string()));
        }

        let response = self
            .client
            .get(format!("{API_BASE}/list/"))
            .header("Authorization", format!("Token {token}"))
            .query(&params)
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            bail!("Rate limited. Please wait a moment and try again.");
        }
        let data: Value = response.error_for_status()?.json().await?;

        let mut articles: Vec<ArticleSummary> = data["results"]
            .as_array()
            .map(|results| {
                results
                    .iter()
                    .filter(|item| {
                        let category = item["category"].as_str().unwrap_or("");
                        category != "highlight" && category != "note"
                    })
                    .map(summary_from_value)
                    .collect()
            })
            .unwrap_or_default();

        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(articles)
    }

    /// Fetches one document with its HTML content.
    pub async fn fetch_article(&self, id: &str) -> Result<Option<Article>> {
        let token = self.token()?;
        let data: Value = self
            .client
            .get(format!("{API_BASE}/list/"))
            .header("Authorization", format!("Token {token}"))
            .query(&[("id", id), ("withHtmlContent", "true")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(item) = data["results"].as_array().and_then(|r| r.first()) else {
            return Ok(None);
        };
        Ok(Some(Article {
            id: id.to_string(),
            title: str_field(item, "title", "Untitled"),
            author: str_field(item, "author", ""),
            html_content: str_field(item, "html_content", ""),
        }))
    }
}

fn str_field(item: &Value, key: &str, default: &str) -> String {
    item[key].as_str().unwrap_or(default).to_string()
}

fn summary_from_value(item: &Value) -> ArticleSummary {
    ArticleSummary {
        id: str_field(item, "id", ""),
        title: str_field(item, "title", "Untitled"),
        author: str_field(item, "author", "Unknown"),
        published_date: item.get("published_date").cloned(),
        word_count: item["word_count"].as_u64().unwrap_or(0),
        reading_time: item["reading_progress"].as_f64().unwrap_or(0.0),
        summary: str_field(item, "summary", ""),
        site_name: str_field(item, "site_name", ""),
        source_url: str_field(item, "source_url", ""),
        location: str_field(item, "location", ""),
        created_at: str_field(item, "created_at", ""),
        category: str_field(item, "category", ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_defaults_missing_fields() {
        let summary = summary_from_value(&json!({ "id": "abc" }));
        assert_eq!(summary.id, "abc");
        assert_eq!(summary.title, "Untitled");
        assert_eq!(summary.author, "Unknown");
        assert_eq!(summary.word_count, 0);
    }
}
