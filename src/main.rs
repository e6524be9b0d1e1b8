mod config;
mod error;
mod models;
mod services;

use axum::{
    Router,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{EnvFilter, fmt};

use config::Config;
use models::{ChapterDocument, CreateEpubRequest, DownloadRequest, ListParams, SendRequest};
use services::{
    digest, epub, keywords::KeywordClient, mailer::Mailer, pdf, readwise::ReadwiseClient, sanitize,
};

#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    readwise: Arc<ReadwiseClient>,
    keywords: Arc<KeywordClient>,
    mailer: Arc<Mailer>,
}

type ApiError = (StatusCode, Json<Value>);
type ApiResult = Result<Json<Value>, ApiError>;

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Arc::new(Config::from_env());
    let readwise = Arc::new(ReadwiseClient::new(config.readwise_token.clone())?);
    let keywords = Arc::new(KeywordClient::new(&config)?);
    let mailer = Arc::new(Mailer::new(
        config.resend_api_key.clone(),
        config.from_email.clone(),
    )?);

    let app_state = AppState {
        config: config.clone(),
        readwise,
        keywords,
        mailer,
    };

    let app = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/api/articles", get(list_articles))
        .route("/api/article/:article_id", get(get_article))
        .route("/api/upload-pdf", post(upload_pdf))
        .route("/api/create-epub", post(create_epub))
        .route("/api/download-epub", post(download_epub))
        .route("/api/send-to-kindle", post(send_to_kindle))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::AllowMethods::any())
                .allow_headers(tower_http::cors::AllowHeaders::any()),
        );

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>R2K Digest Service</title>
    <meta charset="utf-8">
    <style>
        body { font-family: Arial, sans-serif; margin: 40px; }
        .endpoint { background-color: #f5f5f5; padding: 10px; margin: 10px 0; border-radius: 4px; font-family: monospace; }
    </style>
</head>
<body>
    <h1>R2K Digest Service</h1>
    <p>Bundles Readwise articles and uploaded PDFs into a single EPUB digest and mails it to a Kindle.</p>
    <h2>Endpoints:</h2>
    <div class="endpoint">GET /health - Health check</div>
    <div class="endpoint">GET /api/articles?location=... - List Readwise articles</div>
    <div class="endpoint">GET /api/article/:id - Fetch one article with content</div>
    <div class="endpoint">POST /api/upload-pdf - Upload a PDF (multipart 'file' field)</div>
    <div class="endpoint">POST /api/create-epub - Build a digest EPUB from selected articles</div>
    <div class="endpoint">POST /api/download-epub - Download a built EPUB</div>
    <div class="endpoint">POST /api/send-to-kindle - Mail a built EPUB to the configured Kindle</div>
</body>
</html>
"#,
    )
}

async fn health_check() -> &'static str {
    "OK"
}

async fn list_articles(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult {
    let articles = state
        .readwise
        .list_articles(params.location.as_deref())
        .await
        .map_err(|e| {
            api_error(
                StatusCode::BAD_GATEWAY,
                format!("Failed to fetch articles: {e}"),
            )
        })?;
    Ok(Json(json!({ "articles": articles })))
}

async fn get_article(State(state): State<AppState>, Path(article_id): Path<String>) -> ApiResult {
    let article = state
        .readwise
        .fetch_article(&article_id)
        .await
        .map_err(|e| {
            api_error(
                StatusCode::BAD_GATEWAY,
                format!("Failed to fetch article: {e}"),
            )
        })?;
    match article {
        Some(article) => Ok(Json(json!(article))),
        None => Err(api_error(StatusCode::NOT_FOUND, "Article not found")),
    }
}

async fn upload_pdf(mut multipart: Multipart) -> ApiResult {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| api_error(StatusCode::BAD_REQUEST, "Malformed upload"))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("").to_string();
        if file_name.is_empty() {
            return Err(api_error(StatusCode::BAD_REQUEST, "No file selected"));
        }
        if !file_name.to_lowercase().ends_with(".pdf") {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "Only PDF files are accepted",
            ));
        }
        let data = field
            .bytes()
            .await
            .map_err(|_| api_error(StatusCode::BAD_REQUEST, "Failed to read upload"))?;

        let content = pdf::extract_pdf_content(&data).map_err(|e| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to process PDF: {e}"),
            )
        })?;

        let title = std::path::Path::new(&file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Untitled")
            .to_string();
        let id = format!("pdf-{}", &uuid::Uuid::new_v4().simple().to_string()[..8]);

        return Ok(Json(json!({
            "id": id,
            "title": title,
            "author": "",
            "html_content": content.html_content,
            "word_count": content.word_count,
            "source": "pdf",
        })));
    }

    Err(api_error(StatusCode::BAD_REQUEST, "No file provided"))
}

async fn create_epub(
    State(state): State<AppState>,
    Json(request): Json<CreateEpubRequest>,
) -> ApiResult {
    if request.article_ids.is_empty() && request.pdf_articles.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "No articles selected"));
    }

    let mut articles = Vec::new();
    for article_id in &request.article_ids {
        match state.readwise.fetch_article(article_id).await {
            Ok(Some(article)) => articles.push(article),
            Ok(None) => tracing::warn!(%article_id, "article not found, skipping"),
            Err(e) => {
                return Err(api_error(
                    StatusCode::BAD_GATEWAY,
                    format!("Failed to fetch article {article_id}: {e}"),
                ));
            }
        }
    }
    articles.extend(request.pdf_articles);

    if articles.is_empty() {
        return Err(api_error(StatusCode::NOT_FOUND, "No article content found"));
    }

    let chapters: Vec<ChapterDocument> = articles
        .iter()
        .map(|a| {
            sanitize::sanitize_chapter(
                &a.html_content,
                &a.title,
                (!a.author.is_empty()).then_some(a.author.as_str()),
            )
        })
        .collect();

    let titles: Vec<String> = articles.iter().map(|a| a.title.clone()).collect();
    let keywords = state.keywords.generate(&titles).await;
    let digest_title = digest::build_digest_title(&titles, keywords);

    let built = epub::assemble(&chapters, &digest_title, &std::env::temp_dir()).map_err(|e| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to create EPUB: {e}"),
        )
    })?;

    Ok(Json(json!({
        "success": true,
        "filepath": built.path.display().to_string(),
        "filename": built.file_name,
        "digest_title": digest_title.display_title,
        "article_count": articles.len(),
    })))
}

/// Accepts only paths under the temp directory with an .epub extension,
/// since the client echoes the filepath back to us.
fn validate_package_path(filepath: &str) -> Result<PathBuf, ApiError> {
    let not_found = || api_error(StatusCode::NOT_FOUND, "EPUB file not found");
    let path = PathBuf::from(filepath)
        .canonicalize()
        .map_err(|_| not_found())?;
    let temp_dir = std::env::temp_dir()
        .canonicalize()
        .map_err(|_| not_found())?;
    if !path.starts_with(&temp_dir) || path.extension().and_then(|e| e.to_str()) != Some("epub") {
        return Err(not_found());
    }
    Ok(path)
}

async fn download_epub(Json(request): Json<DownloadRequest>) -> Result<Response, ApiError> {
    let path = validate_package_path(&request.filepath)?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| api_error(StatusCode::NOT_FOUND, "EPUB file not found"))?;

    let headers = [
        (header::CONTENT_TYPE, "application/epub+zip".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", request.filename),
        ),
    ];
    Ok((headers, bytes).into_response())
}

async fn send_to_kindle(
    State(state): State<AppState>,
    Json(request): Json<SendRequest>,
) -> ApiResult {
    let kindle_email = state
        .config
        .kindle_email
        .as_deref()
        .filter(|email| *email != "your_kindle@kindle.com")
        .ok_or_else(|| {
            api_error(
                StatusCode::BAD_REQUEST,
                "Please configure your Kindle email.",
            )
        })?;

    let path = validate_package_path(&request.filepath)?;
    let subject = request.digest_title.unwrap_or_else(|| {
        format!(
            "{} - {}",
            digest::TITLE_TAG,
            chrono::Local::now().format("%Y%m%d")
        )
    });

    state
        .mailer
        .send_package(kindle_email, &subject, &path, &request.filename)
        .await
        .map_err(|e| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to send email: {e}"),
            )
        })?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Sent to {kindle_email}"),
    })))
}
