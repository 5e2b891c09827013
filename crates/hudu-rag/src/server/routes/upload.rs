//! Document upload endpoints

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    http::header::CONTENT_TYPE,
    Json,
};
use std::sync::Arc;
use std::time::Instant;

use crate::config::UploadPolicy;
use crate::error::{Error, Result};
use crate::generation::AnsweringPipeline;
use crate::server::state::AppState;
use crate::types::{
    document::extension_of, FileType, UploadResponse, UploadUrlRequest, SUPPORTED_EXTENSIONS,
};

/// Filename used when a URL has no usable last segment
const DEFAULT_URL_FILENAME: &str = "document.pdf";

/// POST /upload - Upload a file and open a session for it
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut file = None;
    let mut session_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::invalid_request(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| Error::invalid_request(format!("Failed to read file: {}", e)))?;
                file = Some((filename, data));
            }
            "session_id" => {
                let value = field.text().await.map_err(|e| {
                    Error::invalid_request(format!("Failed to read session_id: {}", e))
                })?;
                let value = value.trim();
                if !value.is_empty() {
                    session_id = Some(value.to_string());
                }
            }
            _ => {}
        }
    }

    let (filename, data) = file.ok_or_else(|| Error::invalid_request("No file provided"))?;
    check_upload_policy(&filename, state.config().upload.accept)?;

    tracing::info!("Processing upload: {} ({} bytes)", filename, data.len());

    let extension = extension_of(&filename).unwrap_or_default();
    let session_id = ingest_bytes(&state, &filename, &extension, &data, session_id).await?;

    Ok(Json(UploadResponse::processed(session_id, filename)))
}

/// POST /upload-url - Download a document and open a session for it
pub async fn upload_url(
    State(state): State<AppState>,
    request: std::result::Result<Json<UploadUrlRequest>, JsonRejection>,
) -> Result<Json<UploadResponse>> {
    let Json(request) = request?;
    let url = request.url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(Error::invalid_request(
            "Invalid URL. Must start with http:// or https://",
        ));
    }

    tracing::info!("Downloading document from {}", url);

    let response = state
        .http_client()
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| Error::download(format!("Failed to download file from URL: {}", e)))?;

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_lowercase();

    let filename = filename_from_url(url);
    let extension = download_extension(
        &content_type,
        url,
        &filename,
        state.config().upload.accept,
    )
    .ok_or_else(|| Error::download("URL does not point to a PDF file"))?;

    let limit = state.config().server.max_upload_size;
    let data = read_capped(response, limit).await?;

    let session_id = request
        .session_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());
    let session_id = ingest_bytes(&state, &filename, &extension, &data, session_id).await?;

    Ok(Json(UploadResponse::processed(session_id, filename)))
}

/// Write bytes to a temp file, build a pipeline over it and register a session
///
/// The temp file is removed when the build fails; on success the session
/// owns it.
async fn ingest_bytes(
    state: &AppState,
    filename: &str,
    extension: &str,
    data: &[u8],
    session_id: Option<String>,
) -> Result<String> {
    let providers = state.providers()?.clone();
    let start = Instant::now();

    let suffix = if extension.is_empty() {
        String::new()
    } else {
        format!(".{}", extension)
    };

    let temp_dir = &state.config().upload.temp_dir;
    tokio::fs::create_dir_all(temp_dir).await?;
    let temp = tempfile::Builder::new()
        .prefix("hudu-upload-")
        .suffix(&suffix)
        .tempfile_in(temp_dir)?;
    tokio::fs::write(temp.path(), data).await?;

    let pipeline = AnsweringPipeline::build(temp.path(), &providers, state.config()).await?;

    let temp_path = temp
        .into_temp_path()
        .keep()
        .map_err(|e| Error::internal(format!("Failed to keep temp file: {}", e)))?;

    let session_id = state.sessions().create(
        Arc::new(pipeline),
        filename,
        Some(temp_path),
        session_id,
    );

    tracing::info!(
        "Indexed '{}' into session {} in {}ms",
        filename,
        session_id,
        start.elapsed().as_millis()
    );

    Ok(session_id)
}

/// Read a download body, refusing anything larger than `limit` bytes
async fn read_capped(mut response: reqwest::Response, limit: usize) -> Result<Vec<u8>> {
    let too_large = || {
        Error::download(format!(
            "File at URL exceeds the {} byte upload limit",
            limit
        ))
    };

    if response.content_length().is_some_and(|len| len > limit as u64) {
        return Err(too_large());
    }

    let mut data = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| Error::download(format!("Failed to download file from URL: {}", e)))?
    {
        if data.len() + chunk.len() > limit {
            return Err(too_large());
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Reject filenames the configured policy does not accept
pub fn check_upload_policy(filename: &str, policy: UploadPolicy) -> Result<()> {
    let extension = extension_of(filename).unwrap_or_default();

    match policy {
        UploadPolicy::PdfOnly if extension != "pdf" => Err(Error::UnsupportedFormat(
            "Only PDF files are supported".to_string(),
        )),
        UploadPolicy::AllSupported if !FileType::from_extension(&extension).is_supported() => {
            Err(Error::UnsupportedFormat(format!(
                "'{}' (supported: {})",
                filename,
                SUPPORTED_EXTENSIONS.join(", ")
            )))
        }
        _ => Ok(()),
    }
}

/// Last path segment of a URL, or a default name
pub fn filename_from_url(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|segment| !segment.is_empty())
        .unwrap_or_else(|| DEFAULT_URL_FILENAME.to_string())
}

/// Extension to store a download under, or `None` when it is not accepted
///
/// A PDF content type or a `.pdf` URL always qualifies. With every format
/// enabled, a supported extension in the URL also qualifies.
pub fn download_extension(
    content_type: &str,
    url: &str,
    filename: &str,
    policy: UploadPolicy,
) -> Option<String> {
    let extension = extension_of(filename).unwrap_or_default();

    if content_type.contains("pdf") || url.to_lowercase().ends_with(".pdf") || extension == "pdf"
    {
        return Some("pdf".to_string());
    }

    if policy == UploadPolicy::AllSupported && FileType::from_extension(&extension).is_supported()
    {
        return Some(extension);
    }

    None
}
