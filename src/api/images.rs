use crate::api::AppState;
use crate::error::{AppError, Result};
use axum::{
    body::Body,
    extract::{Path as UrlPath, State},
    http::{HeaderValue, header},
    response::Response,
};
use std::path::{Component, Path, PathBuf};
use tokio_util::io::ReaderStream;

/// Uploads never change once written, so clients may cache them for a year.
const CACHE_CONTROL: &str = "public, max-age=31536000";

/// Serves an uploaded file from below the configured upload directory.
#[tracing::instrument(skip(state), err(level = "debug"))]
pub async fn serve_image(
    State(state): State<AppState>,
    UrlPath(path): UrlPath<String>,
) -> Result<Response> {
    let relative = sanitize(&path).ok_or(AppError::NotFound)?;
    let target = Path::new(&state.config.upload.upload_path).join(relative);

    let file = match tokio::fs::File::open(&target).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(AppError::NotFound),
        Err(e) => {
            tracing::error!(error = %e, path = %target.display(), "Failed to open uploaded file");
            return Err(AppError::Internal);
        }
    };

    let metadata = file.metadata().await.map_err(|e| {
        tracing::error!(error = %e, path = %target.display(), "Failed to stat uploaded file");
        AppError::Internal
    })?;
    if !metadata.is_file() {
        return Err(AppError::NotFound);
    }

    let mut response = Response::new(Body::from_stream(ReaderStream::new(file)));
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type_for(&target)));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL));
    if let Ok(len) = HeaderValue::from_str(&metadata.len().to_string()) {
        headers.insert(header::CONTENT_LENGTH, len);
    }

    Ok(response)
}

/// Keeps only plain path segments, so a crafted path can never climb out of
/// the upload root.
fn sanitize(path: &str) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            _ => return None,
        }
    }

    if clean.as_os_str().is_empty() { None } else { Some(clean) }
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => "image/png",
        Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => "image/jpeg",
        Some(ext) if ext.eq_ignore_ascii_case("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
