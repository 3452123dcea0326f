//! File upload and download.
//!
//! Uploads go to `POST /api/files/upload` as a multipart form with a single
//! `file` part. Downloads accept any URL and stream the body to disk.

use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response};
use shopfront_core::UploadedFile;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument, warn};

use crate::error::ApiError;
use crate::http::HttpClient;

/// Client for file transfer.
#[derive(Clone)]
pub struct FilesClient {
    http: HttpClient,
}

impl FilesClient {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Upload `contents` under `file_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unknown`] if `mime` is not a valid media type, or
    /// a classified failure from the backend.
    #[instrument(skip(self, contents), fields(file_name = %file_name, size = contents.len()))]
    pub async fn upload(
        &self,
        file_name: &str,
        contents: Vec<u8>,
        mime: Option<&str>,
    ) -> Result<UploadedFile, ApiError> {
        let mut part = Part::bytes(contents).file_name(file_name.to_owned());
        if let Some(mime) = mime {
            part = part.mime_str(mime).map_err(|e| ApiError::Unknown {
                status: None,
                message: format!("invalid media type '{mime}': {e}"),
            })?;
        }
        let form = Form::new().part("file", part);

        let url = self.http.endpoint(&["api", "files", "upload"])?;
        let uploaded: UploadedFile = self
            .http
            .execute_json(self.http.request(Method::POST, url).multipart(form))
            .await?;
        debug!(location = %uploaded.location, "File uploaded");
        Ok(uploaded)
    }

    /// Download `url` into `destination`, returning the number of bytes written.
    ///
    /// `url` may be absolute or relative to the API base URL. The session
    /// token is only attached when the URL is on the API origin. The body is
    /// streamed to `<destination>.part` and renamed into place once complete,
    /// so a failed download never leaves a truncated file at `destination`.
    ///
    /// # Errors
    ///
    /// Returns a classified failure for the request, or
    /// [`ApiError::Unknown`] if the file cannot be written.
    #[instrument(skip(self), fields(destination = %destination.display()))]
    pub async fn download(&self, url: &str, destination: &Path) -> Result<u64, ApiError> {
        let url = self.http.resolve(url)?;
        let response = self
            .http
            .execute(self.http.request(Method::GET, url))
            .await?;

        let partial = partial_path(destination);
        let result = match write_body(response, &partial).await {
            Ok(written) => fs::rename(&partial, destination)
                .await
                .map(|()| written)
                .map_err(|e| io_error(destination, &e)),
            Err(e) => Err(e),
        };

        match result {
            Ok(written) => {
                debug!(bytes = written, "File downloaded");
                Ok(written)
            }
            Err(e) => {
                if let Some(cleanup) = fs::remove_file(&partial)
                    .await
                    .err()
                    .filter(|cleanup| cleanup.kind() != ErrorKind::NotFound)
                {
                    warn!(path = %partial.display(), error = %cleanup, "Failed to remove partial download");
                }
                Err(e)
            }
        }
    }
}

async fn write_body(response: Response, path: &Path) -> Result<u64, ApiError> {
    let mut file = File::create(path).await.map_err(|e| io_error(path, &e))?;
    let mut written = 0_u64;
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| ApiError::from_transport(&e))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| io_error(path, &e))?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(|e| io_error(path, &e))?;
    Ok(written)
}

/// Sibling path the body is streamed to before the final rename.
fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".part");
    destination.with_file_name(name)
}

fn io_error(path: &Path, err: &std::io::Error) -> ApiError {
    ApiError::Unknown {
        status: None,
        message: format!("failed to write {}: {err}", path.display()),
    }
}
