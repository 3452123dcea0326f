//! File transfer commands.

use std::path::Path;

use tracing::info;

use shopfront_client::StoreApi;

use super::{CliError, emit};

/// Upload a local file.
pub async fn upload(api: &StoreApi, path: &Path, mime: Option<&str>) -> Result<(), CliError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| CliError::InvalidArgument(format!("not a file: {}", path.display())))?
        .to_owned();
    let contents = tokio::fs::read(path).await?;

    let uploaded = api.files().upload(&file_name, contents, mime).await?;
    emit(&uploaded)
}

/// Download a URL into a local file.
pub async fn download(api: &StoreApi, url: &str, destination: &Path) -> Result<(), CliError> {
    let bytes = api.files().download(url, destination).await?;
    info!(bytes, destination = %destination.display(), "Downloaded");
    Ok(())
}
