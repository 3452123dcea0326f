//! File upload response.

use serde::{Deserialize, Serialize};

/// Metadata the backend returns for an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Name the file was uploaded with.
    pub originalname: String,
    /// Name the server stored it under.
    pub filename: String,
    /// Public URL of the stored file.
    pub location: String,
}
