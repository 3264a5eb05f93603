//! Receipt models and file uploads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::resource::{resource, Attachable};
use super::user::User;
use crate::client::HcbClient;
use crate::Result;

/// An uploaded receipt, attached to a transaction or sitting in the
/// receipt bin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Receipt {
    /// Unique receipt id
    pub id: String,
    /// Upload time
    pub created_at: Option<DateTime<Utc>>,
    /// Full-size file URL
    pub url: Option<String>,
    /// Thumbnail URL
    pub preview_url: Option<String>,
    /// Original filename
    pub filename: Option<String>,
    /// Who uploaded it
    pub uploader: Option<User>,
    #[serde(skip)]
    pub(crate) client: Option<HcbClient>,
}

resource!(Receipt, "Receipt", nested = attach_nested);

impl Receipt {
    fn attach_nested(&mut self, client: &HcbClient) {
        self.uploader = self.uploader.take().map(|user| user.attach(client));
    }

    /// Delete this receipt. Returns the raw response body.
    pub async fn delete(&self) -> Result<serde_json::Value> {
        let client = self.require_attached()?;
        client.receipts().delete(&self.id).await
    }
}

/// A file to upload as a receipt or comment attachment.
#[derive(Clone)]
pub struct FileUpload {
    /// Filename sent to the server
    pub filename: String,
    /// File contents
    pub bytes: Vec<u8>,
    /// MIME type, e.g. `image/png`
    pub mime: Option<String>,
}

impl FileUpload {
    /// Wrap in-memory contents.
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
            mime: None,
        }
    }

    /// Set the MIME type.
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Read a file from disk.
    pub async fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| crate::Error::InvalidInput(format!("{}: {}", path.display(), e)))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(filename, bytes))
    }

    /// Build a multipart part named `file`.
    pub(crate) fn into_part(self) -> Result<reqwest::multipart::Part> {
        let part = reqwest::multipart::Part::bytes(self.bytes).file_name(self.filename);
        match self.mime {
            Some(mime) => Ok(part.mime_str(&mime)?),
            None => Ok(part),
        }
    }
}

impl std::fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .field("mime", &self.mime)
            .finish()
    }
}
