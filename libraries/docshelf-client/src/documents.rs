//! Document operations for the Docshelf API.

use crate::client::{DocshelfClient, RequestBody, RequestOptions};
use crate::error::{ClientError, Result};
use crate::types::{ChunkPreview, Document, DocumentId, DocumentReport, TextPreview, UploadReceipt};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::Value;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

/// Documents client for the Docshelf API.
pub struct DocumentsClient<'a> {
    client: &'a DocshelfClient,
}

impl<'a> DocumentsClient<'a> {
    pub(crate) fn new(client: &'a DocshelfClient) -> Self {
        Self { client }
    }

    /// Upload a file for indexing.
    ///
    /// The file travels as the single multipart part named `file`, with
    /// its filename preserved and a MIME type derived from the
    /// extension. Indexing runs server-side; poll
    /// [`status`](Self::status) with the returned id until it settles.
    pub async fn upload(&self, file_path: &Path) -> Result<UploadReceipt> {
        if !file_path.exists() {
            return Err(ClientError::FileNotFound(file_path.display().to_string()));
        }

        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();

        debug!(file = %file_path.display(), "Uploading document");

        // Read file contents
        let mut file = File::open(file_path).await?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).await?;

        let file_size = contents.len();

        // Create multipart form
        let file_part = Part::bytes(contents)
            .file_name(file_name.clone())
            .mime_str(mime_type_for_file(file_path))?;
        let form = Form::new().part("file", file_part);

        let options = RequestOptions::new(Method::POST).body(RequestBody::Multipart(form));
        let payload = self.client.dispatch("/documents/upload", options).await?;
        let receipt = UploadReceipt::from_payload(payload)?;

        info!(
            document_id = %receipt.id,
            file = %file_name,
            size = file_size,
            status = %receipt.status,
            "Document uploaded"
        );

        Ok(receipt)
    }

    /// List the caller's documents.
    ///
    /// The route has replied with both a bare array and an
    /// `{items, total}` wrapper across server versions; both decode to
    /// the same list, and a wrapper without `items` is an empty one.
    pub async fn list(&self) -> Result<Vec<Document>> {
        let payload = self
            .client
            .dispatch("/documents", RequestOptions::default())
            .await?;

        let items = match payload {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("items") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };

        let documents = items
            .into_iter()
            .map(Document::from_payload)
            .collect::<Result<Vec<_>>>()?;

        debug!(count = documents.len(), "Fetched document list");
        Ok(documents)
    }

    /// Fetch the indexing status for one document.
    pub async fn status(&self, id: DocumentId) -> Result<DocumentReport> {
        let path = format!("/documents/{}/status", id);
        let payload = self.client.dispatch(&path, RequestOptions::default()).await?;
        DocumentReport::from_payload(payload)
    }

    /// Fetch the extracted-text preview for one document.
    pub async fn text_preview(&self, id: DocumentId) -> Result<TextPreview> {
        let path = format!("/documents/{}/text", id);
        let payload = self.client.dispatch(&path, RequestOptions::default()).await?;
        TextPreview::from_payload(payload)
    }

    /// Preview how a document would be chunked (debug endpoint).
    pub async fn chunk_preview(
        &self,
        id: DocumentId,
        chunk_size: u32,
        overlap: u32,
    ) -> Result<ChunkPreview> {
        let path = format!(
            "/documents/{}/chunks?chunk_size={}&overlap={}",
            id, chunk_size, overlap
        );
        let payload = self.client.dispatch(&path, RequestOptions::default()).await?;
        ChunkPreview::from_payload(payload)
    }
}

/// Get MIME type for a document file.
fn mime_type_for_file(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("html") | Some("htm") => "text/html",
        Some("csv") => "text/csv",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_types() {
        assert_eq!(mime_type_for_file(Path::new("paper.pdf")), "application/pdf");
        assert_eq!(mime_type_for_file(Path::new("notes.txt")), "text/plain");
        assert_eq!(mime_type_for_file(Path::new("readme.md")), "text/markdown");
        assert_eq!(mime_type_for_file(Path::new("page.html")), "text/html");
        assert_eq!(
            mime_type_for_file(Path::new("data.bin")),
            "application/octet-stream"
        );
        assert_eq!(
            mime_type_for_file(Path::new("no_extension")),
            "application/octet-stream"
        );
    }
}
