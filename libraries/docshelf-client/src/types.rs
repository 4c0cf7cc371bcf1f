//! Types for Docshelf API requests and responses.

use crate::error::{ClientError, Result};
use serde::Deserialize;
use serde_json::Value;

/// Configuration for connecting to a Docshelf server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the server (e.g., "http://127.0.0.1:8000")
    pub base_url: String,
}

impl ClientConfig {
    /// Create a new config with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

// =============================================================================
// Document Types
// =============================================================================

/// Identifier the server assigns to an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub i64);

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A document as returned by the server.
///
/// `status` is whatever vocabulary the server currently uses
/// ("pending", "processing", "indexed", "failed", ...) and is passed
/// through without interpretation.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    pub filename: String,
    pub content_type: Option<String>,
    pub status: String,
}

/// Acknowledgement returned when a document is accepted for indexing.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub id: DocumentId,
    pub status: String,
    pub message: Option<String>,
}

/// Indexing status for a single document.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub id: DocumentId,
    pub status: String,
}

/// Extracted-text preview for a document.
#[derive(Debug, Clone)]
pub struct TextPreview {
    pub id: DocumentId,
    pub content_type: Option<String>,
    pub text_preview: String,
    pub text_length: u64,
}

/// Chunking preview for a document (debug endpoint).
#[derive(Debug, Clone)]
pub struct ChunkPreview {
    pub id: DocumentId,
    pub chunk_size: u32,
    pub overlap: u32,
    pub items: Vec<String>,
    pub total: u64,
}

// =============================================================================
// User Types
// =============================================================================

/// A user account as returned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
}

// =============================================================================
// Wire Shapes
// =============================================================================
//
// Document ids have travelled as both `document_id` and `id` across
// server versions, sometimes both at once. The wire structs accept
// either and `document_id` wins when both are present. Other fields
// default rather than fail so a record with a sparse shape still
// renders.

#[derive(Debug, Deserialize)]
struct DocumentWire {
    document_id: Option<i64>,
    id: Option<i64>,
    filename: Option<String>,
    content_type: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadReceiptWire {
    document_id: Option<i64>,
    id: Option<i64>,
    status: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DocumentReportWire {
    document_id: Option<i64>,
    id: Option<i64>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextPreviewWire {
    document_id: Option<i64>,
    id: Option<i64>,
    content_type: Option<String>,
    text_preview: Option<String>,
    text_length: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ChunkPreviewWire {
    document_id: Option<i64>,
    id: Option<i64>,
    chunk_size: Option<u32>,
    overlap: Option<u32>,
    items: Option<Vec<String>>,
    total: Option<u64>,
}

fn require_id(document_id: Option<i64>, id: Option<i64>, what: &str) -> Result<DocumentId> {
    document_id
        .or(id)
        .map(DocumentId)
        .ok_or_else(|| ClientError::ParseError(format!("{} record had no document id", what)))
}

fn decode<T: serde::de::DeserializeOwned>(payload: Value, what: &str) -> Result<T> {
    serde_json::from_value(payload)
        .map_err(|e| ClientError::ParseError(format!("Failed to parse {}: {}", what, e)))
}

impl Document {
    pub(crate) fn from_payload(payload: Value) -> Result<Self> {
        let wire: DocumentWire = decode(payload, "document")?;
        Ok(Self {
            id: require_id(wire.document_id, wire.id, "document")?,
            filename: wire.filename.unwrap_or_default(),
            content_type: wire.content_type,
            status: wire.status.unwrap_or_default(),
        })
    }
}

impl UploadReceipt {
    pub(crate) fn from_payload(payload: Value) -> Result<Self> {
        let wire: UploadReceiptWire = decode(payload, "upload receipt")?;
        Ok(Self {
            id: require_id(wire.document_id, wire.id, "upload receipt")?,
            status: wire.status.unwrap_or_default(),
            message: wire.message,
        })
    }
}

impl DocumentReport {
    pub(crate) fn from_payload(payload: Value) -> Result<Self> {
        let wire: DocumentReportWire = decode(payload, "status report")?;
        Ok(Self {
            id: require_id(wire.document_id, wire.id, "status report")?,
            status: wire.status.unwrap_or_default(),
        })
    }
}

impl TextPreview {
    pub(crate) fn from_payload(payload: Value) -> Result<Self> {
        let wire: TextPreviewWire = decode(payload, "text preview")?;
        Ok(Self {
            id: require_id(wire.document_id, wire.id, "text preview")?,
            content_type: wire.content_type,
            text_preview: wire.text_preview.unwrap_or_default(),
            text_length: wire.text_length.unwrap_or_default(),
        })
    }
}

impl ChunkPreview {
    pub(crate) fn from_payload(payload: Value) -> Result<Self> {
        let wire: ChunkPreviewWire = decode(payload, "chunk preview")?;
        Ok(Self {
            id: require_id(wire.document_id, wire.id, "chunk preview")?,
            chunk_size: wire.chunk_size.unwrap_or_default(),
            overlap: wire.overlap.unwrap_or_default(),
            items: wire.items.unwrap_or_default(),
            total: wire.total.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_id_preference() {
        // document_id wins when both names arrive
        let doc = Document::from_payload(json!({
            "document_id": 7,
            "id": 99,
            "filename": "report.pdf",
            "status": "indexed"
        }))
        .unwrap();
        assert_eq!(doc.id, DocumentId(7));

        // id alone is accepted
        let doc = Document::from_payload(json!({
            "id": 99,
            "filename": "report.pdf",
            "status": "indexed"
        }))
        .unwrap();
        assert_eq!(doc.id, DocumentId(99));
    }

    #[test]
    fn test_document_without_id_rejected() {
        let result = Document::from_payload(json!({
            "filename": "report.pdf",
            "status": "indexed"
        }));

        match result {
            Err(ClientError::ParseError(msg)) => assert!(msg.contains("document id")),
            other => panic!("Expected ParseError, got: {:?}", other),
        }
    }

    #[test]
    fn test_upload_receipt_prefers_document_id() {
        let receipt = UploadReceipt::from_payload(json!({
            "document_id": 12,
            "id": 3,
            "status": "pending",
            "message": "uploaded, indexing started"
        }))
        .unwrap();

        assert_eq!(receipt.id, DocumentId(12));
        assert_eq!(receipt.status, "pending");
        assert_eq!(receipt.message.as_deref(), Some("uploaded, indexing started"));
    }

    #[test]
    fn test_sparse_document_defaults() {
        let doc = Document::from_payload(json!({ "document_id": 1 })).unwrap();

        assert_eq!(doc.id, DocumentId(1));
        assert!(doc.filename.is_empty());
        assert!(doc.content_type.is_none());
        assert!(doc.status.is_empty());
    }
}
