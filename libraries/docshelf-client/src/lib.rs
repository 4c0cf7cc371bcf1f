//! Docshelf Client
//!
//! HTTP client library for the Docshelf document API.
//!
//! # Features
//!
//! - **Authentication**: Register, login, session token storage
//! - **Documents**: Upload files, list, poll indexing status, text preview
//! - **Normalization**: Envelope and raw responses both unwrap to plain
//!   payloads with one error vocabulary
//!
//! # Example
//!
//! ```ignore
//! use docshelf_client::{ClientConfig, DocshelfClient, MemoryTokenStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create client
//!     let config = ClientConfig::new("http://127.0.0.1:8000");
//!     let client = DocshelfClient::new(config, Arc::new(MemoryTokenStore::new()))?;
//!
//!     // Check the server is up
//!     client.ping().await?;
//!
//!     // Login and upload
//!     client.auth().login("alice", "secret").await?;
//!     let receipt = client.documents().upload("report.pdf".as_ref()).await?;
//!     println!("Uploaded document {}", receipt.id);
//!
//!     // Poll the document list
//!     for doc in client.documents().list().await? {
//!         println!("{}  {}  {}", doc.id, doc.filename, doc.status);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod documents;
mod envelope;
mod error;
mod store;
mod types;

// Re-export main types
pub use client::{DocshelfClient, RequestBody, RequestOptions};
pub use error::{ClientError, Result};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use types::{
    ChunkPreview, ClientConfig, Document, DocumentId, DocumentReport, TextPreview, UploadReceipt,
    UserProfile,
};

// Re-export sub-clients for direct use if needed
pub use auth::AuthClient;
pub use documents::DocumentsClient;

// Re-export the request method type so callers can build raw dispatches
pub use reqwest::Method;
