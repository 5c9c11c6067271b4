pub mod docx;
pub mod pdf;

use std::collections::HashMap;
use std::io::{self, Cursor};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("document not found: {0}")]
    Missing(String),

    #[error("failed to read document {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to extract text from {path}: {message}")]
    Decode { path: String, message: String },
}

impl ExtractionError {
    fn decode(path: &str, err: anyhow::Error) -> Self {
        Self::Decode {
            path: path.to_string(),
            message: format!("{:#}", err),
        }
    }
}

/// Supplies the extracted text of a document.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch_text(&self, document_id: &str) -> Result<Arc<str>, ExtractionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Text,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            "txt" | "text" | "md" => Some(DocumentFormat::Text),
            _ => None,
        }
    }
}

struct CachedText {
    digest: String,
    text: Arc<str>,
}

/// Reads documents from disk. Extracted text is cached per path and reused
/// while the file's SHA-256 digest is unchanged.
#[derive(Clone)]
pub struct FileDocumentSource {
    cache_enabled: bool,
    cache: Arc<RwLock<HashMap<String, CachedText>>>,
}

impl FileDocumentSource {
    pub fn new(cache_enabled: bool) -> Self {
        Self {
            cache_enabled,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn extract(
        &self,
        document_id: &str,
        path: &Path,
        format: DocumentFormat,
        bytes: Vec<u8>,
    ) -> Result<String, ExtractionError> {
        let raw = match format {
            DocumentFormat::Pdf => pdf::extract_pdf_text(path, bytes).await,
            DocumentFormat::Docx => {
                tokio::task::spawn_blocking(move || docx::extract_docx_text(Cursor::new(bytes)))
                    .await
                    .context("DOCX extraction task panicked")
                    .and_then(|res| res)
            }
            DocumentFormat::Text => String::from_utf8(bytes).context("document is not valid UTF-8"),
        }
        .map_err(|err| ExtractionError::decode(document_id, err))?;

        Ok(normalize_text(&raw))
    }
}

#[async_trait]
impl DocumentSource for FileDocumentSource {
    async fn fetch_text(&self, document_id: &str) -> Result<Arc<str>, ExtractionError> {
        let path = Path::new(document_id);
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                ExtractionError::Missing(document_id.to_string())
            } else {
                ExtractionError::Unreadable {
                    path: document_id.to_string(),
                    source: err,
                }
            }
        })?;

        let format = DocumentFormat::from_path(path)
            .ok_or_else(|| ExtractionError::UnsupportedFormat(document_id.to_string()))?;

        let digest = sha256_hex(&bytes);
        if self.cache_enabled {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.get(document_id) {
                if cached.digest == digest {
                    tracing::debug!(document = %document_id, "document text served from cache");
                    return Ok(cached.text.clone());
                }
            }
        }

        let text: Arc<str> = Arc::from(self.extract(document_id, path, format, bytes).await?);
        tracing::info!(
            document = %document_id,
            chars = text.chars().count(),
            "extracted document text"
        );

        if self.cache_enabled {
            self.cache.write().await.insert(
                document_id.to_string(),
                CachedText {
                    digest,
                    text: text.clone(),
                },
            );
        }

        Ok(text)
    }
}

/// Fixed documents held in memory, keyed by id.
#[derive(Clone, Default)]
pub struct InMemorySource {
    documents: HashMap<String, Arc<str>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, document_id: impl Into<String>, text: impl Into<String>) -> Self {
        self.documents
            .insert(document_id.into(), Arc::from(text.into()));
        self
    }
}

#[async_trait]
impl DocumentSource for InMemorySource {
    async fn fetch_text(&self, document_id: &str) -> Result<Arc<str>, ExtractionError> {
        self.documents
            .get(document_id)
            .cloned()
            .ok_or_else(|| ExtractionError::Missing(document_id.to_string()))
    }
}

/// Cleans extracted text while keeping its line structure intact.
pub fn normalize_text(input: &str) -> String {
    input
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace('\u{00A0}', " ")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
