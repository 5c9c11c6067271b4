use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::Instrument;
use uuid::Uuid;

use crate::classifier::QuestionClassifier;
use crate::config::AppConfig;
use crate::extract::{DocumentSource, ExtractionError, FileDocumentSource};
use crate::models::{ChatAnswer, ChatRequest, ExcerptSource};
use crate::patterns::PatternTable;
use crate::retrieval::Retriever;

pub const NOT_FOUND_MESSAGE: &str = "No relevant content found.";

#[derive(Clone)]
pub struct ChatService {
    document_id: String,
    source: Arc<dyn DocumentSource>,
    classifier: QuestionClassifier,
    retriever: Retriever,
}

impl ChatService {
    pub fn new(
        document_id: impl Into<String>,
        source: Arc<dyn DocumentSource>,
        classifier: QuestionClassifier,
        retriever: Retriever,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            source,
            classifier,
            retriever,
        }
    }

    /// File-backed service for the configured document, sharing one compiled
    /// pattern table between classifier and retriever.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let table = Arc::new(PatternTable::new().context("failed to build pattern table")?);
        let classifier = QuestionClassifier::new(table.clone());
        let retriever = Retriever::new(table, config.excerpt_chars, config.fallback);
        let source = Arc::new(FileDocumentSource::new(config.cache_document));

        Ok(Self::new(config.document_id(), source, classifier, retriever))
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn classifier(&self) -> &QuestionClassifier {
        &self.classifier
    }

    pub async fn answer(
        &self,
        request: ChatRequest,
    ) -> std::result::Result<ChatAnswer, ExtractionError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("answer", %request_id, document = %self.document_id);
        self.answer_inner(request).instrument(span).await
    }

    async fn answer_inner(
        &self,
        request: ChatRequest,
    ) -> std::result::Result<ChatAnswer, ExtractionError> {
        let started = Instant::now();

        let document = self.source.fetch_text(&self.document_id).await?;
        let analysis = self.classifier.analyze(&request.question);
        let excerpt = self.retriever.answer(&document, &analysis);

        let (response, source) = if excerpt.is_empty() {
            (NOT_FOUND_MESSAGE.to_string(), ExcerptSource::Prefix)
        } else {
            (excerpt.as_str().to_string(), excerpt.source)
        };

        let latency_ms = started.elapsed().as_millis();
        tracing::info!(
            category = %analysis.category,
            source = source.as_str(),
            chars = response.chars().count(),
            latency_ms = latency_ms as u64,
            "answered question"
        );

        Ok(ChatAnswer {
            response,
            category: analysis.category,
            source,
            latency_ms,
        })
    }
}
