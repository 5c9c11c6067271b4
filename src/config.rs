use std::env;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

use crate::retrieval::DEFAULT_EXCERPT_CHARS;

/// What the retriever does when the extraction pattern finds nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FallbackStrategy {
    #[default]
    Prefix,
    Lexical,
}

impl FromStr for FallbackStrategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "prefix" => Ok(FallbackStrategy::Prefix),
            "lexical" => Ok(FallbackStrategy::Lexical),
            other => Err(format!("unknown fallback strategy: {}", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub document_path: PathBuf,
    pub excerpt_chars: NonZeroUsize,
    pub fallback: FallbackStrategy,
    pub cache_document: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("PDFQA_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            document_path: env::var("PDFQA_DOCUMENT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./public/coaching-material.pdf")),
            excerpt_chars: parse_excerpt_chars(env::var("PDFQA_EXCERPT_CHARS").ok()),
            fallback: env::var("PDFQA_FALLBACK")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            cache_document: env::var("PDFQA_CACHE_DOCUMENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }

    pub fn document_id(&self) -> String {
        self.document_path.display().to_string()
    }
}

/// Zero, negative or malformed lengths fall back to the default.
fn parse_excerpt_chars(value: Option<String>) -> NonZeroUsize {
    value
        .and_then(|v| v.trim().parse::<NonZeroUsize>().ok())
        .unwrap_or(DEFAULT_EXCERPT_CHARS)
}
