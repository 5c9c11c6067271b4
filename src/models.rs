use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    Who,
    What,
    Where,
    When,
    Why,
    How,
    YesNo,
    Unknown,
}

impl IntentCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            IntentCategory::Who => "who",
            IntentCategory::What => "what",
            IntentCategory::Where => "where",
            IntentCategory::When => "when",
            IntentCategory::Why => "why",
            IntentCategory::How => "how",
            IntentCategory::YesNo => "yes_no",
            IntentCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an excerpt was chosen from the document text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExcerptSource {
    Matched,
    Scored,
    Prefix,
}

impl ExcerptSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ExcerptSource::Matched => "matched",
            ExcerptSource::Scored => "scored",
            ExcerptSource::Prefix => "prefix",
        }
    }
}

/// A slice of the document text selected as the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Excerpt<'a> {
    pub text: &'a str,
    pub source: ExcerptSource,
}

impl<'a> Excerpt<'a> {
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionAnalysis {
    pub category: IntentCategory,
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatAnswer {
    pub response: String,
    pub category: IntentCategory,
    pub source: ExcerptSource,
    pub latency_ms: u128,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub question: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&IntentCategory::YesNo).unwrap();
        assert_eq!(json, "\"yes_no\"");
        assert_eq!(IntentCategory::YesNo.to_string(), "yes_no");
    }

    #[test]
    fn chat_request_reads_question_field() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"question":"Who wrote it?"}"#).unwrap();
        assert_eq!(request.question, "Who wrote it?");
    }
}
