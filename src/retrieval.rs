use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::config::FallbackStrategy;
use crate::models::{Excerpt, ExcerptSource, IntentCategory, QuestionAnalysis};
use crate::patterns::PatternTable;
use crate::scoring::best_line;

pub const DEFAULT_EXCERPT_CHARS: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(n) => n,
    None => panic!("default excerpt length must be non-zero"),
};

#[derive(Clone)]
pub struct Retriever {
    table: Arc<PatternTable>,
    excerpt_chars: NonZeroUsize,
    fallback: FallbackStrategy,
}

impl Retriever {
    pub fn new(
        table: Arc<PatternTable>,
        excerpt_chars: NonZeroUsize,
        fallback: FallbackStrategy,
    ) -> Self {
        Self {
            table,
            excerpt_chars,
            fallback,
        }
    }

    /// First match of the category's extraction pattern, or the default
    /// prefix excerpt when there is none.
    pub fn retrieve<'a>(&self, document: &'a str, category: IntentCategory) -> Excerpt<'a> {
        self.matched(document, category)
            .unwrap_or_else(|| self.default_excerpt(document))
    }

    /// Like [`Retriever::retrieve`], but consults the lexical scorer before
    /// falling back to the prefix when the strategy asks for it.
    pub fn answer<'a>(&self, document: &'a str, analysis: &QuestionAnalysis) -> Excerpt<'a> {
        if let Some(excerpt) = self.matched(document, analysis.category) {
            return excerpt;
        }

        if self.fallback == FallbackStrategy::Lexical {
            if let Some(line) = best_line(document, &analysis.terms) {
                tracing::debug!(score = line.score, "lexical fallback selected a line");
                return Excerpt {
                    text: line.text,
                    source: ExcerptSource::Scored,
                };
            }
        }

        self.default_excerpt(document)
    }

    pub fn default_excerpt<'a>(&self, document: &'a str) -> Excerpt<'a> {
        Excerpt {
            text: char_prefix(document, self.excerpt_chars.get()),
            source: ExcerptSource::Prefix,
        }
    }

    fn matched<'a>(&self, document: &'a str, category: IntentCategory) -> Option<Excerpt<'a>> {
        let pattern = self.table.extraction_pattern(category)?;
        pattern.find(document).map(|m| Excerpt {
            text: m.as_str(),
            source: ExcerptSource::Matched,
        })
    }
}

/// The first `max_chars` characters of `text`, never splitting a character.
pub fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
