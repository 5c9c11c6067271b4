use std::collections::HashSet;
use std::sync::Arc;

use crate::models::{IntentCategory, QuestionAnalysis};
use crate::patterns::PatternTable;
use crate::scoring::tokens;

const STOPWORDS: &[&str] = &[
    "when", "what", "who", "whom", "where", "why", "how", "did", "does", "is", "are", "was",
    "were", "the", "a", "an", "in", "on", "to", "of", "for", "it", "its", "and", "or", "if",
    "then", "can", "will", "would", "should", "this", "that", "with", "about", "from",
];

#[derive(Clone)]
pub struct QuestionClassifier {
    table: Arc<PatternTable>,
}

impl QuestionClassifier {
    pub fn new(table: Arc<PatternTable>) -> Self {
        Self { table }
    }

    pub fn classify(&self, question: &str) -> IntentCategory {
        let category = self
            .table
            .classification()
            .find(|(_, pattern)| pattern.is_match(question))
            .map(|(category, _)| category)
            .unwrap_or(IntentCategory::Unknown);

        tracing::debug!(%category, "classified question");
        category
    }

    pub fn analyze(&self, question: &str) -> QuestionAnalysis {
        QuestionAnalysis {
            category: self.classify(question),
            terms: self.question_terms(question),
        }
    }

    /// Lower-cased content words of the question, in first-seen order.
    pub fn question_terms(&self, question: &str) -> Vec<String> {
        let stopwords: HashSet<&str> = STOPWORDS.iter().copied().collect();

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for token in tokens(question) {
            let token = token.to_lowercase();
            if token.chars().count() < 3 || stopwords.contains(token.as_str()) {
                continue;
            }
            if seen.insert(token.clone()) {
                out.push(token);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> QuestionClassifier {
        QuestionClassifier::new(Arc::new(PatternTable::new().unwrap()))
    }

    #[test]
    fn who_and_whom_questions() {
        let c = classifier();
        assert_eq!(c.classify("Who is the president?"), IntentCategory::Who);
        assert_eq!(c.classify("To WHOM was it given"), IntentCategory::Who);
    }

    #[test]
    fn single_keyword_questions() {
        let c = classifier();
        assert_eq!(c.classify("What causes inflation?"), IntentCategory::What);
        assert_eq!(c.classify("Where are the mines located?"), IntentCategory::Where);
        assert_eq!(c.classify("When did the plan start?"), IntentCategory::When);
        assert_eq!(c.classify("Why did prices rise?"), IntentCategory::Why);
        assert_eq!(c.classify("How many states?"), IntentCategory::How);
        assert_eq!(c.classify("Can I apply twice?"), IntentCategory::YesNo);
    }

    #[test]
    fn precedence_follows_table_order() {
        let c = classifier();
        // who beats what
        assert_eq!(c.classify("What did the man who left say?"), IntentCategory::Who);
        // what beats where
        assert_eq!(c.classify("Where is what we need?"), IntentCategory::What);
        // where beats when
        assert_eq!(c.classify("When and where?"), IntentCategory::Where);
        // when beats why
        assert_eq!(c.classify("Why and when?"), IntentCategory::When);
        // why beats how
        assert_eq!(c.classify("How and why?"), IntentCategory::Why);
        // how beats yes/no
        assert_eq!(c.classify("Is that how it works?"), IntentCategory::How);
    }

    #[test]
    fn unmatched_and_blank_questions_are_unknown() {
        let c = classifier();
        assert_eq!(c.classify("Banana smoothie"), IntentCategory::Unknown);
        assert_eq!(c.classify(""), IntentCategory::Unknown);
        assert_eq!(c.classify("   \t"), IntentCategory::Unknown);
    }

    #[test]
    fn classification_is_deterministic() {
        let c = classifier();
        let first = c.classify("Should we go?");
        assert_eq!(first, c.classify("Should we go?"));
    }

    #[test]
    fn terms_drop_stopwords_and_duplicates() {
        let c = classifier();
        let analysis = c.analyze("Who founded the Reserve Bank? The reserve bank of India?");
        assert_eq!(analysis.category, IntentCategory::Who);
        assert_eq!(analysis.terms, vec!["founded", "reserve", "bank", "india"]);
    }

    #[test]
    fn terms_keep_non_ascii_words() {
        let c = classifier();
        let analysis = c.analyze("Où est l'ÉCONOMIE de Québec?");
        assert_eq!(analysis.terms, vec!["est", "économie", "québec"]);
    }
}
