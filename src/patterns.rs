use anyhow::{Context, Result};
use regex::Regex;

use crate::models::IntentCategory;

/// Question rules, in precedence order. The first rule that matches wins.
pub const CLASSIFICATION_RULES: &[(IntentCategory, &str)] = &[
    (IntentCategory::Who, r"(?i)whom?"),
    (IntentCategory::What, r"(?i)what"),
    (IntentCategory::Where, r"(?i)where"),
    (IntentCategory::When, r"(?i)when"),
    (IntentCategory::Why, r"(?i)why"),
    (IntentCategory::How, r"(?i)how"),
    (
        IntentCategory::YesNo,
        r"(?i)is|are|do|does|can|will|would|should",
    ),
];

/// Document rules: keyword through the end of its line. `$` without `(?m)`
/// is end of text, and `[^\r\n]*` stops at the nearest line break.
pub const EXTRACTION_RULES: &[(IntentCategory, &str)] = &[
    (IntentCategory::Who, r"(?i)whom?[^\r\n]*"),
    (IntentCategory::What, r"(?i)what[^\r\n]*"),
    (IntentCategory::Where, r"(?i)where[^\r\n]*"),
    (IntentCategory::When, r"(?i)when[^\r\n]*"),
    (IntentCategory::Why, r"(?i)why[^\r\n]*"),
    (IntentCategory::How, r"(?i)how[^\r\n]*"),
    (
        IntentCategory::YesNo,
        r"(?i)(?:is|are|do|does|can|will|would|should)[^\r\n]*",
    ),
];

/// Compiled classification and extraction tables. Built once at startup and
/// shared read-only between the classifier and the retriever.
#[derive(Debug, Clone)]
pub struct PatternTable {
    classification: Vec<(IntentCategory, Regex)>,
    extraction: Vec<(IntentCategory, Regex)>,
}

impl PatternTable {
    pub fn new() -> Result<Self> {
        Self::from_rules(CLASSIFICATION_RULES, EXTRACTION_RULES)
    }

    pub fn from_rules(
        classification: &[(IntentCategory, &str)],
        extraction: &[(IntentCategory, &str)],
    ) -> Result<Self> {
        Ok(Self {
            classification: compile_rules(classification, "classification")?,
            extraction: compile_rules(extraction, "extraction")?,
        })
    }

    pub fn classification(&self) -> impl Iterator<Item = (IntentCategory, &Regex)> {
        self.classification
            .iter()
            .map(|(category, pattern)| (*category, pattern))
    }

    pub fn extraction_pattern(&self, category: IntentCategory) -> Option<&Regex> {
        self.extraction
            .iter()
            .find(|(candidate, _)| *candidate == category)
            .map(|(_, pattern)| pattern)
    }
}

fn compile_rules(
    rules: &[(IntentCategory, &str)],
    table: &str,
) -> Result<Vec<(IntentCategory, Regex)>> {
    let mut compiled = Vec::with_capacity(rules.len());
    for (category, source) in rules {
        if *category == IntentCategory::Unknown {
            anyhow::bail!("{} table cannot contain a rule for `unknown`", table);
        }
        if compiled.iter().any(|(seen, _)| seen == category) {
            anyhow::bail!("{} table has more than one rule for `{}`", table, category);
        }
        let pattern = Regex::new(source)
            .with_context(|| format!("invalid {} pattern for `{}`", table, category))?;
        compiled.push((*category, pattern));
    }
    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_compiles_in_declaration_order() {
        let table = PatternTable::new().expect("standard rules compile");
        let order: Vec<IntentCategory> = table.classification().map(|(c, _)| c).collect();
        assert_eq!(
            order,
            vec![
                IntentCategory::Who,
                IntentCategory::What,
                IntentCategory::Where,
                IntentCategory::When,
                IntentCategory::Why,
                IntentCategory::How,
                IntentCategory::YesNo,
            ]
        );
    }

    #[test]
    fn unknown_has_no_extraction_pattern() {
        let table = PatternTable::new().unwrap();
        assert!(table.extraction_pattern(IntentCategory::Unknown).is_none());
        assert!(table.extraction_pattern(IntentCategory::How).is_some());
    }

    #[test]
    fn rejects_unknown_and_duplicate_rules() {
        let unknown = PatternTable::from_rules(&[(IntentCategory::Unknown, "x")], &[]);
        assert!(unknown.is_err());

        let duplicate = PatternTable::from_rules(
            &[(IntentCategory::Who, "who"), (IntentCategory::Who, "whom")],
            &[],
        );
        assert!(duplicate.is_err());
    }

    #[test]
    fn rejects_invalid_regex() {
        let err = PatternTable::from_rules(&[], &[(IntentCategory::What, "(")]).unwrap_err();
        assert!(err.to_string().contains("extraction"));
    }
}
