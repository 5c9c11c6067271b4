//! Deterministic lexical-overlap scoring over document lines.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredLine<'a> {
    pub text: &'a str,
    pub score: usize,
}

/// Word tokens of `text`: runs of alphanumerics and underscores.
pub fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
}

/// Number of distinct `terms` present as tokens in `content`. Terms are
/// expected lower-cased with [`str::to_lowercase`].
pub fn lexical_overlap_score(content: &str, terms: &[String]) -> usize {
    if terms.is_empty() {
        return 0;
    }
    let content_tokens: HashSet<String> = tokens(content)
        .map(|token| token.to_lowercase())
        .collect();

    terms
        .iter()
        .collect::<HashSet<_>>()
        .into_iter()
        .filter(|term| content_tokens.contains(term.as_str()))
        .count()
}

/// The non-blank line sharing the most terms with the question. Ties go to
/// the earliest line; `None` when no line shares any term.
pub fn best_line<'a>(text: &'a str, terms: &[String]) -> Option<ScoredLine<'a>> {
    let mut best: Option<ScoredLine<'a>> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let score = lexical_overlap_score(line, terms);
        if score == 0 {
            continue;
        }
        if best.map_or(true, |current| score > current.score) {
            best = Some(ScoredLine { text: line, score });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn tokens_split_on_punctuation() {
        let out: Vec<&str> = tokens("GDP, per-capita (2021)!").collect();
        assert_eq!(out, vec!["GDP", "per", "capita", "2021"]);
    }

    #[test]
    fn tokens_keep_accented_words_whole() {
        let out: Vec<&str> = tokens("Café Müller, São Paulo").collect();
        assert_eq!(out, vec!["Café", "Müller", "São", "Paulo"]);
    }

    #[test]
    fn overlap_matches_non_ascii_terms_case_insensitively() {
        let text = "Intro\nÉCONOMIE du Québec en 1960\nEnd";
        let best = best_line(text, &terms(&["économie", "québec"])).unwrap();
        assert_eq!(best.text, "ÉCONOMIE du Québec en 1960");
        assert_eq!(best.score, 2);
    }

    #[test]
    fn overlap_counts_distinct_whole_words() {
        let score = lexical_overlap_score(
            "Banking reform and the bank rate",
            &terms(&["bank", "rate", "bank", "tax"]),
        );
        assert_eq!(score, 2);
    }

    #[test]
    fn best_line_prefers_highest_overlap() {
        let text = "Agriculture employs many.\n\n  Monsoon rainfall drives agriculture output.  \nRainfall data.";
        let best = best_line(text, &terms(&["monsoon", "rainfall", "agriculture"])).unwrap();
        assert_eq!(best.text, "Monsoon rainfall drives agriculture output.");
        assert_eq!(best.score, 3);
        assert!(text.contains(best.text));
    }

    #[test]
    fn best_line_ties_go_to_earliest() {
        let text = "tea exports\ncoffee exports\n";
        let best = best_line(text, &terms(&["exports"])).unwrap();
        assert_eq!(best.text, "tea exports");
    }

    #[test]
    fn best_line_none_without_overlap() {
        assert!(best_line("nothing relevant here", &terms(&["banana"])).is_none());
        assert!(best_line("", &terms(&["banana"])).is_none());
        assert!(best_line("some text", &[]).is_none());
    }
}
