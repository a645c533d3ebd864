//! Query classifier: decides whether a question escalates to web search.
//!
//! The decision is a case-insensitive substring match against a configured
//! set of trigger phrases. No other input affects it.

use baure_types::config::DEFAULT_TRIGGER_PHRASES;

/// Returned when a classifier is built from a set with no usable phrases.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("trigger phrase set must contain at least one non-blank phrase")]
pub struct EmptyTriggerSet;

/// Keyword matcher over a non-empty set of lowercase trigger phrases.
#[derive(Debug, Clone)]
pub struct QueryClassifier {
    phrases: Vec<String>,
}

impl QueryClassifier {
    /// Build a classifier from the given phrases.
    ///
    /// Phrases are trimmed and lowercased; blank entries are dropped. Fails
    /// if nothing is left.
    pub fn new<I, S>(phrases: I) -> Result<Self, EmptyTriggerSet>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases: Vec<String> = phrases
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();

        if phrases.is_empty() {
            return Err(EmptyTriggerSet);
        }
        Ok(Self { phrases })
    }

    /// Whether the question needs the web-search template.
    pub fn needs_web_search(&self, question: &str) -> bool {
        self.matched_phrase(question).is_some()
    }

    /// The first trigger phrase contained in the question, if any.
    pub fn matched_phrase(&self, question: &str) -> Option<&str> {
        let lowered = question.to_lowercase();
        self.phrases
            .iter()
            .find(|phrase| lowered.contains(phrase.as_str()))
            .map(String::as_str)
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }
}

impl Default for QueryClassifier {
    fn default() -> Self {
        Self {
            phrases: DEFAULT_TRIGGER_PHRASES.iter().map(|p| p.to_string()).collect(),
        }
    }
}
