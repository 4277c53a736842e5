use async_trait::async_trait;
use begrip_core::{BegripResult, SynonymSuggester, SynonymSuggestion};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Placeholder suggester: logs requests and returns no suggestions, so the
/// rest of the stack runs without a configured AI provider.
#[derive(Debug, Default)]
pub struct PlaceholderSuggester {
    calls: AtomicU64,
}

impl PlaceholderSuggester {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SynonymSuggester for PlaceholderSuggester {
    async fn suggest_synonyms(
        &self,
        term: &str,
        definition: Option<&str>,
        context: Option<&str>,
    ) -> BegripResult<Vec<SynonymSuggestion>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        info!(
            term,
            has_definition = definition.is_some(),
            has_context = context.is_some(),
            "synoniemsuggestie gevraagd zonder geconfigureerde AI-provider"
        );
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_placeholder_returns_empty() {
        let suggester = PlaceholderSuggester::new();
        let suggestions = suggester.suggest_synonyms("oproeping", None, None).await.unwrap();
        assert!(suggestions.is_empty());
        assert_eq!(suggester.call_count(), 1);
    }
}
