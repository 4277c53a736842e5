use crate::config::{SynonymConfiguration, SynonymPolicy};
use crate::registry::SynonymRegistry;
use begrip_core::{normalize_term, BegripResult, MemberSource, MemberStatus, SynonymSuggester, WeightedSynonym};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Dedicated tracing target for the enrichment audit trail.
const ENRICHMENT_TARGET: &str = "synonym_enrichment";

struct CacheEntry {
    synonyms: Vec<WeightedSynonym>,
    stored_at: DateTime<Utc>,
    version: u64,
}

/// Insertion-ordered cache state. The version counter invalidates all
/// entries in O(1); stale entries are discarded lazily on access.
struct CacheState {
    entries: IndexMap<String, CacheEntry>,
    version: u64,
    hits: u64,
    misses: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub max_size: usize,
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: String,
    pub warnings: Vec<String>,
    pub cache: CacheStats,
    pub total_groups: i64,
    pub total_members: i64,
    pub timestamp: DateTime<Utc>,
}

/// Business logic over the registry: governance policy, TTL caching and the
/// synchronous AI enrichment path that runs before definition generation.
pub struct SynonymOrchestrator {
    registry: Arc<SynonymRegistry>,
    suggester: Arc<dyn SynonymSuggester>,
    config: SynonymConfiguration,
    cache: Arc<Mutex<CacheState>>,
}

impl SynonymOrchestrator {
    pub fn new(
        registry: Arc<SynonymRegistry>,
        suggester: Arc<dyn SynonymSuggester>,
        config: SynonymConfiguration,
    ) -> Self {
        let cache = Arc::new(Mutex::new(CacheState {
            entries: IndexMap::new(),
            version: 0,
            hits: 0,
            misses: 0,
        }));

        // Registry mutations invalidate through this callback. It only
        // touches the cache map and must never call back into the registry.
        let cache_for_callback = cache.clone();
        registry.register_invalidation_callback(Arc::new(move |term: &str| {
            if let Ok(mut state) = cache_for_callback.lock() {
                state.version += 1;
                state.entries.shift_remove(&normalize_term(term));
            }
        }));

        info!(
            policy = config.policy.as_str(),
            cache_ttl = config.cache_ttl_seconds,
            min_synonyms = config.min_synonyms_threshold,
            "SynonymOrchestrator geïnitialiseerd"
        );

        Self {
            registry,
            suggester,
            config,
            cache,
        }
    }

    pub fn config(&self) -> &SynonymConfiguration {
        &self.config
    }

    fn statuses_for_policy(&self) -> Vec<MemberStatus> {
        match self.config.policy {
            SynonymPolicy::Strict => vec![MemberStatus::Active],
            SynonymPolicy::Pragmatic => vec![MemberStatus::Active, MemberStatus::AiPending],
        }
    }

    /// Cache read: valid iff present, version current and age below the TTL.
    /// A valid hit moves to the back (LRU); stale entries are removed.
    fn cache_lookup(&self, term_normalized: &str) -> Option<Vec<WeightedSynonym>> {
        let mut state = self.cache.lock().ok()?;
        let current_version = state.version;

        let (entry_version, stored_at) = {
            let entry = state.entries.get(term_normalized)?;
            (entry.version, entry.stored_at)
        };

        if entry_version != current_version {
            state.entries.shift_remove(term_normalized);
            debug!(term = term_normalized, "cache entry ongeldig (versie)");
            return None;
        }

        let age = Utc::now().signed_duration_since(stored_at);
        if age.num_seconds() >= self.config.cache_ttl_seconds as i64 {
            state.entries.shift_remove(term_normalized);
            debug!(term = term_normalized, "cache entry verlopen (ttl)");
            return None;
        }

        // LRU reorder: remove and re-insert at the back.
        let entry = state.entries.shift_remove(term_normalized)?;
        let synonyms = entry.synonyms.clone();
        state.entries.insert(term_normalized.to_string(), entry);
        Some(synonyms)
    }

    fn cache_store(&self, term_normalized: &str, synonyms: Vec<WeightedSynonym>) {
        let Ok(mut state) = self.cache.lock() else {
            return;
        };
        if state.entries.len() >= self.config.cache_max_size && !state.entries.is_empty() {
            if let Some((evicted, _)) = state.entries.shift_remove_index(0) {
                debug!(evicted = %evicted, "cache vol; oudste entry verwijderd");
            }
        }
        let version = state.version;
        state.entries.insert(
            term_normalized.to_string(),
            CacheEntry {
                synonyms,
                stored_at: Utc::now(),
                version,
            },
        );
    }

    /// Core query: governance-filtered synonyms with TTL caching.
    pub async fn get_synonyms_for_lookup(
        &self,
        term: &str,
        max_results: usize,
    ) -> Vec<WeightedSynonym> {
        let term_normalized = normalize_term(term);
        if term_normalized.is_empty() {
            return Vec::new();
        }

        if let Some(cached) = self.cache_lookup(&term_normalized) {
            if let Ok(mut state) = self.cache.lock() {
                state.hits += 1;
            }
            debug!(term, "cache HIT");
            return cached.into_iter().take(max_results).collect();
        }

        if let Ok(mut state) = self.cache.lock() {
            state.misses += 1;
        }
        debug!(term, "cache MISS; registry query");

        let statuses = self.statuses_for_policy();
        let min_weight = self.config.min_weight_for_weblookup;

        match self
            .registry
            .get_synonyms(
                &term_normalized,
                &statuses,
                min_weight,
                None,
                (max_results * 2) as u32,
            )
            .await
        {
            Ok(synonyms) => {
                self.cache_store(&term_normalized, synonyms.clone());
                info!(
                    term,
                    found = synonyms.len(),
                    policy = self.config.policy.as_str(),
                    "synoniemen opgehaald"
                );
                synonyms.into_iter().take(max_results).collect()
            }
            Err(e) => {
                error!(term, error = %e, "registry query mislukt");
                Vec::new()
            }
        }
    }

    /// Ensure the term has at least `min_count` synonyms, triggering one
    /// synchronous AI enrichment round when it does not. Returns the visible
    /// set plus the number of stored ai_pending suggestions. Degrades to the
    /// existing set on any suggester failure; never raises.
    pub async fn ensure_synonyms(
        &self,
        term: &str,
        min_count: usize,
        context: Option<&str>,
    ) -> (Vec<WeightedSynonym>, usize) {
        if term.trim().is_empty() {
            return (Vec::new(), 0);
        }

        let existing = self.get_synonyms_for_lookup(term, 10).await;
        if existing.len() >= min_count {
            info!(
                target: ENRICHMENT_TARGET,
                term,
                existing = existing.len(),
                min_count,
                "voldoende synoniemen aanwezig"
            );
            return (existing.into_iter().take(min_count).collect(), 0);
        }

        info!(
            target: ENRICHMENT_TARGET,
            term,
            existing = existing.len(),
            min_count,
            "start AI-verrijking"
        );
        let started = std::time::Instant::now();

        let suggestions = match tokio::time::timeout(
            Duration::from_secs(self.config.gpt4_timeout_seconds),
            self.suggester.suggest_synonyms(term, None, context),
        )
        .await
        {
            Ok(Ok(suggestions)) => suggestions,
            Ok(Err(e)) => {
                error!(
                    target: ENRICHMENT_TARGET,
                    term,
                    duration_s = started.elapsed().as_secs_f64(),
                    error = %e,
                    "AI-verrijking mislukt"
                );
                return (existing, 0);
            }
            Err(_) => {
                error!(
                    target: ENRICHMENT_TARGET,
                    term,
                    duration_s = started.elapsed().as_secs_f64(),
                    timeout_s = self.config.gpt4_timeout_seconds,
                    "AI-verrijking timeout"
                );
                return (existing, 0);
            }
        };

        if suggestions.is_empty() {
            warn!(
                target: ENRICHMENT_TARGET,
                term,
                duration_s = started.elapsed().as_secs_f64(),
                "suggester gaf geen suggesties"
            );
            return (existing, 0);
        }

        let group = match self.registry.get_or_create_group(term, None, "ai_enrichment").await {
            Ok(group) => group,
            Err(e) => {
                error!(target: ENRICHMENT_TARGET, term, error = %e, "groep aanmaken mislukt");
                return (existing, 0);
            }
        };

        let mut added = 0usize;
        for suggestion in &suggestions {
            if let Err(e) = suggestion.validate() {
                warn!(
                    target: ENRICHMENT_TARGET,
                    term,
                    suggestion = %suggestion.synonym,
                    error = %e,
                    "suggestie overgeslagen"
                );
                continue;
            }

            let context_json = serde_json::json!({
                "rationale": suggestion.rationale,
                "model": "gpt-4-turbo",
                "triggered_by": "definition_generation",
                "timestamp": Utc::now().to_rfc3339(),
            })
            .to_string();

            match self
                .registry
                .add_group_member(
                    group.id,
                    &suggestion.synonym,
                    suggestion.confidence,
                    MemberStatus::AiPending,
                    MemberSource::AiSuggested,
                    Some(&context_json),
                    None,
                    "ai_suggester",
                )
                .await
            {
                Ok(_) => added += 1,
                Err(e) => {
                    warn!(
                        target: ENRICHMENT_TARGET,
                        term,
                        suggestion = %suggestion.synonym,
                        error = %e,
                        "suggestie opslaan mislukt"
                    );
                }
            }
        }

        info!(
            target: ENRICHMENT_TARGET,
            term,
            added,
            duration_s = started.elapsed().as_secs_f64(),
            "verrijking afgerond"
        );

        // Force refresh: the add path already bumped the version via the
        // registry callback, this also covers a registry without callbacks.
        self.invalidate_cache(Some(term));

        let enriched = self.get_synonyms_for_lookup(term, 10).await;
        (enriched.into_iter().take(min_count).collect(), added)
    }

    /// Invalidate one term, or flush everything when `term` is `None`.
    pub fn invalidate_cache(&self, term: Option<&str>) {
        let Ok(mut state) = self.cache.lock() else {
            return;
        };
        state.version += 1;
        match term {
            Some(term) => {
                let removed = state.entries.shift_remove(&normalize_term(term)).is_some();
                debug!(term, removed, version = state.version, "cache geïnvalideerd");
            }
            None => {
                let size = state.entries.len();
                state.entries.clear();
                info!(size, version = state.version, "cache volledig geleegd");
            }
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        let state = match self.cache.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        let total = state.hits + state.misses;
        CacheStats {
            size: state.entries.len(),
            hits: state.hits,
            misses: state.misses,
            hit_rate: if total > 0 {
                state.hits as f64 / total as f64
            } else {
                0.0
            },
            max_size: self.config.cache_max_size,
            ttl_seconds: self.config.cache_ttl_seconds,
        }
    }

    pub fn reset_cache_stats(&self) {
        if let Ok(mut state) = self.cache.lock() {
            state.hits = 0;
            state.misses = 0;
        }
    }

    /// Terms currently cached, oldest first. Test and diagnostics hook.
    pub fn cached_terms(&self) -> Vec<String> {
        match self.cache.lock() {
            Ok(state) => state.entries.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub async fn health_check(&self) -> HealthReport {
        let cache = self.cache_stats();
        let mut warnings = Vec::new();

        let (total_groups, total_members) = match self.registry.get_statistics().await {
            Ok(stats) => (stats.total_groups, stats.total_members),
            Err(e) => {
                return HealthReport {
                    status: "unhealthy".to_string(),
                    warnings: vec![format!("registry statistics onbereikbaar: {e}")],
                    cache,
                    total_groups: 0,
                    total_members: 0,
                    timestamp: Utc::now(),
                };
            }
        };

        let total_queries = cache.hits + cache.misses;
        if cache.hit_rate < 0.5 && total_queries > 100 {
            warnings.push(format!("lage cache hit rate: {:.1}%", cache.hit_rate * 100.0));
        }
        if total_groups == 0 {
            warnings.push("registry is leeg (geen synoniemgroepen)".to_string());
        }

        HealthReport {
            status: if warnings.is_empty() { "healthy" } else { "warning" }.to_string(),
            warnings,
            cache,
            total_groups,
            total_members,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use begrip_core::SynonymSuggestion;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticSuggester {
        suggestions: Vec<SynonymSuggestion>,
        calls: AtomicUsize,
    }

    impl StaticSuggester {
        fn new(suggestions: Vec<SynonymSuggestion>) -> Self {
            Self {
                suggestions,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SynonymSuggester for StaticSuggester {
        async fn suggest_synonyms(
            &self,
            _term: &str,
            _definition: Option<&str>,
            _context: Option<&str>,
        ) -> BegripResult<Vec<SynonymSuggestion>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.suggestions.clone())
        }
    }

    struct FailingSuggester;

    #[async_trait]
    impl SynonymSuggester for FailingSuggester {
        async fn suggest_synonyms(
            &self,
            _term: &str,
            _definition: Option<&str>,
            _context: Option<&str>,
        ) -> BegripResult<Vec<SynonymSuggestion>> {
            Err(begrip_core::BegripError::NetworkError {
                operation: "suggest_synonyms".to_string(),
                reason: "verbinding geweigerd".to_string(),
            })
        }
    }

    fn suggestion(term: &str, confidence: f64) -> SynonymSuggestion {
        SynonymSuggestion {
            synonym: term.to_string(),
            confidence,
            rationale: "testsuggestie".to_string(),
        }
    }

    async fn orchestrator_with(
        suggester: Arc<dyn SynonymSuggester>,
        config: SynonymConfiguration,
    ) -> (SynonymOrchestrator, Arc<SynonymRegistry>) {
        let registry = Arc::new(SynonymRegistry::connect_in_memory().await.unwrap());
        let orchestrator = SynonymOrchestrator::new(registry.clone(), suggester, config);
        (orchestrator, registry)
    }

    async fn seed_active(registry: &SynonymRegistry, canonical: &str, terms: &[(&str, f64)]) {
        let group = registry.get_or_create_group(canonical, None, "seed").await.unwrap();
        for (term, weight) in terms {
            registry
                .add_group_member(group.id, term, *weight, MemberStatus::Active, MemberSource::DbSeed, None, None, "seed")
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_cache_hit_counting() {
        let (orchestrator, registry) =
            orchestrator_with(Arc::new(StaticSuggester::new(vec![])), SynonymConfiguration::default()).await;
        seed_active(&registry, "oproeping", &[("dagvaarding", 0.9), ("uitnodiging", 0.8)]).await;

        let first = orchestrator.get_synonyms_for_lookup("oproeping", 5).await;
        let second = orchestrator.get_synonyms_for_lookup("oproeping", 5).await;
        assert_eq!(first, second);

        let stats = orchestrator.cache_stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let config = SynonymConfiguration {
            cache_max_size: 2,
            ..SynonymConfiguration::default()
        };
        let (orchestrator, _registry) =
            orchestrator_with(Arc::new(StaticSuggester::new(vec![])), config).await;

        orchestrator.get_synonyms_for_lookup("a", 5).await;
        orchestrator.get_synonyms_for_lookup("b", 5).await;
        orchestrator.get_synonyms_for_lookup("a", 5).await;
        orchestrator.get_synonyms_for_lookup("c", 5).await;

        let cached = orchestrator.cached_terms();
        assert_eq!(cached.len(), 2);
        assert!(cached.contains(&"a".to_string()));
        assert!(cached.contains(&"c".to_string()));
        assert!(!cached.contains(&"b".to_string()));
    }

    #[tokio::test]
    async fn test_ensure_synonyms_fast_path() {
        let suggester = Arc::new(StaticSuggester::new(vec![suggestion("x", 0.9)]));
        let config = SynonymConfiguration::default();
        let (orchestrator, registry) = orchestrator_with(suggester.clone(), config).await;
        seed_active(
            &registry,
            "beslag",
            &[("inbeslagname", 0.9), ("confiscatie", 0.85), ("verbeurdverklaring", 0.8), ("bevriezing", 0.75), ("zekerheidsbeslag", 0.72)],
        )
        .await;

        let (synonyms, added) = orchestrator.ensure_synonyms("beslag", 5, None).await;
        assert_eq!(synonyms.len(), 5);
        assert_eq!(added, 0);
        assert_eq!(suggester.calls.load(Ordering::SeqCst), 0, "fast path mag suggester niet raken");
    }

    #[tokio::test]
    async fn test_ensure_synonyms_enrichment_pragmatic() {
        let suggester = Arc::new(StaticSuggester::new(vec![
            suggestion("dagvaarding", 0.9),
            suggestion("convocatie", 0.85),
            suggestion("uitnodiging", 0.8),
        ]));
        let config = SynonymConfiguration {
            policy: SynonymPolicy::Pragmatic,
            ..SynonymConfiguration::default()
        };
        let (orchestrator, registry) = orchestrator_with(suggester, config).await;
        seed_active(&registry, "oproeping", &[("oproep", 0.9), ("sommatie", 0.8)]).await;

        let (synonyms, added) = orchestrator.ensure_synonyms("oproeping", 5, None).await;
        assert_eq!(added, 3);
        assert_eq!(synonyms.len(), 5);
        assert!(synonyms.iter().any(|s| s.status == MemberStatus::AiPending));
    }

    #[tokio::test]
    async fn test_ensure_synonyms_strict_stores_but_hides() {
        let suggester = Arc::new(StaticSuggester::new(vec![
            suggestion("dagvaarding", 0.9),
            suggestion("convocatie", 0.85),
            suggestion("uitnodiging", 0.8),
        ]));
        let config = SynonymConfiguration {
            policy: SynonymPolicy::Strict,
            ..SynonymConfiguration::default()
        };
        let (orchestrator, registry) = orchestrator_with(suggester, config).await;
        seed_active(&registry, "oproeping", &[("oproep", 0.9), ("sommatie", 0.8)]).await;

        let (synonyms, added) = orchestrator.ensure_synonyms("oproeping", 5, None).await;
        // Storage always happens; visibility follows the policy.
        assert_eq!(added, 3);
        assert_eq!(synonyms.len(), 2);
        assert!(synonyms.iter().all(|s| s.status == MemberStatus::Active));

        let group = registry.get_or_create_group("oproeping", None, "check").await.unwrap();
        let pending = registry
            .get_group_members(group.id, Some(&[MemberStatus::AiPending]), None)
            .await
            .unwrap();
        assert_eq!(pending.len(), 3);
    }

    #[tokio::test]
    async fn test_ensure_synonyms_suggester_failure_degrades() {
        let config = SynonymConfiguration::default();
        let (orchestrator, registry) = orchestrator_with(Arc::new(FailingSuggester), config).await;
        seed_active(&registry, "oproeping", &[("oproep", 0.9)]).await;

        let (synonyms, added) = orchestrator.ensure_synonyms("oproeping", 5, None).await;
        assert_eq!(added, 0);
        assert_eq!(synonyms.len(), 1);
    }

    #[tokio::test]
    async fn test_registry_mutation_invalidates_cache() {
        let (orchestrator, registry) =
            orchestrator_with(Arc::new(StaticSuggester::new(vec![])), SynonymConfiguration::default()).await;
        seed_active(&registry, "oproeping", &[("oproep", 0.9)]).await;

        let before = orchestrator.get_synonyms_for_lookup("oproeping", 5).await;
        assert_eq!(before.len(), 1);

        let group = registry.get_or_create_group("oproeping", None, "t").await.unwrap();
        registry
            .add_group_member(group.id, "sommatie", 0.85, MemberStatus::Active, MemberSource::Manual, None, None, "t")
            .await
            .unwrap();

        let after = orchestrator.get_synonyms_for_lookup("oproeping", 5).await;
        assert_eq!(after.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_term() {
        let (orchestrator, _registry) =
            orchestrator_with(Arc::new(StaticSuggester::new(vec![])), SynonymConfiguration::default()).await;
        let (synonyms, added) = orchestrator.ensure_synonyms("  ", 5, None).await;
        assert!(synonyms.is_empty());
        assert_eq!(added, 0);
    }

    #[tokio::test]
    async fn test_health_check_reports_empty_registry() {
        let (orchestrator, _registry) =
            orchestrator_with(Arc::new(StaticSuggester::new(vec![])), SynonymConfiguration::default()).await;
        let report = orchestrator.health_check().await;
        assert_eq!(report.status, "warning");
        assert!(report.warnings.iter().any(|w| w.contains("leeg")));
    }
}
