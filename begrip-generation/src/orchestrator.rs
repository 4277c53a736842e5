use crate::cleaning::CleaningService;
use crate::enhancement::EnhancementService;
use begrip_core::{
    AiProvider, BegripError, Definition, DefinitionResponse, EnrichmentStatus, FeedbackEngine,
    FeedbackItem, GenerationRequest, LookupRequest, MonitoringService, ProvenanceSource,
    ResponseMetadata, SecurityService, ValidationContext, WebLookupService, WeightedSynonym,
};
use begrip_db::DefinitionRepository;
use begrip_prompt::{EnrichedContext, PromptConfig, PromptOrchestrator, PromptResult};
use begrip_synonym::SynonymOrchestrator;
use begrip_validation::ValidationOrchestrator;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

const ORCHESTRATOR_VERSION: &str = "v2.0";
const PHASES: u8 = 11;

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub enable_feedback_loop: bool,
    pub enable_enhancement: bool,
    pub web_lookup_top_k: usize,
    pub default_temperature: f32,
    pub default_max_tokens: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            enable_feedback_loop: true,
            enable_enhancement: true,
            web_lookup_top_k: 3,
            default_temperature: 0.1,
            default_max_tokens: 500,
        }
    }
}

/// Caller-provided document snippet, folded into provenance ahead of web
/// results.
#[derive(Debug, Clone)]
pub struct DocumentSnippet {
    pub title: String,
    pub url: Option<String>,
    pub snippet: String,
    pub score: f64,
    pub doc_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ExternalContext {
    pub documents: Vec<DocumentSnippet>,
}

fn web_lookup_timeout_seconds() -> u64 {
    std::env::var("WEB_LOOKUP_TIMEOUT_SECONDS")
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .map(|v| v.max(1.0) as u64)
        .unwrap_or(10)
}

fn web_lookup_max_results() -> usize {
    std::env::var("WEB_LOOKUP_MAX_RESULTS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(20)
}

fn error_type(error: &BegripError) -> &'static str {
    match error {
        BegripError::ValidationError { .. } => "ValidationError",
        BegripError::ConfigurationError { .. } => "ConfigurationError",
        BegripError::DatabaseError { .. } => "DatabaseError",
        BegripError::DuplicateDefinition { .. } => "DuplicateDefinitionError",
        BegripError::NotFound { .. } => "NotFound",
        BegripError::TimeoutError { .. } => "TimeoutError",
        BegripError::NetworkError { .. } => "NetworkError",
        BegripError::AiGenerationError { .. } => "AiGenerationError",
        BegripError::StatusTransitionError { .. } => "StatusTransitionError",
        BegripError::SerializationError { .. } => "SerializationError",
        BegripError::InternalError { .. } => "InternalError",
    }
}

/// Top-level pipeline: eleven phases in fixed order, each individually
/// fault-tolerant except model invocation.
pub struct GenerationOrchestrator {
    ai: Arc<dyn AiProvider>,
    prompts: Arc<PromptOrchestrator>,
    prompt_config: PromptConfig,
    validation: Arc<ValidationOrchestrator>,
    cleaning: CleaningService,
    repository: Arc<DefinitionRepository>,
    enhancement: Option<EnhancementService>,
    security: Option<Arc<dyn SecurityService>>,
    monitoring: Option<Arc<dyn MonitoringService>>,
    feedback: Option<Arc<dyn FeedbackEngine>>,
    web_lookup: Option<Arc<dyn WebLookupService>>,
    synonyms: Option<Arc<SynonymOrchestrator>>,
    config: OrchestratorConfig,
}

impl GenerationOrchestrator {
    pub fn new(
        ai: Arc<dyn AiProvider>,
        prompts: Arc<PromptOrchestrator>,
        validation: Arc<ValidationOrchestrator>,
        repository: Arc<DefinitionRepository>,
    ) -> Self {
        Self {
            ai,
            prompts,
            prompt_config: PromptConfig::default(),
            validation,
            cleaning: CleaningService::new(),
            repository,
            enhancement: None,
            security: None,
            monitoring: None,
            feedback: None,
            web_lookup: None,
            synonyms: None,
            config: OrchestratorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_prompt_config(mut self, prompt_config: PromptConfig) -> Self {
        self.prompt_config = prompt_config;
        self
    }

    pub fn with_enhancement(mut self, enhancement: EnhancementService) -> Self {
        self.enhancement = Some(enhancement);
        self
    }

    pub fn with_security(mut self, security: Arc<dyn SecurityService>) -> Self {
        self.security = Some(security);
        self
    }

    pub fn with_monitoring(mut self, monitoring: Arc<dyn MonitoringService>) -> Self {
        self.monitoring = Some(monitoring);
        self
    }

    pub fn with_feedback(mut self, feedback: Arc<dyn FeedbackEngine>) -> Self {
        self.feedback = Some(feedback);
        self
    }

    pub fn with_web_lookup(mut self, web_lookup: Arc<dyn WebLookupService>) -> Self {
        self.web_lookup = Some(web_lookup);
        self
    }

    pub fn with_synonyms(mut self, synonyms: Arc<SynonymOrchestrator>) -> Self {
        self.synonyms = Some(synonyms);
        self
    }

    /// Self description for diagnostics and the CLI.
    pub fn service_info(&self) -> HashMap<String, serde_json::Value> {
        let mut info = HashMap::new();
        info.insert("service_mode".to_string(), json!("orchestrator_v2"));
        info.insert("version".to_string(), json!(ORCHESTRATOR_VERSION));
        info.insert("rule_count".to_string(), json!(self.validation.rule_count()));
        info.insert("prompt_modules".to_string(), json!(self.prompts.module_ids()));
        info.insert("enhancement_enabled".to_string(), json!(self.enhancement.is_some()));
        info.insert("synonym_enrichment_enabled".to_string(), json!(self.synonyms.is_some()));
        info.insert("web_lookup_enabled".to_string(), json!(self.web_lookup.is_some()));
        info
    }

    /// Single entry point. Infrastructure failures yield `success=false`;
    /// rule violations do not (the definition is persisted as draft).
    pub async fn create_definition(
        &self,
        request: GenerationRequest,
        external: Option<ExternalContext>,
    ) -> DefinitionResponse {
        let start = Instant::now();
        let generation_id = request
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        if let Some(monitoring) = &self.monitoring {
            monitoring.start_generation(&generation_id).await;
        }

        if request.term.trim().is_empty() {
            return self
                .failure(&generation_id, start, "ValidationError", "begrip mag niet leeg zijn")
                .await;
        }

        info!(
            generation_id = %generation_id,
            term = %request.term,
            category = ?request.ontological_category,
            "orchestratie gestart"
        );

        // Phase 1: sanitize. Absent security component passes through; a
        // failing one degrades to the original request.
        let request = match &self.security {
            Some(security) => match security.sanitize_request(request.clone()).await {
                Ok(sanitized) => {
                    debug!(generation_id = %generation_id, "request gesanitizeerd");
                    sanitized
                }
                Err(e) => {
                    warn!(generation_id = %generation_id, error = %e, "sanitization mislukt; origineel request gebruikt");
                    request
                }
            },
            None => request,
        };

        // Phase 2: prior validation failures for this term and category.
        let feedback_items = self.load_feedback(&generation_id, &request).await;

        // Phase 3: synonym enrichment.
        let (synonyms, ai_pending_count, synonym_status) =
            self.ensure_synonyms(&generation_id, &request).await;

        // Phase 4: web lookup.
        let (mut sources, web_status) = self.enrich_from_web(&generation_id, &request).await;

        // Phase 5: caller documents precede web snippets in provenance.
        if let Some(external) = &external {
            let documents: Vec<ProvenanceSource> = external
                .documents
                .iter()
                .map(|doc| ProvenanceSource {
                    provider: "documents".to_string(),
                    title: doc.title.clone(),
                    url: doc.url.clone(),
                    snippet: doc.snippet.clone(),
                    score: doc.score,
                    used_in_prompt: true,
                    retrieved_at: None,
                    doc_id: doc.doc_id.clone(),
                    source_label: Some("Geüpload document".to_string()),
                })
                .collect();
            if !documents.is_empty() {
                debug!(generation_id = %generation_id, count = documents.len(), "documentsnippets samengevoegd");
                let mut merged = documents;
                merged.append(&mut sources);
                sources = merged;
            }
        }

        // Phase 6: prompt assembly; always succeeds via the built-in
        // fallback.
        let prompt_result = self.build_prompt(&request, &feedback_items, &sources, &synonyms);

        // Phase 7: model invocation; the only aborting phase.
        let temperature = request.options.temperature.unwrap_or(self.config.default_temperature);
        let max_tokens = request.options.max_tokens.unwrap_or(self.config.default_max_tokens);
        let generation = match self
            .ai
            .generate_definition(
                &prompt_result.text,
                temperature,
                max_tokens,
                request.options.model.as_deref(),
            )
            .await
        {
            Ok(generation) => generation,
            Err(e) => {
                if let Some(monitoring) = &self.monitoring {
                    monitoring
                        .track_error(&generation_id, error_type(&e), &e.to_string())
                        .await;
                }
                return self
                    .failure(&generation_id, start, error_type(&e), &e.to_string())
                    .await;
            }
        };
        info!(generation_id = %generation_id, model = %generation.model, "AI-generatie afgerond");

        // Phase 8: cleaning plus the display original.
        let cleaning = self.cleaning.clean(&generation.text, &request.term);
        let display_original = self.cleaning.display_original(&generation.text, &request.term);
        let mut current_text = cleaning.cleaned.clone();
        let mut marker = cleaning.ontological_marker.clone();

        // Phase 9: validation of the cleaned text.
        let correlation = Uuid::parse_str(&generation_id).unwrap_or_else(|_| Uuid::new_v4());
        let mut validation_ctx = ValidationContext::new(correlation);
        validation_ctx
            .metadata
            .insert("generation_id".to_string(), json!(generation_id));
        if request.options.force_duplicate {
            validation_ctx
                .metadata
                .insert("force_duplicate".to_string(), json!(true));
        }

        let candidate = self.build_candidate(&request, &current_text, marker.as_deref());
        let mut validation_result = self.validation.validate(&candidate, &validation_ctx);

        // Phase 10: at most one enhancement pass.
        let mut enhanced = false;
        if !validation_result.is_acceptable && self.config.enable_enhancement {
            if let Some(enhancement) = &self.enhancement {
                match enhancement
                    .enhance_definition(&current_text, &validation_result.violations, &request)
                    .await
                {
                    Ok(improved) => {
                        let recleaned = self.cleaning.clean(&improved, &request.term);
                        current_text = recleaned.cleaned;
                        marker = recleaned.ontological_marker.or(marker);

                        let mut enhanced_ctx = ValidationContext::new(correlation);
                        enhanced_ctx
                            .metadata
                            .insert("generation_id".to_string(), json!(generation_id));
                        enhanced_ctx.metadata.insert("enhanced".to_string(), json!(true));

                        let candidate =
                            self.build_candidate(&request, &current_text, marker.as_deref());
                        validation_result = self.validation.validate(&candidate, &enhanced_ctx);
                        enhanced = true;
                        info!(generation_id = %generation_id, "verbetering toegepast en opnieuw gevalideerd");
                    }
                    Err(e) => {
                        warn!(generation_id = %generation_id, error = %e, "verbetering mislukt; origineel behouden");
                    }
                }
            }
        }

        // Phase 11: persist (always, invalid results as draft), feedback and
        // monitoring.
        let mut definition = self.build_candidate(&request, &current_text, marker.as_deref());
        definition.original_text = Some(display_original.clone());
        definition.valid = validation_result.is_acceptable;
        definition.violations = validation_result.violations.clone();
        self.fill_metadata(
            &mut definition,
            &request,
            &generation,
            &prompt_result,
            &sources,
            &synonyms,
            ai_pending_count,
            web_status,
            synonym_status,
            enhanced,
            &feedback_items,
            &display_original,
            start,
        );

        let definition_id = match self.repository.save(&definition).await {
            Ok(id) => id,
            Err(e) => {
                if let Some(monitoring) = &self.monitoring {
                    monitoring
                        .track_error(&generation_id, error_type(&e), &e.to_string())
                        .await;
                }
                return self
                    .failure(&generation_id, start, error_type(&e), &e.to_string())
                    .await;
            }
        };
        definition.id = Some(definition_id);
        info!(generation_id = %generation_id, definition_id, "definitie opgeslagen");

        if !validation_result.is_acceptable {
            if let Err(e) = self
                .repository
                .log_history(
                    definition_id,
                    "failed_attempt",
                    Some(&request.actor),
                    Some(&format!(
                        "Validatie afgekeurd met {} overtreding(en)",
                        validation_result.violations.len()
                    )),
                )
                .await
            {
                warn!(generation_id = %generation_id, error = %e, "mislukte poging niet gelogd");
            }

            if let Some(feedback) = &self.feedback {
                if let Err(e) = feedback
                    .process_validation_feedback(&generation_id, &validation_result, &request)
                    .await
                {
                    warn!(generation_id = %generation_id, error = %e, "feedback niet verwerkt");
                }
            }
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        if let Some(monitoring) = &self.monitoring {
            monitoring
                .complete_generation(
                    &generation_id,
                    validation_result.is_acceptable,
                    duration_ms,
                    Some(generation.tokens_used),
                    &prompt_result.components_used,
                )
                .await;
        }

        info!(
            generation_id = %generation_id,
            duration_ms,
            valid = validation_result.is_acceptable,
            "orchestratie afgerond"
        );

        DefinitionResponse {
            success: true,
            definition: Some(definition),
            validation_result: Some(validation_result),
            error: None,
            metadata: ResponseMetadata {
                generation_id,
                duration_ms,
                phases_completed: Some(PHASES),
                web_lookup_status: Some(web_status),
                synonym_enrichment_status: Some(synonym_status),
                web_sources_count: Some(sources.len()),
                enriched_synonyms_count: Some(synonyms.len()),
                ai_pending_synonyms_count: Some(ai_pending_count),
                enriched: Some(enhanced),
                error_type: None,
            },
        }
    }

    async fn failure(
        &self,
        generation_id: &str,
        start: Instant,
        error_type: &str,
        message: &str,
    ) -> DefinitionResponse {
        warn!(generation_id = %generation_id, error_type, message, "orchestratie mislukt");
        DefinitionResponse::failure(
            format!("Generatie mislukt: {message}"),
            ResponseMetadata {
                generation_id: generation_id.to_string(),
                duration_ms: start.elapsed().as_millis() as u64,
                error_type: Some(error_type.to_string()),
                ..ResponseMetadata::default()
            },
        )
    }

    async fn load_feedback(
        &self,
        generation_id: &str,
        request: &GenerationRequest,
    ) -> Vec<FeedbackItem> {
        if !self.config.enable_feedback_loop {
            return Vec::new();
        }
        let Some(feedback) = &self.feedback else {
            return Vec::new();
        };
        match feedback
            .get_feedback_for_request(&request.term, request.ontological_category)
            .await
        {
            Ok(items) => {
                info!(generation_id = %generation_id, count = items.len(), "feedback geladen");
                items
            }
            Err(e) => {
                warn!(generation_id = %generation_id, error = %e, "feedback laden mislukt; zonder verder");
                Vec::new()
            }
        }
    }

    async fn ensure_synonyms(
        &self,
        generation_id: &str,
        request: &GenerationRequest,
    ) -> (Vec<WeightedSynonym>, usize, EnrichmentStatus) {
        let Some(synonyms) = &self.synonyms else {
            debug!(generation_id = %generation_id, "synoniemorkestrator niet beschikbaar");
            return (Vec::new(), 0, EnrichmentStatus::NotAvailable);
        };

        let min_count = synonyms.config().min_synonyms_threshold as usize;
        let context = build_context_string(request);
        let (found, added) = synonyms
            .ensure_synonyms(&request.term, min_count, context.as_deref())
            .await;

        let status = if found.is_empty() {
            EnrichmentStatus::NoSynonyms
        } else {
            EnrichmentStatus::Success
        };
        info!(
            generation_id = %generation_id,
            found = found.len(),
            ai_pending = added,
            "synoniemverrijking afgerond"
        );
        (found, added, status)
    }

    async fn enrich_from_web(
        &self,
        generation_id: &str,
        request: &GenerationRequest,
    ) -> (Vec<ProvenanceSource>, EnrichmentStatus) {
        let Some(web_lookup) = &self.web_lookup else {
            warn!(generation_id = %generation_id, "web lookup niet beschikbaar; zonder externe context verder");
            return (Vec::new(), EnrichmentStatus::NotAvailable);
        };

        let timeout_seconds = web_lookup_timeout_seconds();
        let lookup_request = LookupRequest {
            term: request.term.clone(),
            sources: None,
            context: build_context_string(request),
            max_results: web_lookup_max_results(),
            include_examples: false,
            timeout_seconds,
        };

        match tokio::time::timeout(
            Duration::from_secs(timeout_seconds),
            web_lookup.lookup(&lookup_request),
        )
        .await
        {
            Ok(Ok(results)) => {
                let mut sources: Vec<ProvenanceSource> = results
                    .into_iter()
                    .map(|result| ProvenanceSource {
                        provider: result.provider,
                        title: result.title,
                        url: result.url,
                        snippet: result.snippet,
                        score: result.score,
                        used_in_prompt: false,
                        retrieved_at: result.retrieved_at,
                        doc_id: None,
                        source_label: None,
                    })
                    .collect();
                for source in sources.iter_mut().take(self.config.web_lookup_top_k) {
                    source.used_in_prompt = true;
                }
                let status = if sources.is_empty() {
                    EnrichmentStatus::NoResults
                } else {
                    EnrichmentStatus::Success
                };
                info!(generation_id = %generation_id, count = sources.len(), "web lookup afgerond");
                (sources, status)
            }
            Ok(Err(e)) => {
                warn!(generation_id = %generation_id, error = %e, "web lookup mislukt; zonder externe context verder");
                (Vec::new(), EnrichmentStatus::Error)
            }
            Err(_) => {
                warn!(
                    generation_id,
                    timeout_seconds, "web lookup timeout; zonder externe context verder"
                );
                (Vec::new(), EnrichmentStatus::Timeout)
            }
        }
    }

    fn build_prompt(
        &self,
        request: &GenerationRequest,
        feedback: &[FeedbackItem],
        sources: &[ProvenanceSource],
        synonyms: &[WeightedSynonym],
    ) -> PromptResult {
        let context = EnrichedContext {
            term: request.term.clone(),
            organizational_context: request.organizational_context.clone(),
            juridical_context: request.juridical_context.clone(),
            legal_basis: request.legal_basis.clone(),
            ontological_category: request.ontological_category,
            feedback: feedback.to_vec(),
            sources: sources.to_vec(),
            synonyms: synonyms.to_vec(),
            timestamp: Utc::now(),
        };

        match self.prompts.build_prompt(&context, &self.prompt_config) {
            Ok(result) if !result.components_used.is_empty() => result,
            Ok(_) | Err(_) => {
                warn!(term = %request.term, "alle promptmodules faalden; minimale fallbackprompt");
                fallback_prompt(request)
            }
        }
    }

    fn build_candidate(
        &self,
        request: &GenerationRequest,
        text: &str,
        marker: Option<&str>,
    ) -> Definition {
        let mut definition = Definition::new(&request.term, text, &request.actor);
        definition.ontological_category = request.ontological_category;
        definition.organizational_context = request.organizational_context.clone();
        definition.juridical_context = request.juridical_context.clone();
        definition.legal_basis = request.legal_basis.clone();
        if let Some(marker) = marker {
            definition
                .metadata
                .insert("ontologische_categorie_marker".to_string(), json!(marker));
        }
        definition
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_metadata(
        &self,
        definition: &mut Definition,
        request: &GenerationRequest,
        generation: &begrip_core::GenerationOutput,
        prompt_result: &PromptResult,
        sources: &[ProvenanceSource],
        synonyms: &[WeightedSynonym],
        ai_pending_count: usize,
        web_status: EnrichmentStatus,
        synonym_status: EnrichmentStatus,
        enhanced: bool,
        feedback: &[FeedbackItem],
        display_original: &str,
        start: Instant,
    ) {
        let metadata = &mut definition.metadata;
        metadata.insert("model".to_string(), json!(generation.model));
        metadata.insert("tokens_used".to_string(), json!(generation.tokens_used));
        metadata.insert(
            "prompt_components".to_string(),
            json!(prompt_result.components_used),
        );
        metadata.insert("prompt_text".to_string(), json!(prompt_result.text));
        metadata.insert("sources".to_string(), json!(sources));
        metadata.insert("web_lookup_status".to_string(), json!(web_status.as_str()));
        metadata.insert(
            "synonym_enrichment_status".to_string(),
            json!(synonym_status.as_str()),
        );
        metadata.insert(
            "enriched_synonyms".to_string(),
            json!(synonyms
                .iter()
                .map(|s| json!({"term": s.term, "weight": s.weight}))
                .collect::<Vec<_>>()),
        );
        metadata.insert(
            "ai_pending_synonyms_count".to_string(),
            json!(ai_pending_count),
        );
        metadata.insert("has_feedback".to_string(), json!(!feedback.is_empty()));
        metadata.insert("enhanced".to_string(), json!(enhanced));
        metadata.insert(
            "generation_time_ms".to_string(),
            json!(start.elapsed().as_millis() as u64),
        );
        metadata.insert("generated_at".to_string(), json!(Utc::now().to_rfc3339()));
        metadata.insert(
            "orchestrator_version".to_string(),
            json!(ORCHESTRATOR_VERSION),
        );
        metadata.insert("definitie_origineel".to_string(), json!(display_original));
        if request.options.force_duplicate {
            metadata.insert("force_duplicate".to_string(), json!(true));
        }
    }
}

fn build_context_string(request: &GenerationRequest) -> Option<String> {
    let parts: Vec<&str> = request
        .organizational_context
        .iter()
        .chain(request.juridical_context.iter())
        .chain(request.legal_basis.iter())
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}

/// Minimal built-in prompt, used only when every module errors out.
fn fallback_prompt(request: &GenerationRequest) -> PromptResult {
    let category_hint = request
        .ontological_category
        .map(|category| {
            format!("\n\nDit begrip is een {category}. Houd hier rekening mee in de definitie.")
        })
        .unwrap_or_default();
    let context = build_context_string(request)
        .unwrap_or_else(|| "Geen specifieke context gegeven".to_string());

    let text = format!(
        "Genereer een Nederlandse definitie voor het begrip: {term}\n\n\
         Context: {context}{category_hint}\n\n\
         Genereer een heldere, precieze definitie in één zin die voldoet aan Nederlandse \
         kwaliteitseisen voor juridisch gebruik. Start met een zelfstandig naamwoord.",
        term = request.term,
    );

    let token_count = begrip_core::estimate_tokens(&text);
    let mut metadata = HashMap::new();
    metadata.insert("fallback_reason".to_string(), json!("prompt_modules_unavailable"));

    PromptResult {
        text,
        token_count,
        components_used: vec!["fallback".to_string()],
        metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use begrip_core::{BegripResult, GenerationOutput};
    use begrip_prompt::ModuleCatalog;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedAi {
        responses: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedAi {
        fn new(responses: Vec<&str>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().map(String::from).collect()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AiProvider for ScriptedAi {
        async fn generate_definition(
            &self,
            _prompt: &str,
            _temperature: f32,
            _max_tokens: u32,
            _model: Option<&str>,
        ) -> BegripResult<GenerationOutput> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                return Err(BegripError::AiGenerationError {
                    reason: "geen response meer".to_string(),
                });
            }
            Ok(GenerationOutput {
                text: responses.remove(0),
                model: "test-model".to_string(),
                tokens_used: 64,
                cached: false,
                retry_count: 0,
                metadata: HashMap::new(),
            })
        }
    }

    struct FailingAi;

    #[async_trait]
    impl AiProvider for FailingAi {
        async fn generate_definition(
            &self,
            _prompt: &str,
            _temperature: f32,
            _max_tokens: u32,
            _model: Option<&str>,
        ) -> BegripResult<GenerationOutput> {
            Err(BegripError::AiGenerationError {
                reason: "provider onbereikbaar".to_string(),
            })
        }
    }

    async fn orchestrator(ai: Arc<dyn AiProvider>) -> GenerationOrchestrator {
        let repository = Arc::new(DefinitionRepository::connect_in_memory().await.unwrap());
        GenerationOrchestrator::new(
            ai,
            Arc::new(PromptOrchestrator::new(ModuleCatalog::Classic)),
            Arc::new(ValidationOrchestrator::default()),
            repository,
        )
    }

    fn request() -> GenerationRequest {
        let mut request = GenerationRequest::new("vervoersverbod", "u1");
        request.organizational_context.push("DJI".to_string());
        request.juridical_context.push("Strafrecht".to_string());
        request.ontological_category = Some(begrip_core::OntologicalCategory::Resultaat);
        request
    }

    const GOOD_OUTPUT: &str = "Ontologische categorie: resultaat\nVervoersverbod: maatregel die volgt op een strafrechtelijke veroordeling en het verplaatsen van een persoon beperkt.";

    #[tokio::test]
    async fn test_happy_path_completes_eleven_phases() {
        let orchestrator = orchestrator(Arc::new(ScriptedAi::new(vec![GOOD_OUTPUT]))).await;
        let response = orchestrator.create_definition(request(), None).await;

        assert!(response.success, "error: {:?}", response.error);
        assert_eq!(response.metadata.phases_completed, Some(11));
        assert_eq!(
            response.metadata.web_lookup_status,
            Some(EnrichmentStatus::NotAvailable)
        );

        let definition = response.definition.unwrap();
        assert!(definition.text.starts_with("Maatregel die volgt op"));
        assert!(definition.valid);
        assert!(definition.id.is_some());
        assert_eq!(
            definition.metadata["ontologische_categorie_marker"],
            json!("resultaat")
        );
        assert!(definition
            .original_text
            .as_deref()
            .unwrap()
            .starts_with("maatregel die volgt op"));
    }

    #[tokio::test]
    async fn test_ai_failure_aborts_pipeline() {
        let orchestrator = orchestrator(Arc::new(FailingAi)).await;
        let response = orchestrator.create_definition(request(), None).await;

        assert!(!response.success);
        assert_eq!(response.metadata.error_type.as_deref(), Some("AiGenerationError"));
        assert!(response.definition.is_none());
    }

    #[tokio::test]
    async fn test_invalid_result_is_persisted_as_draft() {
        let bad = "Ontologische categorie: resultaat\nIs een maatregel die volgt op een veroordeling van een persoon.";
        let orchestrator = orchestrator(Arc::new(ScriptedAi::new(vec![bad]))).await;
        let response = orchestrator.create_definition(request(), None).await;

        assert!(response.success);
        let definition = response.definition.unwrap();
        assert!(!definition.valid);
        assert!(definition.id.is_some());
        assert_eq!(definition.status, begrip_core::DefinitionStatus::Draft);
        let validation = response.validation_result.unwrap();
        assert!(validation.violations.iter().any(|v| v.rule_id == "STR-01"));
    }

    #[tokio::test]
    async fn test_enhancement_runs_once_and_revalidates() {
        let generation_ai: Arc<dyn AiProvider> = Arc::new(ScriptedAi::new(vec![
            "Ontologische categorie: resultaat\nIs een maatregel die volgt op een veroordeling van een persoon.",
        ]));
        let enhancement_ai = Arc::new(ScriptedAi::new(vec![
            "Maatregel die volgt op een strafrechtelijke veroordeling en verplaatsing van een persoon beperkt.",
        ]));

        let orchestrator = orchestrator(generation_ai)
            .await
            .with_enhancement(EnhancementService::new(enhancement_ai.clone()));
        let response = orchestrator.create_definition(request(), None).await;

        assert!(response.success);
        assert_eq!(response.metadata.enriched, Some(true));
        let definition = response.definition.unwrap();
        assert!(definition.valid, "violations: {:?}", definition.violations);
        assert_eq!(definition.metadata["enhanced"], json!(true));
        assert_eq!(enhancement_ai.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_duplicate_save_surfaces_error() {
        let orchestrator =
            orchestrator(Arc::new(ScriptedAi::new(vec![GOOD_OUTPUT, GOOD_OUTPUT]))).await;
        let first = orchestrator.create_definition(request(), None).await;
        assert!(first.success);

        let second = orchestrator.create_definition(request(), None).await;
        assert!(!second.success);
        assert_eq!(
            second.metadata.error_type.as_deref(),
            Some("DuplicateDefinitionError")
        );
    }

    #[tokio::test]
    async fn test_force_duplicate_creates_version() {
        let orchestrator =
            orchestrator(Arc::new(ScriptedAi::new(vec![GOOD_OUTPUT, GOOD_OUTPUT]))).await;
        let first = orchestrator.create_definition(request(), None).await;
        let first_id = first.definition.unwrap().id.unwrap();

        let mut forced = request();
        forced.options.force_duplicate = true;
        let second = orchestrator.create_definition(forced, None).await;
        assert!(second.success);
        let definition = second.definition.unwrap();
        assert_eq!(definition.version, 2);
        assert_eq!(definition.previous_version_id, Some(first_id));
    }

    #[tokio::test]
    async fn test_document_snippets_precede_web_sources() {
        let orchestrator = orchestrator(Arc::new(ScriptedAi::new(vec![GOOD_OUTPUT]))).await;
        let external = ExternalContext {
            documents: vec![DocumentSnippet {
                title: "Beleidsnota vervoer".to_string(),
                url: None,
                snippet: "het verplaatsen van personen onder toezicht".to_string(),
                score: 0.8,
                doc_id: Some("doc-1".to_string()),
            }],
        };
        let response = orchestrator.create_definition(request(), Some(external)).await;

        assert!(response.success);
        let definition = response.definition.unwrap();
        let sources = definition.metadata["sources"].as_array().unwrap().clone();
        assert_eq!(sources[0]["provider"], json!("documents"));
        assert_eq!(sources[0]["used_in_prompt"], json!(true));
    }

    #[tokio::test]
    async fn test_empty_term_rejected_immediately() {
        let orchestrator = orchestrator(Arc::new(ScriptedAi::new(vec![]))).await;
        let response = orchestrator
            .create_definition(GenerationRequest::new("  ", "u1"), None)
            .await;
        assert!(!response.success);
        assert_eq!(response.metadata.error_type.as_deref(), Some("ValidationError"));
    }
}
