use crate::{
    BegripResult, FeedbackItem, GenerationOutput, GenerationRequest, LookupRequest, LookupResult,
    OntologicalCategory, SynonymSuggestion, ValidationResult,
};
use async_trait::async_trait;

/// External AI model invocation (generation and enhancement).
#[async_trait]
pub trait AiProvider: Send + Sync {
    async fn generate_definition(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
        model: Option<&str>,
    ) -> BegripResult<GenerationOutput>;
}

/// External web lookup for provenance snippets.
#[async_trait]
pub trait WebLookupService: Send + Sync {
    async fn lookup(&self, request: &LookupRequest) -> BegripResult<Vec<LookupResult>>;
}

/// AI-backed synonym suggestion used by the enrichment slow path.
#[async_trait]
pub trait SynonymSuggester: Send + Sync {
    async fn suggest_synonyms(
        &self,
        term: &str,
        definition: Option<&str>,
        context: Option<&str>,
    ) -> BegripResult<Vec<SynonymSuggestion>>;
}

/// Optional request sanitization (PII redaction, field stripping).
#[async_trait]
pub trait SecurityService: Send + Sync {
    async fn sanitize_request(&self, request: GenerationRequest) -> BegripResult<GenerationRequest>;
}

/// Prior validation failures fed back into prompt building.
#[async_trait]
pub trait FeedbackEngine: Send + Sync {
    async fn get_feedback_for_request(
        &self,
        term: &str,
        category: Option<OntologicalCategory>,
    ) -> BegripResult<Vec<FeedbackItem>>;

    async fn process_validation_feedback(
        &self,
        definition_id: &str,
        validation_result: &ValidationResult,
        original_request: &GenerationRequest,
    ) -> BegripResult<()>;
}

/// Monitoring event sink for the generation pipeline.
#[async_trait]
pub trait MonitoringService: Send + Sync {
    async fn start_generation(&self, generation_id: &str);

    async fn complete_generation(
        &self,
        generation_id: &str,
        success: bool,
        duration_ms: u64,
        token_count: Option<u32>,
        components_used: &[String],
    );

    async fn track_error(&self, generation_id: &str, error_type: &str, message: &str);
}
