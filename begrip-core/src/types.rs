use crate::errors::{BegripError, BegripResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// Coarse ontological category used by prompt guidance (ESS-02).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OntologicalCategory {
    Proces,
    Type,
    Resultaat,
    Exemplaar,
}

impl OntologicalCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            OntologicalCategory::Proces => "proces",
            OntologicalCategory::Type => "type",
            OntologicalCategory::Resultaat => "resultaat",
            OntologicalCategory::Exemplaar => "exemplaar",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "proces" => Some(OntologicalCategory::Proces),
            "type" | "soort" => Some(OntologicalCategory::Type),
            "resultaat" => Some(OntologicalCategory::Resultaat),
            "exemplaar" | "particulier" => Some(OntologicalCategory::Exemplaar),
            _ => None,
        }
    }
}

impl std::fmt::Display for OntologicalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub model: Option<String>,
    #[serde(default)]
    pub force_duplicate: bool,
}

/// One user invocation of the generation pipeline. Consumed once; never
/// mutated after sanitization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub id: Option<String>,
    pub term: String,
    #[serde(default)]
    pub organizational_context: Vec<String>,
    #[serde(default)]
    pub juridical_context: Vec<String>,
    #[serde(default)]
    pub legal_basis: Vec<String>,
    pub ontological_category: Option<OntologicalCategory>,
    pub actor: String,
    #[serde(default)]
    pub options: GenerationOptions,
}

impl GenerationRequest {
    pub fn new(term: impl Into<String>, actor: impl Into<String>) -> Self {
        Self {
            id: None,
            term: term.into(),
            organizational_context: Vec::new(),
            juridical_context: Vec::new(),
            legal_basis: Vec::new(),
            ontological_category: None,
            actor: actor.into(),
            options: GenerationOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub evidence: Option<String>,
}

impl Violation {
    pub fn new(rule_id: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            evidence: None,
        }
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }
}

/// Immutable validation outcome, bound to one Definition snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_acceptable: bool,
    pub violations: Vec<Violation>,
    pub passed_rules: Vec<String>,
    pub detailed_scores: HashMap<String, f64>,
    pub version: String,
}

impl ValidationResult {
    pub fn has_critical(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Critical)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionStatus {
    Draft,
    Review,
    Established,
    Archived,
}

impl DefinitionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefinitionStatus::Draft => "draft",
            DefinitionStatus::Review => "review",
            DefinitionStatus::Established => "established",
            DefinitionStatus::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(DefinitionStatus::Draft),
            "review" => Some(DefinitionStatus::Review),
            "established" => Some(DefinitionStatus::Established),
            "archived" => Some(DefinitionStatus::Archived),
            _ => None,
        }
    }

    /// Forward transitions only: draft -> review -> established; everything
    /// may be archived.
    pub fn can_transition_to(&self, next: DefinitionStatus) -> bool {
        matches!(
            (self, next),
            (DefinitionStatus::Draft, DefinitionStatus::Review)
                | (DefinitionStatus::Review, DefinitionStatus::Established)
                | (_, DefinitionStatus::Archived)
        )
    }
}

/// A definition as owned by the repository after save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Definition {
    pub id: Option<i64>,
    pub term: String,
    pub text: String,
    pub ontological_category: Option<OntologicalCategory>,
    #[serde(default)]
    pub organizational_context: Vec<String>,
    #[serde(default)]
    pub juridical_context: Vec<String>,
    #[serde(default)]
    pub legal_basis: Vec<String>,
    /// Pre-cleaning text with only the ontological header stripped.
    pub original_text: Option<String>,
    pub valid: bool,
    #[serde(default)]
    pub violations: Vec<Violation>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    pub status: DefinitionStatus,
    pub version: i64,
    pub previous_version_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl Definition {
    pub fn new(term: impl Into<String>, text: impl Into<String>, created_by: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            term: term.into(),
            text: text.into(),
            ontological_category: None,
            organizational_context: Vec::new(),
            juridical_context: Vec::new(),
            legal_basis: Vec::new(),
            original_text: None,
            valid: false,
            violations: Vec::new(),
            metadata: HashMap::new(),
            status: DefinitionStatus::Draft,
            version: 1,
            previous_version_id: None,
            created_at: now,
            updated_at: now,
            created_by: created_by.into(),
            approved_by: None,
            approved_at: None,
        }
    }
}

/// One external evidence item contributing to prompt context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvenanceSource {
    pub provider: String,
    pub title: String,
    pub url: Option<String>,
    pub snippet: String,
    pub score: f64,
    pub used_in_prompt: bool,
    pub retrieved_at: Option<DateTime<Utc>>,
    pub doc_id: Option<String>,
    pub source_label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Active,
    AiPending,
    RejectedAuto,
    Deprecated,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::AiPending => "ai_pending",
            MemberStatus::RejectedAuto => "rejected_auto",
            MemberStatus::Deprecated => "deprecated",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(MemberStatus::Active),
            "ai_pending" => Some(MemberStatus::AiPending),
            "rejected_auto" => Some(MemberStatus::RejectedAuto),
            "deprecated" => Some(MemberStatus::Deprecated),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberSource {
    DbSeed,
    Manual,
    AiSuggested,
    ImportedYaml,
}

impl MemberSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberSource::DbSeed => "db_seed",
            MemberSource::Manual => "manual",
            MemberSource::AiSuggested => "ai_suggested",
            MemberSource::ImportedYaml => "imported_yaml",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "db_seed" => Some(MemberSource::DbSeed),
            "manual" => Some(MemberSource::Manual),
            "ai_suggested" => Some(MemberSource::AiSuggested),
            "imported_yaml" => Some(MemberSource::ImportedYaml),
            _ => None,
        }
    }
}

/// A synonym group clusters peer terms; no hierarchy inside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynonymGroup {
    pub id: i64,
    pub canonical_term: String,
    pub domain: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynonymGroupMember {
    pub id: i64,
    pub group_id: i64,
    pub term: String,
    pub weight: f64,
    pub is_preferred: bool,
    pub status: MemberStatus,
    pub source: MemberSource,
    pub context_json: Option<String>,
    /// NULL = global, otherwise scoped to one definition.
    pub definitie_id: Option<i64>,
    pub usage_count: i64,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Lightweight projection for bidirectional synonym lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedSynonym {
    pub term: String,
    pub weight: f64,
    pub status: MemberStatus,
    pub is_preferred: bool,
    pub usage_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynonymSuggestion {
    pub synonym: String,
    pub confidence: f64,
    pub rationale: String,
}

impl SynonymSuggestion {
    pub fn validate(&self) -> BegripResult<()> {
        if self.synonym.trim().is_empty() {
            return Err(BegripError::ValidationError {
                field: "synonym".to_string(),
                message: "synoniem mag niet leeg zijn".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(BegripError::ValidationError {
                field: "confidence".to_string(),
                message: format!("confidence moet tussen 0.0 en 1.0 zijn: {}", self.confidence),
            });
        }
        Ok(())
    }
}

/// Raw AI provider output for one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutput {
    pub text: String,
    pub model: String,
    pub tokens_used: u32,
    pub cached: bool,
    pub retry_count: u32,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupRequest {
    pub term: String,
    pub sources: Option<Vec<String>>,
    pub context: Option<String>,
    pub max_results: usize,
    pub include_examples: bool,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResult {
    pub provider: String,
    pub title: String,
    pub url: Option<String>,
    pub snippet: String,
    pub score: f64,
    pub retrieved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub kind: String,
    pub content: String,
}

/// Degradation status of an optional enrichment phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStatus {
    Success,
    NoSynonyms,
    NoResults,
    Timeout,
    Error,
    NotAvailable,
}

impl EnrichmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrichmentStatus::Success => "success",
            EnrichmentStatus::NoSynonyms => "no_synonyms",
            EnrichmentStatus::NoResults => "no_results",
            EnrichmentStatus::Timeout => "timeout",
            EnrichmentStatus::Error => "error",
            EnrichmentStatus::NotAvailable => "not_available",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub generation_id: String,
    pub duration_ms: u64,
    pub phases_completed: Option<u8>,
    pub web_lookup_status: Option<EnrichmentStatus>,
    pub synonym_enrichment_status: Option<EnrichmentStatus>,
    pub web_sources_count: Option<usize>,
    pub enriched_synonyms_count: Option<usize>,
    pub ai_pending_synonyms_count: Option<usize>,
    pub enriched: Option<bool>,
    pub error_type: Option<String>,
}

/// Synchronous response of `create_definition`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionResponse {
    pub success: bool,
    pub definition: Option<Definition>,
    pub validation_result: Option<ValidationResult>,
    pub error: Option<String>,
    pub metadata: ResponseMetadata,
}

impl DefinitionResponse {
    pub fn failure(error: impl Into<String>, metadata: ResponseMetadata) -> Self {
        Self {
            success: false,
            definition: None,
            validation_result: None,
            error: Some(error.into()),
            metadata,
        }
    }
}

/// Correlation context handed to the validation orchestrator.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    pub correlation_id: Uuid,
    pub metadata: HashMap<String, Value>,
}

impl ValidationContext {
    pub fn new(correlation_id: Uuid) -> Self {
        Self {
            correlation_id,
            metadata: HashMap::new(),
        }
    }
}
