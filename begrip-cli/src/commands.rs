use async_trait::async_trait;
use begrip_core::{
    AiProvider, BegripError, BegripResult, GenerationOutput, GenerationOptions, GenerationRequest,
    MemberStatus, OntologicalCategory,
};
use begrip_db::{DatabaseSchema, DefinitionRepository};
use begrip_generation::{
    EnhancementService, GenerationOrchestrator, SqliteFeedbackEngine, TracingMonitor,
};
use begrip_ontology::{LegalDomain, UfoClassifier};
use begrip_prompt::{ModuleCatalog, PromptOrchestrator};
use begrip_synonym::{
    PlaceholderSuggester, SynonymConfiguration, SynonymOrchestrator, SynonymRegistry,
};
use begrip_validation::ValidationOrchestrator;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::sync::Arc;
use tracing::warn;

/// Stand-in for the external AI provider: the provider client is configured
/// per deployment, the CLI itself ships without credentials.
struct PlaceholderAiProvider;

#[async_trait]
impl AiProvider for PlaceholderAiProvider {
    async fn generate_definition(
        &self,
        _prompt: &str,
        _temperature: f32,
        _max_tokens: u32,
        _model: Option<&str>,
    ) -> BegripResult<GenerationOutput> {
        Err(BegripError::AiGenerationError {
            reason: "geen AI-provider geconfigureerd; stel de providerkoppeling in".to_string(),
        })
    }
}

async fn open_pool(database: &str) -> Result<Pool<Sqlite>, Box<dyn std::error::Error>> {
    if let Some(parent) = std::path::Path::new(database).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&format!("sqlite://{database}?mode=rwc"))
        .await?;
    DatabaseSchema::create_all_tables(&pool).await?;
    Ok(pool)
}

fn parse_category(value: &str) -> Result<OntologicalCategory, Box<dyn std::error::Error>> {
    OntologicalCategory::parse(value).ok_or_else(|| {
        format!("onbekende categorie '{value}'; kies uit proces, type, resultaat, exemplaar").into()
    })
}

#[allow(clippy::too_many_arguments)]
pub async fn generate(
    database: &str,
    config_path: &str,
    term: &str,
    organizational: &[String],
    juridical: &[String],
    legal_basis: &[String],
    category: Option<&str>,
    actor: &str,
    force_duplicate: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pool = open_pool(database).await?;
    let config = SynonymConfiguration::from_yaml(config_path)?;

    let registry = Arc::new(
        SynonymRegistry::new(pool.clone())
            .with_preferred_threshold(config.preferred_weight_threshold),
    );
    registry.initialize().await?;

    let repository = Arc::new(DefinitionRepository::new(pool.clone()));
    let synonyms = Arc::new(SynonymOrchestrator::new(
        registry,
        Arc::new(PlaceholderSuggester::new()),
        config,
    ));

    let ai: Arc<dyn AiProvider> = Arc::new(PlaceholderAiProvider);
    let orchestrator = GenerationOrchestrator::new(
        ai.clone(),
        Arc::new(PromptOrchestrator::new(ModuleCatalog::Classic)),
        Arc::new(ValidationOrchestrator::default()),
        repository,
    )
    .with_feedback(Arc::new(SqliteFeedbackEngine::new(pool.clone())))
    .with_monitoring(Arc::new(TracingMonitor::new()))
    .with_synonyms(synonyms)
    .with_enhancement(EnhancementService::new(ai));

    let ontological_category = category.map(parse_category).transpose()?;
    let request = GenerationRequest {
        id: None,
        term: term.to_string(),
        organizational_context: organizational.to_vec(),
        juridical_context: juridical.to_vec(),
        legal_basis: legal_basis.to_vec(),
        ontological_category,
        actor: actor.to_string(),
        options: GenerationOptions {
            force_duplicate,
            ..GenerationOptions::default()
        },
    };

    let response = orchestrator.create_definition(request, None).await;
    if !response.success {
        warn!(error = ?response.error, "generatie niet geslaagd");
    }
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

pub fn classify(
    term: &str,
    definition: &str,
    domain: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let domain = match domain {
        Some(value) => Some(LegalDomain::parse(value).ok_or_else(|| {
            format!(
                "onbekend domein '{value}'; kies uit strafrecht, bestuursrecht, civiel_recht, algemeen_juridisch"
            )
        })?),
        None => None,
    };

    let classifier = UfoClassifier::new();
    let result = classifier.classify_with_domain(term, definition, domain)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub async fn synonyms(
    database: &str,
    term: &str,
    pragmatic: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pool = open_pool(database).await?;
    let registry = SynonymRegistry::new(pool);
    registry.initialize().await?;

    let statuses: &[MemberStatus] = if pragmatic {
        &[MemberStatus::Active, MemberStatus::AiPending]
    } else {
        &[MemberStatus::Active]
    };

    let synonyms = registry.get_synonyms(term, statuses, 0.0, None, 25).await?;
    println!("{}", serde_json::to_string_pretty(&synonyms)?);
    Ok(())
}

pub fn config_check(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = SynonymConfiguration::from_yaml(config_path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

pub async fn stats(database: &str) -> Result<(), Box<dyn std::error::Error>> {
    let pool = open_pool(database).await?;
    let repository = DefinitionRepository::new(pool.clone());
    let registry = SynonymRegistry::new(pool);
    registry.initialize().await?;

    let output = serde_json::json!({
        "definities": repository.get_statistics().await?,
        "synoniemen": registry.get_statistics().await?,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
