use begrip_core::{
    BegripResult, FeedbackItem, OntologicalCategory, ProvenanceSource, WeightedSynonym,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Everything a prompt module may read about the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedContext {
    pub term: String,
    pub organizational_context: Vec<String>,
    pub juridical_context: Vec<String>,
    pub legal_basis: Vec<String>,
    pub ontological_category: Option<OntologicalCategory>,
    pub feedback: Vec<FeedbackItem>,
    pub sources: Vec<ProvenanceSource>,
    pub synonyms: Vec<WeightedSynonym>,
    pub timestamp: DateTime<Utc>,
}

impl EnrichedContext {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            organizational_context: Vec::new(),
            juridical_context: Vec::new(),
            legal_basis: Vec::new(),
            ontological_category: None,
            feedback: Vec::new(),
            sources: Vec::new(),
            synonyms: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn has_context(&self) -> bool {
        !self.organizational_context.is_empty()
            || !self.juridical_context.is_empty()
            || !self.legal_basis.is_empty()
    }
}

/// Key-value bus threaded through priority-ordered module execution. Writes
/// from a later module never affect earlier ones.
pub type SharedState = HashMap<String, Value>;

/// Configuration over the module set and post-processing.
#[derive(Debug, Clone)]
pub struct PromptConfig {
    /// Module ids to skip.
    pub exclude: HashSet<String>,
    /// When set, only these module ids run.
    pub include_only: Option<HashSet<String>>,
    pub detailed_category_guidance: bool,
    pub include_examples_in_rules: bool,
    pub compact_mode: bool,
    pub max_prompt_length: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            exclude: HashSet::new(),
            include_only: None,
            detailed_category_guidance: true,
            include_examples_in_rules: true,
            compact_mode: false,
            max_prompt_length: 20_000,
        }
    }
}

impl PromptConfig {
    pub fn is_enabled(&self, module_id: &str) -> bool {
        if self.exclude.contains(module_id) {
            return false;
        }
        match &self.include_only {
            Some(include) => include.contains(module_id),
            None => true,
        }
    }
}

/// Read view handed to a module during execution.
pub struct ModuleContext<'a> {
    pub context: &'a EnrichedContext,
    pub config: &'a PromptConfig,
    pub shared_state: &'a SharedState,
}

/// What one module contributes to the prompt.
#[derive(Debug, Clone, Default)]
pub struct ModuleOutput {
    pub module_id: String,
    pub content: String,
    pub metadata: HashMap<String, Value>,
    pub shared_writes: HashMap<String, Value>,
}

impl ModuleOutput {
    pub fn new(module_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            module_id: module_id.into(),
            content: content.into(),
            metadata: HashMap::new(),
            shared_writes: HashMap::new(),
        }
    }
}

/// One prompt fragment producer. Modules are pure functions of the context,
/// the configuration and the shared state written by earlier modules.
pub trait PromptModule: Send + Sync {
    fn id(&self) -> &str;

    /// Higher priority runs (and is placed) earlier; ties break on
    /// registration order.
    fn priority(&self) -> i32;

    fn execute(&self, ctx: &ModuleContext) -> BegripResult<ModuleOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_config_filtering() {
        let mut config = PromptConfig::default();
        assert!(config.is_enabled("expertise"));

        config.exclude.insert("metrics".to_string());
        assert!(!config.is_enabled("metrics"));

        config.include_only = Some(["expertise".to_string()].into_iter().collect());
        assert!(config.is_enabled("expertise"));
        assert!(!config.is_enabled("template"));
    }

    #[test]
    fn test_enriched_context_has_context() {
        let mut context = EnrichedContext::new("toezicht");
        assert!(!context.has_context());
        context.organizational_context.push("DJI".to_string());
        assert!(context.has_context());
    }
}
