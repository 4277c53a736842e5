use crate::context::{EnrichedContext, ModuleContext, PromptConfig, PromptModule, SharedState};
use crate::modules::{build_catalog, ModuleCatalog};
use begrip_core::{estimate_tokens, BegripError, BegripResult};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Assembled prompt plus build diagnostics.
#[derive(Debug, Clone)]
pub struct PromptResult {
    pub text: String,
    pub token_count: usize,
    pub components_used: Vec<String>,
    pub metadata: HashMap<String, Value>,
}

/// Priority-ordered composition of registered prompt modules over a shared
/// state bus. Immutable after construction; safe to share between requests.
pub struct PromptOrchestrator {
    modules: Vec<Arc<dyn PromptModule>>,
}

impl PromptOrchestrator {
    pub fn new(catalog: ModuleCatalog) -> Self {
        let modules = build_catalog(catalog);
        info!(modules = modules.len(), ?catalog, "PromptOrchestrator opgebouwd");
        Self { modules }
    }

    pub fn with_modules(modules: Vec<Arc<dyn PromptModule>>) -> Self {
        Self { modules }
    }

    /// The process-wide orchestrator with the classic catalog, built lazily.
    pub fn global() -> &'static PromptOrchestrator {
        static GLOBAL: Lazy<PromptOrchestrator> =
            Lazy::new(|| PromptOrchestrator::new(ModuleCatalog::Classic));
        &GLOBAL
    }

    pub fn module_ids(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.id().to_string()).collect()
    }

    /// Compose the prompt: filter on configuration, sort by descending
    /// priority (registration order breaks ties), execute each module and
    /// merge its shared writes, then apply post-processing.
    pub fn build_prompt(
        &self,
        context: &EnrichedContext,
        config: &PromptConfig,
    ) -> BegripResult<PromptResult> {
        let start = Instant::now();

        if context.term.trim().is_empty() {
            return Err(BegripError::ValidationError {
                field: "term".to_string(),
                message: "begrip mag niet leeg zijn".to_string(),
            });
        }

        let mut selected: Vec<(usize, &Arc<dyn PromptModule>)> = self
            .modules
            .iter()
            .enumerate()
            .filter(|(_, module)| config.is_enabled(module.id()))
            .collect();
        // Stable sort: equal priorities keep registration order.
        selected.sort_by_key(|(_, module)| std::cmp::Reverse(module.priority()));

        let mut shared_state = SharedState::new();
        let mut sections: Vec<String> = Vec::new();
        let mut components_used = Vec::new();
        let mut failed = 0usize;

        for (_, module) in selected {
            let ctx = ModuleContext {
                context,
                config,
                shared_state: &shared_state,
            };
            match module.execute(&ctx) {
                Ok(output) => {
                    if !output.content.trim().is_empty() {
                        sections.push(output.content);
                        components_used.push(output.module_id.clone());
                    }
                    for (key, value) in output.shared_writes {
                        shared_state.insert(key, value);
                    }
                }
                Err(e) => {
                    failed += 1;
                    warn!(module = module.id(), error = %e, "promptmodule overgeslagen");
                }
            }
        }

        let mut text = sections.join("\n\n");

        if config.compact_mode {
            text = apply_compact_mode(&text);
        }

        if text.chars().count() > config.max_prompt_length {
            text = truncate_chars(&text, config.max_prompt_length);
            debug!(max = config.max_prompt_length, "prompt afgekapt op lengtelimiet");
        }

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        let token_count = estimate_tokens(&text);
        let mut metadata = HashMap::new();
        metadata.insert("active_components".to_string(), json!(components_used.len()));
        metadata.insert("failed_components".to_string(), json!(failed));
        metadata.insert("prompt_length".to_string(), json!(text.chars().count()));
        metadata.insert("estimated_tokens".to_string(), json!(token_count));
        metadata.insert("generation_time_ms".to_string(), json!(elapsed_ms));
        metadata.insert(
            "ontological_category".to_string(),
            json!(context.ontological_category.map(|c| c.as_str())),
        );

        info!(
            term = %context.term,
            length = text.chars().count(),
            components = components_used.len(),
            "prompt samengesteld"
        );

        Ok(PromptResult {
            text,
            token_count,
            components_used,
            metadata,
        })
    }
}

/// Compact mode drops example lines and validation matrices.
fn apply_compact_mode(text: &str) -> String {
    text.lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            !trimmed.starts_with('✅')
                && !trimmed.starts_with('❌')
                && !trimmed.starts_with('|')
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ModuleOutput;
    use begrip_core::OntologicalCategory;

    fn context() -> EnrichedContext {
        let mut context = EnrichedContext::new("vervoersverbod");
        context.organizational_context.push("DJI".to_string());
        context.juridical_context.push("Strafrecht".to_string());
        context.ontological_category = Some(OntologicalCategory::Resultaat);
        context
    }

    #[test]
    fn test_build_prompt_classic_catalog() {
        let orchestrator = PromptOrchestrator::new(ModuleCatalog::Classic);
        let result = orchestrator.build_prompt(&context(), &PromptConfig::default()).unwrap();

        assert_eq!(result.components_used.len(), 16);
        assert_eq!(result.components_used[0], "expertise");
        assert_eq!(result.components_used.last().unwrap(), "metrics");
        assert!(result.text.contains("vervoersverbod"));
        assert!(result.text.contains("Toetsregels STR"));
        assert!(result.token_count > 0);
    }

    #[test]
    fn test_build_prompt_consolidated_matches_classic_content() {
        let classic = PromptOrchestrator::new(ModuleCatalog::Classic)
            .build_prompt(&context(), &PromptConfig::default())
            .unwrap();
        let consolidated = PromptOrchestrator::new(ModuleCatalog::Consolidated)
            .build_prompt(&context(), &PromptConfig::default())
            .unwrap();

        assert_eq!(consolidated.components_used.len(), 9);
        // Same guidance reaches the model through both catalogs.
        for marker in [
            "expert in beleidsmatige definities",
            "Toetsregels ESS",
            "Toetsregels STR",
            "Grammaticale eisen",
            "Outputspecificatie",
            "Definitieopdracht",
        ] {
            assert!(classic.text.contains(marker), "classic mist {marker}");
            assert!(consolidated.text.contains(marker), "consolidated mist {marker}");
        }
    }

    #[test]
    fn test_empty_term_rejected() {
        let orchestrator = PromptOrchestrator::new(ModuleCatalog::Classic);
        let empty = EnrichedContext::new("  ");
        assert!(orchestrator.build_prompt(&empty, &PromptConfig::default()).is_err());
    }

    #[test]
    fn test_priority_ordering_with_tie_break() {
        struct Fixed(&'static str, i32);
        impl PromptModule for Fixed {
            fn id(&self) -> &str {
                self.0
            }
            fn priority(&self) -> i32 {
                self.1
            }
            fn execute(&self, _ctx: &ModuleContext) -> BegripResult<ModuleOutput> {
                Ok(ModuleOutput::new(self.0, self.0))
            }
        }

        let orchestrator = PromptOrchestrator::with_modules(vec![
            Arc::new(Fixed("eerste", 50)),
            Arc::new(Fixed("tweede", 50)),
            Arc::new(Fixed("hoog", 90)),
        ]);
        let result = orchestrator
            .build_prompt(&EnrichedContext::new("x"), &PromptConfig::default())
            .unwrap();
        assert_eq!(result.components_used, vec!["hoog", "eerste", "tweede"]);
    }

    #[test]
    fn test_module_error_is_tolerated() {
        struct Failing;
        impl PromptModule for Failing {
            fn id(&self) -> &str {
                "failing"
            }
            fn priority(&self) -> i32 {
                99
            }
            fn execute(&self, _ctx: &ModuleContext) -> BegripResult<ModuleOutput> {
                Err(BegripError::InternalError {
                    message: "kapot".to_string(),
                })
            }
        }
        struct Working;
        impl PromptModule for Working {
            fn id(&self) -> &str {
                "working"
            }
            fn priority(&self) -> i32 {
                10
            }
            fn execute(&self, _ctx: &ModuleContext) -> BegripResult<ModuleOutput> {
                Ok(ModuleOutput::new("working", "inhoud"))
            }
        }

        let orchestrator =
            PromptOrchestrator::with_modules(vec![Arc::new(Failing), Arc::new(Working)]);
        let result = orchestrator
            .build_prompt(&EnrichedContext::new("x"), &PromptConfig::default())
            .unwrap();
        assert_eq!(result.components_used, vec!["working"]);
        assert_eq!(result.metadata["failed_components"], 1);
    }

    #[test]
    fn test_shared_state_flows_forward() {
        let orchestrator = PromptOrchestrator::new(ModuleCatalog::Classic);
        let mut context = EnrichedContext::new("registratie");
        context.ontological_category = None;
        let result = orchestrator.build_prompt(&context, &PromptConfig::default()).unwrap();
        // Expertise writes the word class; the semantic module reads it and
        // the task trailer prints it.
        assert!(result.text.contains("nominalisatie"));
        assert!(result.text.contains("Termtype: verbal-noun"));
    }

    #[test]
    fn test_compact_mode_strips_examples() {
        let orchestrator = PromptOrchestrator::new(ModuleCatalog::Classic);
        let config = PromptConfig {
            compact_mode: true,
            ..PromptConfig::default()
        };
        let result = orchestrator.build_prompt(&context(), &config).unwrap();
        assert!(!result.text.contains('✅'));
        assert!(!result.text.contains('❌'));
    }

    #[test]
    fn test_max_length_cap() {
        let orchestrator = PromptOrchestrator::new(ModuleCatalog::Classic);
        let config = PromptConfig {
            max_prompt_length: 500,
            ..PromptConfig::default()
        };
        let result = orchestrator.build_prompt(&context(), &config).unwrap();
        assert!(result.text.chars().count() <= 500);
    }

    #[test]
    fn test_exclude_module() {
        let orchestrator = PromptOrchestrator::new(ModuleCatalog::Classic);
        let mut config = PromptConfig::default();
        config.exclude.insert("metrics".to_string());
        let result = orchestrator.build_prompt(&context(), &config).unwrap();
        assert!(!result.components_used.contains(&"metrics".to_string()));
        assert_eq!(result.components_used.len(), 15);
    }

    #[test]
    fn test_global_singleton() {
        let first = PromptOrchestrator::global();
        let second = PromptOrchestrator::global();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.module_ids().len(), 16);
    }
}
