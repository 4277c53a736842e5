use crate::context::{ModuleContext, ModuleOutput, PromptModule};
use crate::modules::guards::GRAMMAR_SECTION;
use crate::rules::{rules_for_family, RuleSpec, RULE_FAMILIES};
use begrip_core::BegripResult;

fn render_rule(rule: &RuleSpec, include_examples: bool, lines: &mut Vec<String>) {
    lines.push(format!("**{}: {}**", rule.code, rule.title));
    lines.push(format!("- {}", rule.description));
    lines.push(format!("- Toetsvraag: {}", rule.test_question));
    if include_examples {
        for good in rule.good {
            lines.push(format!("  ✅ {good}"));
        }
        for bad in rule.bad {
            lines.push(format!("  ❌ {bad}"));
        }
    }
}

fn render_family(family: &str, include_examples: bool) -> String {
    let mut lines = vec![format!("### Toetsregels {family}:")];
    for rule in rules_for_family(family) {
        render_rule(rule, include_examples, &mut lines);
    }
    lines.join("\n")
}

/// One prompt module per rule family (classic catalog).
pub struct ValidationRulesModule {
    family: &'static str,
    id: String,
    priority: i32,
}

impl ValidationRulesModule {
    pub fn new(family: &'static str, priority: i32) -> Self {
        Self {
            family,
            id: format!("validation_rules_{}", family.to_lowercase()),
            priority,
        }
    }
}

impl PromptModule for ValidationRulesModule {
    fn id(&self) -> &str {
        &self.id
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn execute(&self, ctx: &ModuleContext) -> BegripResult<ModuleOutput> {
        let content = render_family(self.family, ctx.config.include_examples_in_rules);
        Ok(ModuleOutput::new(self.id(), content))
    }
}

/// Consolidated variant: all seven rule families in one module, identical
/// content.
pub struct UnifiedValidationRulesModule;

impl PromptModule for UnifiedValidationRulesModule {
    fn id(&self) -> &str {
        "unified_validation_rules"
    }

    fn priority(&self) -> i32 {
        55
    }

    fn execute(&self, ctx: &ModuleContext) -> BegripResult<ModuleOutput> {
        let sections: Vec<String> = RULE_FAMILIES
            .iter()
            .map(|family| render_family(family, ctx.config.include_examples_in_rules))
            .collect();
        Ok(ModuleOutput::new(self.id(), sections.join("\n\n")))
    }
}

/// Consolidated variant: grammar constraints and output format merged into
/// one linguistic module.
pub struct LinguisticRulesModule;

impl PromptModule for LinguisticRulesModule {
    fn id(&self) -> &str {
        "linguistic_rules"
    }

    fn priority(&self) -> i32 {
        70
    }

    fn execute(&self, _ctx: &ModuleContext) -> BegripResult<ModuleOutput> {
        let content = format!(
            "{GRAMMAR_SECTION}\n\n\
             ### Outputspecificatie:\n\
             - Lever als eerste regel de ontologische marker: 'Ontologische categorie: <soort|exemplaar|proces|resultaat>'\n\
             - Daarna volgt de definitie: precies één zin van 30 tot 350 tekens.\n\
             - Geen opsommingstekens, geen toelichting, geen voorbeelden, geen haakjes.\n\
             - Geen aanhalingstekens rond de definitie."
        );
        Ok(ModuleOutput::new(self.id(), content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{EnrichedContext, PromptConfig, SharedState};

    fn run_with_config(module: &dyn PromptModule, config: &PromptConfig) -> ModuleOutput {
        let context = EnrichedContext::new("toezicht");
        let shared = SharedState::new();
        module
            .execute(&ModuleContext {
                context: &context,
                config,
                shared_state: &shared,
            })
            .unwrap()
    }

    #[test]
    fn test_family_module_renders_rules() {
        let module = ValidationRulesModule::new("STR", 50);
        let output = run_with_config(&module, &PromptConfig::default());
        assert!(output.content.contains("STR-01"));
        assert!(output.content.contains("Toetsvraag"));
        assert!(output.content.contains("✅"));
    }

    #[test]
    fn test_examples_can_be_suppressed() {
        let module = ValidationRulesModule::new("STR", 50);
        let config = PromptConfig {
            include_examples_in_rules: false,
            ..PromptConfig::default()
        };
        let output = run_with_config(&module, &config);
        assert!(!output.content.contains("✅"));
        assert!(output.content.contains("STR-01"));
    }

    #[test]
    fn test_unified_module_covers_all_families() {
        let output = run_with_config(&UnifiedValidationRulesModule, &PromptConfig::default());
        for family in RULE_FAMILIES {
            assert!(output.content.contains(&format!("Toetsregels {family}")));
        }
    }

    #[test]
    fn test_unified_content_matches_family_modules() {
        let config = PromptConfig::default();
        let unified = run_with_config(&UnifiedValidationRulesModule, &config);
        for family in RULE_FAMILIES {
            let module = ValidationRulesModule::new(family, 50);
            let single = run_with_config(&module, &config);
            assert!(unified.content.contains(&single.content));
        }
    }

    #[test]
    fn test_linguistic_module_merges_grammar_and_output() {
        let output = run_with_config(&LinguisticRulesModule, &PromptConfig::default());
        assert!(output.content.contains("Grammaticale eisen"));
        assert!(output.content.contains("Outputspecificatie"));
    }
}
