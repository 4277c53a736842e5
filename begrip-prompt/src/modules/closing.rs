use crate::context::{ModuleContext, ModuleOutput, PromptModule};
use crate::rules::all_rules;
use begrip_core::BegripResult;

/// Final checklist and the "produce your answer now" instruction, closed off
/// with a traceability trailer.
pub struct DefinitionTaskModule;

impl PromptModule for DefinitionTaskModule {
    fn id(&self) -> &str {
        "definition_task"
    }

    fn priority(&self) -> i32 {
        20
    }

    fn execute(&self, ctx: &ModuleContext) -> BegripResult<ModuleOutput> {
        let context = ctx.context;
        let term = &context.term;
        let category = context
            .ontological_category
            .map(|c| c.as_str().to_string())
            .unwrap_or_else(|| "niet opgegeven".to_string());
        let word_class = ctx
            .shared_state
            .get("word_class")
            .and_then(|v| v.as_str())
            .unwrap_or("onbekend");
        let org = if context.organizational_context.is_empty() {
            "geen".to_string()
        } else {
            context.organizational_context.join(", ")
        };

        let content = format!(
            "### Definitieopdracht:\n\
             Formuleer nu de definitie van **{term}** volgens bovenstaande specificaties.\n\
             \n\
             Checklist, controleer voor je antwoord:\n\
             - Begint met zelfstandig naamwoord (geen lidwoord of koppelwerkwoord)\n\
             - Eén enkele zin\n\
             - Geen toelichting, voorbeelden of haakjes\n\
             - Ontologische categorie is duidelijk\n\
             - Geen subjectieve woorden (belangrijk, essentieel, adequaat)\n\
             - Context verwerkt zonder expliciete benoeming\n\
             \n\
             Kwaliteitscontrole, stel jezelf deze vragen:\n\
             1. Is direct duidelijk wat het begrip is (niet het doel)?\n\
             2. Kan iemand hiermee bepalen of iets wel of niet onder dit begrip valt?\n\
             3. Bevat de definitie alleen essentiële informatie?\n\
             \n\
             Ontologische marker (lever als eerste regel):\n\
             Ontologische categorie: kies uit [soort, exemplaar, proces, resultaat]\n\
             \n\
             Geef nu de definitie van het begrip **{term}** in één enkele zin, zonder toelichting.\n\
             \n\
             Promptmetadata:\n\
             - Begrip: {term}\n\
             - Categorie: {category}\n\
             - Termtype: {word_class}\n\
             - Organisatorische context(en): {org}\n\
             - Timestamp: {timestamp}",
            timestamp = context.timestamp.to_rfc3339(),
        );

        Ok(ModuleOutput::new(self.id(), content))
    }
}

/// Optional summary of the rule codes the validator will check.
pub struct MetricsModule;

impl PromptModule for MetricsModule {
    fn id(&self) -> &str {
        "metrics"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn execute(&self, _ctx: &ModuleContext) -> BegripResult<ModuleOutput> {
        let codes: Vec<&str> = all_rules().map(|rule| rule.code).collect();
        let content = format!(
            "### Toetsing achteraf:\n\
             De definitie wordt gevalideerd tegen de volgende regels: {}.",
            codes.join(", ")
        );
        Ok(ModuleOutput::new(self.id(), content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{EnrichedContext, PromptConfig, SharedState};
    use serde_json::json;

    #[test]
    fn test_definition_task_contains_term_and_trailer() {
        let mut context = EnrichedContext::new("vervoersverbod");
        context.organizational_context.push("DJI".to_string());
        let config = PromptConfig::default();
        let mut shared = SharedState::new();
        shared.insert("word_class".to_string(), json!("other"));

        let output = DefinitionTaskModule
            .execute(&ModuleContext {
                context: &context,
                config: &config,
                shared_state: &shared,
            })
            .unwrap();

        assert!(output.content.contains("**vervoersverbod**"));
        assert!(output.content.contains("Promptmetadata"));
        assert!(output.content.contains("Termtype: other"));
        assert!(output.content.contains("DJI"));
    }

    #[test]
    fn test_metrics_lists_rule_codes() {
        let context = EnrichedContext::new("x");
        let config = PromptConfig::default();
        let shared = SharedState::new();
        let output = MetricsModule
            .execute(&ModuleContext {
                context: &context,
                config: &config,
                shared_state: &shared,
            })
            .unwrap();
        assert!(output.content.contains("ESS-02"));
        assert!(output.content.contains("STR-01"));
    }
}
