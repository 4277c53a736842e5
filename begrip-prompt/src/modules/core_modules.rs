use crate::context::{ModuleContext, ModuleOutput, PromptModule};
use begrip_core::{expand_org_abbreviation, BegripResult};
use serde_json::json;

/// Role framing. Also infers the word class of the term and publishes it on
/// the shared-state bus for later modules.
pub struct ExpertiseModule;

fn infer_word_class(term: &str) -> &'static str {
    let lower = term.trim().to_lowercase();
    if lower.ends_with("ing") || lower.ends_with("atie") || lower.ends_with("itie") || lower.ends_with("en") {
        "verbal-noun"
    } else if lower.ends_with("heid") || lower.ends_with("schap") || lower.ends_with("teit") || lower.ends_with("isme") {
        "abstract-noun"
    } else {
        "other"
    }
}

impl PromptModule for ExpertiseModule {
    fn id(&self) -> &str {
        "expertise"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn execute(&self, ctx: &ModuleContext) -> BegripResult<ModuleOutput> {
        let term = &ctx.context.term;
        let word_class = infer_word_class(term);

        let word_class_hint = match word_class {
            "verbal-noun" => {
                "\nHet begrip is een naamwoord afgeleid van een werkwoord; benoem de handeling of de uitkomst expliciet."
            }
            "abstract-noun" => {
                "\nHet begrip is een abstract naamwoord; definieer de eigenschap of toestand die het aanduidt."
            }
            _ => "",
        };

        let content = format!(
            "Je bent een expert in beleidsmatige definities voor overheidsgebruik.\n\
             Formuleer een definitie van **{term}** in één enkele zin, zonder toelichting.\n\
             Gebruik een zakelijke en generieke stijl voor het definiëren van dit begrip.{word_class_hint}"
        );

        let mut output = ModuleOutput::new(self.id(), content);
        output.shared_writes.insert("word_class".to_string(), json!(word_class));
        Ok(output)
    }
}

/// Output format: one sentence, character bounds, the ontological marker as
/// first line.
pub struct OutputSpecificationModule;

impl PromptModule for OutputSpecificationModule {
    fn id(&self) -> &str {
        "output_specification"
    }

    fn priority(&self) -> i32 {
        90
    }

    fn execute(&self, _ctx: &ModuleContext) -> BegripResult<ModuleOutput> {
        let content = "### Outputspecificatie:\n\
            - Lever als eerste regel de ontologische marker: 'Ontologische categorie: <soort|exemplaar|proces|resultaat>'\n\
            - Daarna volgt de definitie: precies één zin van 30 tot 350 tekens.\n\
            - Geen opsommingstekens, geen toelichting, geen voorbeelden, geen haakjes.\n\
            - Geen aanhalingstekens rond de definitie."
            .to_string();
        Ok(ModuleOutput::new(self.id(), content))
    }
}

/// Formats the organizational, juridical and statutory context, expanding
/// known abbreviations, and appends provenance snippets, synonyms and prior
/// feedback when present.
pub struct ContextAwarenessModule;

fn format_context_entry(entry: &str) -> String {
    match expand_org_abbreviation(entry) {
        Some(full) => format!("{entry} ({full})"),
        None => entry.to_string(),
    }
}

impl PromptModule for ContextAwarenessModule {
    fn id(&self) -> &str {
        "context_awareness"
    }

    fn priority(&self) -> i32 {
        85
    }

    fn execute(&self, ctx: &ModuleContext) -> BegripResult<ModuleOutput> {
        let context = ctx.context;
        let mut lines = Vec::new();

        if context.has_context() {
            lines.push("### Context:".to_string());
            if !context.organizational_context.is_empty() {
                let formatted: Vec<String> = context
                    .organizational_context
                    .iter()
                    .map(|e| format_context_entry(e))
                    .collect();
                lines.push(format!("- Organisatorische context(en): {}", formatted.join(", ")));
            }
            if !context.juridical_context.is_empty() {
                lines.push(format!(
                    "- Juridische context(en): {}",
                    context.juridical_context.join(", ")
                ));
            }
            if !context.legal_basis.is_empty() {
                lines.push(format!("- Wettelijke basis: {}", context.legal_basis.join(", ")));
            }
        }

        let used_sources: Vec<_> = context.sources.iter().filter(|s| s.used_in_prompt).collect();
        if !used_sources.is_empty() {
            lines.push(String::new());
            lines.push("### Contextinformatie uit bronnen:".to_string());
            for source in used_sources {
                let snippet: String = source.snippet.chars().take(300).collect();
                lines.push(format!("- {}: {}", source.title, snippet));
            }
        }

        if !context.synonyms.is_empty() {
            let terms: Vec<&str> = context.synonyms.iter().map(|s| s.term.as_str()).collect();
            lines.push(String::new());
            lines.push(format!(
                "### Verwante termen (niet letterlijk overnemen): {}",
                terms.join(", ")
            ));
        }

        if !context.feedback.is_empty() {
            lines.push(String::new());
            lines.push("### Eerdere afkeuringen voor dit begrip (vermijd herhaling):".to_string());
            for item in context.feedback.iter().take(5) {
                lines.push(format!("- [{}] {}", item.kind, item.content));
            }
        }

        Ok(ModuleOutput::new(self.id(), lines.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{EnrichedContext, PromptConfig, SharedState};
    use begrip_core::{FeedbackItem, ProvenanceSource};

    fn run(module: &dyn PromptModule, context: &EnrichedContext) -> ModuleOutput {
        let config = PromptConfig::default();
        let shared = SharedState::new();
        module
            .execute(&ModuleContext {
                context,
                config: &config,
                shared_state: &shared,
            })
            .unwrap()
    }

    #[test]
    fn test_expertise_word_class_inference() {
        assert_eq!(infer_word_class("registratie"), "verbal-noun");
        assert_eq!(infer_word_class("oproeping"), "verbal-noun");
        assert_eq!(infer_word_class("aansprakelijkheid"), "abstract-noun");
        assert_eq!(infer_word_class("vonnis"), "other");
    }

    #[test]
    fn test_expertise_writes_shared_state() {
        let context = EnrichedContext::new("oproeping");
        let output = run(&ExpertiseModule, &context);
        assert_eq!(output.shared_writes["word_class"], "verbal-noun");
        assert!(output.content.contains("oproeping"));
    }

    #[test]
    fn test_context_awareness_expands_abbreviations() {
        let mut context = EnrichedContext::new("toezicht");
        context.organizational_context.push("DJI".to_string());
        let output = run(&ContextAwarenessModule, &context);
        assert!(output.content.contains("DJI (Dienst Justitiële Inrichtingen)"));
    }

    #[test]
    fn test_context_awareness_empty_without_context() {
        let context = EnrichedContext::new("toezicht");
        let output = run(&ContextAwarenessModule, &context);
        assert!(output.content.is_empty());
    }

    #[test]
    fn test_context_awareness_renders_sources_and_feedback() {
        let mut context = EnrichedContext::new("toezicht");
        context.sources.push(ProvenanceSource {
            provider: "wetten_overheid".to_string(),
            title: "Penitentiaire beginselenwet".to_string(),
            url: None,
            snippet: "toezicht op de tenuitvoerlegging".to_string(),
            score: 0.9,
            used_in_prompt: true,
            retrieved_at: None,
            doc_id: None,
            source_label: None,
        });
        context.feedback.push(FeedbackItem {
            kind: "starts_with_copula".to_string(),
            content: "definitie begon met 'is een'".to_string(),
        });
        let output = run(&ContextAwarenessModule, &context);
        assert!(output.content.contains("Contextinformatie uit bronnen"));
        assert!(output.content.contains("Eerdere afkeuringen"));
    }

    #[test]
    fn test_output_specification_mentions_marker() {
        let context = EnrichedContext::new("toezicht");
        let output = run(&OutputSpecificationModule, &context);
        assert!(output.content.contains("Ontologische categorie"));
        assert!(output.content.contains("één zin"));
    }
}
