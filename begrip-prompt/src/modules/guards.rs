use crate::context::{ModuleContext, ModuleOutput, PromptModule};
use begrip_core::{expand_org_abbreviation, BegripResult};

/// Dutch grammar constraints on the definition sentence.
pub struct GrammarModule;

pub(crate) const GRAMMAR_SECTION: &str = "### Grammaticale eisen:\n\
- Start met een zelfstandig naamwoord of naamwoordgroep.\n\
- Geen koppelwerkwoord aan het begin ('is', 'betekent', 'omvat', 'betreft').\n\
- Geen lidwoord aan het begin ('de', 'het', 'een').\n\
- Gebruik enkelvoud; infinitief bij werkwoorden.\n\
- Eén enkele zin; geen opsommingen of bijzinnenketens.\n\
- Herhaal het begrip niet letterlijk in de definitie.";

impl PromptModule for GrammarModule {
    fn id(&self) -> &str {
        "grammar"
    }

    fn priority(&self) -> i32 {
        70
    }

    fn execute(&self, _ctx: &ModuleContext) -> BegripResult<ModuleOutput> {
        Ok(ModuleOutput::new(self.id(), GRAMMAR_SECTION))
    }
}

/// Positive framing plus a short list of critical pitfalls, extended with a
/// prohibitions block derived from the supplied contexts.
pub struct ErrorPreventionModule;

/// Starters the validator flags as critical; the prompt warns about the full
/// list, the module surfaces only the three most common.
pub const FORBIDDEN_STARTERS: [&str; 20] = [
    "is", "betreft", "omvat", "betekent", "verwijst naar", "houdt in", "heeft betrekking op",
    "duidt op", "staat voor", "impliceert", "definieert", "beschrijft", "wordt", "zijn", "was",
    "waren", "behelst", "bevat", "bestaat uit", "een",
];

impl PromptModule for ErrorPreventionModule {
    fn id(&self) -> &str {
        "error_prevention"
    }

    fn priority(&self) -> i32 {
        65
    }

    fn execute(&self, ctx: &ModuleContext) -> BegripResult<ModuleOutput> {
        let mut lines = vec![
            "### Werkwijze:".to_string(),
            "- Start met het bredere begrip waar dit begrip onder valt.".to_string(),
            "- Definieer vervolgens de verbijzondering ten opzichte van dat bredere begrip.".to_string(),
            "- Structureer de zin als: kern, toespitsing, begrenzing.".to_string(),
            String::new(),
            format!("Verboden startwoorden: {}.", FORBIDDEN_STARTERS.join(", ")),
            String::new(),
            "### Kritieke fouten (maximaal drie, vermijd deze altijd):".to_string(),
            "1. Start nooit met 'is', 'betreft' of een ander koppelwerkwoord.".to_string(),
            "2. Noem de opgegeven context(en) nooit letterlijk in de definitie.".to_string(),
            "3. Gebruik nooit subjectieve woorden zoals 'belangrijk' of 'essentieel'.".to_string(),
        ];

        let context = ctx.context;
        let mut prohibitions = Vec::new();
        for org in &context.organizational_context {
            prohibitions.push(format!(
                "- Gebruik de term '{org}' of een variant daarvan niet letterlijk in de definitie."
            ));
            if let Some(full) = expand_org_abbreviation(org) {
                prohibitions.push(format!(
                    "- Gebruik de term '{full}' of een variant daarvan niet letterlijk in de definitie."
                ));
            }
        }
        for juridical in &context.juridical_context {
            prohibitions.push(format!(
                "- Vermijd expliciete vermelding van '{juridical}' in de definitie."
            ));
        }

        if !prohibitions.is_empty() {
            lines.push(String::new());
            lines.push("### Context-specifieke verboden:".to_string());
            lines.extend(prohibitions);
        }

        Ok(ModuleOutput::new(self.id(), lines.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{EnrichedContext, PromptConfig, SharedState};

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
    fn test_grammar_constraints_present() {
        let output = run(&GrammarModule, &EnrichedContext::new("toezicht"));
        assert!(output.content.contains("zelfstandig naamwoord"));
        assert!(output.content.contains("koppelwerkwoord"));
    }

    #[test]
    fn test_error_prevention_limits_critical_warnings() {
        let output = run(&ErrorPreventionModule, &EnrichedContext::new("toezicht"));
        let numbered = output.content.lines().filter(|l| l.starts_with(['1', '2', '3'])).count();
        assert_eq!(numbered, 3);
    }

    #[test]
    fn test_error_prevention_context_prohibitions() {
        let mut context = EnrichedContext::new("toezicht");
        context.organizational_context.push("DJI".to_string());
        context.juridical_context.push("Strafrecht".to_string());
        let output = run(&ErrorPreventionModule, &context);
        assert!(output.content.contains("'DJI'"));
        assert!(output.content.contains("'Dienst Justitiële Inrichtingen'"));
        assert!(output.content.contains("'Strafrecht'"));
    }
}
