use crate::context::{ModuleContext, ModuleOutput, PromptModule};
use begrip_core::{BegripResult, OntologicalCategory};

const BASE_ESS02_SECTION: &str = "### Betekenislaag (ontologische categorie):\n\
Je moet één van de vier categorieën expliciet maken:\n\
soort (type), exemplaar (specifiek geval), proces (activiteit), resultaat (uitkomst).\n\
Gebruik formuleringen zoals:\n\
- 'activiteit waarbij...'\n\
- 'uitkomst van...'\n\
- 'soort ... die...'\n\
- 'specifiek geval van...'\n\
Ondubbelzinnigheid is vereist.\n\
\n\
Bepaal de juiste categorie op basis van het begrip zelf:\n\
- Eindigt op -ING of -TIE en beschrijft het een handeling? Dan PROCES.\n\
- Is het een gevolg of uitkomst van iets? Dan RESULTAAT (bijv. sanctie, rapport, besluit).\n\
- Is het een classificatie of soort? Dan TYPE.\n\
- Is het een specifiek geval? Dan EXEMPLAAR.";

/// Category-specific guidance, the core of the semantic section. Falls back
/// to generic framing when no category is supplied.
pub struct SemanticCategorisationModule;

fn category_guidance(category: OntologicalCategory) -> &'static str {
    match category {
        OntologicalCategory::Proces => {
            "**PROCES: focus op HANDELING en VERLOOP:**\n\
             Gebruik formuleringen zoals 'activiteit waarbij...', 'proces waarin...', 'handeling van...'.\n\
             Richtlijnen:\n\
             - Beschrijf wie wat doet en hoe het verloopt.\n\
             - Geef aan waar het proces begint en eindigt.\n\
             - Vermeld de actoren die uitvoeren.\n\
             - Focus op de handeling, niet het doel.\n\
             - Gebruik actieve in plaats van passieve bewoordingen.\n\
             Voorbeelden van procesbegrippen:\n\
             - validatie: proces waarbij gecontroleerd wordt of aan vastgestelde criteria is voldaan\n\
             - toezicht: activiteit waarbij handelingen systematisch worden gevolgd\n\
             - sanctionering: het proces van opleggen van maatregelen (niet de sanctie zelf)"
        }
        OntologicalCategory::Type => {
            "**TYPE: focus op CLASSIFICATIE en KENMERKEN:**\n\
             Gebruik formuleringen zoals 'soort...', 'categorie van...', 'vorm van...'.\n\
             Richtlijnen:\n\
             - Geef aan waarin dit type verschilt van andere types.\n\
             - Beschrijf de onderscheidende kenmerken.\n\
             - Focus op wat het is, niet wat het doet.\n\
             - Maak duidelijk tot welke bredere klasse het behoort."
        }
        OntologicalCategory::Resultaat => {
            "**RESULTAAT: focus op OORSPRONG en GEVOLG:**\n\
             Gebruik formuleringen zoals 'resultaat van...', 'uitkomst van...', 'maatregel die volgt op...',\n\
             'besluit genomen door...'.\n\
             Richtlijnen:\n\
             - Beschrijf waar het uit voortkomt (oorsprong).\n\
             - Leg uit wat het betekent of bewerkstelligt (gevolg).\n\
             - Focus op de causale relatie.\n\
             - Vermeld het proces of de handeling die het resultaat oplevert.\n\
             Voorbeelden van resultaatbegrippen:\n\
             - sanctie: maatregel die volgt op normovertreding\n\
             - rapport: document dat het resultaat is van onderzoek\n\
             - besluit: uitkomst van een besluitvormingsproces"
        }
        OntologicalCategory::Exemplaar => {
            "**EXEMPLAAR: focus op SPECIFICITEIT en INDIVIDUALITEIT:**\n\
             Gebruik formuleringen zoals 'specifiek exemplaar van...', 'individueel geval van...',\n\
             'concrete instantie van...'.\n\
             Richtlijnen:\n\
             - Maak duidelijk dat het een concrete instantie betreft.\n\
             - Geef aan van welke algemene klasse dit een specifiek geval is.\n\
             - Beschrijf wat dit exemplaar uniek maakt."
        }
    }
}

impl PromptModule for SemanticCategorisationModule {
    fn id(&self) -> &str {
        "semantic_categorisation"
    }

    fn priority(&self) -> i32 {
        80
    }

    fn execute(&self, ctx: &ModuleContext) -> BegripResult<ModuleOutput> {
        let mut content = BASE_ESS02_SECTION.to_string();

        match ctx.context.ontological_category {
            Some(category) if ctx.config.detailed_category_guidance => {
                content.push_str("\n\n");
                content.push_str(category_guidance(category));
            }
            Some(_) => {}
            None => {
                // No category given: lean on the inferred word class.
                if let Some(word_class) = ctx.shared_state.get("word_class").and_then(|v| v.as_str()) {
                    if word_class == "verbal-noun" {
                        content.push_str(
                            "\n\nHet begrip lijkt een nominalisatie; overweeg de categorie PROCES of RESULTAAT.",
                        );
                    }
                }
            }
        }

        Ok(ModuleOutput::new(self.id(), content))
    }
}

/// Category-specific opening templates with worked examples.
pub struct TemplateModule;

fn templates_for(category: Option<OntologicalCategory>) -> &'static str {
    match category {
        Some(OntologicalCategory::Proces) => {
            "### Openingssjablonen (proces):\n\
             - 'activiteit waarbij ...'\n\
             - 'proces waarin ...'\n\
             Uitgewerkt voorbeeld:\n\
             verhoor: activiteit waarbij een verdachte of getuige door een opsporingsambtenaar wordt ondervraagd over een strafbaar feit"
        }
        Some(OntologicalCategory::Type) => {
            "### Openingssjablonen (type):\n\
             - 'soort <breder begrip> die ...'\n\
             - 'vorm van <breder begrip> waarbij ...'\n\
             Uitgewerkt voorbeeld:\n\
             taakstraf: soort straf die bestaat uit onbetaalde arbeid ten behoeve van de samenleving"
        }
        Some(OntologicalCategory::Resultaat) => {
            "### Openingssjablonen (resultaat):\n\
             - 'maatregel die volgt op ...'\n\
             - 'uitkomst van ...'\n\
             - 'document dat voortkomt uit ...'\n\
             Uitgewerkt voorbeeld:\n\
             vonnis: uitspraak van een rechtbank waarmee een strafzaak of civiele zaak in eerste aanleg wordt beslist"
        }
        Some(OntologicalCategory::Exemplaar) => {
            "### Openingssjablonen (exemplaar):\n\
             - 'specifiek geval van ...'\n\
             - 'concrete instantie van ...'\n\
             Uitgewerkt voorbeeld:\n\
             dossiernummer: uniek kenmerk waarmee één specifiek strafdossier wordt geïdentificeerd"
        }
        None => {
            "### Openingssjablonen:\n\
             - 'activiteit waarbij ...' (proces)\n\
             - 'maatregel die volgt op ...' (resultaat)\n\
             - 'soort ... die ...' (type)\n\
             - 'specifiek geval van ...' (exemplaar)"
        }
    }
}

impl PromptModule for TemplateModule {
    fn id(&self) -> &str {
        "template"
    }

    fn priority(&self) -> i32 {
        75
    }

    fn execute(&self, ctx: &ModuleContext) -> BegripResult<ModuleOutput> {
        Ok(ModuleOutput::new(self.id(), templates_for(ctx.context.ontological_category)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{EnrichedContext, PromptConfig, SharedState};
    use serde_json::json;

    fn run_with(
        module: &dyn PromptModule,
        context: &EnrichedContext,
        shared: &SharedState,
    ) -> ModuleOutput {
        let config = PromptConfig::default();
        module
            .execute(&ModuleContext {
                context,
                config: &config,
                shared_state: shared,
            })
            .unwrap()
    }

    #[test]
    fn test_semantic_guidance_per_category() {
        let mut context = EnrichedContext::new("sanctie");
        context.ontological_category = Some(OntologicalCategory::Resultaat);
        let output = run_with(&SemanticCategorisationModule, &context, &SharedState::new());
        assert!(output.content.contains("RESULTAAT"));
        assert!(output.content.contains("maatregel die volgt op normovertreding"));
    }

    #[test]
    fn test_semantic_generic_without_category() {
        let context = EnrichedContext::new("sanctie");
        let output = run_with(&SemanticCategorisationModule, &context, &SharedState::new());
        assert!(output.content.contains("Betekenislaag"));
        assert!(!output.content.contains("RESULTAAT:"));
    }

    #[test]
    fn test_semantic_reads_word_class_from_shared_state() {
        let context = EnrichedContext::new("registratie");
        let mut shared = SharedState::new();
        shared.insert("word_class".to_string(), json!("verbal-noun"));
        let output = run_with(&SemanticCategorisationModule, &context, &shared);
        assert!(output.content.contains("nominalisatie"));
    }

    #[test]
    fn test_template_follows_category() {
        let mut context = EnrichedContext::new("vonnis");
        context.ontological_category = Some(OntologicalCategory::Resultaat);
        let output = run_with(&TemplateModule, &context, &SharedState::new());
        assert!(output.content.contains("uitkomst van"));

        context.ontological_category = None;
        let output = run_with(&TemplateModule, &context, &SharedState::new());
        assert!(output.content.contains("(proces)"));
    }
}
