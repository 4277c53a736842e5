use begrip_core::{
    contains_standalone_word, expand_org_abbreviation, Definition, Severity, ValidationContext,
    Violation,
};
use once_cell::sync::Lazy;
use regex::Regex;

/// One independent style-guide check. Rules can be added and retired without
/// schema changes.
pub trait ValidationRule: Send + Sync {
    fn id(&self) -> &str;
    fn validate(&self, definition: &Definition, ctx: &ValidationContext) -> Vec<Violation>;
}

/// Configurable bounds shared by the length-sensitive rules.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_length: 25,
            max_length: 350,
        }
    }
}

const COPULA_STARTERS: [&str; 10] = [
    "is", "zijn", "wordt", "worden", "was", "waren", "betreft", "omvat", "betekent", "behelst",
];

const ARTICLE_STARTERS: [&str; 3] = ["de", "het", "een"];

const FORBIDDEN_STARTER_PHRASES: [&str; 14] = [
    "verwijst naar",
    "houdt in",
    "heeft betrekking op",
    "duidt op",
    "staat voor",
    "impliceert",
    "definieert",
    "beschrijft",
    "bestaat uit",
    "proces waarbij",
    "handeling die",
    "vorm van",
    "methode voor",
    "wijze waarop",
];

/// STR-01: the definition starts with a noun phrase, not a copula, article or
/// other forbidden starter.
pub struct StartsWithNounRule;

impl ValidationRule for StartsWithNounRule {
    fn id(&self) -> &str {
        "STR-01"
    }

    fn validate(&self, definition: &Definition, _ctx: &ValidationContext) -> Vec<Violation> {
        let text = definition.text.trim();
        let lower = text.to_lowercase();
        let first_word = lower.split_whitespace().next().unwrap_or("");

        if COPULA_STARTERS.contains(&first_word) {
            return vec![Violation::new(
                self.id(),
                Severity::Critical,
                format!("definitie start met koppelwerkwoord '{first_word}'"),
            )
            .with_evidence(first_word.to_string())];
        }

        if ARTICLE_STARTERS.contains(&first_word) {
            return vec![Violation::new(
                self.id(),
                Severity::Critical,
                format!("definitie start met lidwoord '{first_word}'"),
            )
            .with_evidence(first_word.to_string())];
        }

        for phrase in FORBIDDEN_STARTER_PHRASES {
            if lower.starts_with(phrase) {
                return vec![Violation::new(
                    self.id(),
                    Severity::Critical,
                    format!("definitie start met verboden formulering '{phrase}'"),
                )
                .with_evidence(phrase.to_string())];
            }
        }

        Vec::new()
    }
}

static SENTENCE_BOUNDARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+\S").unwrap());

/// INT-01: one compact sentence within the configured character bounds.
pub struct SingleSentenceRule {
    config: ValidationConfig,
}

impl SingleSentenceRule {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }
}

impl ValidationRule for SingleSentenceRule {
    fn id(&self) -> &str {
        "INT-01"
    }

    fn validate(&self, definition: &Definition, _ctx: &ValidationContext) -> Vec<Violation> {
        let text = definition.text.trim();
        let mut violations = Vec::new();

        let boundaries = SENTENCE_BOUNDARY_RE.find_iter(text).count();
        if boundaries > 0 {
            violations.push(
                Violation::new(
                    self.id(),
                    Severity::Critical,
                    format!("definitie bestaat uit {} zinnen; één zin is vereist", boundaries + 1),
                ),
            );
        }

        let length = text.chars().count();
        if length < self.config.min_length {
            violations.push(Violation::new(
                self.id(),
                Severity::Medium,
                format!(
                    "definitie is te kort ({length} tekens, minimum {})",
                    self.config.min_length
                ),
            ));
        } else if length > self.config.max_length {
            violations.push(Violation::new(
                self.id(),
                Severity::Medium,
                format!(
                    "definitie is te lang ({length} tekens, maximum {})",
                    self.config.max_length
                ),
            ));
        }

        violations
    }
}

/// SAM-05: the definition may not contain the term itself as a stand-alone
/// word.
pub struct CircularReferenceRule;

impl ValidationRule for CircularReferenceRule {
    fn id(&self) -> &str {
        "SAM-05"
    }

    fn validate(&self, definition: &Definition, _ctx: &ValidationContext) -> Vec<Violation> {
        let term = definition.term.trim();
        if term.is_empty() {
            return Vec::new();
        }

        if contains_standalone_word(&definition.text, term) {
            return vec![Violation::new(
                self.id(),
                Severity::Critical,
                format!("definitie bevat het begrip '{term}' zelf (cirkeldefinitie)"),
            )
            .with_evidence(term.to_string())];
        }

        Vec::new()
    }
}

/// CON-01: the supplied context strings, including expanded organizational
/// abbreviations, may not appear verbatim in the definition.
pub struct ContextLeakageRule;

impl ValidationRule for ContextLeakageRule {
    fn id(&self) -> &str {
        "CON-01"
    }

    fn validate(&self, definition: &Definition, _ctx: &ValidationContext) -> Vec<Violation> {
        let mut candidates: Vec<String> = Vec::new();
        for org in &definition.organizational_context {
            candidates.push(org.clone());
            if let Some(full) = expand_org_abbreviation(org) {
                candidates.push(full.to_string());
            }
        }
        candidates.extend(definition.juridical_context.iter().cloned());
        candidates.extend(definition.legal_basis.iter().cloned());

        let mut violations = Vec::new();
        for candidate in candidates {
            if candidate.trim().is_empty() {
                continue;
            }
            if contains_standalone_word(&definition.text, &candidate) {
                violations.push(
                    Violation::new(
                        self.id(),
                        Severity::Critical,
                        format!("context '{candidate}' wordt letterlijk genoemd in de definitie"),
                    )
                    .with_evidence(candidate),
                );
            }
        }

        violations
    }
}

/// ARAI-02: the ontological marker must have been present in the raw output;
/// cleaning persists it into metadata.
pub struct OntologicalMarkerRule;

impl ValidationRule for OntologicalMarkerRule {
    fn id(&self) -> &str {
        "ARAI-02"
    }

    fn validate(&self, definition: &Definition, _ctx: &ValidationContext) -> Vec<Violation> {
        let marker = definition
            .metadata
            .get("ontologische_categorie_marker")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        if marker.is_empty() {
            return vec![Violation::new(
                self.id(),
                Severity::High,
                "ontologische marker ontbreekt in de modeloutput",
            )];
        }
        Vec::new()
    }
}

const SUBJECTIVE_STEMS: [&str; 5] = ["belangrijk", "essenti", "adequa", "cruciaal", "wezenlijk"];

/// STR-08: no subjective qualifiers.
pub struct SubjectiveWordsRule;

impl ValidationRule for SubjectiveWordsRule {
    fn id(&self) -> &str {
        "STR-08"
    }

    fn validate(&self, definition: &Definition, _ctx: &ValidationContext) -> Vec<Violation> {
        let lower = definition.text.to_lowercase();
        SUBJECTIVE_STEMS
            .iter()
            .filter(|stem| lower.contains(*stem))
            .map(|stem| {
                Violation::new(
                    self.id(),
                    Severity::High,
                    format!("definitie bevat subjectieve kwalificatie ('{stem}…')"),
                )
                .with_evidence((*stem).to_string())
            })
            .collect()
    }
}

const EXPLANATION_SIGNALS: [&str; 4] = ["bijvoorbeeld", "dit houdt in", "met andere woorden", "zoals bij"];

/// INT-06: no explanatory asides inside the definition.
pub struct ExplanationSignalRule;

impl ValidationRule for ExplanationSignalRule {
    fn id(&self) -> &str {
        "INT-06"
    }

    fn validate(&self, definition: &Definition, _ctx: &ValidationContext) -> Vec<Violation> {
        let lower = definition.text.to_lowercase();
        EXPLANATION_SIGNALS
            .iter()
            .filter(|signal| lower.contains(*signal))
            .map(|signal| {
                Violation::new(
                    self.id(),
                    Severity::Medium,
                    format!("definitie bevat toelichtingssignaal '{signal}'"),
                )
                .with_evidence((*signal).to_string())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use begrip_core::Definition;
    use uuid::Uuid;

    fn ctx() -> ValidationContext {
        ValidationContext::new(Uuid::new_v4())
    }

    fn definition(text: &str) -> Definition {
        Definition::new("vervoersverbod", text, "tester")
    }

    #[test]
    fn test_starts_with_copula_is_critical() {
        let violations = StartsWithNounRule.validate(
            &definition("Is een maatregel die recidive voorkomt."),
            &ctx(),
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Critical);
        assert_eq!(violations[0].rule_id, "STR-01");
    }

    #[test]
    fn test_starts_with_article_is_critical() {
        let violations =
            StartsWithNounRule.validate(&definition("De maatregel die recidive voorkomt."), &ctx());
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_noun_start_passes() {
        let violations = StartsWithNounRule.validate(
            &definition("Maatregel die volgt op een strafrechtelijke veroordeling."),
            &ctx(),
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_multiple_sentences_flagged() {
        let rule = SingleSentenceRule::new(ValidationConfig::default());
        let violations = rule.validate(
            &definition("Maatregel die recidive voorkomt. Deze maatregel is streng."),
            &ctx(),
        );
        assert!(violations.iter().any(|v| v.severity == Severity::Critical));
    }

    #[test]
    fn test_length_bounds() {
        let rule = SingleSentenceRule::new(ValidationConfig::default());
        let short = rule.validate(&definition("Korte tekst."), &ctx());
        assert!(short.iter().any(|v| v.message.contains("te kort")));

        let long_text = format!("Maatregel die {}.", "zeer ".repeat(100));
        let long = rule.validate(&definition(&long_text), &ctx());
        assert!(long.iter().any(|v| v.message.contains("te lang")));
    }

    #[test]
    fn test_circular_reference() {
        let violations = CircularReferenceRule.validate(
            &definition("Maatregel waarbij een vervoersverbod wordt opgelegd."),
            &ctx(),
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Critical);

        // A compound containing the term is not a stand-alone mention.
        let compound = CircularReferenceRule.validate(
            &definition("Maatregel die vervoersverbodsregistratie ondersteunt."),
            &ctx(),
        );
        assert!(compound.is_empty());
    }

    #[test]
    fn test_context_leakage_with_abbreviation_expansion() {
        let mut def = definition("Toezicht uitgevoerd door de Dienst Justitiële Inrichtingen.");
        def.organizational_context.push("DJI".to_string());
        let violations = ContextLeakageRule.validate(&def, &ctx());
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("Dienst Justitiële Inrichtingen"));
    }

    #[test]
    fn test_context_leakage_ignores_derived_words() {
        let mut def = definition("Maatregel die volgt op een strafrechtelijke veroordeling.");
        def.juridical_context.push("Strafrecht".to_string());
        let violations = ContextLeakageRule.validate(&def, &ctx());
        assert!(violations.is_empty());
    }

    #[test]
    fn test_ontological_marker_rule() {
        let mut def = definition("Maatregel die volgt op een veroordeling.");
        let missing = OntologicalMarkerRule.validate(&def, &ctx());
        assert_eq!(missing.len(), 1);

        def.metadata.insert(
            "ontologische_categorie_marker".to_string(),
            serde_json::json!("resultaat"),
        );
        assert!(OntologicalMarkerRule.validate(&def, &ctx()).is_empty());
    }

    #[test]
    fn test_subjective_words() {
        let violations = SubjectiveWordsRule.validate(
            &definition("Belangrijke maatregel die recidive voorkomt."),
            &ctx(),
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::High);
    }

    #[test]
    fn test_explanation_signals() {
        let violations = ExplanationSignalRule.validate(
            &definition("Maatregel die recidive voorkomt, bijvoorbeeld een gebiedsverbod."),
            &ctx(),
        );
        assert_eq!(violations.len(), 1);
    }
}
