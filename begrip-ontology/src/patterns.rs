use crate::category::UfoCategory;
use crate::lexicon::{LegalDomain, LegalLexicon};
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

/// Regex + keyword evidence for one category.
#[derive(Debug)]
pub struct CategoryPatterns {
    pub patterns: Vec<Regex>,
    pub keywords: &'static [&'static str],
    pub weight: f64,
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("invalid pattern {p}: {e}")))
        .collect()
}

/// Pattern matching over all sixteen UFO categories. No early exit: the
/// matcher always scans every category so the dominance test sees the full
/// evidence.
#[derive(Debug)]
pub struct PatternMatcher {
    lexicon: LegalLexicon,
    patterns: HashMap<UfoCategory, CategoryPatterns>,
    disambiguation: HashMap<&'static str, Vec<(Regex, UfoCategory, bool)>>,
}

impl PatternMatcher {
    pub fn new() -> Self {
        Self {
            lexicon: LegalLexicon::new(),
            patterns: Self::initialize_patterns(),
            disambiguation: Self::initialize_disambiguation(),
        }
    }

    pub fn lexicon(&self) -> &LegalLexicon {
        &self.lexicon
    }

    fn initialize_patterns() -> HashMap<UfoCategory, CategoryPatterns> {
        let mut patterns = HashMap::new();

        patterns.insert(
            UfoCategory::Kind,
            CategoryPatterns {
                patterns: compile(&[
                    r"\b(?:een|de|het)\s+\w+\s+(?:is|zijn|betreft)",
                    r"(?:natuurlijk|rechts)persoon",
                    r"(?:organisatie|instantie|orgaan|lichaam)",
                    r"(?:zaak|goed|object|voorwerp)\b",
                    r"(?:document|akte|stuk|dossier)\b",
                    r"(?:gebouw|pand|onroerend goed|perceel)\b",
                    r"(?:voertuig|auto|schip|vliegtuig)\b",
                ]),
                keywords: &[
                    "persoon", "mens", "individu", "organisatie", "bedrijf", "instelling", "zaak",
                    "ding", "object", "entiteit", "document", "gebouw", "voertuig", "systeem",
                    "apparaat",
                ],
                weight: 1.0,
            },
        );

        patterns.insert(
            UfoCategory::Event,
            CategoryPatterns {
                patterns: compile(&[
                    r"(?:tijdens|gedurende|na afloop van|voorafgaand aan)",
                    r"(?:proces|procedure|handeling|gebeurtenis)\b",
                    r"\b\w+(?:ing|atie|itie)\b",
                    r"(?:aanvang|begin|einde|afloop|verloop)",
                    r"(?:uitvoer|voltrek|verricht|plaats\s?vind)",
                    r"(?:start|stop|duur|periode|termijn)",
                ]),
                keywords: &[
                    "arrestatie", "aanhouding", "zitting", "procedure", "proces", "behandeling",
                    "onderzoek", "verhoor", "uitspraak", "vonnis", "gebeurtenis", "handeling",
                    "actie", "operatie", "transactie",
                ],
                weight: 0.9,
            },
        );

        patterns.insert(
            UfoCategory::Role,
            CategoryPatterns {
                patterns: compile(&[
                    r"(?:in de hoedanigheid van|in de rol van|als)\s+\w+",
                    r"(?:optreedt?|handel\w+|fungeer\w+)\s+als",
                    r"(?:verdachte|beklaagde|getuige|aangever)\b",
                    r"(?:koper|verkoper|huurder|verhuurder)\b",
                    r"(?:werkgever|werknemer|opdrachtgever|opdrachtnemer)\b",
                ]),
                keywords: &[
                    "verdachte", "dader", "slachtoffer", "getuige", "rechter", "officier",
                    "advocaat", "notaris", "deurwaarder", "curator", "eigenaar", "gebruiker",
                    "bewoner", "bestuurder", "aandeelhouder",
                ],
                weight: 0.8,
            },
        );

        patterns.insert(
            UfoCategory::Phase,
            CategoryPatterns {
                patterns: compile(&[
                    r"(?:in\s+)?(?:onderzoek|behandeling|beraad)",
                    r"(?:voorlopig|definitief|concept|ontwerp)",
                    r"(?:actief|inactief|gesloten|gearchiveerd)",
                    r"(?:lopend|afgerond|gestart|beëindigd)",
                    r"(?:status|staat|toestand|fase|stadium)",
                ]),
                keywords: &[
                    "onderzoek", "voorlopig", "definitief", "concept", "ontwerp", "actief",
                    "inactief", "lopend", "afgerond", "gesloten", "nieuw", "huidig", "voormalig",
                    "toekomstig",
                ],
                weight: 0.7,
            },
        );

        patterns.insert(
            UfoCategory::Relator,
            CategoryPatterns {
                patterns: compile(&[
                    r"(?:overeenkomst|contract|verbintenis|afspraak)",
                    r"(?:huwelijk|partnerschap|relatie|verhouding)",
                    r"(?:vergunning|machtiging|mandaat|volmacht)",
                    r"(?:tussen|jegens|tegenover)\s+\w+",
                    r"(?:partijen|contractanten|partners)",
                ]),
                keywords: &[
                    "overeenkomst", "contract", "huwelijk", "verbintenis", "relatie", "vergunning",
                    "mandaat", "volmacht", "licentie", "concessie", "dagvaarding", "beschikking",
                    "vonnis", "arrest", "uitspraak",
                ],
                weight: 0.8,
            },
        );

        patterns.insert(
            UfoCategory::Mode,
            CategoryPatterns {
                patterns: compile(&[
                    r"(?:eigenschap|kenmerk|attribuut|karakteristiek)",
                    r"(?:toestand|conditie|gesteldheid)",
                    r"(?:behorend bij|eigen aan)\s+\w+",
                    r"(?:gezondheid|locatie|positie|status)",
                    r"(?:kleur|grootte|vorm|gewicht)",
                ]),
                keywords: &[
                    "gezondheid", "locatie", "adres", "woonplaats", "nationaliteit",
                    "gemoedstoestand", "geestestoestand", "vermogen", "inkomen", "bezit",
                    "eigenschap", "kwaliteit",
                ],
                weight: 0.6,
            },
        );

        patterns.insert(
            UfoCategory::Quantity,
            CategoryPatterns {
                patterns: compile(&[
                    r"\d+\s*(?:euro|EUR|€|\$|dollar)",
                    r"\d+\s*(?:%|procent|percent)",
                    r"\d+\s*(?:meter|km|cm|mm|m²|m³)",
                    r"\d+\s*(?:kilo|gram|kg|g|ton)",
                    r"\d+\s*(?:liter|ml|cl|dl)",
                    r"(?:aantal|hoeveelheid|bedrag|som|totaal)",
                ]),
                keywords: &[
                    "bedrag", "aantal", "hoeveelheid", "percentage", "tarief", "prijs", "kosten",
                    "omzet", "winst", "verlies", "afstand", "oppervlakte", "inhoud", "gewicht",
                    "duur",
                ],
                weight: 0.7,
            },
        );

        patterns.insert(
            UfoCategory::Quality,
            CategoryPatterns {
                patterns: compile(&[
                    r"(?:kwaliteit|hoedanigheid|graad|niveau)",
                    r"(?:ernstig|eenvoudig|complex|simpel)",
                    r"(?:betrouwbaar|onbetrouwbaar|waarschijnlijk)",
                    r"(?:mate van|graad van|niveau van)",
                ]),
                keywords: &[
                    "ernst", "zwaarte", "kwaliteit", "betrouwbaarheid", "waarschijnlijkheid",
                    "complexiteit", "urgentie", "prioriteit", "relevantie", "geschiktheid",
                ],
                weight: 0.6,
            },
        );

        patterns.insert(
            UfoCategory::Subkind,
            CategoryPatterns {
                patterns: compile(&[
                    r"(?:soort|type|variant|vorm)\s+van",
                    r"(?:specifieke|bijzondere|speciale)\s+\w+",
                    r"is een\s+\w+\s+die",
                ]),
                keywords: &[
                    "subtype", "subcategorie", "deelgroep", "variant", "vorm", "soort", "type",
                    "klasse",
                ],
                weight: 0.5,
            },
        );

        patterns.insert(
            UfoCategory::Category,
            CategoryPatterns {
                patterns: compile(&[
                    r"(?:categorie|klasse|groep|verzameling)",
                    r"(?:alle|elke|iedere)\s+\w+",
                    r"(?:behoort tot|valt onder|deel van)",
                ]),
                keywords: &[
                    "categorie", "klasse", "verzameling", "collectie", "classificatie", "indeling",
                    "rubricering",
                ],
                weight: 0.5,
            },
        );

        patterns.insert(
            UfoCategory::Mixin,
            CategoryPatterns {
                patterns: compile(&[
                    r"(?:gemeenschappelijk|gedeeld|gezamenlijk)",
                    r"(?:kenmerk|eigenschap)\s+van\s+(?:verschillende|meerdere)",
                    r"(?:onafhankelijk van|los van)\s+\w+",
                ]),
                keywords: &[
                    "gemeenschappelijk", "gedeeld", "gezamenlijk", "collectief", "algemeen",
                    "universeel", "generiek", "abstract",
                ],
                weight: 0.4,
            },
        );

        patterns.insert(
            UfoCategory::RoleMixin,
            CategoryPatterns {
                patterns: compile(&[
                    r"rol-gerelateerd\w*",
                    r"(?:verschillende rollen|meerdere functies)",
                    r"(?:ongeacht|los van)\s+(?:rol|functie)",
                ]),
                keywords: &["rolpatroon", "functiepatroon", "gedragspatroon", "rolmodel"],
                weight: 0.4,
            },
        );

        patterns.insert(
            UfoCategory::PhaseMixin,
            CategoryPatterns {
                patterns: compile(&[
                    r"fase-gerelateerd\w*",
                    r"(?:verschillende fasen|meerdere stadia)",
                    r"(?:gedurende|tijdens)\s+(?:verschillende|alle)\s+fasen",
                ]),
                keywords: &["fasepatroon", "stadiumpatroon", "levenscycluspatroon"],
                weight: 0.4,
            },
        );

        patterns.insert(
            UfoCategory::Collective,
            CategoryPatterns {
                patterns: compile(&[
                    r"(?:groep|collectie|verzameling|set)\s+van",
                    r"(?:team|ploeg|commissie|raad|college)",
                    r"(?:samen|gezamenlijk|collectief)",
                    r"(?:leden|deelnemers|participanten)",
                ]),
                keywords: &[
                    "groep", "team", "commissie", "raad", "college", "vereniging", "collectief",
                    "gemeenschap", "consortium", "coalitie", "federatie",
                ],
                weight: 0.6,
            },
        );

        patterns.insert(
            UfoCategory::VariableCollection,
            CategoryPatterns {
                patterns: compile(&[
                    r"(?:wisselend|variabel|veranderlijk)\s+aantal",
                    r"(?:groeiende|krimpende|fluctuerende)\s+groep",
                    r"(?:dynamische|flexibele)\s+verzameling",
                ]),
                keywords: &["dynamisch", "variabel", "flexibel", "wisselend", "veranderlijk"],
                weight: 0.5,
            },
        );

        patterns.insert(
            UfoCategory::FixedCollection,
            CategoryPatterns {
                patterns: compile(&[
                    r"(?:vast|bepaald|gefixeerd)\s+aantal",
                    r"(?:onveranderlijke|statische)\s+groep",
                    r"(?:vaste|permanente)\s+samenstelling",
                ]),
                keywords: &["vast", "bepaald", "gefixeerd", "statisch", "permanent", "onveranderlijk"],
                weight: 0.5,
            },
        );

        patterns
    }

    /// Per-term disambiguation pairs. The bool marks entries the source
    /// material targeted at an undefined category; these coerce to Mode and
    /// carry an extra note.
    fn initialize_disambiguation() -> HashMap<&'static str, Vec<(Regex, UfoCategory, bool)>> {
        let mut rules: HashMap<&'static str, Vec<(Regex, UfoCategory, bool)>> = HashMap::new();

        let rule = |p: &str, c: UfoCategory| (Regex::new(p).unwrap(), c, false);

        rules.insert(
            "zaak",
            vec![
                rule(r"(?:rechts|straf|civiele)\s*zaak", UfoCategory::Event),
                rule(r"zaak\s+(?:voor|bij)\s+de\s+rechter", UfoCategory::Event),
                rule(r"(?:roerende|onroerende)\s+zaak", UfoCategory::Kind),
                rule(r"zaak\s+(?:als|zoals)\s+(?:auto|gebouw|voorwerp)", UfoCategory::Kind),
                (
                    Regex::new(r"de\s+zaak\s+van\s+(?:de\s+)?(?:verdachte|eisende partij)").unwrap(),
                    UfoCategory::Mode,
                    true,
                ),
            ],
        );

        rules.insert(
            "huwelijk",
            vec![
                rule(
                    r"(?:sluiten|voltrekken|aangaan)\s+(?:van\s+)?(?:een\s+)?huwelijk",
                    UfoCategory::Event,
                ),
                rule(r"huwelijks(?:voltrekking|sluiting|ceremonie)", UfoCategory::Event),
                rule(r"(?:staat|band|verbintenis)\s+van\s+het\s+huwelijk", UfoCategory::Relator),
                rule(r"huwelijk\s+tussen", UfoCategory::Relator),
                rule(r"gehuwd\s+(?:zijn|paar|stel)", UfoCategory::Relator),
            ],
        );

        rules.insert(
            "overeenkomst",
            vec![
                rule(
                    r"(?:sluiten|aangaan|tekenen)\s+(?:van\s+)?(?:een\s+)?overeenkomst",
                    UfoCategory::Event,
                ),
                rule(r"overeenkomst\s+(?:komt\s+)?tot\s+stand", UfoCategory::Event),
                rule(r"(?:koop|huur|arbeids)overeenkomst", UfoCategory::Relator),
                rule(r"overeenkomst\s+tussen\s+partijen", UfoCategory::Relator),
                rule(r"document\s+van\s+de\s+overeenkomst", UfoCategory::Kind),
            ],
        );

        rules.insert(
            "procedure",
            vec![
                rule(r"(?:start|begin|aanvang)\s+(?:van\s+)?(?:de\s+)?procedure", UfoCategory::Event),
                rule(r"procedure\s+(?:duurt|neemt|vergt)", UfoCategory::Event),
                rule(r"(?:bezwaar|beroeps|klacht)procedure", UfoCategory::Event),
                rule(r"volgens\s+de\s+procedure", UfoCategory::Kind),
                rule(r"procedurele\s+(?:regel|voorschrift)", UfoCategory::Kind),
            ],
        );

        rules.insert(
            "vergunning",
            vec![
                rule(
                    r"(?:aanvragen|verlenen|verstrekken)\s+(?:van\s+)?(?:een\s+)?vergunning",
                    UfoCategory::Event,
                ),
                rule(r"vergunning(?:verlening|aanvraag)", UfoCategory::Event),
                rule(r"(?:bouw|milieu|omgevings)vergunning", UfoCategory::Relator),
                rule(r"vergunning\s+voor", UfoCategory::Relator),
                rule(r"document\s+van\s+de\s+vergunning", UfoCategory::Kind),
            ],
        );

        rules.insert(
            "besluit",
            vec![
                rule(r"(?:nemen|maken)\s+(?:van\s+)?(?:een\s+)?besluit", UfoCategory::Event),
                rule(r"besluitvorming(?:sproces)?", UfoCategory::Event),
                rule(r"(?:bestuurs|rechterlijk)\s+besluit", UfoCategory::Relator),
                rule(
                    r"besluit\s+(?:van|door)\s+(?:het\s+)?(?:bestuur|rechter)",
                    UfoCategory::Relator,
                ),
                rule(r"schriftelijk\s+besluit", UfoCategory::Kind),
            ],
        );

        rules
    }

    /// Collect every pattern and keyword match per category. Always scans the
    /// complete table.
    pub fn find_all_matches(&self, text: &str) -> HashMap<UfoCategory, Vec<String>> {
        let text_lower = text.to_lowercase();
        let mut matches: HashMap<UfoCategory, Vec<String>> = HashMap::new();

        for (category, config) in &self.patterns {
            let mut category_matches = Vec::new();

            for pattern in &config.patterns {
                if pattern.is_match(&text_lower) {
                    category_matches.push(format!("Pattern: {}", pattern.as_str()));
                }
            }

            for keyword in config.keywords {
                if text_lower.contains(keyword) {
                    category_matches.push(format!("Keyword: {keyword}"));
                }
            }

            if !category_matches.is_empty() {
                matches.insert(*category, category_matches);
            }
        }

        matches
    }

    /// Lexicon hits per domain, as explanation evidence.
    pub fn find_legal_matches(&self, text: &str) -> HashMap<LegalDomain, Vec<&'static str>> {
        self.lexicon.find_matching_terms(text)
    }

    /// Context-aware disambiguation for ambiguous terms. Returns the category
    /// plus a human-readable explanation when a rule fires.
    pub fn apply_disambiguation(&self, term: &str, definition: &str) -> Option<(UfoCategory, String)> {
        let term_lower = term.trim().to_lowercase();
        let definition_lower = definition.to_lowercase();

        let rules = self.disambiguation.get(term_lower.as_str())?;
        for (pattern, category, coerced) in rules {
            if pattern.is_match(&definition_lower) {
                let mut explanation = format!(
                    "Term '{term}' gedisambigueerd naar {category} op basis van context: '{}'",
                    pattern.as_str()
                );
                if *coerced {
                    explanation.push_str(
                        " (doelcategorie in bronmateriaal ongedefinieerd; herleid naar Mode)",
                    );
                }
                debug!(term, category = %category, "disambiguatieregel toegepast");
                return Some((*category, explanation));
            }
        }

        None
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_all_matches_event_nominalization() {
        let matcher = PatternMatcher::new();
        let matches = matcher.find_all_matches("aanhouding van een persoon door de politie");
        assert!(matches.contains_key(&UfoCategory::Event));
        let event = &matches[&UfoCategory::Event];
        assert!(event.iter().any(|m| m.starts_with("Pattern:")));
    }

    #[test]
    fn test_find_all_matches_scans_every_category() {
        let matcher = PatternMatcher::new();
        let matches = matcher.find_all_matches(
            "vast aantal leden van de commissie, een groep van personen met een contract",
        );
        assert!(matches.contains_key(&UfoCategory::FixedCollection));
        assert!(matches.contains_key(&UfoCategory::Collective));
        assert!(matches.contains_key(&UfoCategory::Relator));
    }

    #[test]
    fn test_disambiguation_huwelijk_relator() {
        let matcher = PatternMatcher::new();
        let (category, explanation) = matcher
            .apply_disambiguation("huwelijk", "staat van de huwelijk tussen twee personen")
            .unwrap();
        assert_eq!(category, UfoCategory::Relator);
        assert!(explanation.contains("huwelijk"));
    }

    #[test]
    fn test_disambiguation_besluit_event() {
        let matcher = PatternMatcher::new();
        let (category, _) = matcher
            .apply_disambiguation("besluit", "het nemen van een besluit door het college")
            .unwrap();
        assert_eq!(category, UfoCategory::Event);
    }

    #[test]
    fn test_disambiguation_zaak_coercion_note() {
        let matcher = PatternMatcher::new();
        let (category, explanation) = matcher
            .apply_disambiguation("zaak", "de zaak van de verdachte wordt behandeld")
            .unwrap();
        assert_eq!(category, UfoCategory::Mode);
        assert!(explanation.contains("herleid naar Mode"));
    }

    #[test]
    fn test_disambiguation_unknown_term() {
        let matcher = PatternMatcher::new();
        assert!(matcher.apply_disambiguation("fiets", "tweewielig voertuig").is_none());
    }
}
