use crate::category::UfoCategory;
use crate::lexicon::LegalDomain;
use crate::patterns::PatternMatcher;
use begrip_core::{BegripError, BegripResult};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info, warn};

const CLASSIFIER_VERSION: &str = "1.0.0";

/// Full classification outcome, including the complete decision trail for
/// juridical accountability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UfoClassificationResult {
    pub term: String,
    pub definition: String,
    pub primary_category: UfoCategory,
    pub secondary_categories: Vec<UfoCategory>,
    pub confidence: f64,
    pub all_scores: HashMap<UfoCategory, f64>,
    pub matched_patterns: Vec<String>,
    pub decision_path: Vec<String>,
    pub disambiguation_notes: Vec<String>,
    pub detailed_explanation: Vec<String>,
    pub classification_time_ms: f64,
    pub classifier_version: String,
    pub timestamp: DateTime<Utc>,
}

static NOMINALIZATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w+(?:ing|atie)\b").unwrap());
static MONEY_OR_PERCENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\s*(?:euro|EUR|€|%)").unwrap());

/// Classifies Dutch legal terms into the sixteen UFO/OntoUML categories.
/// The nine decision steps run exhaustively; correctness dominates speed in
/// this single-user tool.
#[derive(Debug, Default)]
pub struct UfoClassifier {
    matcher: PatternMatcher,
}

impl UfoClassifier {
    pub fn new() -> Self {
        let classifier = Self {
            matcher: PatternMatcher::new(),
        };
        info!(
            version = CLASSIFIER_VERSION,
            terms = classifier.matcher.lexicon().all_terms().len(),
            "UfoClassifier geïnitialiseerd"
        );
        classifier
    }

    pub fn classify(&self, term: &str, definition: &str) -> BegripResult<UfoClassificationResult> {
        self.classify_with_domain(term, definition, None)
    }

    pub fn classify_with_domain(
        &self,
        term: &str,
        definition: &str,
        domain: Option<LegalDomain>,
    ) -> BegripResult<UfoClassificationResult> {
        let start = Instant::now();

        if term.trim().is_empty() || definition.trim().is_empty() {
            return Err(BegripError::ValidationError {
                field: "term/definition".to_string(),
                message: "term en definitie zijn verplicht".to_string(),
            });
        }

        debug!(term, "start classificatie");

        let text = format!("{term}. {definition}");
        let all_matches = self.matcher.find_all_matches(&text);

        let mut matched_patterns: Vec<String> = Vec::new();
        for patterns in all_matches.values() {
            matched_patterns.extend(patterns.iter().cloned());
        }

        let mut decision_path = Vec::new();
        let mut primary_category =
            self.apply_nine_step_logic(&text.to_lowercase(), &all_matches, &mut decision_path);

        let mut disambiguation_notes = Vec::new();
        let disambiguation = self.matcher.apply_disambiguation(term, definition);
        if let Some((disambiguated, explanation)) = &disambiguation {
            disambiguation_notes.push(explanation.clone());
            if *disambiguated != primary_category {
                disambiguation_notes.push(format!(
                    "Oorspronkelijke classificatie: {primary_category}, na disambiguatie: {disambiguated}"
                ));
            }
            primary_category = *disambiguated;
        }

        let all_scores = self.calculate_all_scores(&all_matches, definition, domain);
        let confidence =
            self.calculate_confidence(primary_category, &all_scores, matched_patterns.len());
        let secondary_categories = self.identify_secondary_categories(&all_scores, primary_category);

        let classification_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        let mut result = UfoClassificationResult {
            term: term.to_string(),
            definition: definition.to_string(),
            primary_category,
            secondary_categories,
            confidence,
            all_scores,
            matched_patterns,
            decision_path,
            disambiguation_notes,
            detailed_explanation: Vec::new(),
            classification_time_ms,
            classifier_version: CLASSIFIER_VERSION.to_string(),
            timestamp: Utc::now(),
        };
        result.detailed_explanation = self.generate_detailed_explanation(&result, &all_matches);

        info!(
            term,
            category = %result.primary_category,
            confidence = result.confidence,
            "classificatie compleet"
        );

        Ok(result)
    }

    /// Classify many pairs; a failing item yields a zero-confidence Kind
    /// result carrying the error text instead of aborting the batch.
    pub fn classify_batch(&self, pairs: &[(String, String)]) -> Vec<UfoClassificationResult> {
        let total = pairs.len();
        info!(total, "start batch classificatie");

        let mut results = Vec::with_capacity(total);
        for (term, definition) in pairs {
            match self.classify(term, definition) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(term = %term, error = %e, "classificatie van batch-item mislukt");
                    results.push(UfoClassificationResult {
                        term: term.clone(),
                        definition: definition.clone(),
                        primary_category: UfoCategory::Kind,
                        secondary_categories: Vec::new(),
                        confidence: 0.0,
                        all_scores: HashMap::new(),
                        matched_patterns: Vec::new(),
                        decision_path: Vec::new(),
                        disambiguation_notes: Vec::new(),
                        detailed_explanation: vec![format!("FOUT: {e}")],
                        classification_time_ms: 0.0,
                        classifier_version: CLASSIFIER_VERSION.to_string(),
                        timestamp: Utc::now(),
                    });
                }
            }
        }

        results
    }

    /// The complete nine-step decision procedure. Every step that runs leaves
    /// one entry in `decision_path`.
    fn apply_nine_step_logic(
        &self,
        text: &str,
        matches: &HashMap<UfoCategory, Vec<String>>,
        decision_path: &mut Vec<String>,
    ) -> UfoCategory {
        decision_path.push("Stap 1: check voor zelfstandige entiteit (Kind)".to_string());
        if self.is_independent_entity(text, matches) {
            decision_path.push("-> gedetecteerd als zelfstandige entiteit".to_string());
            if !self.has_dominant_alternative(matches, UfoCategory::Kind) {
                return UfoCategory::Kind;
            }
        }

        decision_path.push("Stap 2: check voor tijdsgebonden gebeurtenis (Event)".to_string());
        if self.is_temporal_event(text, matches) {
            decision_path.push("-> gedetecteerd als temporele gebeurtenis".to_string());
            if !self.has_dominant_alternative(matches, UfoCategory::Event) {
                return UfoCategory::Event;
            }
        }

        decision_path.push("Stap 3: check voor contextuele rol (Role)".to_string());
        if self.is_contextual_role(text, matches) {
            decision_path.push("-> gedetecteerd als rol".to_string());
            if !self.has_dominant_alternative(matches, UfoCategory::Role) {
                return UfoCategory::Role;
            }
        }

        decision_path.push("Stap 4: check voor levensfase (Phase)".to_string());
        if self.is_life_phase(text, matches) {
            decision_path.push("-> gedetecteerd als fase".to_string());
            if !self.has_dominant_alternative(matches, UfoCategory::Phase) {
                return UfoCategory::Phase;
            }
        }

        decision_path.push("Stap 5: check voor mediërende relatie (Relator)".to_string());
        if self.mediates_relationship(text, matches) {
            decision_path.push("-> gedetecteerd als relator".to_string());
            if !self.has_dominant_alternative(matches, UfoCategory::Relator) {
                return UfoCategory::Relator;
            }
        }

        decision_path.push("Stap 6: check voor intrinsieke eigenschap (Mode)".to_string());
        if self.is_intrinsic_mode(text, matches) {
            decision_path.push("-> gedetecteerd als mode".to_string());
            if !self.has_dominant_alternative(matches, UfoCategory::Mode) {
                return UfoCategory::Mode;
            }
        }

        decision_path.push("Stap 7: check voor meetbare grootheid (Quantity)".to_string());
        if self.is_measurable_quantity(text, matches) {
            decision_path.push("-> gedetecteerd als quantity".to_string());
            if !self.has_dominant_alternative(matches, UfoCategory::Quantity) {
                return UfoCategory::Quantity;
            }
        }

        decision_path.push("Stap 8: check voor kwalitatieve eigenschap (Quality)".to_string());
        if self.is_qualitative_property(text, matches) {
            decision_path.push("-> gedetecteerd als quality".to_string());
            if !self.has_dominant_alternative(matches, UfoCategory::Quality) {
                return UfoCategory::Quality;
            }
        }

        decision_path.push("Stap 9: check voor subcategorieën".to_string());
        if let Some(subcategory) = self.refine_with_subcategories(text) {
            decision_path.push(format!("-> gedetecteerd als {subcategory}"));
            return subcategory;
        }

        decision_path.push("Geen specifieke categorie gedetecteerd, fallback naar Kind".to_string());
        UfoCategory::Kind
    }

    fn is_independent_entity(&self, text: &str, matches: &HashMap<UfoCategory, Vec<String>>) -> bool {
        text.contains("persoon")
            || text.contains("organisatie")
            || (text.contains("zaak") && text.contains("roerende"))
            || text.contains("document")
            || text.contains("gebouw")
            || matches.get(&UfoCategory::Kind).map_or(false, |m| m.len() >= 2)
    }

    fn is_temporal_event(&self, text: &str, matches: &HashMap<UfoCategory, Vec<String>>) -> bool {
        text.contains("tijdens")
            || text.contains("gedurende")
            || text.contains("proces")
            || text.contains("procedure")
            || text.contains("handeling")
            || text.contains("gebeurtenis")
            || NOMINALIZATION_RE.is_match(text)
            || matches.get(&UfoCategory::Event).map_or(false, |m| m.len() >= 2)
    }

    fn is_contextual_role(&self, text: &str, matches: &HashMap<UfoCategory, Vec<String>>) -> bool {
        text.contains("in de hoedanigheid van")
            || (text.contains("als") && (text.contains("optreed") || text.contains("handel")))
            || text.contains("verdachte")
            || text.contains("dader")
            || text.contains("koper")
            || text.contains("verkoper")
            || matches.get(&UfoCategory::Role).map_or(false, |m| m.len() >= 2)
    }

    fn is_life_phase(&self, text: &str, matches: &HashMap<UfoCategory, Vec<String>>) -> bool {
        text.contains("in onderzoek")
            || text.contains("voorlopig")
            || text.contains("definitief")
            || text.contains("actief")
            || text.contains("inactief")
            || text.contains("fase")
            || text.contains("stadium")
            || matches.get(&UfoCategory::Phase).map_or(false, |m| m.len() >= 2)
    }

    fn mediates_relationship(&self, text: &str, matches: &HashMap<UfoCategory, Vec<String>>) -> bool {
        (text.contains("overeenkomst") && text.contains("tussen"))
            || text.contains("contract")
            || text.contains("verbintenis")
            || (text.contains("huwelijk") && !text.contains("sluiten"))
            || (text.contains("vergunning") && text.contains("voor"))
            || matches.get(&UfoCategory::Relator).map_or(false, |m| m.len() >= 2)
    }

    fn is_intrinsic_mode(&self, text: &str, matches: &HashMap<UfoCategory, Vec<String>>) -> bool {
        text.contains("eigenschap")
            || text.contains("kenmerk")
            || text.contains("toestand")
            || text.contains("conditie")
            || text.contains("gezondheid")
            || text.contains("locatie")
            || text.contains("behorend bij")
            || matches.get(&UfoCategory::Mode).map_or(false, |m| m.len() >= 2)
    }

    fn is_measurable_quantity(&self, text: &str, matches: &HashMap<UfoCategory, Vec<String>>) -> bool {
        MONEY_OR_PERCENT_RE.is_match(text)
            || text.contains("bedrag")
            || text.contains("aantal")
            || text.contains("hoeveelheid")
            || text.contains("percentage")
            || matches.get(&UfoCategory::Quantity).map_or(false, |m| m.len() >= 2)
    }

    fn is_qualitative_property(&self, text: &str, matches: &HashMap<UfoCategory, Vec<String>>) -> bool {
        text.contains("kwaliteit")
            || text.contains("hoedanigheid")
            || text.contains("ernst")
            || text.contains("zwaarte")
            || text.contains("betrouwbaarheid")
            || text.contains("waarschijnlijkheid")
            || text.contains("mate van")
            || text.contains("graad van")
            || matches.get(&UfoCategory::Quality).map_or(false, |m| m.len() >= 2)
    }

    fn refine_with_subcategories(&self, text: &str) -> Option<UfoCategory> {
        if text.contains("groep") || text.contains("verzameling") || text.contains("team") {
            if text.contains("vast") || text.contains("bepaald") {
                return Some(UfoCategory::FixedCollection);
            }
            if text.contains("variabel") || text.contains("wisselend") {
                return Some(UfoCategory::VariableCollection);
            }
            return Some(UfoCategory::Collective);
        }

        if text.contains("gemeenschappelijk") || text.contains("gedeeld") {
            if text.contains("rol") {
                return Some(UfoCategory::RoleMixin);
            }
            if text.contains("fase") {
                return Some(UfoCategory::PhaseMixin);
            }
            return Some(UfoCategory::Mixin);
        }

        if text.contains("soort van") || text.contains("type van") {
            return Some(UfoCategory::Subkind);
        }

        if text.contains("categorie") || text.contains("klasse") {
            return Some(UfoCategory::Category);
        }

        None
    }

    /// Dominant-evidence test: a step only yields its category when no other
    /// matched category carries more than 1.5x the match count.
    fn has_dominant_alternative(
        &self,
        matches: &HashMap<UfoCategory, Vec<String>>,
        current: UfoCategory,
    ) -> bool {
        let current_count = matches.get(&current).map_or(0, Vec::len);
        let threshold = current_count as f64 * 1.5;

        matches
            .iter()
            .any(|(category, m)| *category != current && m.len() as f64 > threshold)
    }

    fn calculate_all_scores(
        &self,
        matches: &HashMap<UfoCategory, Vec<String>>,
        definition: &str,
        domain: Option<LegalDomain>,
    ) -> HashMap<UfoCategory, f64> {
        let definition_lower = definition.to_lowercase();
        let hedging = definition_lower.contains("mogelijk") || definition_lower.contains("waarschijnlijk");

        let mut scores = HashMap::new();
        for category in UfoCategory::ALL {
            let mut score = matches
                .get(&category)
                .map_or(0.0, |m| (m.len() as f64 * 0.2).min(0.8));

            if let Some(domain) = domain {
                if Self::is_relevant_for_domain(category, domain) {
                    score += 0.1;
                }
            }

            if hedging {
                score *= 0.9;
            }

            scores.insert(category, score.clamp(0.0, 1.0));
        }

        scores
    }

    fn is_relevant_for_domain(category: UfoCategory, domain: LegalDomain) -> bool {
        let relevant: &[UfoCategory] = match domain {
            LegalDomain::Strafrecht => &[UfoCategory::Event, UfoCategory::Role, UfoCategory::Phase],
            LegalDomain::Bestuursrecht => &[UfoCategory::Relator, UfoCategory::Kind, UfoCategory::Event],
            LegalDomain::CivielRecht => &[UfoCategory::Relator, UfoCategory::Role, UfoCategory::Kind],
            LegalDomain::AlgemeenJuridisch => {
                &[UfoCategory::Kind, UfoCategory::Category, UfoCategory::Mixin]
            }
        };
        relevant.contains(&category)
    }

    fn calculate_confidence(
        &self,
        primary: UfoCategory,
        all_scores: &HashMap<UfoCategory, f64>,
        pattern_count: usize,
    ) -> f64 {
        let mut confidence = all_scores.get(&primary).copied().unwrap_or(0.0);

        if pattern_count > 10 {
            confidence += 0.2;
        } else if pattern_count > 5 {
            confidence += 0.1;
        }

        let mut sorted: Vec<f64> = all_scores.values().copied().collect();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        if sorted.len() > 1 && sorted[0] - sorted[1] > 0.3 {
            confidence += 0.15;
        }

        let ambiguous = all_scores.values().filter(|s| **s > 0.4).count();
        if ambiguous > 3 {
            confidence *= 0.8;
        }

        confidence.clamp(0.0, 1.0)
    }

    fn identify_secondary_categories(
        &self,
        all_scores: &HashMap<UfoCategory, f64>,
        primary: UfoCategory,
    ) -> Vec<UfoCategory> {
        let mut secondary: Vec<(UfoCategory, f64)> = all_scores
            .iter()
            .filter(|(category, score)| **category != primary && **score >= 0.3)
            .map(|(category, score)| (*category, *score))
            .collect();

        secondary.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        secondary.into_iter().take(3).map(|(category, _)| category).collect()
    }

    fn generate_detailed_explanation(
        &self,
        result: &UfoClassificationResult,
        all_matches: &HashMap<UfoCategory, Vec<String>>,
    ) -> Vec<String> {
        let mut explanations = Vec::new();

        explanations.push(format!("=== UFO classificatie-analyse voor '{}' ===", result.term));
        explanations.push(format!("Primaire classificatie: {}", result.primary_category));
        explanations.push(format!("Confidence: {:.1}%", result.confidence * 100.0));

        explanations.push("Beslispad:".to_string());
        for step in &result.decision_path {
            explanations.push(format!("  {step}"));
        }

        explanations.push("Gevonden patronen per categorie:".to_string());
        let mut ordered: Vec<(&UfoCategory, &Vec<String>)> = all_matches.iter().collect();
        ordered.sort_by_key(|(category, _)| **category);
        for (category, patterns) in ordered {
            explanations.push(format!("  {category}:"));
            for pattern in patterns.iter().take(5) {
                explanations.push(format!("    - {pattern}"));
            }
        }

        explanations.push("Scoreoverzicht (alle categorieën):".to_string());
        let mut sorted_scores: Vec<(&UfoCategory, &f64)> = result.all_scores.iter().collect();
        sorted_scores.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
        for (category, score) in sorted_scores.into_iter().take(8) {
            explanations.push(format!("  {category:<20} {score:.2}"));
        }

        if !result.disambiguation_notes.is_empty() {
            explanations.push("Disambiguatie toegepast:".to_string());
            for note in &result.disambiguation_notes {
                explanations.push(format!("  {note}"));
            }
        }

        if !result.secondary_categories.is_empty() {
            explanations.push("Secundaire categorieën:".to_string());
            for category in &result.secondary_categories {
                let score = result.all_scores.get(category).copied().unwrap_or(0.0);
                explanations.push(format!("  - {category} (score: {score:.2})"));
            }
        }

        let legal_matches = self.matcher.find_legal_matches(&result.definition);
        if !legal_matches.is_empty() {
            explanations.push("Juridische domeintreffers:".to_string());
            let mut domains: Vec<(&LegalDomain, &Vec<&'static str>)> = legal_matches.iter().collect();
            domains.sort_by_key(|(domain, _)| domain.as_str());
            for (domain, terms) in domains {
                let shown: Vec<&str> = terms.iter().take(5).copied().collect();
                explanations.push(format!("  {domain}: {}", shown.join(", ")));
            }
        }

        explanations.push(format!("Analysetijd: {:.1}ms", result.classification_time_ms));
        explanations.push(format!("Classifier versie: {}", result.classifier_version));

        explanations
    }
}
