use crate::rules::{
    CircularReferenceRule, ContextLeakageRule, ExplanationSignalRule, OntologicalMarkerRule,
    SingleSentenceRule, StartsWithNounRule, SubjectiveWordsRule, ValidationConfig, ValidationRule,
};
use begrip_core::{Definition, Severity, ValidationContext, ValidationResult, Violation};
use std::collections::HashMap;
use tracing::{debug, info};

const RESULT_VERSION: &str = "v2";

/// Runs the registered rule set over a definition snapshot and normalizes the
/// outcome into the canonical result shape.
pub struct ValidationOrchestrator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationOrchestrator {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The mandatory rule set with the given bounds.
    pub fn with_default_rules(config: ValidationConfig) -> Self {
        let mut orchestrator = Self::new();
        orchestrator.add_rule(Box::new(StartsWithNounRule));
        orchestrator.add_rule(Box::new(SingleSentenceRule::new(config)));
        orchestrator.add_rule(Box::new(CircularReferenceRule));
        orchestrator.add_rule(Box::new(ContextLeakageRule));
        orchestrator.add_rule(Box::new(OntologicalMarkerRule));
        orchestrator.add_rule(Box::new(SubjectiveWordsRule));
        orchestrator.add_rule(Box::new(ExplanationSignalRule));
        orchestrator
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Retire a rule by id. Returns whether anything was removed.
    pub fn remove_rule(&mut self, rule_id: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.id() != rule_id);
        self.rules.len() != before
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn rule_ids(&self) -> Vec<String> {
        self.rules.iter().map(|rule| rule.id().to_string()).collect()
    }

    pub fn validate(&self, definition: &Definition, ctx: &ValidationContext) -> ValidationResult {
        let mut outcomes: Vec<(String, Vec<Violation>)> = Vec::new();

        for rule in &self.rules {
            let violations = rule.validate(definition, ctx);
            debug!(
                rule = rule.id(),
                violations = violations.len(),
                correlation_id = %ctx.correlation_id,
                "regel uitgevoerd"
            );
            outcomes.push((rule.id().to_string(), violations));
        }

        let result = normalize(outcomes);
        info!(
            term = %definition.term,
            acceptable = result.is_acceptable,
            violations = result.violations.len(),
            correlation_id = %ctx.correlation_id,
            "validatie afgerond"
        );
        result
    }
}

impl Default for ValidationOrchestrator {
    fn default() -> Self {
        Self::with_default_rules(ValidationConfig::default())
    }
}

fn severity_score(severity: Severity) -> f64 {
    match severity {
        Severity::Critical => 0.0,
        Severity::High => 0.25,
        Severity::Medium => 0.5,
        Severity::Low => 0.75,
    }
}

/// The single mapping point from raw rule outcomes to the canonical
/// `ValidationResult` shape: stable violation ordering, passed-rule
/// bookkeeping and per-rule scores.
pub fn normalize(outcomes: Vec<(String, Vec<Violation>)>) -> ValidationResult {
    let mut violations: Vec<Violation> = Vec::new();
    let mut passed_rules: Vec<String> = Vec::new();
    let mut detailed_scores: HashMap<String, f64> = HashMap::new();

    for (rule_id, rule_violations) in outcomes {
        if rule_violations.is_empty() {
            detailed_scores.insert(rule_id.clone(), 1.0);
            passed_rules.push(rule_id);
        } else {
            let worst = rule_violations
                .iter()
                .map(|v| severity_score(v.severity))
                .fold(1.0_f64, f64::min);
            detailed_scores
                .entry(rule_id)
                .and_modify(|score| *score = score.min(worst))
                .or_insert(worst);
            violations.extend(rule_violations);
        }
    }

    // Stable under re-ordering of the rule set.
    violations.sort_by(|a, b| a.rule_id.cmp(&b.rule_id).then(a.severity.cmp(&b.severity)));
    passed_rules.sort();

    let is_acceptable = !violations.iter().any(|v| v.severity == Severity::Critical);

    ValidationResult {
        is_acceptable,
        violations,
        passed_rules,
        detailed_scores,
        version: RESULT_VERSION.to_string(),
    }
}
