use begrip_core::{AiProvider, BegripResult, GenerationRequest, Violation};
use std::sync::Arc;
use tracing::info;

/// Default remediation temperature; lower than generation for deterministic
/// repairs.
pub const DEFAULT_ENHANCEMENT_TEMPERATURE: f32 = 0.05;

/// One-shot remediation of a definition that failed validation. Never invoked
/// more than once per request; the orchestrator enforces that.
pub struct EnhancementService {
    ai: Arc<dyn AiProvider>,
    temperature: f32,
}

impl EnhancementService {
    pub fn new(ai: Arc<dyn AiProvider>) -> Self {
        Self {
            ai,
            temperature: DEFAULT_ENHANCEMENT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub async fn enhance_definition(
        &self,
        text: &str,
        violations: &[Violation],
        request: &GenerationRequest,
    ) -> BegripResult<String> {
        let prompt = self.build_remediation_prompt(text, violations, request);

        let result = self
            .ai
            .generate_definition(
                &prompt,
                self.temperature,
                request.options.max_tokens.unwrap_or(400),
                request.options.model.as_deref(),
            )
            .await?;

        info!(term = %request.term, "verbeterpoging uitgevoerd");
        Ok(result.text.trim().trim_matches('"').to_string())
    }

    fn build_remediation_prompt(
        &self,
        text: &str,
        violations: &[Violation],
        request: &GenerationRequest,
    ) -> String {
        let mut lines = vec![
            "Je bent een expert in beleidsmatige definities voor overheidsgebruik.".to_string(),
            format!(
                "De volgende definitie van **{}** is afgekeurd door de validator:",
                request.term
            ),
            String::new(),
            format!("  {text}"),
            String::new(),
            "Geconstateerde overtredingen:".to_string(),
        ];

        for violation in violations {
            lines.push(format!(
                "- [{}] {} ({})",
                violation.rule_id,
                violation.message,
                violation.severity.as_str()
            ));
        }

        if let Some(category) = request.ontological_category {
            lines.push(String::new());
            lines.push(format!("De ontologische categorie is: {category}."));
        }

        lines.push(String::new());
        lines.push(
            "Herschrijf de definitie zodat alle overtredingen zijn opgelost. Behoud de betekenis. \
             Start met een zelfstandig naamwoord, gebruik één enkele zin en noem de context niet letterlijk. \
             Geef uitsluitend de verbeterde definitie terug, zonder toelichting."
                .to_string(),
        );

        lines.join("\n")
    }
}
