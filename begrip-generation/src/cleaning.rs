use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*ontologische\s+categorie\s*:\s*(?P<cat>[^\r\n]+)\r?\n?").unwrap());
static MULTI_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static PARENTHETICAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\(([^)]*)\)").unwrap());

const EXPLANATION_MARKERS: [&str; 6] = [
    "bijvoorbeeld",
    "bijv.",
    "zoals",
    "d.w.z.",
    "oftewel",
    "met andere woorden",
];

/// Result of canonicalizing raw model output. Presentation changes only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningOutcome {
    pub original: String,
    pub cleaned: String,
    pub was_cleaned: bool,
    pub applied_rules: Vec<String>,
    pub improvements: Vec<String>,
    /// Value of the stripped "Ontologische categorie:" header, if present.
    pub ontological_marker: Option<String>,
}

/// Canonicalizes raw model output: header and term-prefix stripping,
/// whitespace and punctuation normalization.
#[derive(Debug, Clone, Default)]
pub struct CleaningService;

impl CleaningService {
    pub fn new() -> Self {
        Self
    }

    pub fn clean(&self, raw: &str, term: &str) -> CleaningOutcome {
        let mut applied_rules = Vec::new();
        let mut improvements = Vec::new();

        // 1. Ontological header into metadata.
        let (mut text, marker) = strip_ontological_header(raw);
        if marker.is_some() {
            applied_rules.push("header_stripped".to_string());
            improvements.push("Metadataheader 'Ontologische categorie' verwijderd".to_string());
        }

        // 2. Leading "<term>:" prefix.
        let (stripped, prefix_removed) = strip_term_prefix(&text, term);
        text = stripped;
        if prefix_removed {
            applied_rules.push("term_prefix_stripped".to_string());
            improvements.push(format!("Prefix '{term}:' verwijderd"));
        }

        // 3. Explanatory parentheticals.
        let (without_asides, asides_removed) = strip_explanatory_parentheticals(&text);
        if asides_removed > 0 {
            text = without_asides;
            applied_rules.push("parenthetical_removed".to_string());
            improvements.push(format!("{asides_removed} toelichting(en) tussen haakjes verwijderd"));
        }

        // 4. Whitespace.
        let normalized = MULTI_SPACE_RE.replace_all(text.trim(), " ").to_string();
        if normalized != text {
            applied_rules.push("whitespace_normalized".to_string());
        }
        text = normalized;

        // 5. Exactly one terminal period.
        let trimmed = text.trim_end_matches(['.', ' ', '!', '?']).to_string();
        let with_period = format!("{trimmed}.");
        if with_period != text {
            applied_rules.push("terminal_period".to_string());
        }
        text = with_period;

        // 6. Sentence-initial capital.
        let capitalized = capitalize_first(&text);
        if capitalized != text {
            applied_rules.push("capitalized".to_string());
        }
        text = capitalized;

        let was_cleaned = text != raw;
        debug!(term, rules = applied_rules.len(), "modeloutput opgeschoond");

        CleaningOutcome {
            original: raw.to_string(),
            cleaned: text,
            was_cleaned,
            applied_rules,
            improvements,
            ontological_marker: marker,
        }
    }

    /// Display variant: strips the ontological header and the term prefix but
    /// preserves the model's own phrasing otherwise.
    pub fn display_original(&self, raw: &str, term: &str) -> String {
        let (text, _) = strip_ontological_header(raw);
        let (text, _) = strip_term_prefix(&text, term);
        text.trim().to_string()
    }
}

fn strip_ontological_header(raw: &str) -> (String, Option<String>) {
    match HEADER_RE.captures(raw) {
        Some(captures) => {
            let marker = captures.name("cat").map(|m| m.as_str().trim().to_lowercase());
            let text = HEADER_RE.replace(raw, "").to_string();
            (text, marker)
        }
        None => (raw.to_string(), None),
    }
}

fn strip_term_prefix(text: &str, term: &str) -> (String, bool) {
    let pattern = format!(r"(?i)^\s*\**{}\**\s*:\s*", regex::escape(term.trim()));
    match Regex::new(&pattern) {
        Ok(re) if re.is_match(text) => (re.replace(text, "").to_string(), true),
        _ => (text.to_string(), false),
    }
}

fn strip_explanatory_parentheticals(text: &str) -> (String, usize) {
    let mut removed = 0;
    let result = PARENTHETICAL_RE.replace_all(text, |captures: &regex::Captures| {
        let contents = captures[1].to_lowercase();
        if EXPLANATION_MARKERS.iter().any(|marker| contents.contains(marker)) {
            removed += 1;
            String::new()
        } else {
            captures[0].to_string()
        }
    });
    (result.to_string(), removed)
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> CleaningService {
        CleaningService::new()
    }

    #[test]
    fn test_full_cleaning_pipeline() {
        let raw = "Ontologische categorie: resultaat\nVervoersverbod: maatregel die volgt op een strafrechtelijke veroordeling en het verplaatsen van een persoon beperkt.";
        let outcome = service().clean(raw, "vervoersverbod");

        assert!(outcome.cleaned.starts_with("Maatregel die volgt op"));
        assert!(!outcome.cleaned.contains("Ontologische categorie"));
        assert!(!outcome.cleaned.to_lowercase().starts_with("vervoersverbod:"));
        assert_eq!(outcome.ontological_marker.as_deref(), Some("resultaat"));
        assert!(outcome.was_cleaned);
        assert!(outcome.applied_rules.contains(&"header_stripped".to_string()));
        assert!(outcome.applied_rules.contains(&"term_prefix_stripped".to_string()));
    }

    #[test]
    fn test_exactly_one_terminal_period() {
        let outcome = service().clean("Maatregel die verplaatsing beperkt...", "x");
        assert!(outcome.cleaned.ends_with("beperkt."));
        assert!(!outcome.cleaned.ends_with(".."));

        let no_period = service().clean("Maatregel die verplaatsing beperkt", "x");
        assert!(no_period.cleaned.ends_with("beperkt."));
    }

    #[test]
    fn test_whitespace_normalization() {
        let outcome = service().clean("Maatregel   die \n verplaatsing  beperkt.", "x");
        assert_eq!(outcome.cleaned, "Maatregel die verplaatsing beperkt.");
    }

    #[test]
    fn test_explanatory_parenthetical_removed() {
        let outcome = service().clean(
            "Maatregel (bijvoorbeeld een gebiedsverbod) die verplaatsing beperkt.",
            "x",
        );
        assert!(!outcome.cleaned.contains("bijvoorbeeld"));
        assert!(outcome.applied_rules.contains(&"parenthetical_removed".to_string()));
    }

    #[test]
    fn test_non_explanatory_parenthetical_preserved() {
        let outcome = service().clean(
            "Toestemming verleend door de Dienst Justitiële Inrichtingen (DJI) aan een persoon.",
            "x",
        );
        assert!(outcome.cleaned.contains("(DJI)"));
    }

    #[test]
    fn test_clean_text_untouched() {
        let raw = "Maatregel die verplaatsing van een persoon beperkt.";
        let outcome = service().clean(raw, "vervoersverbod");
        assert_eq!(outcome.cleaned, raw);
        assert!(!outcome.was_cleaned);
        assert!(outcome.ontological_marker.is_none());
    }

    #[test]
    fn test_display_original_preserves_phrasing() {
        let raw = "Ontologische categorie: resultaat\nVervoersverbod: maatregel   die  volgt op een veroordeling";
        let display = service().display_original(raw, "vervoersverbod");
        // Header and prefix gone, multiple spaces kept.
        assert!(display.starts_with("maatregel   die"));
        assert!(!display.contains("Ontologische"));
    }

    #[test]
    fn test_markdown_bold_prefix() {
        let raw = "**Vervoersverbod**: maatregel die verplaatsing beperkt.";
        let outcome = service().clean(raw, "vervoersverbod");
        assert!(outcome.cleaned.starts_with("Maatregel"));
    }
}
