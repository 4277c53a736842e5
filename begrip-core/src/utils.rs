use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Normalize a term for cache keys and lookups.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Rough token estimate for Dutch text (~1.3 tokens per word).
pub fn estimate_tokens(text: &str) -> usize {
    let word_count = text.split_whitespace().count();
    (word_count as f64 * 1.3).round() as usize
}

/// Token-level Jaccard similarity between two strings.
pub fn token_jaccard(a: &str, b: &str) -> f64 {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    if a_lower == b_lower {
        return 1.0;
    }

    let set_a: HashSet<&str> = a_lower.split_whitespace().collect();
    let set_b: HashSet<&str> = b_lower.split_whitespace().collect();

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();

    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Known organizational abbreviations and their full names.
pub fn expand_org_abbreviation(abbreviation: &str) -> Option<&'static str> {
    match abbreviation {
        "NP" => Some("Nederlandse Politie"),
        "DJI" => Some("Dienst Justitiële Inrichtingen"),
        "OM" => Some("Openbaar Ministerie"),
        "ZM" => Some("Zittende Magistratuur"),
        "AVG" => Some("Algemene verordening gegevensbescherming"),
        "KvK" => Some("Kamer van Koophandel"),
        _ => None,
    }
}

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}][\p{L}\-]{2,}").unwrap());

/// Extract lowercase keywords of three letters or more.
pub fn extract_keywords(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|word| !is_stop_word(word))
        .collect()
}

fn is_stop_word(word: &str) -> bool {
    matches!(
        word,
        "een" | "het" | "van" | "der" | "den" | "des" | "die" | "dat" | "deze" | "dit" | "door"
            | "voor" | "naar" | "met" | "aan" | "bij" | "tot" | "uit" | "over" | "onder" | "tussen"
            | "wordt" | "worden" | "zijn" | "hebben" | "heeft" | "niet" | "ook" | "als" | "dan"
            | "waarbij" | "waarin" | "zoals"
    )
}

/// Does `text` contain `term` as a stand-alone word (case-insensitive)?
pub fn contains_standalone_word(text: &str, term: &str) -> bool {
    let escaped = regex::escape(&term.to_lowercase());
    match Regex::new(&format!(r"(?i)\b{escaped}\b")) {
        Ok(re) => re.is_match(text),
        Err(_) => text.to_lowercase().contains(&term.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_term() {
        assert_eq!(normalize_term("  Voorlopige Hechtenis "), "voorlopige hechtenis");
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens("een twee drie vier"), 5);
        assert_eq!(estimate_tokens(""), 0);
    }

    #[test]
    fn test_token_jaccard() {
        assert_eq!(token_jaccard("voorlopige hechtenis", "voorlopige hechtenis"), 1.0);
        assert!(token_jaccard("voorlopige hechtenis", "voorlopige bewaring") > 0.3);
        assert_eq!(token_jaccard("appel", "peer"), 0.0);
    }

    #[test]
    fn test_expand_org_abbreviation() {
        assert_eq!(expand_org_abbreviation("DJI"), Some("Dienst Justitiële Inrichtingen"));
        assert_eq!(expand_org_abbreviation("OM"), Some("Openbaar Ministerie"));
        assert_eq!(expand_org_abbreviation("XYZ"), None);
    }

    #[test]
    fn test_contains_standalone_word() {
        assert!(contains_standalone_word("het toezicht op de naleving", "toezicht"));
        assert!(!contains_standalone_word("reclasseringstoezicht op afstand", "toezicht"));
    }

    #[test]
    fn test_extract_keywords_skips_stop_words() {
        let keywords = extract_keywords("het systematisch volgen van handelingen");
        assert!(keywords.contains(&"systematisch".to_string()));
        assert!(keywords.contains(&"volgen".to_string()));
        assert!(!keywords.contains(&"van".to_string()));
        assert!(!keywords.contains(&"het".to_string()));
    }
}
