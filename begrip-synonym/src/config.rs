use begrip_core::{BegripError, BegripResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Governance policy for synonym visibility.
///
/// STRICT: only approved members (status=active).
/// PRAGMATIC: ai_pending members are surfaced as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynonymPolicy {
    Strict,
    Pragmatic,
}

impl SynonymPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SynonymPolicy::Strict => "strict",
            SynonymPolicy::Pragmatic => "pragmatic",
        }
    }
}

/// Central configuration for the synonym orchestrator. Loaded from the
/// `synonym_configuration` YAML section; out-of-range values are fatal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynonymConfiguration {
    pub policy: SynonymPolicy,
    pub min_synonyms_threshold: u32,
    pub gpt4_timeout_seconds: u64,
    pub gpt4_max_retries: u32,
    pub cache_ttl_seconds: u64,
    pub cache_max_size: usize,
    pub min_weight_for_weblookup: f64,
    pub preferred_weight_threshold: f64,
}

impl Default for SynonymConfiguration {
    fn default() -> Self {
        Self {
            policy: SynonymPolicy::Strict,
            min_synonyms_threshold: 5,
            gpt4_timeout_seconds: 30,
            gpt4_max_retries: 3,
            cache_ttl_seconds: 3600,
            cache_max_size: 1000,
            min_weight_for_weblookup: 0.7,
            preferred_weight_threshold: 0.95,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfigFile {
    synonym_configuration: Option<RawSection>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSection {
    policy: Option<String>,
    min_synonyms: Option<i64>,
    gpt4_timeout: Option<i64>,
    gpt4_max_retries: Option<i64>,
    cache_ttl: Option<i64>,
    cache_max_size: Option<i64>,
    min_weight: Option<f64>,
    preferred_threshold: Option<f64>,
}

impl SynonymConfiguration {
    /// Load configuration from a YAML file, merging with defaults. A missing
    /// file or empty section falls back to defaults with a warning; invalid
    /// values are fatal with all problems aggregated into one error.
    pub fn from_yaml(path: impl AsRef<Path>) -> BegripResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "configuratiebestand niet gevonden, defaults gebruikt");
            return Ok(Self::default());
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "configuratie onleesbaar, defaults gebruikt");
                return Ok(Self::default());
            }
        };

        let raw: RawConfigFile = match serde_yaml::from_str(&contents) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "YAML parse mislukt, defaults gebruikt");
                return Ok(Self::default());
            }
        };

        let section = match raw.synonym_configuration {
            Some(section) => section,
            None => {
                warn!(
                    path = %path.display(),
                    "geen 'synonym_configuration' sectie gevonden, defaults gebruikt"
                );
                return Ok(Self::default());
            }
        };

        let defaults = Self::default();
        let policy = match section.policy.as_deref() {
            None => defaults.policy,
            Some("strict") => SynonymPolicy::Strict,
            Some("pragmatic") => SynonymPolicy::Pragmatic,
            Some(other) => {
                return Err(BegripError::ConfigurationError {
                    parameter: "policy".to_string(),
                    reason: format!("'{other}' is ongeldig; kies 'strict' of 'pragmatic'"),
                });
            }
        };

        let config = Self {
            policy,
            min_synonyms_threshold: section
                .min_synonyms
                .map(|v| v.max(0) as u32)
                .unwrap_or(defaults.min_synonyms_threshold),
            gpt4_timeout_seconds: section
                .gpt4_timeout
                .map(|v| v.max(0) as u64)
                .unwrap_or(defaults.gpt4_timeout_seconds),
            gpt4_max_retries: section
                .gpt4_max_retries
                .map(|v| v.max(0) as u32)
                .unwrap_or(defaults.gpt4_max_retries),
            cache_ttl_seconds: section
                .cache_ttl
                .map(|v| v.max(0) as u64)
                .unwrap_or(defaults.cache_ttl_seconds),
            cache_max_size: section
                .cache_max_size
                .map(|v| v.max(0) as usize)
                .unwrap_or(defaults.cache_max_size),
            min_weight_for_weblookup: section
                .min_weight
                .unwrap_or(defaults.min_weight_for_weblookup),
            preferred_weight_threshold: section
                .preferred_threshold
                .unwrap_or(defaults.preferred_weight_threshold),
        };

        let errors = config.validate();
        if !errors.is_empty() {
            return Err(BegripError::ConfigurationError {
                parameter: "synonym_configuration".to_string(),
                reason: errors.join("; "),
            });
        }

        info!(
            policy = config.policy.as_str(),
            min_synonyms = config.min_synonyms_threshold,
            cache_ttl = config.cache_ttl_seconds,
            "synonym configuratie geladen"
        );

        Ok(config)
    }

    /// Check all numeric ranges and cross-field constraints. Returns an empty
    /// list when valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.min_synonyms_threshold < 1 {
            errors.push(format!(
                "min_synonyms moet >= 1 zijn, kreeg: {}",
                self.min_synonyms_threshold
            ));
        }

        if self.gpt4_timeout_seconds < 5 {
            errors.push(format!(
                "gpt4_timeout moet >= 5 zijn (te kort voor een API call), kreeg: {}",
                self.gpt4_timeout_seconds
            ));
        }
        if self.gpt4_timeout_seconds > 300 {
            errors.push(format!(
                "gpt4_timeout moet <= 300 zijn (5 minuten maximum), kreeg: {}",
                self.gpt4_timeout_seconds
            ));
        }

        if self.gpt4_max_retries > 10 {
            errors.push(format!(
                "gpt4_max_retries moet <= 10 zijn, kreeg: {}",
                self.gpt4_max_retries
            ));
        }

        if self.cache_ttl_seconds < 60 {
            errors.push(format!(
                "cache_ttl moet >= 60 zijn (1 minuut minimum), kreeg: {}",
                self.cache_ttl_seconds
            ));
        }
        if self.cache_ttl_seconds > 86_400 {
            errors.push(format!(
                "cache_ttl moet <= 86400 zijn (24 uur maximum), kreeg: {}",
                self.cache_ttl_seconds
            ));
        }

        if self.cache_max_size < 10 {
            errors.push(format!(
                "cache_max_size moet >= 10 zijn, kreeg: {}",
                self.cache_max_size
            ));
        }
        if self.cache_max_size > 100_000 {
            errors.push(format!(
                "cache_max_size moet <= 100000 zijn, kreeg: {}",
                self.cache_max_size
            ));
        }

        if !(0.0..=1.0).contains(&self.min_weight_for_weblookup) {
            errors.push(format!(
                "min_weight moet tussen 0.0 en 1.0 zijn, kreeg: {}",
                self.min_weight_for_weblookup
            ));
        }
        if !(0.0..=1.0).contains(&self.preferred_weight_threshold) {
            errors.push(format!(
                "preferred_threshold moet tussen 0.0 en 1.0 zijn, kreeg: {}",
                self.preferred_weight_threshold
            ));
        }

        if self.preferred_weight_threshold < self.min_weight_for_weblookup {
            errors.push(format!(
                "preferred_threshold ({}) moet >= min_weight ({}) zijn",
                self.preferred_weight_threshold, self.min_weight_for_weblookup
            ));
        }

        errors
    }
}
