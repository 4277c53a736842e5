use async_trait::async_trait;
use begrip_core::MonitoringService;
use dashmap::DashMap;
use tracing::{error, info};

/// Monitoring sink backed by tracing events plus in-process counters.
#[derive(Debug, Default)]
pub struct TracingMonitor {
    counters: DashMap<&'static str, u64>,
}

impl TracingMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&self, key: &'static str) {
        *self.counters.entry(key).or_insert(0) += 1;
    }

    pub fn counter(&self, key: &str) -> u64 {
        self.counters.get(key).map(|v| *v).unwrap_or(0)
    }
}

#[async_trait]
impl MonitoringService for TracingMonitor {
    async fn start_generation(&self, generation_id: &str) {
        self.bump("generations_started");
        info!(target: "monitoring", generation_id, "generatie gestart");
    }

    async fn complete_generation(
        &self,
        generation_id: &str,
        success: bool,
        duration_ms: u64,
        token_count: Option<u32>,
        components_used: &[String],
    ) {
        self.bump(if success {
            "generations_succeeded"
        } else {
            "generations_failed_validation"
        });
        info!(
            target: "monitoring",
            generation_id,
            success,
            duration_ms,
            tokens = token_count,
            components = components_used.len(),
            "generatie afgerond"
        );
    }

    async fn track_error(&self, generation_id: &str, error_type: &str, message: &str) {
        self.bump("generation_errors");
        error!(target: "monitoring", generation_id, error_type, message, "generatie mislukt");
    }
}
