use async_trait::async_trait;
use begrip_core::{
    BegripError, BegripResult, FeedbackEngine, FeedbackItem, GenerationRequest,
    OntologicalCategory, ValidationResult,
};
use chrono::Utc;
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, info};

const MAX_FEEDBACK_ITEMS: u32 = 10;

/// Feedback store over the shared embedded database: prior validation
/// failures per term and category, injected into later prompt builds.
pub struct SqliteFeedbackEngine {
    pool: Pool<Sqlite>,
}

impl SqliteFeedbackEngine {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedbackEngine for SqliteFeedbackEngine {
    async fn get_feedback_for_request(
        &self,
        term: &str,
        category: Option<OntologicalCategory>,
    ) -> BegripResult<Vec<FeedbackItem>> {
        let rows = sqlx::query(
            r#"
            SELECT feedback_type, content
            FROM generation_feedback
            WHERE begrip = ?
              AND (ontologische_categorie IS NULL OR ontologische_categorie = ?)
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(term)
        .bind(category.map(|c| c.as_str()).unwrap_or(""))
        .bind(MAX_FEEDBACK_ITEMS)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BegripError::DatabaseError {
            operation: "get_feedback_for_request".to_string(),
            reason: e.to_string(),
        })?;

        let items = rows
            .iter()
            .map(|row| FeedbackItem {
                kind: row.get("feedback_type"),
                content: row.get("content"),
            })
            .collect::<Vec<_>>();

        debug!(term, count = items.len(), "feedback opgehaald");
        Ok(items)
    }

    /// Records one entry per violation when validation failed; acceptable
    /// results leave no trace.
    async fn process_validation_feedback(
        &self,
        definition_id: &str,
        validation_result: &ValidationResult,
        original_request: &GenerationRequest,
    ) -> BegripResult<()> {
        if validation_result.is_acceptable {
            return Ok(());
        }

        let now = Utc::now();
        for violation in &validation_result.violations {
            sqlx::query(
                r#"
                INSERT INTO generation_feedback
                    (begrip, ontologische_categorie, feedback_type, content, created_at)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&original_request.term)
            .bind(original_request.ontological_category.map(|c| c.as_str()))
            .bind(&violation.rule_id)
            .bind(format!("[{definition_id}] {}", violation.message))
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| BegripError::DatabaseError {
                operation: "process_validation_feedback".to_string(),
                reason: e.to_string(),
            })?;
        }

        info!(
            term = %original_request.term,
            violations = validation_result.violations.len(),
            "validatiefeedback vastgelegd"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use begrip_core::{Severity, Violation};
    use begrip_db::DefinitionRepository;
    use std::collections::HashMap;

    async fn engine() -> SqliteFeedbackEngine {
        let repo = DefinitionRepository::connect_in_memory().await.unwrap();
        SqliteFeedbackEngine::new(repo.pool().clone())
    }

    fn failed_result() -> ValidationResult {
        ValidationResult {
            is_acceptable: false,
            violations: vec![Violation::new(
                "STR-01",
                Severity::Critical,
                "definitie start met koppelwerkwoord 'is'",
            )],
            passed_rules: vec![],
            detailed_scores: HashMap::new(),
            version: "v2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_failed_validation_is_recorded_and_retrievable() {
        let engine = engine().await;
        let mut request = GenerationRequest::new("vervoersverbod", "u1");
        request.ontological_category = Some(OntologicalCategory::Resultaat);

        engine
            .process_validation_feedback("gen-1", &failed_result(), &request)
            .await
            .unwrap();

        let items = engine
            .get_feedback_for_request("vervoersverbod", Some(OntologicalCategory::Resultaat))
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, "STR-01");
        assert!(items[0].content.contains("koppelwerkwoord"));
    }

    #[tokio::test]
    async fn test_acceptable_result_leaves_no_trace() {
        let engine = engine().await;
        let request = GenerationRequest::new("toezicht", "u1");
        let result = ValidationResult {
            is_acceptable: true,
            violations: vec![],
            passed_rules: vec!["STR-01".to_string()],
            detailed_scores: HashMap::new(),
            version: "v2".to_string(),
        };

        engine
            .process_validation_feedback("gen-2", &result, &request)
            .await
            .unwrap();

        let items = engine.get_feedback_for_request("toezicht", None).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_miss_returns_empty_list() {
        let engine = engine().await;
        let items = engine.get_feedback_for_request("onbekend", None).await.unwrap();
        assert!(items.is_empty());
    }
}
