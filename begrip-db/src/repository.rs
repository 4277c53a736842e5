use crate::schema::DatabaseSchema;
use begrip_core::{
    token_jaccard, BegripError, BegripResult, Definition, DefinitionStatus, OntologicalCategory,
    Violation,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};
use std::collections::HashMap;
use tracing::{info, warn};

/// A possible duplicate, with the evidence that triggered the match.
#[derive(Debug, Clone)]
pub struct DuplicateMatch {
    pub definition: Definition,
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Field-wise update payload; unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct DefinitionUpdate {
    pub text: Option<String>,
    pub ontological_category: Option<OntologicalCategory>,
    pub valid: Option<bool>,
    pub violations: Option<Vec<Violation>>,
    pub metadata: Option<HashMap<String, Value>>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct RepositoryStatistics {
    pub total_definitions: i64,
    pub by_status: HashMap<String, i64>,
    pub by_category: HashMap<String, i64>,
    pub average_validation_score: Option<f64>,
}

/// Durable store for definitions with duplicate detection, status
/// transitions and an append-only history trail.
pub struct DefinitionRepository {
    pool: Pool<Sqlite>,
}

impl DefinitionRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn connect_in_memory() -> BegripResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| BegripError::DatabaseError {
                operation: "connect_in_memory".to_string(),
                reason: e.to_string(),
            })?;
        DatabaseSchema::create_all_tables(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    fn db_err(operation: &str) -> impl Fn(sqlx::Error) -> BegripError + '_ {
        move |e| BegripError::DatabaseError {
            operation: operation.to_string(),
            reason: e.to_string(),
        }
    }

    /// Persist a definition. A non-archived duplicate on
    /// `(term, organizational_context, juridical_context)` is rejected
    /// unless `metadata.force_duplicate` is set, in which case a new version
    /// is appended with `previous_version_id` referencing the latest one.
    pub async fn save(&self, definition: &Definition) -> BegripResult<i64> {
        let force_duplicate = definition
            .metadata
            .get("force_duplicate")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let duplicates = self
            .find_duplicates(
                &definition.term,
                &definition.organizational_context,
                &definition.juridical_context,
            )
            .await?;
        let exact = duplicates.iter().find(|d| d.score >= 1.0);

        let mut version = definition.version.max(1);
        let mut previous_version_id = definition.previous_version_id;

        if let Some(existing) = exact {
            if !force_duplicate {
                return Err(BegripError::DuplicateDefinition {
                    term: definition.term.clone(),
                    context: definition.organizational_context.join(", "),
                });
            }
            version = existing.definition.version + 1;
            previous_version_id = existing.definition.id;
            info!(
                term = %definition.term,
                version,
                "duplicaat geforceerd; nieuwe versie aangemaakt"
            );
        } else if !duplicates.is_empty() && !force_duplicate {
            warn!(
                term = %definition.term,
                candidates = duplicates.len(),
                "vergelijkbare definities gevonden; opslag gaat door"
            );
        }

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO definities (
                begrip, definitie, ontologische_categorie,
                organisatorische_context, juridische_context, wettelijke_basis,
                original_text, valid, violations, metadata, status,
                version_number, previous_version_id,
                created_at, updated_at, created_by, approved_by, approved_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&definition.term)
        .bind(&definition.text)
        .bind(definition.ontological_category.map(|c| c.as_str()))
        .bind(serde_json::to_string(&definition.organizational_context)?)
        .bind(serde_json::to_string(&definition.juridical_context)?)
        .bind(serde_json::to_string(&definition.legal_basis)?)
        .bind(&definition.original_text)
        .bind(definition.valid)
        .bind(serde_json::to_string(&definition.violations)?)
        .bind(serde_json::to_string(&definition.metadata)?)
        .bind(definition.status.as_str())
        .bind(version)
        .bind(previous_version_id)
        .bind(now)
        .bind(now)
        .bind(&definition.created_by)
        .bind(&definition.approved_by)
        .bind(definition.approved_at)
        .execute(&self.pool)
        .await
        .map_err(Self::db_err("save"))?;

        let id = result.last_insert_rowid();
        self.log_history(
            id,
            "created",
            Some(&definition.created_by),
            Some(&format!("Nieuwe definitie aangemaakt voor '{}'", definition.term)),
        )
        .await?;

        info!(term = %definition.term, id, "definitie opgeslagen");
        Ok(id)
    }

    pub async fn get(&self, id: i64) -> BegripResult<Option<Definition>> {
        let row = sqlx::query("SELECT * FROM definities WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::db_err("get"))?;

        row.map(|row| Self::definition_from_row(&row)).transpose()
    }

    /// All non-archived definitions for a term, newest version first.
    pub async fn find_by_term(&self, term: &str) -> BegripResult<Vec<Definition>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM definities
            WHERE begrip = ? AND status != 'archived'
            ORDER BY version_number DESC, created_at DESC
            "#,
        )
        .bind(term)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_err("find_by_term"))?;

        rows.iter().map(Self::definition_from_row).collect()
    }

    /// Targeted lookup on term plus exact context, newest version.
    pub async fn find_definition(
        &self,
        term: &str,
        organizational_context: &[String],
        juridical_context: &[String],
        status: Option<DefinitionStatus>,
    ) -> BegripResult<Option<Definition>> {
        let org_json = serde_json::to_string(organizational_context)?;
        let jur_json = serde_json::to_string(juridical_context)?;

        let mut sql = String::from(
            "SELECT * FROM definities WHERE begrip = ? AND organisatorische_context = ? AND juridische_context = ?",
        );
        if status.is_some() {
            sql.push_str(" AND status = ?");
        }
        sql.push_str(" ORDER BY version_number DESC LIMIT 1");

        let mut query = sqlx::query(&sql).bind(term).bind(org_json).bind(jur_json);
        if let Some(status) = status {
            query = query.bind(status.as_str());
        }

        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::db_err("find_definition"))?;

        row.map(|row| Self::definition_from_row(&row)).transpose()
    }

    /// Free search with optional filters; archived rows are excluded unless
    /// explicitly requested via the status filter.
    pub async fn search(
        &self,
        query_text: Option<&str>,
        category: Option<OntologicalCategory>,
        organization: Option<&str>,
        status: Option<DefinitionStatus>,
        limit: u32,
    ) -> BegripResult<Vec<Definition>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(q) = query_text {
            clauses.push("(begrip LIKE ? OR definitie LIKE ?)".to_string());
            let like = format!("%{q}%");
            binds.push(like.clone());
            binds.push(like);
        }
        if let Some(category) = category {
            clauses.push("ontologische_categorie = ?".to_string());
            binds.push(category.as_str().to_string());
        }
        if let Some(org) = organization {
            clauses.push("organisatorische_context LIKE ?".to_string());
            binds.push(format!("%\"{org}\"%"));
        }
        match status {
            Some(status) => {
                clauses.push("status = ?".to_string());
                binds.push(status.as_str().to_string());
            }
            None => clauses.push("status != 'archived'".to_string()),
        }

        let mut sql = String::from("SELECT * FROM definities");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY begrip, created_at DESC LIMIT ?");

        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        query = query.bind(limit);

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(Self::db_err("search"))?;

        rows.iter().map(Self::definition_from_row).collect()
    }

    /// Exact matches score 1.0; otherwise fuzzy candidates with token-Jaccard
    /// similarity of at least 0.7 on the term.
    pub async fn find_duplicates(
        &self,
        term: &str,
        organizational_context: &[String],
        juridical_context: &[String],
    ) -> BegripResult<Vec<DuplicateMatch>> {
        let org_json = serde_json::to_string(organizational_context)?;
        let jur_json = serde_json::to_string(juridical_context)?;

        let mut matches = Vec::new();

        let exact_rows = sqlx::query(
            r#"
            SELECT * FROM definities
            WHERE begrip = ? AND organisatorische_context = ? AND juridische_context = ?
              AND status != 'archived'
            ORDER BY version_number DESC
            "#,
        )
        .bind(term)
        .bind(&org_json)
        .bind(&jur_json)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_err("find_duplicates"))?;

        for row in &exact_rows {
            matches.push(DuplicateMatch {
                definition: Self::definition_from_row(row)?,
                score: 1.0,
                reasons: vec!["Exact match: begrip + context".to_string()],
            });
        }

        if matches.is_empty() {
            let fuzzy_rows = sqlx::query(
                r#"
                SELECT * FROM definities
                WHERE organisatorische_context = ? AND status != 'archived'
                "#,
            )
            .bind(&org_json)
            .fetch_all(&self.pool)
            .await
            .map_err(Self::db_err("find_duplicates"))?;

            for row in &fuzzy_rows {
                let candidate = Self::definition_from_row(row)?;
                let similarity = token_jaccard(term, &candidate.term);
                if similarity >= 0.7 {
                    matches.push(DuplicateMatch {
                        score: similarity,
                        reasons: vec![format!("Fuzzy match: '{term}' ~ '{}'", candidate.term)],
                        definition: candidate,
                    });
                }
            }
        }

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        Ok(matches)
    }

    /// Status machine: draft -> review -> established; everything may be
    /// archived; reverse transitions are rejected.
    pub async fn change_status(
        &self,
        id: i64,
        new_status: DefinitionStatus,
        actor: &str,
        notes: Option<&str>,
    ) -> BegripResult<()> {
        let current = self.get(id).await?.ok_or_else(|| BegripError::NotFound {
            entity: "definitie".to_string(),
            id: id.to_string(),
        })?;

        if !current.status.can_transition_to(new_status) {
            return Err(BegripError::StatusTransitionError {
                from: current.status.as_str().to_string(),
                to: new_status.as_str().to_string(),
            });
        }

        let now = Utc::now();
        if new_status == DefinitionStatus::Established {
            sqlx::query(
                r#"
                UPDATE definities
                SET status = ?, updated_at = ?, approved_by = ?, approved_at = ?
                WHERE id = ?
                "#,
            )
            .bind(new_status.as_str())
            .bind(now)
            .bind(actor)
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Self::db_err("change_status"))?;
        } else {
            sqlx::query("UPDATE definities SET status = ?, updated_at = ? WHERE id = ?")
                .bind(new_status.as_str())
                .bind(now)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(Self::db_err("change_status"))?;
        }

        self.log_history(
            id,
            "status_changed",
            Some(actor),
            Some(&match notes {
                Some(notes) => format!("Status gewijzigd naar {} ({notes})", new_status.as_str()),
                None => format!("Status gewijzigd naar {}", new_status.as_str()),
            }),
        )
        .await?;

        info!(id, status = new_status.as_str(), actor, "status gewijzigd");
        Ok(())
    }

    /// Field-wise update of a stored definition.
    pub async fn update(
        &self,
        id: i64,
        updates: DefinitionUpdate,
        updated_by: &str,
    ) -> BegripResult<()> {
        if self.get(id).await?.is_none() {
            return Err(BegripError::NotFound {
                entity: "definitie".to_string(),
                id: id.to_string(),
            });
        }

        let mut set_clauses: Vec<&str> = Vec::new();
        let mut text_binds: Vec<String> = Vec::new();
        let mut changed: Vec<&str> = Vec::new();

        if let Some(text) = &updates.text {
            set_clauses.push("definitie = ?");
            text_binds.push(text.clone());
            changed.push("definitie");
        }
        if let Some(category) = updates.ontological_category {
            set_clauses.push("ontologische_categorie = ?");
            text_binds.push(category.as_str().to_string());
            changed.push("ontologische_categorie");
        }
        if let Some(violations) = &updates.violations {
            set_clauses.push("violations = ?");
            text_binds.push(serde_json::to_string(violations)?);
            changed.push("violations");
        }
        if let Some(metadata) = &updates.metadata {
            set_clauses.push("metadata = ?");
            text_binds.push(serde_json::to_string(metadata)?);
            changed.push("metadata");
        }

        if set_clauses.is_empty() && updates.valid.is_none() {
            return Ok(());
        }

        let mut sql = String::from("UPDATE definities SET ");
        sql.push_str(&set_clauses.join(", "));
        if updates.valid.is_some() {
            if !set_clauses.is_empty() {
                sql.push_str(", ");
            }
            sql.push_str("valid = ?");
            changed.push("valid");
        }
        sql.push_str(", updated_at = ? WHERE id = ?");

        let mut query = sqlx::query(&sql);
        for bind in &text_binds {
            query = query.bind(bind);
        }
        if let Some(valid) = updates.valid {
            query = query.bind(valid);
        }
        query = query.bind(Utc::now()).bind(id);

        query
            .execute(&self.pool)
            .await
            .map_err(Self::db_err("update"))?;

        self.log_history(
            id,
            "updated",
            Some(updated_by),
            Some(&format!("Definitie geüpdatet: {}", changed.join(", "))),
        )
        .await?;

        Ok(())
    }

    pub async fn get_statistics(&self) -> BegripResult<RepositoryStatistics> {
        let total: i64 = sqlx::query("SELECT COUNT(*) AS count FROM definities")
            .fetch_one(&self.pool)
            .await
            .map_err(Self::db_err("get_statistics"))?
            .get("count");

        let status_rows = sqlx::query("SELECT status, COUNT(*) AS count FROM definities GROUP BY status")
            .fetch_all(&self.pool)
            .await
            .map_err(Self::db_err("get_statistics"))?;
        let by_status = status_rows
            .iter()
            .map(|row| (row.get::<String, _>("status"), row.get::<i64, _>("count")))
            .collect();

        let category_rows = sqlx::query(
            r#"
            SELECT ontologische_categorie AS categorie, COUNT(*) AS count
            FROM definities
            WHERE ontologische_categorie IS NOT NULL
            GROUP BY ontologische_categorie
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_err("get_statistics"))?;
        let by_category = category_rows
            .iter()
            .map(|row| (row.get::<String, _>("categorie"), row.get::<i64, _>("count")))
            .collect();

        let avg: Option<f64> = sqlx::query("SELECT AVG(valid) AS avg_valid FROM definities")
            .fetch_one(&self.pool)
            .await
            .map_err(Self::db_err("get_statistics"))?
            .get("avg_valid");

        Ok(RepositoryStatistics {
            total_definitions: total,
            by_status,
            by_category,
            average_validation_score: avg,
        })
    }

    /// Append-only history entry; every mutating call records one. Callers
    /// may add their own entries (failed attempts, reviews).
    pub async fn log_history(
        &self,
        definitie_id: i64,
        change_type: &str,
        actor: Option<&str>,
        reason: Option<&str>,
    ) -> BegripResult<()> {
        sqlx::query(
            r#"
            INSERT INTO definitie_geschiedenis
                (definitie_id, wijziging_type, wijziging_reden, gewijzigd_door, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(definitie_id)
        .bind(change_type)
        .bind(reason)
        .bind(actor)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Self::db_err("log_history"))?;
        Ok(())
    }

    pub async fn get_history(&self, definitie_id: i64) -> BegripResult<Vec<(String, Option<String>, DateTime<Utc>)>> {
        let rows = sqlx::query(
            r#"
            SELECT wijziging_type, wijziging_reden, created_at
            FROM definitie_geschiedenis
            WHERE definitie_id = ?
            ORDER BY created_at, id
            "#,
        )
        .bind(definitie_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_err("get_history"))?;

        Ok(rows
            .iter()
            .map(|row| {
                (
                    row.get::<String, _>("wijziging_type"),
                    row.get::<Option<String>, _>("wijziging_reden"),
                    row.get::<DateTime<Utc>, _>("created_at"),
                )
            })
            .collect())
    }

    fn definition_from_row(row: &sqlx::sqlite::SqliteRow) -> BegripResult<Definition> {
        let status_raw: String = row.get("status");
        let status = DefinitionStatus::parse(&status_raw).ok_or_else(|| BegripError::InternalError {
            message: format!("onbekende definitiestatus in database: {status_raw}"),
        })?;

        let category: Option<String> = row.get("ontologische_categorie");

        Ok(Definition {
            id: Some(row.get("id")),
            term: row.get("begrip"),
            text: row.get("definitie"),
            ontological_category: category.as_deref().and_then(OntologicalCategory::parse),
            organizational_context: serde_json::from_str(row.get::<&str, _>("organisatorische_context"))?,
            juridical_context: serde_json::from_str(row.get::<&str, _>("juridische_context"))?,
            legal_basis: serde_json::from_str(row.get::<&str, _>("wettelijke_basis"))?,
            original_text: row.get("original_text"),
            valid: row.get("valid"),
            violations: serde_json::from_str(row.get::<&str, _>("violations"))?,
            metadata: serde_json::from_str(row.get::<&str, _>("metadata"))?,
            status,
            version: row.get("version_number"),
            previous_version_id: row.get("previous_version_id"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            created_by: row.get("created_by"),
            approved_by: row.get("approved_by"),
            approved_at: row.get::<Option<DateTime<Utc>>, _>("approved_at"),
        })
    }
}
