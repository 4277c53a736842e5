use begrip_core::{
    normalize_term, BegripError, BegripResult, MemberSource, MemberStatus, SynonymGroup,
    SynonymGroupMember, WeightedSynonym,
};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};
use std::sync::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Valid ORDER BY columns (whitelist for SQL injection prevention).
pub const ORDER_BY_WHITELIST: [&str; 7] = [
    "weight",
    "is_preferred",
    "term",
    "created_at",
    "updated_at",
    "usage_count",
    "status",
];

pub type InvalidationCallback = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Clone, serde::Serialize)]
pub struct RegistryStatistics {
    pub total_groups: i64,
    pub total_members: i64,
    pub members_by_status: std::collections::HashMap<String, i64>,
}

/// Data access layer over the synonym graph: groups with weighted members,
/// bidirectional lookup and invalidation callbacks toward the cache layer.
pub struct SynonymRegistry {
    pool: Pool<Sqlite>,
    preferred_threshold: f64,
    callbacks: Mutex<Vec<InvalidationCallback>>,
}

impl SynonymRegistry {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self {
            pool,
            preferred_threshold: 0.95,
            callbacks: Mutex::new(Vec::new()),
        }
    }

    pub fn with_preferred_threshold(mut self, threshold: f64) -> Self {
        self.preferred_threshold = threshold;
        self
    }

    /// Open an in-memory database with its schema applied. A single
    /// connection keeps the in-memory database alive and shared.
    pub async fn connect_in_memory() -> BegripResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| BegripError::DatabaseError {
                operation: "connect_in_memory".to_string(),
                reason: e.to_string(),
            })?;
        let registry = Self::new(pool);
        registry.initialize().await?;
        Ok(registry)
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn initialize(&self) -> BegripResult<()> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS synonym_groups (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                canonical_term TEXT NOT NULL UNIQUE,
                domain TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                created_by TEXT
            );
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS synonym_group_members (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                group_id INTEGER NOT NULL REFERENCES synonym_groups(id),
                term TEXT NOT NULL,
                weight REAL NOT NULL,
                is_preferred INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL CHECK (status IN ('active', 'ai_pending', 'rejected_auto', 'deprecated')),
                source TEXT NOT NULL CHECK (source IN ('db_seed', 'manual', 'ai_suggested', 'imported_yaml')),
                context_json TEXT,
                definitie_id INTEGER,
                usage_count INTEGER NOT NULL DEFAULT 0,
                last_used_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                created_by TEXT,
                reviewed_by TEXT,
                reviewed_at TEXT
            );
            "#,
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_synonym_members_unique
                ON synonym_group_members (group_id, term, COALESCE(definitie_id, 0));
            "#,
            r#"
            CREATE INDEX IF NOT EXISTS idx_synonym_members_term
                ON synonym_group_members (term);
            "#,
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| BegripError::DatabaseError {
                    operation: "initialize_synonym_schema".to_string(),
                    reason: e.to_string(),
                })?;
        }

        Ok(())
    }

    /// Register a cache invalidation callback. Callbacks run synchronously on
    /// every mutation; a panicking callback is logged and swallowed so it can
    /// never fail the mutation itself.
    pub fn register_invalidation_callback(&self, callback: InvalidationCallback) {
        if let Ok(mut callbacks) = self.callbacks.lock() {
            callbacks.push(callback);
        }
    }

    fn fire_invalidation(&self, terms: &[String]) {
        let Ok(callbacks) = self.callbacks.lock() else {
            return;
        };
        for term in terms {
            for callback in callbacks.iter() {
                let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    callback(term);
                }));
                if result.is_err() {
                    warn!(term = %term, "invalidation callback faalde; genegeerd");
                }
            }
        }
    }

    /// Canonical term plus every member term of a group, for invalidation.
    async fn group_terms(&self, group_id: i64) -> BegripResult<Vec<String>> {
        let mut terms = Vec::new();

        let group_row = sqlx::query("SELECT canonical_term FROM synonym_groups WHERE id = ?")
            .bind(group_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BegripError::DatabaseError {
                operation: "group_terms".to_string(),
                reason: e.to_string(),
            })?;
        if let Some(row) = group_row {
            terms.push(row.get::<String, _>("canonical_term"));
        }

        let member_rows = sqlx::query("SELECT term FROM synonym_group_members WHERE group_id = ?")
            .bind(group_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| BegripError::DatabaseError {
                operation: "group_terms".to_string(),
                reason: e.to_string(),
            })?;
        for row in member_rows {
            terms.push(row.get::<String, _>("term"));
        }

        Ok(terms)
    }

    /// Idempotent: an existing canonical term returns the stored group.
    pub async fn get_or_create_group(
        &self,
        canonical_term: &str,
        domain: Option<&str>,
        created_by: &str,
    ) -> BegripResult<SynonymGroup> {
        let canonical = canonical_term.trim();
        if canonical.is_empty() {
            return Err(BegripError::ValidationError {
                field: "canonical_term".to_string(),
                message: "canonical_term mag niet leeg zijn".to_string(),
            });
        }

        if let Some(row) = sqlx::query("SELECT * FROM synonym_groups WHERE canonical_term = ?")
            .bind(canonical)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BegripError::DatabaseError {
                operation: "get_or_create_group".to_string(),
                reason: e.to_string(),
            })?
        {
            return Ok(Self::group_from_row(&row));
        }

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO synonym_groups (canonical_term, domain, created_at, updated_at, created_by)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(canonical)
        .bind(domain)
        .bind(now)
        .bind(now)
        .bind(created_by)
        .execute(&self.pool)
        .await
        .map_err(|e| BegripError::DatabaseError {
            operation: "get_or_create_group".to_string(),
            reason: e.to_string(),
        })?;

        let id = result.last_insert_rowid();
        info!(canonical, id, "synoniemgroep aangemaakt");

        Ok(SynonymGroup {
            id,
            canonical_term: canonical.to_string(),
            domain: domain.map(str::to_string),
            created_at: now,
            updated_at: now,
            created_by: Some(created_by.to_string()),
        })
    }

    /// Idempotent on `(group_id, term, definitie_id)`: a duplicate add returns
    /// the existing member id and does not fire invalidation callbacks.
    #[allow(clippy::too_many_arguments)]
    pub async fn add_group_member(
        &self,
        group_id: i64,
        term: &str,
        weight: f64,
        status: MemberStatus,
        source: MemberSource,
        context_json: Option<&str>,
        definitie_id: Option<i64>,
        created_by: &str,
    ) -> BegripResult<i64> {
        let term = term.trim();
        if term.is_empty() {
            return Err(BegripError::ValidationError {
                field: "term".to_string(),
                message: "term mag niet leeg zijn".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&weight) {
            return Err(BegripError::ValidationError {
                field: "weight".to_string(),
                message: format!("weight moet tussen 0.0 en 1.0 zijn: {weight}"),
            });
        }

        let group_exists = sqlx::query("SELECT id FROM synonym_groups WHERE id = ?")
            .bind(group_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BegripError::DatabaseError {
                operation: "add_group_member".to_string(),
                reason: e.to_string(),
            })?;
        if group_exists.is_none() {
            return Err(BegripError::NotFound {
                entity: "synonym_group".to_string(),
                id: group_id.to_string(),
            });
        }

        let existing = sqlx::query(
            r#"
            SELECT id FROM synonym_group_members
            WHERE group_id = ? AND term = ? AND COALESCE(definitie_id, 0) = COALESCE(?, 0)
            "#,
        )
        .bind(group_id)
        .bind(term)
        .bind(definitie_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| BegripError::DatabaseError {
            operation: "add_group_member".to_string(),
            reason: e.to_string(),
        })?;

        if let Some(row) = existing {
            let id: i64 = row.get("id");
            debug!(term, group_id, id, "member bestond al; idempotente add");
            return Ok(id);
        }

        let now = Utc::now();
        let is_preferred = weight >= self.preferred_threshold;
        let result = sqlx::query(
            r#"
            INSERT INTO synonym_group_members (
                group_id, term, weight, is_preferred, status, source,
                context_json, definitie_id, usage_count, created_at, updated_at, created_by
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?)
            "#,
        )
        .bind(group_id)
        .bind(term)
        .bind(weight)
        .bind(is_preferred)
        .bind(status.as_str())
        .bind(source.as_str())
        .bind(context_json)
        .bind(definitie_id)
        .bind(now)
        .bind(now)
        .bind(created_by)
        .execute(&self.pool)
        .await
        .map_err(|e| BegripError::DatabaseError {
            operation: "add_group_member".to_string(),
            reason: e.to_string(),
        })?;

        let id = result.last_insert_rowid();
        debug!(term, group_id, id, status = status.as_str(), "member toegevoegd");

        let terms = self.group_terms(group_id).await?;
        self.fire_invalidation(&terms);

        Ok(id)
    }

    fn validate_order_by(order_by: &str) -> BegripResult<&str> {
        if ORDER_BY_WHITELIST.contains(&order_by) {
            Ok(order_by)
        } else {
            Err(BegripError::ValidationError {
                field: "order_by".to_string(),
                message: format!(
                    "Invalid order_by column '{order_by}'. Toegestaan: {}",
                    ORDER_BY_WHITELIST.join(", ")
                ),
            })
        }
    }

    /// Bidirectional lookup: a term matching any member or canonical term
    /// yields the other members of that group.
    pub async fn get_synonyms(
        &self,
        term: &str,
        statuses: &[MemberStatus],
        min_weight: f64,
        order_by: Option<&str>,
        limit: u32,
    ) -> BegripResult<Vec<WeightedSynonym>> {
        let term_normalized = normalize_term(term);
        if term_normalized.is_empty() || statuses.is_empty() {
            return Ok(Vec::new());
        }

        let order_clause = match order_by {
            Some(column) => {
                let column = Self::validate_order_by(column)?;
                format!("m.{column} DESC")
            }
            None => "m.is_preferred DESC, m.weight DESC, m.usage_count DESC".to_string(),
        };

        let placeholders = vec!["?"; statuses.len()].join(", ");
        // Concatenation is limited to the whitelist-validated order clause and
        // bind placeholders.
        let sql = format!(
            r#"
            SELECT m.term, m.weight, m.status, m.is_preferred, m.usage_count
            FROM synonym_group_members m
            WHERE m.group_id IN (
                SELECT group_id FROM synonym_group_members WHERE LOWER(term) = ?
                UNION
                SELECT id FROM synonym_groups WHERE LOWER(canonical_term) = ?
            )
              AND LOWER(m.term) <> ?
              AND m.status IN ({placeholders})
              AND m.weight >= ?
            ORDER BY {order_clause}
            LIMIT ?
            "#
        );

        let mut query = sqlx::query(&sql)
            .bind(&term_normalized)
            .bind(&term_normalized)
            .bind(&term_normalized);
        for status in statuses {
            query = query.bind(status.as_str());
        }
        query = query.bind(min_weight).bind(limit);

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| BegripError::DatabaseError {
                operation: "get_synonyms".to_string(),
                reason: e.to_string(),
            })?;

        rows.iter().map(Self::weighted_from_row).collect()
    }

    pub async fn get_group_members(
        &self,
        group_id: i64,
        statuses: Option<&[MemberStatus]>,
        order_by: Option<&str>,
    ) -> BegripResult<Vec<SynonymGroupMember>> {
        let order_clause = match order_by {
            Some(column) => {
                let column = Self::validate_order_by(column)?;
                format!("{column} DESC")
            }
            None => "is_preferred DESC, weight DESC, usage_count DESC".to_string(),
        };

        let status_clause = match statuses {
            Some(statuses) if !statuses.is_empty() => {
                let placeholders = vec!["?"; statuses.len()].join(", ");
                format!("AND status IN ({placeholders})")
            }
            _ => String::new(),
        };

        let sql = format!(
            r#"
            SELECT * FROM synonym_group_members
            WHERE group_id = ? {status_clause}
            ORDER BY {order_clause}
            "#
        );

        let mut query = sqlx::query(&sql).bind(group_id);
        if let Some(statuses) = statuses {
            for status in statuses {
                query = query.bind(status.as_str());
            }
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| BegripError::DatabaseError {
                operation: "get_group_members".to_string(),
                reason: e.to_string(),
            })?;

        rows.iter().map(Self::member_from_row).collect()
    }

    /// Status review: records the reviewer and review timestamp.
    pub async fn update_member_status(
        &self,
        member_id: i64,
        new_status: MemberStatus,
        reviewed_by: &str,
    ) -> BegripResult<()> {
        let row = sqlx::query("SELECT group_id FROM synonym_group_members WHERE id = ?")
            .bind(member_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BegripError::DatabaseError {
                operation: "update_member_status".to_string(),
                reason: e.to_string(),
            })?
            .ok_or_else(|| BegripError::NotFound {
                entity: "synonym_group_member".to_string(),
                id: member_id.to_string(),
            })?;
        let group_id: i64 = row.get("group_id");

        let now = Utc::now();
        sqlx::query(
            r#"
            UPDATE synonym_group_members
            SET status = ?, reviewed_by = ?, reviewed_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(new_status.as_str())
        .bind(reviewed_by)
        .bind(now)
        .bind(now)
        .bind(member_id)
        .execute(&self.pool)
        .await
        .map_err(|e| BegripError::DatabaseError {
            operation: "update_member_status".to_string(),
            reason: e.to_string(),
        })?;

        info!(member_id, status = new_status.as_str(), reviewed_by, "memberstatus bijgewerkt");

        let terms = self.group_terms(group_id).await?;
        self.fire_invalidation(&terms);

        Ok(())
    }

    /// With `cascade=false` the call refuses when members still exist.
    pub async fn delete_group(&self, group_id: i64, cascade: bool) -> BegripResult<()> {
        let terms = self.group_terms(group_id).await?;
        if terms.is_empty() {
            return Err(BegripError::NotFound {
                entity: "synonym_group".to_string(),
                id: group_id.to_string(),
            });
        }

        let member_count: i64 =
            sqlx::query("SELECT COUNT(*) AS count FROM synonym_group_members WHERE group_id = ?")
                .bind(group_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| BegripError::DatabaseError {
                    operation: "delete_group".to_string(),
                    reason: e.to_string(),
                })?
                .get("count");

        if !cascade && member_count > 0 {
            return Err(BegripError::ValidationError {
                field: "cascade".to_string(),
                message: format!(
                    "groep {group_id} heeft {member_count} leden; verwijderen vereist cascade=true"
                ),
            });
        }

        let mut tx = self.pool.begin().await.map_err(|e| BegripError::DatabaseError {
            operation: "delete_group".to_string(),
            reason: e.to_string(),
        })?;

        sqlx::query("DELETE FROM synonym_group_members WHERE group_id = ?")
            .bind(group_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| BegripError::DatabaseError {
                operation: "delete_group".to_string(),
                reason: e.to_string(),
            })?;

        sqlx::query("DELETE FROM synonym_groups WHERE id = ?")
            .bind(group_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| BegripError::DatabaseError {
                operation: "delete_group".to_string(),
                reason: e.to_string(),
            })?;

        tx.commit().await.map_err(|e| BegripError::DatabaseError {
            operation: "delete_group".to_string(),
            reason: e.to_string(),
        })?;

        info!(group_id, members = member_count, "synoniemgroep verwijderd");
        self.fire_invalidation(&terms);

        Ok(())
    }

    /// Bump usage analytics when a synonym is injected into a prompt.
    pub async fn record_usage(&self, member_id: i64) -> BegripResult<()> {
        sqlx::query(
            r#"
            UPDATE synonym_group_members
            SET usage_count = usage_count + 1, last_used_at = ?
            WHERE id = ?
            "#,
        )
        .bind(Utc::now())
        .bind(member_id)
        .execute(&self.pool)
        .await
        .map_err(|e| BegripError::DatabaseError {
            operation: "record_usage".to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    pub async fn get_statistics(&self) -> BegripResult<RegistryStatistics> {
        let total_groups: i64 = sqlx::query("SELECT COUNT(*) AS count FROM synonym_groups")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| BegripError::DatabaseError {
                operation: "get_statistics".to_string(),
                reason: e.to_string(),
            })?
            .get("count");

        let total_members: i64 = sqlx::query("SELECT COUNT(*) AS count FROM synonym_group_members")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| BegripError::DatabaseError {
                operation: "get_statistics".to_string(),
                reason: e.to_string(),
            })?
            .get("count");

        let rows = sqlx::query(
            "SELECT status, COUNT(*) AS count FROM synonym_group_members GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BegripError::DatabaseError {
            operation: "get_statistics".to_string(),
            reason: e.to_string(),
        })?;

        let members_by_status = rows
            .iter()
            .map(|row| (row.get::<String, _>("status"), row.get::<i64, _>("count")))
            .collect();

        Ok(RegistryStatistics {
            total_groups,
            total_members,
            members_by_status,
        })
    }

    fn group_from_row(row: &sqlx::sqlite::SqliteRow) -> SynonymGroup {
        SynonymGroup {
            id: row.get("id"),
            canonical_term: row.get("canonical_term"),
            domain: row.get("domain"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            created_by: row.get("created_by"),
        }
    }

    fn weighted_from_row(row: &sqlx::sqlite::SqliteRow) -> BegripResult<WeightedSynonym> {
        let status_raw: String = row.get("status");
        let status = MemberStatus::parse(&status_raw).ok_or_else(|| BegripError::InternalError {
            message: format!("onbekende memberstatus in database: {status_raw}"),
        })?;
        Ok(WeightedSynonym {
            term: row.get("term"),
            weight: row.get("weight"),
            status,
            is_preferred: row.get("is_preferred"),
            usage_count: row.get("usage_count"),
        })
    }

    fn member_from_row(row: &sqlx::sqlite::SqliteRow) -> BegripResult<SynonymGroupMember> {
        let status_raw: String = row.get("status");
        let source_raw: String = row.get("source");
        let status = MemberStatus::parse(&status_raw).ok_or_else(|| BegripError::InternalError {
            message: format!("onbekende memberstatus in database: {status_raw}"),
        })?;
        let source = MemberSource::parse(&source_raw).ok_or_else(|| BegripError::InternalError {
            message: format!("onbekende membersource in database: {source_raw}"),
        })?;

        Ok(SynonymGroupMember {
            id: row.get("id"),
            group_id: row.get("group_id"),
            term: row.get("term"),
            weight: row.get("weight"),
            is_preferred: row.get("is_preferred"),
            status,
            source,
            context_json: row.get("context_json"),
            definitie_id: row.get("definitie_id"),
            usage_count: row.get("usage_count"),
            last_used_at: row.get::<Option<DateTime<Utc>>, _>("last_used_at"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            created_by: row.get("created_by"),
            reviewed_by: row.get("reviewed_by"),
            reviewed_at: row.get::<Option<DateTime<Utc>>, _>("reviewed_at"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn registry() -> SynonymRegistry {
        SynonymRegistry::connect_in_memory().await.unwrap()
    }

    async fn seed_group(registry: &SynonymRegistry) -> i64 {
        let group = registry
            .get_or_create_group("voorlopige hechtenis", Some("strafrecht"), "tester")
            .await
            .unwrap();
        registry
            .add_group_member(group.id, "voorarrest", 0.95, MemberStatus::Active, MemberSource::Manual, None, None, "tester")
            .await
            .unwrap();
        registry
            .add_group_member(group.id, "bewaring", 0.90, MemberStatus::Active, MemberSource::Manual, None, None, "tester")
            .await
            .unwrap();
        registry
            .add_group_member(group.id, "preventieve hechtenis", 0.85, MemberStatus::AiPending, MemberSource::AiSuggested, None, None, "tester")
            .await
            .unwrap();
        group.id
    }

    #[tokio::test]
    async fn test_get_or_create_group_idempotent() {
        let registry = registry().await;
        let first = registry.get_or_create_group("oproeping", None, "t").await.unwrap();
        let second = registry.get_or_create_group("oproeping", None, "t").await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_empty_canonical_term_rejected() {
        let registry = registry().await;
        assert!(registry.get_or_create_group("  ", None, "t").await.is_err());
    }

    #[tokio::test]
    async fn test_add_member_idempotent_without_second_invalidation() {
        let registry = registry().await;
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();
        registry.register_invalidation_callback(Arc::new(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        }));

        let group = registry.get_or_create_group("dagvaarding", None, "t").await.unwrap();
        let first = registry
            .add_group_member(group.id, "oproeping", 0.8, MemberStatus::Active, MemberSource::Manual, None, None, "t")
            .await
            .unwrap();
        let fired_after_first = counter.load(Ordering::SeqCst);
        assert!(fired_after_first > 0);

        let second = registry
            .add_group_member(group.id, "oproeping", 0.8, MemberStatus::Active, MemberSource::Manual, None, None, "t")
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(counter.load(Ordering::SeqCst), fired_after_first);
    }

    #[tokio::test]
    async fn test_add_member_validation() {
        let registry = registry().await;
        let group = registry.get_or_create_group("sanctie", None, "t").await.unwrap();
        assert!(registry
            .add_group_member(group.id, " ", 0.5, MemberStatus::Active, MemberSource::Manual, None, None, "t")
            .await
            .is_err());
        assert!(registry
            .add_group_member(group.id, "maatregel", 1.4, MemberStatus::Active, MemberSource::Manual, None, None, "t")
            .await
            .is_err());
        assert!(registry
            .add_group_member(9999, "maatregel", 0.5, MemberStatus::Active, MemberSource::Manual, None, None, "t")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_bidirectional_lookup() {
        let registry = registry().await;
        seed_group(&registry).await;

        // Via the canonical term.
        let via_canonical = registry
            .get_synonyms("voorlopige hechtenis", &[MemberStatus::Active], 0.0, None, 10)
            .await
            .unwrap();
        let terms: Vec<&str> = via_canonical.iter().map(|s| s.term.as_str()).collect();
        assert!(terms.contains(&"voorarrest"));
        assert!(terms.contains(&"bewaring"));

        // Via a member: the other members come back, not the queried term.
        let via_member = registry
            .get_synonyms("voorarrest", &[MemberStatus::Active], 0.0, None, 10)
            .await
            .unwrap();
        let terms: Vec<&str> = via_member.iter().map(|s| s.term.as_str()).collect();
        assert!(terms.contains(&"bewaring"));
        assert!(!terms.contains(&"voorarrest"));
    }

    #[tokio::test]
    async fn test_status_visibility() {
        let registry = registry().await;
        let group_id = seed_group(&registry).await;
        registry
            .add_group_member(group_id, "afgekeurd", 0.9, MemberStatus::RejectedAuto, MemberSource::AiSuggested, None, None, "t")
            .await
            .unwrap();

        let strict = registry
            .get_synonyms("voorlopige hechtenis", &[MemberStatus::Active], 0.0, None, 10)
            .await
            .unwrap();
        assert_eq!(strict.len(), 2);

        let pragmatic = registry
            .get_synonyms(
                "voorlopige hechtenis",
                &[MemberStatus::Active, MemberStatus::AiPending],
                0.0,
                None,
                10,
            )
            .await
            .unwrap();
        assert_eq!(pragmatic.len(), 3);
        assert!(pragmatic.iter().all(|s| s.term != "afgekeurd"));
    }

    #[tokio::test]
    async fn test_default_ordering_prefers_weight() {
        let registry = registry().await;
        seed_group(&registry).await;
        let synonyms = registry
            .get_synonyms("voorlopige hechtenis", &[MemberStatus::Active], 0.0, None, 10)
            .await
            .unwrap();
        // voorarrest carries weight 0.95 and is marked preferred at the
        // default threshold.
        assert_eq!(synonyms[0].term, "voorarrest");
        assert!(synonyms[0].is_preferred);
    }

    #[tokio::test]
    async fn test_order_by_whitelist_enforced() {
        let registry = registry().await;
        seed_group(&registry).await;

        for column in ORDER_BY_WHITELIST {
            assert!(registry
                .get_synonyms("voorlopige hechtenis", &[MemberStatus::Active], 0.0, Some(column), 10)
                .await
                .is_ok());
        }

        let err = registry
            .get_synonyms(
                "voorlopige hechtenis",
                &[MemberStatus::Active],
                0.0,
                Some("weight; DROP TABLE synonym_groups"),
                10,
            )
            .await
            .unwrap_err();
        let message = err.to_string();
        for column in ORDER_BY_WHITELIST {
            assert!(message.contains(column), "whitelist mist {column} in: {message}");
        }

        // The tables are untouched after the attempt.
        assert!(registry.get_statistics().await.unwrap().total_groups >= 1);
    }

    #[tokio::test]
    async fn test_get_group_members_order_by_injection() {
        let registry = registry().await;
        let group_id = seed_group(&registry).await;
        let err = registry
            .get_group_members(group_id, None, Some("weight UNION SELECT * FROM synonym_groups"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("order_by"));
    }

    #[tokio::test]
    async fn test_min_weight_filter() {
        let registry = registry().await;
        seed_group(&registry).await;
        let synonyms = registry
            .get_synonyms("voorlopige hechtenis", &[MemberStatus::Active], 0.92, None, 10)
            .await
            .unwrap();
        assert_eq!(synonyms.len(), 1);
        assert_eq!(synonyms[0].term, "voorarrest");
    }

    #[tokio::test]
    async fn test_update_member_status_records_reviewer() {
        let registry = registry().await;
        let group_id = seed_group(&registry).await;
        let members = registry
            .get_group_members(group_id, Some(&[MemberStatus::AiPending]), None)
            .await
            .unwrap();
        let pending = &members[0];

        registry
            .update_member_status(pending.id, MemberStatus::Active, "reviewer1")
            .await
            .unwrap();

        let members = registry.get_group_members(group_id, None, None).await.unwrap();
        let updated = members.iter().find(|m| m.id == pending.id).unwrap();
        assert_eq!(updated.status, MemberStatus::Active);
        assert_eq!(updated.reviewed_by.as_deref(), Some("reviewer1"));
        assert!(updated.reviewed_at.is_some());
    }

    #[tokio::test]
    async fn test_delete_group_cascade() {
        let registry = registry().await;
        let group_id = seed_group(&registry).await;

        let refused = registry.delete_group(group_id, false).await;
        assert!(refused.is_err());

        registry.delete_group(group_id, true).await.unwrap();
        let stats = registry.get_statistics().await.unwrap();
        assert_eq!(stats.total_groups, 0);
        assert_eq!(stats.total_members, 0);
    }

    #[tokio::test]
    async fn test_delete_unknown_group() {
        let registry = registry().await;
        assert!(registry.delete_group(424242, true).await.is_err());
    }

    #[tokio::test]
    async fn test_record_usage() {
        let registry = registry().await;
        let group_id = seed_group(&registry).await;
        let members = registry.get_group_members(group_id, None, None).await.unwrap();
        registry.record_usage(members[0].id).await.unwrap();
        let members_after = registry.get_group_members(group_id, None, None).await.unwrap();
        let bumped = members_after.iter().find(|m| m.id == members[0].id).unwrap();
        assert_eq!(bumped.usage_count, 1);
        assert!(bumped.last_used_at.is_some());
    }

    #[tokio::test]
    async fn test_scoped_member_distinct_from_global() {
        let registry = registry().await;
        let group = registry.get_or_create_group("toezicht", None, "t").await.unwrap();
        let global = registry
            .add_group_member(group.id, "controle", 0.8, MemberStatus::Active, MemberSource::Manual, None, None, "t")
            .await
            .unwrap();
        let scoped = registry
            .add_group_member(group.id, "controle", 0.8, MemberStatus::Active, MemberSource::Manual, None, Some(7), "t")
            .await
            .unwrap();
        assert_ne!(global, scoped);
    }
}
