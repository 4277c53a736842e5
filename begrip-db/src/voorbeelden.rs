use crate::repository::DefinitionRepository;
use begrip_core::{BegripError, BegripResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use tracing::info;

/// Review rating for an example sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoorbeeldRating {
    Goed,
    Matig,
    Slecht,
}

impl VoorbeeldRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoorbeeldRating::Goed => "goed",
            VoorbeeldRating::Matig => "matig",
            VoorbeeldRating::Slecht => "slecht",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "goed" => Some(VoorbeeldRating::Goed),
            "matig" => Some(VoorbeeldRating::Matig),
            "slecht" => Some(VoorbeeldRating::Slecht),
            _ => None,
        }
    }
}

/// An example sentence attached to a definition; not part of the definition
/// text itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voorbeeld {
    pub id: i64,
    pub definitie_id: i64,
    pub zin: String,
    pub rating: Option<VoorbeeldRating>,
    pub actief: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl DefinitionRepository {
    /// Replace the active example set of a definition: existing active rows
    /// are soft-deactivated, the new sentences become the active set.
    pub async fn save_voorbeelden(
        &self,
        definitie_id: i64,
        zinnen: &[String],
        created_by: &str,
    ) -> BegripResult<Vec<i64>> {
        let now = Utc::now();

        sqlx::query("UPDATE voorbeelden SET actief = 0, updated_at = ? WHERE definitie_id = ? AND actief = 1")
            .bind(now)
            .bind(definitie_id)
            .execute(self.pool())
            .await
            .map_err(|e| BegripError::DatabaseError {
                operation: "save_voorbeelden".to_string(),
                reason: e.to_string(),
            })?;

        let mut ids = Vec::with_capacity(zinnen.len());
        for zin in zinnen {
            let result = sqlx::query(
                r#"
                INSERT INTO voorbeelden (definitie_id, zin, actief, created_at, updated_at, created_by)
                VALUES (?, ?, 1, ?, ?, ?)
                "#,
            )
            .bind(definitie_id)
            .bind(zin)
            .bind(now)
            .bind(now)
            .bind(created_by)
            .execute(self.pool())
            .await
            .map_err(|e| BegripError::DatabaseError {
                operation: "save_voorbeelden".to_string(),
                reason: e.to_string(),
            })?;
            ids.push(result.last_insert_rowid());
        }

        self.log_history(
            definitie_id,
            "voorbeelden_saved",
            Some(created_by),
            Some(&format!("{} voorbeelden opgeslagen", zinnen.len())),
        )
        .await?;

        info!(definitie_id, count = zinnen.len(), "voorbeelden opgeslagen");
        Ok(ids)
    }

    pub async fn get_voorbeelden(
        &self,
        definitie_id: i64,
        only_active: bool,
    ) -> BegripResult<Vec<Voorbeeld>> {
        let sql = if only_active {
            "SELECT * FROM voorbeelden WHERE definitie_id = ? AND actief = 1 ORDER BY id"
        } else {
            "SELECT * FROM voorbeelden WHERE definitie_id = ? ORDER BY id"
        };

        let rows = sqlx::query(sql)
            .bind(definitie_id)
            .fetch_all(self.pool())
            .await
            .map_err(|e| BegripError::DatabaseError {
                operation: "get_voorbeelden".to_string(),
                reason: e.to_string(),
            })?;

        rows.iter()
            .map(|row| {
                let rating: Option<String> = row.get("rating");
                Ok(Voorbeeld {
                    id: row.get("id"),
                    definitie_id: row.get("definitie_id"),
                    zin: row.get("zin"),
                    rating: rating.as_deref().and_then(VoorbeeldRating::parse),
                    actief: row.get("actief"),
                    created_at: row.get("created_at"),
                    updated_at: row.get("updated_at"),
                    created_by: row.get("created_by"),
                    reviewed_by: row.get("reviewed_by"),
                    reviewed_at: row.get::<Option<DateTime<Utc>>, _>("reviewed_at"),
                })
            })
            .collect()
    }

    pub async fn review_voorbeeld(
        &self,
        voorbeeld_id: i64,
        rating: VoorbeeldRating,
        reviewed_by: &str,
    ) -> BegripResult<()> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE voorbeelden
            SET rating = ?, reviewed_by = ?, reviewed_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(rating.as_str())
        .bind(reviewed_by)
        .bind(now)
        .bind(now)
        .bind(voorbeeld_id)
        .execute(self.pool())
        .await
        .map_err(|e| BegripError::DatabaseError {
            operation: "review_voorbeeld".to_string(),
            reason: e.to_string(),
        })?;

        if result.rows_affected() == 0 {
            return Err(BegripError::NotFound {
                entity: "voorbeeld".to_string(),
                id: voorbeeld_id.to_string(),
            });
        }
        Ok(())
    }

    pub async fn delete_voorbeeld(&self, voorbeeld_id: i64) -> BegripResult<()> {
        let result = sqlx::query("DELETE FROM voorbeelden WHERE id = ?")
            .bind(voorbeeld_id)
            .execute(self.pool())
            .await
            .map_err(|e| BegripError::DatabaseError {
                operation: "delete_voorbeeld".to_string(),
                reason: e.to_string(),
            })?;

        if result.rows_affected() == 0 {
            return Err(BegripError::NotFound {
                entity: "voorbeeld".to_string(),
                id: voorbeeld_id.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use begrip_core::Definition;

    async fn repo_with_definition() -> (DefinitionRepository, i64) {
        let repo = DefinitionRepository::connect_in_memory().await.unwrap();
        let def = Definition::new(
            "vervoersverbod",
            "Maatregel die verplaatsing van een persoon beperkt na veroordeling.",
            "tester",
        );
        let id = repo.save(&def).await.unwrap();
        (repo, id)
    }

    #[tokio::test]
    async fn test_save_and_get_voorbeelden() {
        let (repo, definitie_id) = repo_with_definition().await;
        let ids = repo
            .save_voorbeelden(
                definitie_id,
                &[
                    "De rechter legde een vervoersverbod op.".to_string(),
                    "Het vervoersverbod geldt voor twee jaar.".to_string(),
                ],
                "tester",
            )
            .await
            .unwrap();
        assert_eq!(ids.len(), 2);

        let voorbeelden = repo.get_voorbeelden(definitie_id, true).await.unwrap();
        assert_eq!(voorbeelden.len(), 2);
        assert!(voorbeelden.iter().all(|v| v.actief));
    }

    #[tokio::test]
    async fn test_resave_soft_deactivates() {
        let (repo, definitie_id) = repo_with_definition().await;
        repo.save_voorbeelden(definitie_id, &["Eerste zin.".to_string()], "tester")
            .await
            .unwrap();
        repo.save_voorbeelden(definitie_id, &["Tweede zin.".to_string()], "tester")
            .await
            .unwrap();

        let active = repo.get_voorbeelden(definitie_id, true).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].zin, "Tweede zin.");

        let all = repo.get_voorbeelden(definitie_id, false).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|v| !v.actief));
    }

    #[tokio::test]
    async fn test_review_records_rating() {
        let (repo, definitie_id) = repo_with_definition().await;
        let ids = repo
            .save_voorbeelden(definitie_id, &["Een zin.".to_string()], "tester")
            .await
            .unwrap();

        repo.review_voorbeeld(ids[0], VoorbeeldRating::Goed, "reviewer")
            .await
            .unwrap();

        let voorbeelden = repo.get_voorbeelden(definitie_id, true).await.unwrap();
        assert_eq!(voorbeelden[0].rating, Some(VoorbeeldRating::Goed));
        assert_eq!(voorbeelden[0].reviewed_by.as_deref(), Some("reviewer"));
    }

    #[tokio::test]
    async fn test_delete_voorbeeld() {
        let (repo, definitie_id) = repo_with_definition().await;
        let ids = repo
            .save_voorbeelden(definitie_id, &["Weg ermee.".to_string()], "tester")
            .await
            .unwrap();

        repo.delete_voorbeeld(ids[0]).await.unwrap();
        assert!(repo.get_voorbeelden(definitie_id, false).await.unwrap().is_empty());
        assert!(repo.delete_voorbeeld(ids[0]).await.is_err());
    }
}
