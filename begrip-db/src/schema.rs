use begrip_core::{BegripError, BegripResult};
use sqlx::{Pool, Sqlite};

pub struct DatabaseSchema;

impl DatabaseSchema {
    pub async fn create_all_tables(pool: &Pool<Sqlite>) -> BegripResult<()> {
        Self::create_definities_table(pool).await?;
        Self::create_geschiedenis_table(pool).await?;
        Self::create_voorbeelden_table(pool).await?;
        Self::create_feedback_table(pool).await?;
        Self::create_import_export_logs_table(pool).await?;
        Self::create_indexes(pool).await?;
        Ok(())
    }

    async fn execute(pool: &Pool<Sqlite>, operation: &str, query: &str) -> BegripResult<()> {
        sqlx::query(query)
            .execute(pool)
            .await
            .map_err(|e| BegripError::DatabaseError {
                operation: operation.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn create_definities_table(pool: &Pool<Sqlite>) -> BegripResult<()> {
        let query = r#"
            CREATE TABLE IF NOT EXISTS definities (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                begrip TEXT NOT NULL,
                definitie TEXT NOT NULL,
                ontologische_categorie TEXT,
                organisatorische_context TEXT NOT NULL DEFAULT '[]',
                juridische_context TEXT NOT NULL DEFAULT '[]',
                wettelijke_basis TEXT NOT NULL DEFAULT '[]',
                original_text TEXT,
                valid INTEGER NOT NULL DEFAULT 0,
                violations TEXT NOT NULL DEFAULT '[]',
                metadata TEXT NOT NULL DEFAULT '{}',
                status TEXT NOT NULL DEFAULT 'draft',
                version_number INTEGER NOT NULL DEFAULT 1,
                previous_version_id INTEGER,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                created_by TEXT NOT NULL,
                approved_by TEXT,
                approved_at TEXT,
                CONSTRAINT valid_status CHECK (status IN ('draft', 'review', 'established', 'archived'))
            );
        "#;
        Self::execute(pool, "create_definities_table", query).await
    }

    async fn create_geschiedenis_table(pool: &Pool<Sqlite>) -> BegripResult<()> {
        let query = r#"
            CREATE TABLE IF NOT EXISTS definitie_geschiedenis (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                definitie_id INTEGER NOT NULL,
                wijziging_type TEXT NOT NULL,
                wijziging_reden TEXT,
                gewijzigd_door TEXT,
                created_at TEXT NOT NULL
            );
        "#;
        Self::execute(pool, "create_geschiedenis_table", query).await
    }

    async fn create_voorbeelden_table(pool: &Pool<Sqlite>) -> BegripResult<()> {
        let query = r#"
            CREATE TABLE IF NOT EXISTS voorbeelden (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                definitie_id INTEGER NOT NULL,
                zin TEXT NOT NULL,
                rating TEXT,
                actief INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                created_by TEXT,
                reviewed_by TEXT,
                reviewed_at TEXT,
                CONSTRAINT valid_rating CHECK (rating IS NULL OR rating IN ('goed', 'matig', 'slecht'))
            );
        "#;
        Self::execute(pool, "create_voorbeelden_table", query).await
    }

    async fn create_feedback_table(pool: &Pool<Sqlite>) -> BegripResult<()> {
        let query = r#"
            CREATE TABLE IF NOT EXISTS generation_feedback (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                begrip TEXT NOT NULL,
                ontologische_categorie TEXT,
                feedback_type TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
        "#;
        Self::execute(pool, "create_feedback_table", query).await
    }

    async fn create_import_export_logs_table(pool: &Pool<Sqlite>) -> BegripResult<()> {
        let query = r#"
            CREATE TABLE IF NOT EXISTS import_export_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                operatie_type TEXT NOT NULL,
                bron_bestemming TEXT,
                aantal_verwerkt INTEGER NOT NULL DEFAULT 0,
                aantal_succesvol INTEGER NOT NULL DEFAULT 0,
                aantal_gefaald INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'completed',
                voltooid_op TEXT
            );
        "#;
        Self::execute(pool, "create_import_export_logs_table", query).await
    }

    async fn create_indexes(pool: &Pool<Sqlite>) -> BegripResult<()> {
        let queries = [
            "CREATE INDEX IF NOT EXISTS idx_definities_begrip ON definities (begrip);",
            "CREATE INDEX IF NOT EXISTS idx_definities_status ON definities (status);",
            "CREATE INDEX IF NOT EXISTS idx_geschiedenis_definitie ON definitie_geschiedenis (definitie_id);",
            "CREATE INDEX IF NOT EXISTS idx_voorbeelden_definitie ON voorbeelden (definitie_id);",
            "CREATE INDEX IF NOT EXISTS idx_feedback_begrip ON generation_feedback (begrip);",
        ];
        for query in queries {
            Self::execute(pool, "create_indexes", query).await?;
        }
        Ok(())
    }
}
