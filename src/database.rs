//! Database access: the `test_cases` store and the answer-cache tables
//!
//! The database is an external collaborator; this module only issues plain
//! reads and writes. The `query_cache` table belongs to the answering
//! service: we inspect and clear it, never create it.

use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::models::Priority;
use crate::models::TestCase;
use crate::Result;

/// Database connection pool wrapper
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

/// Row shape of the `test_cases` table
#[derive(Debug, FromRow)]
struct TestCaseRow {
    id: i64,
    question: String,
    category: String,
    expected_keywords: Vec<String>,
    expected_content: Vec<String>,
    must_not_include: Vec<String>,
    priority: String,
}

impl From<TestCaseRow> for TestCase {
    fn from(row: TestCaseRow) -> Self {
        Self {
            id: row.id,
            question: row.question,
            category: row.category,
            expected_keywords: row.expected_keywords,
            expected_content: row.expected_content,
            must_not_include: row.must_not_include,
            priority: Priority::from(row.priority.as_str()),
        }
    }
}

/// Summary of the answering service's `query_cache` table
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub entries: i64,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
}

impl Database {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new database instance from configuration
    pub async fn from_config(config: &crate::config::AppConfig) -> Result<Self> {
        let pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections())
            .min_connections(config.min_connections())
            .acquire_timeout(std::time::Duration::from_secs(config.connection_timeout()));

        let pool = pool_options.connect(config.database_url()).await?;

        tracing::debug!(
            "Database pool configured: max_connections={}, min_connections={}",
            config.max_connections(),
            config.min_connections()
        );

        Ok(Self::new(pool))
    }

    /// Get a reference to the database pool for raw queries
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the `test_cases` table if it does not exist
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS test_cases (
                id BIGSERIAL PRIMARY KEY,
                question TEXT NOT NULL,
                category TEXT NOT NULL,
                expected_keywords TEXT[] NOT NULL DEFAULT '{}',
                expected_content TEXT[] NOT NULL DEFAULT '{}',
                must_not_include TEXT[] NOT NULL DEFAULT '{}',
                priority TEXT NOT NULL DEFAULT 'medium',
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// List test cases ordered by category then id
    pub async fn list_test_cases(
        &self,
        category: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Vec<TestCase>> {
        let limit = limit.unwrap_or(1000);

        let rows = match category {
            Some(category) => {
                sqlx::query_as::<_, TestCaseRow>(
                    "SELECT id, question, category, expected_keywords, expected_content,
                            must_not_include, priority
                     FROM test_cases WHERE category = $1 ORDER BY category, id LIMIT $2",
                )
                .bind(category)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, TestCaseRow>(
                    "SELECT id, question, category, expected_keywords, expected_content,
                            must_not_include, priority
                     FROM test_cases ORDER BY category, id LIMIT $1",
                )
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(TestCase::from).collect())
    }

    /// Insert a suite into `test_cases`, returning the number of rows written
    pub async fn seed_test_cases(&self, cases: &[TestCase]) -> Result<u64> {
        let mut inserted = 0;
        for case in cases {
            let result = sqlx::query(
                "INSERT INTO test_cases
                    (question, category, expected_keywords, expected_content,
                     must_not_include, priority)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&case.question)
            .bind(&case.category)
            .bind(&case.expected_keywords)
            .bind(&case.expected_content)
            .bind(&case.must_not_include)
            .bind(case.priority.as_str())
            .execute(&self.pool)
            .await?;
            inserted += result.rows_affected();
        }
        Ok(inserted)
    }

    /// Delete every row of `test_cases`
    pub async fn clear_test_cases(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM test_cases")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_test_cases(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM test_cases")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Entry count and age range of the answer cache
    pub async fn cache_stats(&self) -> Result<CacheStats> {
        let (entries, oldest, newest): (i64, Option<DateTime<Utc>>, Option<DateTime<Utc>>) =
            sqlx::query_as(
                "SELECT COUNT(*), MIN(created_at), MAX(created_at) FROM query_cache",
            )
            .fetch_one(&self.pool)
            .await?;
        Ok(CacheStats {
            entries,
            oldest,
            newest,
        })
    }

    /// Clear cached answers, optionally only those older than the given age
    pub async fn clear_cache(&self, older_than_hours: Option<i64>) -> Result<u64> {
        let result = match older_than_hours {
            Some(hours) => {
                sqlx::query(
                    "DELETE FROM query_cache WHERE created_at < now() - ($1 * INTERVAL '1 hour')",
                )
                .bind(hours)
                .execute(&self.pool)
                .await?
            }
            None => sqlx::query("DELETE FROM query_cache").execute(&self.pool).await?,
        };
        Ok(result.rows_affected())
    }
}
