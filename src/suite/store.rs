//! Database-backed test case source

use std::sync::Arc;

use crate::database::Database;
use crate::models::TestCase;
use crate::suite::ensure_not_empty;
use crate::Result;

/// Loads the suite from the `test_cases` table, ordered by category then id
/// so reports stay deterministic across runs.
pub struct TableSuite {
    db: Arc<Database>,
}

impl TableSuite {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn load(&self) -> Result<Vec<TestCase>> {
        let cases = self.db.list_test_cases(None, None).await?;
        ensure_not_empty(cases, "test_cases table")
    }
}
