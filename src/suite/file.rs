//! JSON file test case source

use std::path::Path;
use std::path::PathBuf;

use crate::models::TestCase;
use crate::suite::ensure_not_empty;
use crate::Result;

/// Loads a suite from a JSON array of test cases on disk.
pub struct JsonFileSuite {
    path: PathBuf,
}

impl JsonFileSuite {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> Result<Vec<TestCase>> {
        let content = std::fs::read_to_string(&self.path)?;
        let cases: Vec<TestCase> = serde_json::from_str(&content)?;
        ensure_not_empty(cases, &self.path.display().to_string())
    }
}
