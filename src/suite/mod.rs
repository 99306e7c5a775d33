//! Test case sources
//!
//! A suite can come from the built-in inline collection, a JSON file, or the
//! `test_cases` table. Every source rejects an empty result: an empty suite
//! is a configuration error, never a 0% run.

pub mod file;
pub mod inline;
pub mod store;

pub use file::JsonFileSuite;
pub use inline::inline_suite;
pub use store::TableSuite;

use crate::models::TestCase;
use crate::PdragError;
use crate::Result;

/// Reject empty suites loudly; aggregate scoring divides by the case count
pub fn ensure_not_empty(cases: Vec<TestCase>, source: &str) -> Result<Vec<TestCase>> {
    if cases.is_empty() {
        Err(PdragError::EmptySuite(source.to_string()))
    } else {
        Ok(cases)
    }
}

/// Narrow a loaded suite by category and size, keeping source order
pub fn filter_cases(
    cases: Vec<TestCase>,
    category: Option<&str>,
    limit: Option<usize>,
) -> Vec<TestCase> {
    let filtered: Vec<TestCase> = match category {
        Some(category) => cases
            .into_iter()
            .filter(|c| c.category.eq_ignore_ascii_case(category))
            .collect(),
        None => cases,
    };
    match limit {
        Some(limit) => filtered.into_iter().take(limit).collect(),
        None => filtered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_not_empty_rejects_empty() {
        let result = ensure_not_empty(vec![], "inline");
        assert!(matches!(result, Err(PdragError::EmptySuite(_))));
    }

    #[test]
    fn test_filter_by_category_is_case_insensitive() {
        let cases = inline_suite();
        let filtered = filter_cases(cases, Some("ZONEAMENTO"), None);
        assert!(!filtered.is_empty());
        assert!(filtered.iter().all(|c| c.category == "zoneamento"));
    }

    #[test]
    fn test_limit_keeps_source_order() {
        let cases = inline_suite();
        let first_ids: Vec<i64> = cases.iter().take(3).map(|c| c.id).collect();
        let limited = filter_cases(cases, None, Some(3));
        assert_eq!(limited.iter().map(|c| c.id).collect::<Vec<_>>(), first_ids);
    }
}
