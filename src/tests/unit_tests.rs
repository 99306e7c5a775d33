//! Pure unit tests (no network or database required)
//!
//! These tests verify cross-module behavior the in-file test modules don't
//! cover: scorer + report invariants, error display, threshold defaults.

#[cfg(test)]
mod unit_tests {
    use crate::models::Priority;
    use crate::models::QueryResult;
    use crate::models::RunReport;
    use crate::models::TestCase;
    use crate::scorer::score_response;
    use crate::scorer::ScoringRules;
    use crate::DEFAULT_PASS_THRESHOLD;

    fn case(id: i64, category: &str, keywords: &[&str]) -> TestCase {
        TestCase {
            id,
            question: format!("Pergunta {id}"),
            category: category.to_string(),
            expected_keywords: keywords.iter().map(ToString::to_string).collect(),
            expected_content: vec![],
            must_not_include: vec![],
            priority: Priority::Medium,
        }
    }

    fn answer(id: i64, text: &str) -> QueryResult {
        QueryResult {
            test_case_id: id,
            response_text: text.to_string(),
            confidence: None,
            sources: None,
            response_time_ms: 100,
            error: None,
        }
    }

    // ====== Threshold Tests ======

    #[test]
    fn test_default_pass_threshold() {
        assert!((DEFAULT_PASS_THRESHOLD - 60.0).abs() < f64::EPSILON);
        let rules = ScoringRules::default();
        assert!((rules.pass_threshold - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_score_exactly_at_threshold_passes() {
        // 3 of 5 keywords = 60.0, which meets the 60% threshold
        let case = case(1, "zoneamento", &["um", "dois", "tres", "quatro", "cinco"]);
        let result = answer(1, "um dois tres");
        let eval = score_response(&case, &result, &ScoringRules::default());
        assert!((eval.score - 60.0).abs() < 1e-9);
        assert!(eval.passed);
    }

    // ====== Score Bounds ======

    #[test]
    fn test_score_is_always_within_bounds() {
        let rules = ScoringRules::default();
        let samples = [
            ("", &["ZOT"][..]),
            ("resposta sem nenhum dos termos", &["ZOT", "altura"][..]),
            ("ZOT altura metros", &["ZOT", "altura", "metros"][..]),
            ("texto livre de tamanho razoável para o fallback funcionar", &[][..]),
        ];
        for (id, (text, keywords)) in samples.iter().enumerate() {
            let case = case(id as i64, "bounds", keywords);
            let eval = score_response(&case, &answer(id as i64, text), &rules);
            assert!(
                (0.0..=100.0).contains(&eval.score),
                "score {} out of bounds for sample {id}",
                eval.score
            );
        }
    }

    // ====== Report Integration ======

    #[test]
    fn test_scored_batch_folds_into_consistent_report() {
        let rules = ScoringRules::default();
        let cases = vec![
            case(1, "zoneamento", &["ZOT", "08"]),
            case(2, "zoneamento", &["ZOT"]),
            case(3, "bairros", &["Petrópolis"]),
        ];
        let results = vec![
            answer(1, "ZOT-08 é uma zona de ocupação."),
            answer(2, "não encontrei informações"),
            answer(3, "O bairro Petrópolis pertence à ZOT-08."),
        ];
        let evaluations: Vec<_> = cases
            .iter()
            .zip(&results)
            .map(|(c, r)| score_response(c, r, &rules))
            .collect();

        let report = RunReport::build(evaluations, rules.pass_threshold, None);
        assert_eq!(report.overall.total, 3);
        assert_eq!(report.overall.passed, 2);
        assert_eq!(report.by_category.len(), 2);

        // raw_results order matches input order
        let ids: Vec<i64> = report.raw_results.iter().map(|e| e.test_case_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        // report JSON round-trips
        let json = serde_json::to_string(&report).unwrap();
        let parsed: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.overall.total, 3);
    }

    // ====== Error Handling Tests ======

    #[test]
    fn test_config_error_display() {
        use crate::errors::PdragError;

        let error = PdragError::Config("endpoint URL not set".to_string());
        let display = format!("{error}");
        assert!(display.contains("endpoint URL not set"));
    }

    #[test]
    fn test_empty_suite_error() {
        use crate::errors::PdragError;

        let error = PdragError::EmptySuite("test_cases table".to_string());
        assert!(matches!(error, PdragError::EmptySuite(_)));
        assert!(format!("{error}").contains("Empty test suite"));
    }

    #[test]
    fn test_error_from_io() {
        use std::io;

        use crate::errors::PdragError;

        let io_error = io::Error::new(io::ErrorKind::NotFound, "suite.json");
        let error: PdragError = io_error.into();
        assert!(matches!(error, PdragError::Io(_)));
    }
}
