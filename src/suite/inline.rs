//! Built-in evaluation suite for the Plano Diretor chatbot
//!
//! The canonical questions the operational scripts always graded against:
//! zoning lookups (ZOT), per-neighborhood urban regime, construction limits
//! and the conceptual vocabulary of the plan. Kept inline so a run needs no
//! database or file to be useful.

use crate::models::Priority;
use crate::models::TestCase;

fn case(
    id: i64,
    category: &str,
    priority: Priority,
    question: &str,
    keywords: &[&str],
    forbidden: &[&str],
) -> TestCase {
    TestCase {
        id,
        question: question.to_string(),
        category: category.to_string(),
        expected_keywords: keywords.iter().map(ToString::to_string).collect(),
        expected_content: vec![],
        must_not_include: forbidden.iter().map(ToString::to_string).collect(),
        priority,
    }
}

/// The built-in suite, ordered by category then id for deterministic reports
pub fn inline_suite() -> Vec<TestCase> {
    vec![
        // Alturas e limites construtivos
        case(
            1,
            "alturas",
            Priority::High,
            "Qual a altura máxima permitida na ZOT-08?",
            &["altura", "metros"],
            &[],
        ),
        case(
            2,
            "alturas",
            Priority::Medium,
            "Qual o limite de altura da ZOT-07?",
            &["ZOT-07", "metros"],
            &[],
        ),
        // Bairros e regime urbanístico local
        case(
            3,
            "bairros",
            Priority::High,
            "O que posso construir no bairro Petrópolis?",
            &["Petrópolis", "ZOT"],
            &[],
        ),
        case(
            4,
            "bairros",
            Priority::High,
            "Qual a altura máxima no bairro Moinhos de Vento?",
            &["altura", "metros"],
            &["BETA_RESPONSE"],
        ),
        case(
            5,
            "bairros",
            Priority::High,
            "Existe regime urbanístico para o bairro Boa Vista?",
            &["Boa Vista"],
            &["Boa Vista do Sul"],
        ),
        // Conceitual
        case(
            6,
            "conceitual",
            Priority::High,
            "O que é o Plano Diretor de Porto Alegre?",
            &["plano", "desenvolvimento", "urbano"],
            &[],
        ),
        case(
            7,
            "conceitual",
            Priority::Medium,
            "Como o plano trata a habitação de interesse social?",
            &["habitação", "interesse social"],
            &[],
        ),
        // Sem palavras-chave: exercita o fallback por comprimento
        case(
            8,
            "conceitual",
            Priority::Low,
            "Resuma as principais mudanças do novo Plano Diretor.",
            &[],
            &[],
        ),
        // Instrumentos urbanísticos
        case(
            9,
            "instrumentos",
            Priority::Medium,
            "O que é outorga onerosa do direito de construir?",
            &["outorga", "onerosa"],
            &[],
        ),
        case(
            10,
            "instrumentos",
            Priority::Medium,
            "O que é o Estudo de Impacto de Vizinhança (EIV)?",
            &["estudo", "impacto", "vizinhança"],
            &[],
        ),
        // Regime urbanístico
        case(
            11,
            "regime_urbanistico",
            Priority::High,
            "Qual o coeficiente de aproveitamento máximo na ZOT-13?",
            &["coeficiente", "aproveitamento"],
            &[],
        ),
        case(
            12,
            "regime_urbanistico",
            Priority::Medium,
            "Qual a taxa de permeabilidade exigida na ZOT-02?",
            &["permeabilidade"],
            &[],
        ),
        // Zoneamento
        case(
            13,
            "zoneamento",
            Priority::High,
            "O que é ZOT-08?",
            &["ZOT", "08"],
            &[],
        ),
        case(
            14,
            "zoneamento",
            Priority::Medium,
            "Quais são as ZOTs de Porto Alegre?",
            &["ZOT", "zona"],
            &[],
        ),
        case(
            15,
            "zoneamento",
            Priority::Medium,
            "O que são as ZEIS?",
            &["especial", "interesse social"],
            &[],
        ),
        case(
            16,
            "zoneamento",
            Priority::Low,
            "Quais bairros fazem parte da ZOT-01?",
            &["ZOT-01", "bairro"],
            &[],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_suite_is_not_empty() {
        assert!(!inline_suite().is_empty());
    }

    #[test]
    fn test_inline_suite_ids_are_unique() {
        let cases = inline_suite();
        let mut ids: Vec<i64> = cases.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), cases.len());
    }

    #[test]
    fn test_inline_suite_is_ordered_by_category_then_id() {
        let cases = inline_suite();
        let keys: Vec<(String, i64)> = cases.iter().map(|c| (c.category.clone(), c.id)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_every_case_has_a_question() {
        for case in inline_suite() {
            assert!(!case.question.trim().is_empty(), "case {} is blank", case.id);
        }
    }
}
