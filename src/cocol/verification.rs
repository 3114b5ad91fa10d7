//! Structural verification of language definitions
//!
//! Checks a built [LanguageDefinition] for dangling references. The
//! builder guarantees these invariants for the rules it synthesizes
//! itself, but a reader is free to register a rule body that mentions
//! names which never get defined.

use crate::cocol::definition::LanguageDefinition;
use crate::cocol::diagnostics::{Diagnostic, DiagnosticSeverity};
use crate::cocol::symbol::Symbol;

/// Collects structural problems in a definition
///
/// Reported in a stable order: start rules first, then rules by name,
/// symbols within a rule in body order.
pub fn verify(definition: &LanguageDefinition) -> Vec<Diagnostic> {
    let mut findings = Vec::new();

    for name in &definition.start_rules {
        if definition.rule(name).is_none() {
            findings.push(
                Diagnostic::new(
                    DiagnosticSeverity::Error,
                    format!("Start rule '{}' is not defined", name),
                )
                .with_code("dangling-start-rule"),
            );
        }
    }

    for rule in definition.rules.values() {
        for symbol in &rule.symbols {
            match symbol {
                Symbol::NonTerminal(reference) => {
                    if definition.rule(reference).is_none() {
                        findings.push(
                            Diagnostic::new(
                                DiagnosticSeverity::Error,
                                format!(
                                    "Rule '{}' references unknown rule '{}'",
                                    rule.name, reference
                                ),
                            )
                            .with_code("dangling-reference"),
                        );
                    }
                }
                Symbol::Alternation { options, .. } => {
                    if options.is_empty() {
                        findings.push(
                            Diagnostic::new(
                                DiagnosticSeverity::Warning,
                                format!(
                                    "Rule '{}' contains an alternation with no options",
                                    rule.name
                                ),
                            )
                            .with_code("empty-alternation"),
                        );
                    }
                    for option in options {
                        if definition.rule(option).is_none() {
                            findings.push(
                                Diagnostic::new(
                                    DiagnosticSeverity::Error,
                                    format!(
                                        "Rule '{}' references unknown rule '{}' in an alternation",
                                        rule.name, option
                                    ),
                                )
                                .with_code("dangling-reference"),
                            );
                        }
                    }
                }
                _ => {}
            }
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cocol::building::builder::DefinitionBuilder;
    use crate::cocol::definition::Rule;
    use crate::cocol::symbol::Symbol;

    fn built_with(rules: Vec<Rule>, start_rules: Vec<&str>) -> LanguageDefinition {
        let mut builder = DefinitionBuilder::new();
        for rule in rules {
            builder.add_rule(rule.name, rule.symbols, false, false);
        }
        let mut definition = builder.build();
        definition.start_rules = start_rules.into_iter().map(String::from).collect();
        definition
    }

    #[test]
    fn test_clean_definition_has_no_findings() {
        let definition = built_with(
            vec![
                Rule::new("program", vec![Symbol::NonTerminal("word".to_string())]),
                Rule::new("word", vec![Symbol::AnyLetter]),
            ],
            vec!["program"],
        );
        assert!(verify(&definition).is_empty());
    }

    #[test]
    fn test_missing_start_rule_is_reported() {
        let definition = built_with(Vec::new(), vec!["ghost"]);
        let findings = verify(&definition);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, DiagnosticSeverity::Error);
        assert_eq!(findings[0].message, "Start rule 'ghost' is not defined");
        assert_eq!(findings[0].code.as_deref(), Some("dangling-start-rule"));
    }

    #[test]
    fn test_dangling_reference_is_reported() {
        let definition = built_with(
            vec![Rule::new(
                "program",
                vec![Symbol::NonTerminal("missing".to_string())],
            )],
            Vec::new(),
        );
        let findings = verify(&definition);
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].message,
            "Rule 'program' references unknown rule 'missing'"
        );
        assert_eq!(findings[0].code.as_deref(), Some("dangling-reference"));
    }

    #[test]
    fn test_dangling_alternation_option_is_reported() {
        let definition = built_with(
            vec![Rule::new(
                "program",
                vec![Symbol::Alternation {
                    allow_empty: false,
                    options: vec!["missing".to_string()],
                }],
            )],
            Vec::new(),
        );
        let findings = verify(&definition);
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].message,
            "Rule 'program' references unknown rule 'missing' in an alternation"
        );
    }

    #[test]
    fn test_empty_alternation_is_a_warning() {
        let definition = built_with(
            vec![Rule::new(
                "program",
                vec![Symbol::Alternation {
                    allow_empty: false,
                    options: Vec::new(),
                }],
            )],
            Vec::new(),
        );
        let findings = verify(&definition);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, DiagnosticSeverity::Warning);
        assert_eq!(findings[0].code.as_deref(), Some("empty-alternation"));
    }
}
