//! Start-rule boundary normalization
//!
//! A start rule anchors matching at the beginning of a document, where
//! leading whitespace must be tolerated, and at the end, where the
//! trailing whitespace skip inserted by the whitespace pass must not be
//! required to match anything. The pass prepends an optional `$$ws`
//! reference to every start rule and then walks inward from the end of
//! the rule graph, converting the final whitespace reference to its
//! optional form. Rewrites are committed to the rule store, so a rule
//! shared by several start rules is only converted once.

use crate::cocol::building::builder::{DefinitionBuilder, WHITESPACE_RULE};
use crate::cocol::symbol::Symbol;

impl DefinitionBuilder {
    /// Normalizes both boundaries of every registered start rule
    ///
    /// # Panics
    ///
    /// Panics when a start rule is not registered, or when the trailing
    /// scan reaches a rule with no rule reference or alternation in its
    /// body. The whitespace pass guarantees such a symbol exists in every
    /// rule it touched; reaching a bare rule here means the grammar wired
    /// a start boundary to an unnormalized rule.
    pub(crate) fn normalize_start_boundaries(&mut self) {
        let start_rules: Vec<String> = self.start_rule_names().to_vec();
        for name in &start_rules {
            let mut symbols = match self.rule_symbols(name) {
                Some(symbols) => symbols.to_vec(),
                None => panic!("start rule '{}' is not defined", name),
            };
            symbols.insert(0, Symbol::optional_reference(WHITESPACE_RULE));
            self.replace_rule_symbols(name, symbols);

            let mut visited = Vec::new();
            self.convert_trailing_whitespace(name, &mut visited);
        }
    }

    /// Makes the last whitespace reference reachable from `rule_name`
    /// optional
    ///
    /// The visited set accumulates across the whole traversal of one
    /// start rule; revisiting a rule is a no-op, which bounds recursion
    /// on cyclic grammars by the number of distinct rules.
    fn convert_trailing_whitespace(&mut self, rule_name: &str, visited: &mut Vec<String>) {
        if visited.iter().any(|seen| seen == rule_name) {
            return;
        }
        visited.push(rule_name.to_string());

        let symbols = match self.rule_symbols(rule_name) {
            Some(symbols) => symbols.to_vec(),
            None => panic!(
                "trailing whitespace conversion reached unknown rule '{}'",
                rule_name
            ),
        };
        let position = symbols.iter().rposition(|symbol| {
            matches!(symbol, Symbol::NonTerminal(_) | Symbol::Alternation { .. })
        });
        let position = match position {
            Some(position) => position,
            None => panic!(
                "rule '{}' contains no rule reference or alternation to widen",
                rule_name
            ),
        };

        match symbols[position].clone() {
            Symbol::NonTerminal(reference) => {
                if reference == WHITESPACE_RULE {
                    let mut symbols = symbols;
                    symbols[position] = Symbol::optional_reference(WHITESPACE_RULE);
                    self.replace_rule_symbols(rule_name, symbols);
                } else {
                    self.convert_trailing_whitespace(&reference, visited);
                }
            }
            Symbol::Alternation { options, .. } => {
                if options.iter().any(|option| option == WHITESPACE_RULE) {
                    let mut symbols = symbols;
                    if let Symbol::Alternation { allow_empty, .. } = &mut symbols[position] {
                        *allow_empty = true;
                    }
                    self.replace_rule_symbols(rule_name, symbols);
                } else {
                    for option in &options {
                        self.convert_trailing_whitespace(option, visited);
                    }
                }
            }
            _ => unreachable!(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn optional_ws() -> Symbol {
        Symbol::optional_reference(WHITESPACE_RULE)
    }

    #[test]
    fn test_start_rule_gets_leading_optional_whitespace() {
        let mut builder = DefinitionBuilder::new();
        builder.add_rule("program", vec![Symbol::AnyDigit], true, false);
        builder.add_start_rule("program");

        let definition = builder.build();
        let symbols = &definition.rule("program").unwrap().symbols;
        assert_eq!(symbols[0], optional_ws());
    }

    #[test]
    fn test_trailing_mandatory_whitespace_becomes_optional() {
        let mut builder = DefinitionBuilder::new();
        // force_ws_at_end appends a mandatory $$ws reference.
        builder.add_rule("program", vec![Symbol::AnyDigit], false, true);
        builder.add_start_rule("program");

        let definition = builder.build();
        let symbols = &definition.rule("program").unwrap().symbols;
        assert_eq!(
            symbols,
            &vec![optional_ws(), Symbol::AnyDigit, optional_ws()]
        );
    }

    #[test]
    fn test_trailing_alternation_with_whitespace_is_widened() {
        let mut builder = DefinitionBuilder::new();
        builder.add_rule(
            "program",
            vec![
                Symbol::AnyDigit,
                Symbol::Alternation {
                    allow_empty: false,
                    options: vec![WHITESPACE_RULE.to_string()],
                },
            ],
            false,
            false,
        );
        builder.add_start_rule("program");

        let definition = builder.build();
        let symbols = &definition.rule("program").unwrap().symbols;
        assert_eq!(symbols[2], optional_ws());
    }

    #[test]
    fn test_conversion_recurses_into_referenced_rule_and_commits() {
        let mut builder = DefinitionBuilder::new();
        builder.add_rule("tail", vec![Symbol::AnyDigit], true, false);
        builder.add_rule(
            "program",
            vec![Symbol::AnyLetter, Symbol::NonTerminal("tail".to_string())],
            true,
            false,
        );
        builder.add_start_rule("program");

        let definition = builder.build();
        // The whitespace pass leaves "tail" ending in an optional $$ws
        // reference already; the boundary pass must terminate on it and
        // leave the committed body optional.
        let tail = &definition.rule("tail").unwrap().symbols;
        assert_eq!(tail, &vec![Symbol::AnyDigit, optional_ws()]);
    }

    #[test]
    fn test_conversion_commits_inner_mandatory_reference() {
        let mut builder = DefinitionBuilder::new();
        builder.add_rule("tail", vec![Symbol::AnyDigit], false, true);
        builder.add_rule(
            "program",
            vec![Symbol::AnyLetter, Symbol::NonTerminal("tail".to_string())],
            true,
            false,
        );
        builder.add_start_rule("program");

        let definition = builder.build();
        let tail = &definition.rule("tail").unwrap().symbols;
        assert_eq!(tail, &vec![Symbol::AnyDigit, optional_ws()]);
    }

    #[test]
    fn test_self_referential_start_rule_terminates() {
        let mut builder = DefinitionBuilder::new();
        builder.add_rule(
            "loop",
            vec![Symbol::NonTerminal("loop".to_string())],
            false,
            false,
        );
        builder.add_start_rule("loop");

        let definition = builder.build();
        let symbols = &definition.rule("loop").unwrap().symbols;
        assert_eq!(symbols[0], optional_ws());
        assert_eq!(symbols[1], Symbol::NonTerminal("loop".to_string()));
    }

    #[test]
    fn test_branching_alternation_recurses_into_every_option() {
        let mut builder = DefinitionBuilder::new();
        builder.add_rule("first", vec![Symbol::AnyDigit], false, true);
        builder.add_rule("second", vec![Symbol::AnyLetter], false, true);
        builder.add_rule(
            "program",
            vec![Symbol::Alternation {
                allow_empty: false,
                options: vec!["first".to_string(), "second".to_string()],
            }],
            false,
            false,
        );
        builder.add_start_rule("program");

        let definition = builder.build();
        let first = &definition.rule("first").unwrap().symbols;
        let second = &definition.rule("second").unwrap().symbols;
        assert_eq!(first[1], optional_ws());
        assert_eq!(second[1], optional_ws());
    }

    #[test]
    #[should_panic(expected = "is not defined")]
    fn test_missing_start_rule_is_a_fault() {
        let mut builder = DefinitionBuilder::new();
        builder.add_start_rule("ghost");
        builder.build();
    }

    #[test]
    #[should_panic(expected = "no rule reference or alternation")]
    fn test_bare_rule_at_the_boundary_is_a_fault() {
        let mut builder = DefinitionBuilder::new();
        // "bare" never went through the whitespace pass, so nothing follows
        // its terminal.
        builder.add_rule("bare", vec![Symbol::AnyDigit], false, false);
        builder.add_rule(
            "program",
            vec![Symbol::NonTerminal("bare".to_string())],
            true,
            false,
        );
        builder.add_start_rule("program");
        builder.build();
    }
}
