//! Character-set rule synthesis
//!
//! Turns a [CharSet] into rules. Enumerating broad classes character by
//! character would bloat the definition, so positive sets go through
//! greedy named-subset extraction first: whenever a whole canonical class
//! from the catalog is contained in the remaining characters, the class is
//! pulled out and replaced by a reference to a shared class rule such as
//! `$$any_letter`. Only the leftover characters stay as a literal set.
//!
//! Characters the definition file cannot represent are dropped before
//! extraction.

use crate::cocol::building::builder::DefinitionBuilder;
use crate::cocol::catalog;
use crate::cocol::charset::CharSet;
use crate::cocol::diagnostics::{Diagnostic, DiagnosticSeverity};
use crate::cocol::serialization::is_definition_char;
use crate::cocol::symbol::Symbol;
use std::collections::BTreeSet;

pub const ANY_LETTER_OR_DIGIT_RULE: &str = "$$any_letter_or_digit";
pub const ANY_LETTER_RULE: &str = "$$any_letter";
pub const ANY_DIGIT_RULE: &str = "$$any_digit";
pub const ANY_UPPERCASE_RULE: &str = "$$any_uppercase";
pub const ANY_LOWERCASE_RULE: &str = "$$any_lowercase";
pub const ANY_LINE_END_RULE: &str = "$$any_lineEnd";
pub const ANY_WHITESPACE_RULE: &str = "$$any_whitespace";

/// Extraction candidates in priority order; broad classes come first so
/// they win over their own subsets.
fn named_subsets() -> Vec<(&'static BTreeSet<char>, &'static str, Symbol)> {
    vec![
        (
            &catalog::LETTERS_OR_DIGITS,
            ANY_LETTER_OR_DIGIT_RULE,
            Symbol::AnyLetterOrDigit,
        ),
        (&catalog::LETTERS, ANY_LETTER_RULE, Symbol::AnyLetter),
        (&catalog::DIGITS, ANY_DIGIT_RULE, Symbol::AnyDigit),
        (
            &catalog::UPPERCASE,
            ANY_UPPERCASE_RULE,
            Symbol::AnyUppercaseLetter,
        ),
        (
            &catalog::LOWERCASE,
            ANY_LOWERCASE_RULE,
            Symbol::AnyLowercaseLetter,
        ),
        (&catalog::LINE_FEED, ANY_LINE_END_RULE, Symbol::AnyLineEnd),
        (
            &catalog::CARRIAGE_RETURN,
            ANY_LINE_END_RULE,
            Symbol::AnyLineEnd,
        ),
        (
            &catalog::WHITESPACE,
            ANY_WHITESPACE_RULE,
            Symbol::AnyWhitespace,
        ),
    ]
}

impl DefinitionBuilder {
    /// Synthesizes the rule(s) for a named character set
    ///
    /// An empty set is reported as a diagnostic and adds nothing. Residual
    /// characters that share the set with class references are wrapped in
    /// `<name>|<index>` sub-rules so the main rule can stay a plain
    /// alternation over rule names.
    pub fn add_character_set_rule(&mut self, name: &str, set: CharSet) {
        if set.is_empty() {
            self.add_diagnostic(
                Diagnostic::new(
                    DiagnosticSeverity::Warning,
                    format!("character set '{}' is an empty set, no rule was added", name),
                )
                .with_code("empty-character-set"),
            );
            return;
        }

        let mut references: Vec<String> = Vec::new();
        let mut residuals: Vec<Symbol> = Vec::new();
        for symbol in set.symbols() {
            match symbol {
                Symbol::OneCharOf(chars) => {
                    let mut remaining: BTreeSet<char> = chars
                        .iter()
                        .copied()
                        .filter(|chr| is_definition_char(*chr))
                        .collect();
                    for (subset, rule_name, class_symbol) in named_subsets() {
                        if remaining.is_empty() {
                            break;
                        }
                        if subset.is_subset(&remaining) {
                            remaining = remaining.difference(subset).copied().collect();
                            self.ensure_class_rule(rule_name, class_symbol);
                            if !references.iter().any(|reference| reference == rule_name) {
                                references.push(rule_name.to_string());
                            }
                        }
                    }
                    if !remaining.is_empty() {
                        residuals.push(Symbol::OneCharOf(remaining));
                    }
                }
                Symbol::AnyCharExcept(chars) => {
                    residuals.push(Symbol::AnyCharExcept(
                        chars
                            .iter()
                            .copied()
                            .filter(|chr| is_definition_char(*chr))
                            .collect(),
                    ));
                }
                other => residuals.push(other.clone()),
            }
        }

        if references.is_empty() {
            self.add_rule(name, residuals, false, false);
        } else if residuals.is_empty() {
            if references.len() == 1 {
                self.add_rule(
                    name,
                    vec![Symbol::NonTerminal(references.remove(0))],
                    false,
                    false,
                );
            } else {
                self.add_rule(
                    name,
                    vec![Symbol::Alternation {
                        allow_empty: false,
                        options: references,
                    }],
                    false,
                    false,
                );
            }
        } else {
            let mut options = Vec::new();
            for (index, terminal) in residuals.into_iter().enumerate() {
                let sub_name = format!("{}|{}", name, index);
                self.add_rule(sub_name.clone(), vec![terminal], false, false);
                options.push(sub_name);
            }
            options.append(&mut references);
            self.add_rule(
                name,
                vec![Symbol::Alternation {
                    allow_empty: false,
                    options,
                }],
                false,
                false,
            );
        }
    }

    /// Registers a shared class rule on first use
    fn ensure_class_rule(&mut self, name: &str, symbol: Symbol) {
        if !self.contains_rule(name) {
            self.add_rule(name, vec![symbol], false, false);
        }
    }
}
