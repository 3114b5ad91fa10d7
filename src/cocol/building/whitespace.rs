//! Whitespace-skip insertion and keyword boundary resolution
//!
//! Languages with free-form whitespace need a skip between every pair of
//! adjacent tokens. Instead of teaching the downstream engine about
//! whitespace, the normalizer rewrites each rule body so that every
//! terminal is followed by a reference to the `$$ws` rule.
//!
//! The reference is optional except in one case: a keyword followed by
//! material that can only ever be another keyword. Two keywords glued
//! together ("endif" for "end if") would lex as a single identifier, so
//! the separating whitespace must be mandatory there. Whether the
//! following material is keyword-only is decided by a conservative
//! lookahead over the rule graph; any cycle or uncertainty answers "no",
//! which degrades to the harmless optional form.

use crate::cocol::building::builder::{DefinitionBuilder, WHITESPACE_RULE};
use crate::cocol::symbol::Symbol;

impl DefinitionBuilder {
    /// Rewrites every rule flagged for forced whitespace
    pub(crate) fn normalize_whitespace(&mut self) {
        let names: Vec<String> = self.forced_ws_rules().to_vec();
        for name in &names {
            let symbols = match self.rule_symbols(name) {
                Some(symbols) => symbols.to_vec(),
                None => panic!("whitespace normalization reached unknown rule '{}'", name),
            };
            let rewritten = self.insert_whitespace_references(&symbols);
            self.replace_rule_symbols(name, rewritten);
        }
    }

    /// Builds the rewritten body for one rule
    ///
    /// Non-terminals and alternations pass through untouched; whitespace
    /// around their boundaries is handled by their own rules. An action is
    /// pulled in front of an immediately preceding mandatory whitespace
    /// reference so it still runs between the content and the skip.
    pub(crate) fn insert_whitespace_references(&self, symbols: &[Symbol]) -> Vec<Symbol> {
        let mut rewritten = Vec::with_capacity(symbols.len() * 2);
        for (position, symbol) in symbols.iter().enumerate() {
            match symbol {
                Symbol::NonTerminal(_) | Symbol::Alternation { .. } => {
                    rewritten.push(symbol.clone());
                }
                Symbol::Action(_) => {
                    let after_mandatory_ws = matches!(
                        rewritten.last(),
                        Some(Symbol::NonTerminal(reference)) if reference == WHITESPACE_RULE
                    );
                    if after_mandatory_ws {
                        let at = rewritten.len() - 1;
                        rewritten.insert(at, symbol.clone());
                    } else {
                        rewritten.push(symbol.clone());
                    }
                }
                _ => {
                    rewritten.push(symbol.clone());
                    if self.keyword_needs_separator(symbols, position) {
                        rewritten.push(Symbol::NonTerminal(WHITESPACE_RULE.to_string()));
                    } else {
                        rewritten.push(Symbol::optional_reference(WHITESPACE_RULE));
                    }
                }
            }
        }
        rewritten
    }

    fn keyword_needs_separator(&self, symbols: &[Symbol], position: usize) -> bool {
        match &symbols[position] {
            Symbol::Literal(text) => {
                self.keywords().iter().any(|keyword| keyword == text)
                    && self.can_only_be_keyword(symbols, position + 1, &mut Vec::new())
            }
            _ => false,
        }
    }

    /// Conservative keyword-only lookahead
    ///
    /// True only when every path from `symbols[position]` provably starts
    /// with a registered keyword. Rules already on the `visited` path
    /// answer false, so cyclic grammars terminate and fall back to the
    /// optional whitespace form.
    pub(crate) fn can_only_be_keyword(
        &self,
        symbols: &[Symbol],
        position: usize,
        visited: &mut Vec<String>,
    ) -> bool {
        let symbol = match symbols.get(position) {
            Some(symbol) => symbol,
            None => return false,
        };
        match symbol {
            Symbol::Literal(text) => self.keywords().iter().any(|keyword| keyword == text),
            Symbol::NonTerminal(name) => self.rule_starts_with_keyword(name, visited),
            Symbol::Action(_) => self.can_only_be_keyword(symbols, position + 1, visited),
            Symbol::Alternation {
                allow_empty,
                options,
            } => {
                let every_option = options
                    .iter()
                    .all(|option| self.rule_starts_with_keyword(option, visited));
                every_option
                    && (!*allow_empty || self.can_only_be_keyword(symbols, position + 1, visited))
            }
            _ => false,
        }
    }

    fn rule_starts_with_keyword(&self, name: &str, visited: &mut Vec<String>) -> bool {
        if visited.iter().any(|seen| seen == name) {
            return false;
        }
        let symbols = match self.rule_symbols(name) {
            Some(symbols) => symbols.to_vec(),
            None => panic!("keyword lookahead reached unknown rule '{}'", name),
        };
        visited.push(name.to_string());
        let result = self.can_only_be_keyword(&symbols, 0, visited);
        visited.pop();
        result
    }
}
