//! Definition builder
//!
//! The mutable accumulator behind grammar extraction. A reader drives it
//! through a small protocol (heading fields, keywords, comment rules,
//! start rules, rules, character-set rules) and finally calls
//! [DefinitionBuilder::build], which consumes the builder and returns the
//! immutable [LanguageDefinition]. Consuming the builder is what makes the
//! construction phase unrepeatable; there is no way to mutate a definition
//! after it has been built.
//!
//! Rule names are unique. Registering the same name twice is a caller
//! contract breach and panics instead of producing a diagnostic.

use crate::cocol::definition::{CommentRule, CommentRules, LanguageDefinition, Rule};
use crate::cocol::diagnostics::{Diagnostic, DiagnosticSeverity};
use crate::cocol::symbol::Symbol;
use std::collections::BTreeMap;

/// Name of the synthesized whitespace-skip rule
///
/// The `$$` prefix keeps synthesized names out of the grammar's own
/// namespace.
pub const WHITESPACE_RULE: &str = "$$ws";

/// Accumulates a language definition while a grammar is being read
#[derive(Debug)]
pub struct DefinitionBuilder {
    language_id: String,
    file_pattern: String,
    keywords: Vec<String>,
    start_rules: Vec<String>,
    comment_rules: CommentRules,
    rules: BTreeMap<String, Rule>,
    forced_ws_rules: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl DefinitionBuilder {
    /// Creates a builder holding only the whitespace-skip rule
    ///
    /// `$$ws` matches one whitespace character followed by optionally more
    /// of itself, so a single reference skips a whole whitespace run.
    pub fn new() -> Self {
        let mut builder = DefinitionBuilder {
            language_id: String::new(),
            file_pattern: String::new(),
            keywords: Vec::new(),
            start_rules: Vec::new(),
            comment_rules: CommentRules::default(),
            rules: BTreeMap::new(),
            forced_ws_rules: Vec::new(),
            diagnostics: Vec::new(),
        };
        builder.add_rule(
            WHITESPACE_RULE,
            vec![
                Symbol::AnyWhitespace,
                Symbol::optional_reference(WHITESPACE_RULE),
            ],
            false,
            false,
        );
        builder
    }

    /// Records a heading field from the grammar's annotation comments
    ///
    /// Known keys are `id` and `filePattern`; anything else produces a
    /// warning diagnostic.
    pub fn set_heading_field(&mut self, key: &str, value: &str) {
        match key {
            "id" => self.language_id = value.to_string(),
            "filePattern" => self.file_pattern = value.to_string(),
            _ => self.add_diagnostic(
                Diagnostic::new(
                    DiagnosticSeverity::Warning,
                    format!("unrecognized heading field '{}'", key),
                )
                .with_code("unknown-heading-field"),
            ),
        }
    }

    /// Registers a reserved word for keyword boundary handling
    pub fn add_keyword(&mut self, text: impl Into<String>) {
        self.keywords.push(text.into());
    }

    /// Marks a rule name as a top-level entry point
    pub fn add_start_rule(&mut self, rule_name: impl Into<String>) {
        self.start_rules.push(rule_name.into());
    }

    pub fn add_comment_rule(
        &mut self,
        start: impl Into<String>,
        end: impl Into<String>,
        documentation: bool,
    ) {
        let rule = CommentRule::new(start, end);
        if documentation {
            self.comment_rules.documentation.push(rule);
        } else {
            self.comment_rules.normal.push(rule);
        }
    }

    /// Registers a rule
    ///
    /// `force_ws_between` queues the rule for whitespace-skip insertion at
    /// build time. `force_ws_at_end` appends a mandatory whitespace
    /// reference right away, for rules whose last token would otherwise
    /// have no guaranteed boundary.
    ///
    /// # Panics
    ///
    /// Panics when `name` is already registered.
    pub fn add_rule(
        &mut self,
        name: impl Into<String>,
        mut symbols: Vec<Symbol>,
        force_ws_between: bool,
        force_ws_at_end: bool,
    ) {
        let name = name.into();
        if self.rules.contains_key(&name) {
            panic!("rule '{}' is already defined", name);
        }
        if force_ws_at_end {
            symbols.push(Symbol::NonTerminal(WHITESPACE_RULE.to_string()));
        }
        if force_ws_between {
            self.forced_ws_rules.push(name.clone());
        }
        self.rules.insert(name.clone(), Rule::new(name, symbols));
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// All diagnostics collected so far, in the order they were produced
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn contains_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub(crate) fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub(crate) fn rules(&self) -> &BTreeMap<String, Rule> {
        &self.rules
    }

    pub(crate) fn rule_symbols(&self, name: &str) -> Option<&[Symbol]> {
        self.rules.get(name).map(|rule| rule.symbols.as_slice())
    }

    pub(crate) fn replace_rule_symbols(&mut self, name: &str, symbols: Vec<Symbol>) {
        if let Some(rule) = self.rules.get_mut(name) {
            rule.symbols = symbols;
        }
    }

    pub(crate) fn forced_ws_rules(&self) -> &[String] {
        &self.forced_ws_rules
    }

    pub(crate) fn start_rule_names(&self) -> &[String] {
        &self.start_rules
    }

    /// Runs the normalization passes and emits the definition
    ///
    /// Whitespace-skip insertion must run before start-rule boundary
    /// normalization; the boundary pass relies on the trailing whitespace
    /// references the first pass guarantees.
    pub fn build(mut self) -> LanguageDefinition {
        self.normalize_whitespace();
        self.normalize_start_boundaries();
        LanguageDefinition {
            language_id: self.language_id,
            file_pattern: self.file_pattern,
            comment_rules: self.comment_rules,
            start_rules: self.start_rules,
            rules: self.rules,
        }
    }
}

impl Default for DefinitionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
