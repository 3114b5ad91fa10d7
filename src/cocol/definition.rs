//! Language definition model
//!
//! The immutable output of grammar extraction. A [LanguageDefinition] is
//! produced once by the builder and then only read: serialized to disk,
//! rendered as an overview or checked by the verifier.

use crate::cocol::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A named production with an ordered symbol body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub symbols: Vec<Symbol>,
}

impl Rule {
    pub fn new(name: impl Into<String>, symbols: Vec<Symbol>) -> Rule {
        Rule {
            name: name.into(),
            symbols,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} =", self.name)?;
        for symbol in &self.symbols {
            write!(f, " {}", symbol)?;
        }
        Ok(())
    }
}

/// Delimiters of one comment form
///
/// `padding` is the text a matched comment is replaced with so that the
/// positions of the surrounding tokens stay addressable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRule {
    pub start: String,
    pub end: String,
    pub padding: String,
}

impl CommentRule {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> CommentRule {
        CommentRule {
            start: start.into(),
            end: end.into(),
            padding: " ".to_string(),
        }
    }
}

/// Comment forms of a language, split into plain and documentation comments
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommentRules {
    pub normal: Vec<CommentRule>,
    pub documentation: Vec<CommentRule>,
}

/// The extracted grammar of one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageDefinition {
    pub language_id: String,
    pub file_pattern: String,
    pub comment_rules: CommentRules,
    pub start_rules: Vec<String>,
    pub rules: BTreeMap<String, Rule>,
}

impl LanguageDefinition {
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }
}
