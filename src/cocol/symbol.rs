//! Grammar symbols
//!
//! Every rule body in a language definition is an ordered sequence of
//! [Symbol] values. Terminals match literal input (single characters,
//! character classes or string literals), non-terminals reference other
//! rules by name, actions carry opaque semantic text, and alternations
//! express ordered choice between rule names.
//!
//! Alternation options are rule *names*, never inline bodies; any inline
//! choice or repetition in the source grammar is lowered to a helper rule
//! before it reaches a symbol sequence.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A single element of a rule body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbol {
    /// Matches any single character
    AnyCharacter,
    /// Matches a line end
    AnyLineEnd,
    /// Matches any letter
    AnyLetter,
    /// Matches any decimal digit
    AnyDigit,
    /// Matches any letter or decimal digit
    AnyLetterOrDigit,
    /// Matches any uppercase letter
    AnyUppercaseLetter,
    /// Matches any lowercase letter
    AnyLowercaseLetter,
    /// Matches a space or tab
    AnyWhitespace,
    /// Matches exactly one of the listed characters
    OneCharOf(BTreeSet<char>),
    /// Matches any single character except the listed ones
    AnyCharExcept(BTreeSet<char>),
    /// Matches the literal text
    Literal(String),
    /// Expands to the body of the named rule
    NonTerminal(String),
    /// Semantic action text, transparent to matching
    Action(String),
    /// Ordered choice between the named rules; option order is the
    /// tie-break priority
    Alternation {
        allow_empty: bool,
        options: Vec<String>,
    },
}

impl Symbol {
    /// True for symbols that match literal input directly, i.e. everything
    /// except rule references, actions and alternations.
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            Symbol::NonTerminal(_) | Symbol::Action(_) | Symbol::Alternation { .. }
        )
    }

    /// An alternation that matches the named rule or nothing at all.
    pub fn optional_reference(rule_name: impl Into<String>) -> Symbol {
        Symbol::Alternation {
            allow_empty: true,
            options: vec![rule_name.into()],
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::AnyCharacter => write!(f, "<any>"),
            Symbol::AnyLineEnd => write!(f, "<lineEnd>"),
            Symbol::AnyLetter => write!(f, "<letter>"),
            Symbol::AnyDigit => write!(f, "<digit>"),
            Symbol::AnyLetterOrDigit => write!(f, "<letterOrDigit>"),
            Symbol::AnyUppercaseLetter => write!(f, "<uppercase>"),
            Symbol::AnyLowercaseLetter => write!(f, "<lowercase>"),
            Symbol::AnyWhitespace => write!(f, "<whitespace>"),
            Symbol::OneCharOf(chars) => {
                write!(f, "[")?;
                for chr in chars {
                    write!(f, "{}", chr.escape_debug())?;
                }
                write!(f, "]")
            }
            Symbol::AnyCharExcept(chars) => {
                write!(f, "[^")?;
                for chr in chars {
                    write!(f, "{}", chr.escape_debug())?;
                }
                write!(f, "]")
            }
            Symbol::Literal(text) => write!(f, "\"{}\"", text.escape_debug()),
            Symbol::NonTerminal(name) => write!(f, "{}", name),
            Symbol::Action(text) => write!(f, "(. {} .)", text),
            Symbol::Alternation {
                allow_empty,
                options,
            } => {
                write!(f, "({})", options.join(" | "))?;
                if *allow_empty {
                    write!(f, "?")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_classification() {
        assert!(Symbol::AnyLetter.is_terminal());
        assert!(Symbol::Literal("if".to_string()).is_terminal());
        assert!(Symbol::OneCharOf(BTreeSet::from(['a'])).is_terminal());
        assert!(!Symbol::NonTerminal("expr".to_string()).is_terminal());
        assert!(!Symbol::Action("out()".to_string()).is_terminal());
        assert!(!Symbol::optional_reference("expr").is_terminal());
    }

    #[test]
    fn test_display_renders_grammar_notation() {
        assert_eq!(Symbol::AnyWhitespace.to_string(), "<whitespace>");
        assert_eq!(
            Symbol::OneCharOf(BTreeSet::from(['b', 'a'])).to_string(),
            "[ab]"
        );
        assert_eq!(
            Symbol::AnyCharExcept(BTreeSet::from(['\n'])).to_string(),
            "[^\\n]"
        );
        assert_eq!(Symbol::Literal("if".to_string()).to_string(), "\"if\"");
        assert_eq!(
            Symbol::Alternation {
                allow_empty: false,
                options: vec!["a".to_string(), "b".to_string()],
            }
            .to_string(),
            "(a | b)"
        );
        assert_eq!(Symbol::optional_reference("ws").to_string(), "(ws)?");
    }

    #[test]
    fn test_serde_round_trip() {
        let symbol = Symbol::Alternation {
            allow_empty: true,
            options: vec!["digits".to_string()],
        };
        let encoded = serde_json::to_string(&symbol).unwrap();
        let decoded: Symbol = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, symbol);
    }
}
