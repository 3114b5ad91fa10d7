//! Symbolic character-set algebra
//!
//! Character sets in a grammar's CHARACTERS section are built by combining
//! literals, ranges and previously defined sets with `+` and `-`. Broad
//! sets like "any character except a quote" cannot reasonably be stored as
//! character enumerations, so [CharSet] keeps a symbolic form instead: a
//! short sequence of terminal [Symbol]s folded by the operators into at
//! most one positive bucket (`OneCharOf` or the absorbing `AnyCharacter`)
//! and at most one exception bucket (`AnyCharExcept`).
//!
//! The operators follow two non-obvious conventions:
//!
//! - `AnyCharacter` absorbs unions completely. Once one operand matches
//!   everything, exception information from the other operand is discarded
//!   rather than merged, since "everything" has no exceptions.
//! - Subtraction distinguishes a complement base from a finite base. When
//!   the minuend is built on `AnyCharacter` or `AnyCharExcept`, removing a
//!   character must record it as an explicit exception, and the final
//!   result is the exception bucket alone. The subtrahend must be finite;
//!   a complement-class symbol on the right side is a contract breach.

use crate::cocol::symbol::Symbol;
use std::collections::BTreeSet;
use std::ops::{Add, Sub};

/// A symbolic set of characters
///
/// The empty set is represented by an empty symbol sequence. Well-formed
/// values hold at most one positive aggregate and at most one exception
/// aggregate; the operators always fold their output back to that shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharSet {
    symbols: Vec<Symbol>,
}

impl CharSet {
    /// The set containing no characters
    pub fn empty() -> CharSet {
        CharSet {
            symbols: Vec::new(),
        }
    }

    /// The set containing exactly one character
    pub fn from_char(chr: char) -> CharSet {
        CharSet::from_chars([chr])
    }

    /// The set of all characters in the inclusive range
    pub fn from_range(low: char, high: char) -> CharSet {
        CharSet::from_chars(low..=high)
    }

    /// The set of all listed characters
    pub fn from_chars(chars: impl IntoIterator<Item = char>) -> CharSet {
        let set: BTreeSet<char> = chars.into_iter().collect();
        if set.is_empty() {
            CharSet::empty()
        } else {
            CharSet {
                symbols: vec![Symbol::OneCharOf(set)],
            }
        }
    }

    /// The set matching every character
    pub fn any() -> CharSet {
        CharSet {
            symbols: vec![Symbol::AnyCharacter],
        }
    }

    /// The set matching a line end
    pub fn end_of_line() -> CharSet {
        CharSet {
            symbols: vec![Symbol::AnyLineEnd],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    fn contains_any(&self) -> bool {
        self.symbols
            .iter()
            .any(|symbol| matches!(symbol, Symbol::AnyCharacter))
    }

    /// Canonical two-bucket form: positive characters first, exceptions
    /// second, empty buckets omitted.
    fn from_buckets(positive: BTreeSet<char>, negative: BTreeSet<char>) -> CharSet {
        let mut symbols = Vec::new();
        if !positive.is_empty() {
            symbols.push(Symbol::OneCharOf(positive));
        }
        if !negative.is_empty() {
            symbols.push(Symbol::AnyCharExcept(negative));
        }
        CharSet { symbols }
    }

    /// Logical complement, used for `empty - B`
    ///
    /// Positive symbols become exceptions and vice versa. `AnyCharacter`
    /// complements to nothing at all. Any other terminal is treated as a
    /// line end and complements to "anything but a line feed".
    fn complement(&self) -> CharSet {
        let mut symbols = Vec::new();
        for symbol in &self.symbols {
            match symbol {
                Symbol::OneCharOf(chars) => symbols.push(Symbol::AnyCharExcept(chars.clone())),
                Symbol::AnyCharExcept(chars) => symbols.push(Symbol::OneCharOf(chars.clone())),
                Symbol::AnyCharacter => {}
                _ => symbols.push(Symbol::AnyCharExcept(BTreeSet::from(['\n']))),
            }
        }
        CharSet { symbols }
    }

    /// General subtraction for two non-empty operands
    ///
    /// # Panics
    ///
    /// Panics when the subtrahend contains `AnyCharacter` or
    /// `AnyCharExcept`; callers only ever subtract finite sets.
    fn subtract(self, other: CharSet) -> CharSet {
        let mut positive = BTreeSet::new();
        let mut negative = BTreeSet::new();
        let mut base_is_complement = false;
        for symbol in &self.symbols {
            match symbol {
                Symbol::OneCharOf(chars) => positive.extend(chars.iter().copied()),
                Symbol::AnyCharExcept(chars) => {
                    negative.extend(chars.iter().copied());
                    base_is_complement = true;
                }
                Symbol::AnyCharacter => base_is_complement = true,
                Symbol::AnyLineEnd => {
                    positive.insert('\n');
                }
                _ => {}
            }
        }
        for symbol in &other.symbols {
            match symbol {
                Symbol::OneCharOf(chars) => {
                    for chr in chars {
                        positive.remove(chr);
                        if base_is_complement {
                            negative.insert(*chr);
                        }
                    }
                }
                Symbol::AnyLineEnd => {
                    negative.insert('\n');
                }
                Symbol::AnyCharacter | Symbol::AnyCharExcept(_) => {
                    panic!("cannot subtract a complement-class character set");
                }
                _ => {}
            }
        }
        if base_is_complement {
            // A complement base only tracks exceptions; the positive
            // bucket never contributes to membership.
            CharSet {
                symbols: vec![Symbol::AnyCharExcept(negative)],
            }
        } else {
            CharSet::from_buckets(positive, negative)
        }
    }
}

impl Add for CharSet {
    type Output = CharSet;

    fn add(self, other: CharSet) -> CharSet {
        if self.contains_any() || other.contains_any() {
            return CharSet::any();
        }
        let mut positive = BTreeSet::new();
        let mut negative = BTreeSet::new();
        for symbol in self.symbols.iter().chain(other.symbols.iter()) {
            match symbol {
                Symbol::OneCharOf(chars) => positive.extend(chars.iter().copied()),
                Symbol::AnyCharExcept(chars) => negative.extend(chars.iter().copied()),
                Symbol::AnyLineEnd => {
                    positive.insert('\n');
                }
                _ => {}
            }
        }
        CharSet::from_buckets(positive, negative)
    }
}

impl Sub for CharSet {
    type Output = CharSet;

    fn sub(self, other: CharSet) -> CharSet {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => CharSet::empty(),
            (false, true) => self,
            (true, false) => other.complement(),
            (false, false) => self.subtract(other),
        }
    }
}
