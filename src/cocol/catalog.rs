//! Named-subset catalog
//!
//! Canonical character sets for the named classes the rule synthesizer can
//! extract from a character-set rule. These are lookup tables only; the
//! synthesizer tests them for subset containment against the characters of
//! a positive set and never mutates them.

use once_cell::sync::Lazy;
use std::collections::BTreeSet;

/// ASCII letters, both cases
pub static LETTERS: Lazy<BTreeSet<char>> =
    Lazy::new(|| ('a'..='z').chain('A'..='Z').collect());

/// ASCII decimal digits
pub static DIGITS: Lazy<BTreeSet<char>> = Lazy::new(|| ('0'..='9').collect());

/// ASCII letters and decimal digits
pub static LETTERS_OR_DIGITS: Lazy<BTreeSet<char>> =
    Lazy::new(|| LETTERS.union(&DIGITS).copied().collect());

/// ASCII uppercase letters
pub static UPPERCASE: Lazy<BTreeSet<char>> = Lazy::new(|| ('A'..='Z').collect());

/// ASCII lowercase letters
pub static LOWERCASE: Lazy<BTreeSet<char>> = Lazy::new(|| ('a'..='z').collect());

/// Horizontal whitespace; line ends are a class of their own
pub static WHITESPACE: Lazy<BTreeSet<char>> = Lazy::new(|| BTreeSet::from([' ', '\t']));

/// Line feed, probed separately from carriage return so either one alone
/// still maps to the shared line-end rule
pub static LINE_FEED: Lazy<BTreeSet<char>> = Lazy::new(|| BTreeSet::from(['\n']));

/// Carriage return
pub static CARRIAGE_RETURN: Lazy<BTreeSet<char>> = Lazy::new(|| BTreeSet::from(['\r']));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(LETTERS.len(), 52);
        assert_eq!(DIGITS.len(), 10);
        assert_eq!(LETTERS_OR_DIGITS.len(), 62);
        assert_eq!(UPPERCASE.len(), 26);
        assert_eq!(LOWERCASE.len(), 26);
    }

    #[test]
    fn test_subset_relations() {
        assert!(UPPERCASE.is_subset(&LETTERS));
        assert!(LOWERCASE.is_subset(&LETTERS));
        assert!(LETTERS.is_subset(&LETTERS_OR_DIGITS));
        assert!(DIGITS.is_subset(&LETTERS_OR_DIGITS));
        assert!(!WHITESPACE.is_subset(&LETTERS_OR_DIGITS));
    }
}
