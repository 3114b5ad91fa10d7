//! Property-based tests for the character-set algebra
//!
//! The `+` and `-` operators must keep every result in the canonical
//! two-bucket shape and behave like plain set arithmetic on finite
//! sets, with `ANY` as the absorbing element and exclusion sets
//! accumulating their exceptions.

use cocol::cocol::charset::CharSet;
use cocol::cocol::symbol::Symbol;
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Generates a small finite character pool, possibly empty
fn chars_strategy() -> impl Strategy<Value = BTreeSet<char>> {
    prop::collection::btree_set(
        prop_oneof![
            prop::char::range('a', 'z'),
            prop::char::range('0', '9'),
            Just('\n'),
            Just('_'),
            Just(' '),
        ],
        0..8,
    )
}

/// Generates a finite character pool with at least one member
fn nonempty_chars_strategy() -> impl Strategy<Value = BTreeSet<char>> {
    prop::collection::btree_set(
        prop_oneof![
            prop::char::range('a', 'z'),
            prop::char::range('0', '9'),
            Just('\n'),
        ],
        1..8,
    )
}

/// Generates any operand shape a grammar can produce
fn charset_strategy() -> impl Strategy<Value = CharSet> {
    prop_oneof![
        Just(CharSet::empty()),
        Just(CharSet::any()),
        Just(CharSet::end_of_line()),
        chars_strategy().prop_map(|chars| CharSet::from_chars(chars)),
        // Exclusion sets only arise as ANY minus a finite set
        nonempty_chars_strategy()
            .prop_map(|chars| CharSet::any() - CharSet::from_chars(chars)),
    ]
}

/// At most one positive aggregate followed by at most one exception
/// aggregate.
fn is_canonical(set: &CharSet) -> bool {
    matches!(
        set.symbols(),
        []
            | [Symbol::AnyCharacter]
            | [Symbol::OneCharOf(_)]
            | [Symbol::AnyCharExcept(_)]
            | [Symbol::OneCharOf(_), Symbol::AnyCharExcept(_)]
    )
}

proptest! {
    #[test]
    fn test_union_is_commutative(a in charset_strategy(), b in charset_strategy()) {
        prop_assert_eq!(a.clone() + b.clone(), b + a);
    }

    #[test]
    fn test_union_absorbs_a_repeated_operand(a in charset_strategy(), b in charset_strategy()) {
        let once = a + b.clone();
        prop_assert_eq!(once.clone() + b, once);
    }

    #[test]
    fn test_any_absorbs_every_union(a in charset_strategy()) {
        prop_assert_eq!(CharSet::any() + a.clone(), CharSet::any());
        prop_assert_eq!(a + CharSet::any(), CharSet::any());
    }

    #[test]
    fn test_union_results_are_canonical(a in charset_strategy(), b in charset_strategy()) {
        prop_assert!(is_canonical(&(a + b)));
    }

    #[test]
    fn test_finite_union_matches_set_union(a in chars_strategy(), b in chars_strategy()) {
        let merged: BTreeSet<char> = a.union(&b).copied().collect();
        prop_assert_eq!(
            CharSet::from_chars(a) + CharSet::from_chars(b),
            CharSet::from_chars(merged)
        );
    }

    #[test]
    fn test_finite_difference_matches_set_difference(
        a in nonempty_chars_strategy(),
        b in chars_strategy(),
    ) {
        let kept: BTreeSet<char> = a.difference(&b).copied().collect();
        prop_assert_eq!(
            CharSet::from_chars(a) - CharSet::from_chars(b),
            CharSet::from_chars(kept)
        );
    }

    #[test]
    fn test_finite_self_subtraction_is_empty(a in chars_strategy()) {
        let set = CharSet::from_chars(a);
        prop_assert_eq!(set.clone() - set, CharSet::empty());
    }

    #[test]
    fn test_exclusion_base_accumulates_exceptions(
        a in chars_strategy(),
        b in chars_strategy(),
    ) {
        let combined: BTreeSet<char> = a.union(&b).copied().collect();
        let stepwise = (CharSet::any() - CharSet::from_chars(a)) - CharSet::from_chars(b);
        prop_assert_eq!(stepwise, CharSet::any() - CharSet::from_chars(combined));
    }

    #[test]
    fn test_subtracting_finite_sets_stays_canonical(
        a in charset_strategy(),
        b in nonempty_chars_strategy(),
    ) {
        prop_assert!(is_canonical(&(a - CharSet::from_chars(b))));
    }
}
