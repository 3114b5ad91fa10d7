//! Grammar assembly
//!
//! [builder::DefinitionBuilder] accumulates rules, keywords, comment rules
//! and start rules while a grammar is being read, then runs the
//! normalization passes in a fixed order when it is built:
//!
//! 1. whitespace-skip insertion with keyword boundary resolution
//!    ([whitespace]), over every rule flagged for forced whitespace
//! 2. start-rule boundary normalization ([boundary]), which assumes the
//!    whitespace pass has already placed trailing whitespace references
//!
//! Character-set rules are synthesized on the way in ([charset_rules]),
//! before either pass runs.

pub mod boundary;
pub mod builder;
pub mod charset_rules;
pub mod whitespace;
