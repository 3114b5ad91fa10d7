//! # cocol
//!
//! An extractor that turns Cocol grammars into normalized language definitions.
//!
//! The library reads an attributed context-free grammar (character classes,
//! keywords, comment annotations, token and production rules), normalizes it
//! (whitespace-skip insertion, keyword boundary resolution, start-rule boundary
//! handling) and emits a serializable [LanguageDefinition](cocol::definition::LanguageDefinition)
//! suitable for driving a generic editor-support engine.

pub mod cocol;
