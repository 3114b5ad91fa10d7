//! Reading of Cocol grammar sources
//!
//! The reader tokenizes a grammar file and drives a
//! [DefinitionBuilder](crate::cocol::building::builder::DefinitionBuilder)
//! with the declarations it finds. Mistakes in the source are reported as
//! [ReadError](reader::ReadError) values with line and column positions.

pub mod reader;
pub mod tokens;
