//! Main module for cocol library functionality

pub mod building;
pub mod catalog;
pub mod charset;
pub mod definition;
pub mod diagnostics;
pub mod reading;
pub mod serialization;
pub mod symbol;
pub mod verification;
