//! Vellum Core Types
//!
//! This crate provides the foundational types used throughout the Vellum
//! write engine:
//! - The document value type (the Datum enum) and type introspection
//! - Structural merge primitives (deep merge plus named merge strategies)
//! - Configured limits (array sizes, generated-key cap)
//! - Common error types

mod datum;
mod error;
mod limits;
mod merge;

pub use datum::*;
pub use error::*;
pub use limits::*;
pub use merge::*;
