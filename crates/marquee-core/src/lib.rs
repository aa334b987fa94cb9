//! # Marquee Core
//!
//! Core types, domain records, and error definitions for Marquee.
//! Every other crate in the workspace builds on the abstractions here:
//! the unified error type, pagination, typed identifiers, and the
//! read-only records served by the query layer.

pub mod domain;
pub mod error;
pub mod id;
pub mod pagination;
pub mod result;
pub mod telemetry;
pub mod timestamp;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use pagination::*;
pub use result::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
