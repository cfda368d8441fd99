//! riskscore-core: Likert scoring, risk classification and cached analysis.
//!
//! Raw exam answers flow through [`codec`] and [`aggregate`] into per-category
//! totals, are classified by [`classify`], compared against the attempt's own
//! [`baseline`], and composed by [`analysis`]. The [`assembler`] decides
//! between a cached snapshot and a fresh computation.

pub mod aggregate;
pub mod analysis;
pub mod assembler;
pub mod baseline;
pub mod cache;
pub mod classify;
pub mod codec;
pub mod error;
pub mod model;
pub mod narrative;
pub mod parser;
pub mod source;
pub mod summary;
