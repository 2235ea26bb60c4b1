//! # wovenX Storage
//!
//! Artifact loading layer for the wovenX catalog engine.
//!
//! The upstream pipeline (classification, color extraction, similarity,
//! Pantone matching) exports four JSON datasets. [`load_catalog`] reads
//! them once at startup, applies referential validation, and produces the
//! immutable [`wovenx_core::Catalog`] the API serves from.

pub mod loader;
pub mod records;

pub use loader::{load_catalog, PANTONE_FILE, STOCK_FILE, VARIANTS_FILE, WOVENS_FILE};
