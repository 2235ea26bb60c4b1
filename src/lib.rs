//! # wovenX
//!
//! A read-only faceted catalog engine for woven fabric designs, their color
//! variants, inventory stock and Pantone color cross-references.
//!
//! Classification, color extraction and similarity scoring happen upstream;
//! wovenX loads the exported artifacts once at startup and serves
//! deterministic, paginated list and detail queries over them.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! cargo install wovenx
//! wovenx --data-dir ./data --http-port 8000
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use wovenx::prelude::*;
//!
//! // Build a catalog (normally done by wovenx-storage from JSON artifacts)
//! let catalog = Catalog::builder().build();
//!
//! // Faceted listing: all supplied filters are AND-composed
//! let filter = VariantFilter {
//!     color_names: vec!["white".to_string(), "blue".to_string()],
//!     in_stock: Some(true),
//!     ..Default::default()
//! };
//! let page = catalog.list_variants(&filter, PageRequest::default());
//! assert_eq!(page.total, 0);
//! ```
//!
//! ## Crate Structure
//!
//! wovenX is composed of several crates:
//!
//! - [`wovenx-core`](https://docs.rs/wovenx-core) - Entity store, filter
//!   predicates, pagination, projection
//! - [`wovenx-storage`](https://docs.rs/wovenx-storage) - Artifact loader
//! - [`wovenx-api`](https://docs.rs/wovenx-api) - REST endpoints
//!
//! ## Features
//!
//! - **Faceted queries**: conjunctions of partial-match, multi-valued AND,
//!   boolean and threshold filters
//! - **Deterministic pagination**: stable id order, exact totals, clamped
//!   page sizes
//! - **Read-time projection**: denormalized joins and precomputed
//!   similarity edges resolved per response
//! - **Immutable store**: loaded once, shared lock-free across requests

// Re-export core types
pub use wovenx_core::{
    Catalog, CatalogBuilder, Error, Page, PageRequest, PantoneColor, Predicate, Result,
    SimilarityEdge, Stock, StockFilter, Variant, VariantFilter, Woven, WovenFilter, Yarn,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};

// Re-export the loader
pub use wovenx_storage::load_catalog;

// Re-export the API
pub use wovenx_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        load_catalog, Catalog, CatalogBuilder, Error, Page, PageRequest, PantoneColor, Predicate,
        Result, RestApi, SimilarityEdge, Stock, StockFilter, Variant, VariantFilter, Woven,
        WovenFilter, Yarn,
    };
}
