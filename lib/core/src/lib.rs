//! # wovenX Core
//!
//! Core library for the wovenX catalog engine.
//!
//! This crate provides the read-only faceted query engine:
//!
//! - [`Catalog`] - The entity store: wovens, variants, stock, Pantone colors
//!   and their precomputed similarity edges, immutable after construction
//! - [`WovenFilter`] / [`VariantFilter`] / [`StockFilter`] - Typed filter
//!   predicates with AND composition
//! - [`PageRequest`] / [`Page`] - Deterministic pagination over the
//!   canonical id order
//! - [`view`] - Response shapes and the projection methods that build them
//!
//! ## Example
//!
//! ```rust
//! use wovenx_core::{Catalog, PageRequest, VariantFilter, Woven};
//!
//! let catalog = Catalog::builder()
//!     .wovens(vec![Woven {
//!         id: 1,
//!         reference: "4612".to_string(),
//!         draw: "Plain".to_string(),
//!         composition: "100% CO".to_string(),
//!         date: None,
//!         finishing: None,
//!         category: None,
//!         yarns: vec![],
//!     }])
//!     .build();
//!
//! let filter = VariantFilter {
//!     color_names: vec!["white".to_string()],
//!     ..Default::default()
//! };
//! let page = catalog.list_variants(&filter, PageRequest::default());
//! assert_eq!(page.total, 0);
//! ```

pub mod catalog;
pub mod error;
pub mod filter;
pub mod model;
pub mod page;
pub mod view;

pub use catalog::{Catalog, CatalogBuilder};
pub use error::{Error, Result};
pub use filter::{Predicate, StockFilter, VariantCtx, VariantFilter, WovenFilter};
pub use model::{PantoneColor, SimilarityEdge, Stock, Variant, Woven, Yarn};
pub use page::{paginate, Page, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use view::{
    EntityCounts, NearestVariantItem, PantoneDetail, PantoneList, PantoneListItem,
    SimilarVariantItem, StockItem, StockListItem, StockVariantSummary, VariantDetail,
    VariantListItem, VariantSummary, WovenListItem, WovenSummary, YarnItem,
};
