//! Response shapes and the query methods that assemble them.
//!
//! Everything here is read-time projection: denormalized joins (variant
//! summaries under a woven, parent fields on a variant row), filter-by-tag
//! over the composite yarn list, and resolution of precomputed edges.

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::filter::{Predicate, StockFilter, VariantCtx, VariantFilter, WovenFilter};
use crate::model::{Stock, Variant, Woven};
use crate::page::{paginate, Page, PageRequest};
use crate::{Error, Result};

/// Reduced variant embedded in woven payloads.
#[derive(Debug, Clone, Serialize)]
pub struct VariantSummary {
    pub variant_id: u32,
    pub variant_ref: String,
    pub thumbnail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WovenListItem {
    pub id: u32,
    pub reference: String,
    pub draw: String,
    pub finishing: Option<String>,
    pub variant_count: usize,
    pub variants: Vec<VariantSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariantListItem {
    pub id: u32,
    pub variant_ref: String,
    pub reference: String,
    pub draw: String,
    pub thumbnail: String,
    pub color_hex: Vec<String>,
}

/// One resolved similarity edge.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarVariantItem {
    pub id: u32,
    pub score_percent: f32,
    pub variant_ref: String,
    pub reference: String,
    pub thumbnail: String,
}

/// Technical fields of the parent woven, embedded in the variant detail.
#[derive(Debug, Clone, Serialize)]
pub struct WovenSummary {
    pub id: u32,
    pub reference: String,
    pub draw: String,
    pub composition: String,
    pub date: Option<NaiveDate>,
    pub finishing: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct YarnItem {
    pub name: Option<String>,
    pub ne: Option<String>,
    pub composition: Option<String>,
    pub colors: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StockItem {
    pub id: u32,
    pub description: String,
    pub quantity: f64,
    pub perfect_match: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariantDetail {
    pub id: u32,
    pub variant_ref: String,
    pub filename: Option<String>,
    pub thumbnail: String,
    pub category: Option<String>,
    pub color_name: Vec<String>,
    pub color_hex: Vec<String>,
    pub similarity: Vec<SimilarVariantItem>,
    pub woven: WovenSummary,
    pub other_variants: Vec<VariantSummary>,
    pub yarns: Vec<YarnItem>,
    pub stock: Vec<StockItem>,
}

/// Reduced variant embedded in stock rows.
#[derive(Debug, Clone, Serialize)]
pub struct StockVariantSummary {
    pub id: u32,
    pub variant_ref: String,
    pub reference: String,
    pub category: Option<String>,
    pub thumbnail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StockListItem {
    pub id: u32,
    pub variant_id: u32,
    pub description: String,
    pub quantity: f64,
    pub perfect_match: bool,
    pub variant: Option<StockVariantSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PantoneListItem {
    pub name: String,
    pub hex: String,
    pub nearest_count: usize,
}

/// The Pantone listing takes no paging parameters, so its envelope carries
/// no page fields.
#[derive(Debug, Clone, Serialize)]
pub struct PantoneList {
    pub items: Vec<PantoneListItem>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NearestVariantItem {
    pub id: u32,
    pub variant_ref: String,
    pub reference: String,
    pub category: Option<String>,
    pub thumbnail: String,
    pub has_stock: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PantoneDetail {
    pub name: String,
    pub hex: String,
    pub nearest: Vec<NearestVariantItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityCounts {
    pub wovens: usize,
    pub variants: usize,
    pub stock: usize,
    pub pantone_colors: usize,
}

fn variant_summary(variant: &Variant) -> VariantSummary {
    VariantSummary {
        variant_id: variant.id,
        variant_ref: variant.variant_ref.clone(),
        thumbnail: variant.thumbnail.clone(),
    }
}

impl Catalog {
    fn woven_item(&self, woven: &Woven) -> WovenListItem {
        let variants: Vec<VariantSummary> = self.variants_of(woven.id).map(variant_summary).collect();
        WovenListItem {
            id: woven.id,
            reference: woven.reference.clone(),
            draw: woven.draw.clone(),
            finishing: woven.finishing.clone(),
            variant_count: variants.len(),
            variants,
        }
    }

    /// Paginated woven listing with embedded variant summaries.
    pub fn list_wovens(&self, filter: &WovenFilter, request: PageRequest) -> Page<WovenListItem> {
        paginate(self.wovens().iter().filter(|w| filter.matches(w)), request)
            .map(|w| self.woven_item(w))
    }

    pub fn woven_detail(&self, id: u32) -> Result<WovenListItem> {
        self.woven(id)
            .map(|w| self.woven_item(w))
            .ok_or(Error::WovenNotFound(id))
    }

    /// Paginated variant listing. Parent reference and draw are resolved at
    /// read time, never stored on the variant.
    pub fn list_variants(
        &self,
        filter: &VariantFilter,
        request: PageRequest,
    ) -> Page<VariantListItem> {
        let matches = self.variants().iter().filter_map(|variant| {
            let woven = self.woven(variant.woven_id)?;
            let ctx = VariantCtx {
                variant,
                woven,
                has_stock: self.has_stock(variant.id),
            };
            filter.matches(&ctx).then_some(ctx)
        });
        paginate(matches, request).map(|ctx| VariantListItem {
            id: ctx.variant.id,
            variant_ref: ctx.variant.variant_ref.clone(),
            reference: ctx.woven.reference.clone(),
            draw: ctx.woven.draw.clone(),
            thumbnail: ctx.variant.thumbnail.clone(),
            color_hex: ctx.variant.color_hex.clone(),
        })
    }

    /// Full variant projection: resolved similarity edges, parent woven
    /// summary, sibling variants, the yarn subset tagged for this variant,
    /// and every stock row referencing it.
    pub fn variant_detail(&self, id: u32) -> Result<VariantDetail> {
        let variant = self.variant(id).ok_or(Error::VariantNotFound(id))?;
        let woven = self
            .woven(variant.woven_id)
            .ok_or(Error::WovenNotFound(variant.woven_id))?;

        let similarity = self
            .similar_to(id)
            .iter()
            .filter_map(|edge| {
                let target = self.variant(edge.variant_id)?;
                let target_woven = self.woven(target.woven_id)?;
                Some(SimilarVariantItem {
                    id: target.id,
                    score_percent: edge.score_percent,
                    variant_ref: target.variant_ref.clone(),
                    reference: target_woven.reference.clone(),
                    thumbnail: target.thumbnail.clone(),
                })
            })
            .collect();

        let other_variants = self
            .variants_of(woven.id)
            .filter(|v| v.id != id)
            .map(variant_summary)
            .collect();

        let yarns = woven
            .yarns
            .iter()
            .filter(|y| y.belongs_to(&variant.variant_ref))
            .map(|y| YarnItem {
                name: y.name.clone(),
                ne: y.ne.clone(),
                composition: y.composition.clone(),
                colors: y.colors.clone(),
            })
            .collect();

        let stock = self
            .stocks_of(id)
            .map(|s| StockItem {
                id: s.id,
                description: s.description.clone(),
                quantity: s.quantity,
                perfect_match: s.perfect_match,
            })
            .collect();

        Ok(VariantDetail {
            id: variant.id,
            variant_ref: variant.variant_ref.clone(),
            filename: variant.filename.clone(),
            thumbnail: variant.thumbnail.clone(),
            category: variant.category.clone(),
            color_name: variant.color_name.clone(),
            color_hex: variant.color_hex.clone(),
            similarity,
            woven: WovenSummary {
                id: woven.id,
                reference: woven.reference.clone(),
                draw: woven.draw.clone(),
                composition: woven.composition.clone(),
                date: woven.date,
                finishing: woven.finishing.clone(),
            },
            other_variants,
            yarns,
            stock,
        })
    }

    /// Paginated stock listing with an embedded reduced variant.
    pub fn list_stock(&self, filter: &StockFilter, request: PageRequest) -> Page<StockListItem> {
        paginate(self.stocks().iter().filter(|s| filter.matches(s)), request).map(|s| {
            self.stock_item(s)
        })
    }

    fn stock_item(&self, stock: &Stock) -> StockListItem {
        let variant = self.variant(stock.variant_id).map(|v| {
            let reference = self
                .woven(v.woven_id)
                .map(|w| w.reference.clone())
                .unwrap_or_default();
            StockVariantSummary {
                id: v.id,
                variant_ref: v.variant_ref.clone(),
                reference,
                category: v.category.clone(),
                thumbnail: v.thumbnail.clone(),
            }
        });
        StockListItem {
            id: stock.id,
            variant_id: stock.variant_id,
            description: stock.description.clone(),
            quantity: stock.quantity,
            perfect_match: stock.perfect_match,
            variant,
        }
    }

    /// All Pantone colors in name order.
    pub fn list_pantone(&self) -> PantoneList {
        let items: Vec<PantoneListItem> = self
            .pantone_colors()
            .iter()
            .map(|p| PantoneListItem {
                name: p.name.clone(),
                hex: p.hex.clone(),
                nearest_count: p.nearest_count(),
            })
            .collect();
        let total = items.len();
        PantoneList { items, total }
    }

    /// Pantone detail with the nearest-variant list in stored rank order.
    /// `has_stock` is recomputed per entry, never cached on the edge.
    pub fn pantone_detail(&self, name: &str) -> Result<PantoneDetail> {
        let pantone = self
            .pantone(name)
            .ok_or_else(|| Error::PantoneNotFound(name.to_string()))?;

        let nearest = pantone
            .nearests
            .iter()
            .filter_map(|&variant_id| {
                let variant = self.variant(variant_id)?;
                let reference = self
                    .woven(variant.woven_id)
                    .map(|w| w.reference.clone())
                    .unwrap_or_default();
                Some(NearestVariantItem {
                    id: variant.id,
                    variant_ref: variant.variant_ref.clone(),
                    reference,
                    category: variant.category.clone(),
                    thumbnail: variant.thumbnail.clone(),
                    has_stock: self.has_stock(variant.id),
                })
            })
            .collect();

        Ok(PantoneDetail {
            name: pantone.name.clone(),
            hex: pantone.hex.clone(),
            nearest,
        })
    }

    pub fn counts(&self) -> EntityCounts {
        EntityCounts {
            wovens: self.wovens().len(),
            variants: self.variants().len(),
            stock: self.stocks().len(),
            pantone_colors: self.pantone_colors().len(),
        }
    }
}
