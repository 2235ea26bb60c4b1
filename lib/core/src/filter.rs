// Typed filter predicates over the entity collections
use crate::model::{Stock, Variant, Woven};

/// A composable restriction over one entity kind. Building a predicate never
/// evaluates it; evaluation happens when a list query walks the collection.
pub trait Predicate<T: ?Sized> {
    fn matches(&self, item: &T) -> bool;
}

/// Case-folded substring test. An absent or empty pattern restricts nothing.
fn contains_fold(haystack: &str, pattern: &Option<String>) -> bool {
    match pattern.as_deref() {
        None | Some("") => true,
        Some(p) => haystack.to_lowercase().contains(&p.to_lowercase()),
    }
}

/// Same test against an optional field. A missing field never matches a
/// supplied pattern.
fn opt_contains_fold(haystack: Option<&str>, pattern: &Option<String>) -> bool {
    match pattern.as_deref() {
        None | Some("") => true,
        Some(p) => haystack
            .map(|h| h.to_lowercase().contains(&p.to_lowercase()))
            .unwrap_or(false),
    }
}

/// Filters for the woven listing. All fields optional, AND-composed.
#[derive(Debug, Default, Clone)]
pub struct WovenFilter {
    pub reference: Option<String>,
    pub draw: Option<String>,
}

impl Predicate<Woven> for WovenFilter {
    fn matches(&self, woven: &Woven) -> bool {
        contains_fold(&woven.reference, &self.reference) && contains_fold(&woven.draw, &self.draw)
    }
}

/// Filters for the variant listing. `color_names` uses AND semantics: the
/// variant must carry every supplied name. `in_stock` is existence-based.
#[derive(Debug, Default, Clone)]
pub struct VariantFilter {
    pub color_names: Vec<String>,
    pub category: Option<String>,
    pub reference: Option<String>,
    pub draw: Option<String>,
    pub in_stock: Option<bool>,
}

/// A variant joined with the context its filters need: reference and draw
/// live on the owning woven, and stock presence is derived from the store.
pub struct VariantCtx<'a> {
    pub variant: &'a Variant,
    pub woven: &'a Woven,
    pub has_stock: bool,
}

impl Predicate<VariantCtx<'_>> for VariantFilter {
    fn matches(&self, ctx: &VariantCtx<'_>) -> bool {
        ctx.variant.has_all_colors(&self.color_names)
            && opt_contains_fold(ctx.variant.category.as_deref(), &self.category)
            && contains_fold(&ctx.woven.reference, &self.reference)
            && contains_fold(&ctx.woven.draw, &self.draw)
            && self.in_stock.map_or(true, |want| ctx.has_stock == want)
    }
}

/// Filters for the stock listing.
#[derive(Debug, Default, Clone)]
pub struct StockFilter {
    pub variant_id: Option<u32>,
    pub perfect_match: Option<bool>,
    pub min_quantity: Option<f64>,
    pub description: Option<String>,
}

impl Predicate<Stock> for StockFilter {
    fn matches(&self, stock: &Stock) -> bool {
        self.variant_id.map_or(true, |id| stock.variant_id == id)
            && self
                .perfect_match
                .map_or(true, |want| stock.perfect_match == want)
            && self.min_quantity.map_or(true, |min| stock.quantity >= min)
            && contains_fold(&stock.description, &self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn woven(reference: &str, draw: &str) -> Woven {
        Woven {
            id: 1,
            reference: reference.to_string(),
            draw: draw.to_string(),
            composition: "100% CO".to_string(),
            date: None,
            finishing: None,
            category: None,
            yarns: vec![],
        }
    }

    fn variant(colors: &[&str], category: Option<&str>) -> Variant {
        Variant::new(
            10,
            1,
            "001".to_string(),
            category.map(|c| c.to_string()),
            colors.iter().map(|c| c.to_string()).collect(),
            vec![],
            "10.jpg".to_string(),
            None,
        )
    }

    fn stock(description: &str, quantity: f64, perfect_match: bool) -> Stock {
        Stock {
            id: 1,
            variant_id: 10,
            description: description.to_string(),
            quantity,
            perfect_match,
        }
    }

    #[test]
    fn test_partial_match_is_case_insensitive_substring() {
        let w = woven("4612", "Herringbone");
        let hit = WovenFilter {
            reference: Some("46".to_string()),
            ..Default::default()
        };
        let miss = WovenFilter {
            reference: Some("9999".to_string()),
            ..Default::default()
        };
        let folded = WovenFilter {
            draw: Some("herring".to_string()),
            ..Default::default()
        };
        assert!(hit.matches(&w));
        assert!(!miss.matches(&w));
        assert!(folded.matches(&w));
    }

    #[test]
    fn test_empty_pattern_restricts_nothing() {
        let w = woven("4612", "Plain");
        let f = WovenFilter {
            reference: Some(String::new()),
            draw: None,
        };
        assert!(f.matches(&w));
    }

    #[test]
    fn test_default_filter_matches_everything() {
        assert!(WovenFilter::default().matches(&woven("4612", "Plain")));
        assert!(StockFilter::default().matches(&stock("lot", 0.0, false)));
    }

    #[test]
    fn test_color_names_are_and_composed() {
        let w = woven("4612", "Plain");
        let v = variant(&["white", "blue"], None);
        let ctx = VariantCtx {
            variant: &v,
            woven: &w,
            has_stock: false,
        };

        let both = VariantFilter {
            color_names: vec!["White".to_string(), "BLUE".to_string()],
            ..Default::default()
        };
        let extra = VariantFilter {
            color_names: vec!["white".to_string(), "red".to_string()],
            ..Default::default()
        };
        assert!(both.matches(&ctx));
        assert!(!extra.matches(&ctx));
    }

    #[test]
    fn test_missing_category_never_matches_supplied_pattern() {
        let w = woven("4612", "Plain");
        let v = variant(&[], None);
        let ctx = VariantCtx {
            variant: &v,
            woven: &w,
            has_stock: false,
        };
        let f = VariantFilter {
            category: Some("Jacquard".to_string()),
            ..Default::default()
        };
        assert!(!f.matches(&ctx));
    }

    #[test]
    fn test_in_stock_three_valued() {
        let w = woven("4612", "Plain");
        let v = variant(&[], None);
        let stocked = VariantCtx {
            variant: &v,
            woven: &w,
            has_stock: true,
        };
        let unstocked = VariantCtx {
            variant: &v,
            woven: &w,
            has_stock: false,
        };

        let want_stock = VariantFilter {
            in_stock: Some(true),
            ..Default::default()
        };
        let want_none = VariantFilter {
            in_stock: Some(false),
            ..Default::default()
        };
        let absent = VariantFilter::default();

        assert!(want_stock.matches(&stocked));
        assert!(!want_stock.matches(&unstocked));
        assert!(want_none.matches(&unstocked));
        assert!(!want_none.matches(&stocked));
        assert!(absent.matches(&stocked));
        assert!(absent.matches(&unstocked));
    }

    #[test]
    fn test_min_quantity_threshold() {
        let f = StockFilter {
            min_quantity: Some(5.0),
            ..Default::default()
        };
        assert!(f.matches(&stock("lot", 5.0, false)));
        assert!(f.matches(&stock("lot", 7.5, false)));
        assert!(!f.matches(&stock("lot", 4.9, false)));
    }

    #[test]
    fn test_stock_filters_and_composed() {
        let f = StockFilter {
            variant_id: Some(10),
            perfect_match: Some(true),
            min_quantity: Some(1.0),
            description: Some("warehouse".to_string()),
        };
        assert!(f.matches(&stock("Warehouse A", 2.0, true)));
        assert!(!f.matches(&stock("Warehouse A", 2.0, false)));
        assert!(!f.matches(&stock("Outlet", 2.0, true)));
    }
}
