use crate::model::{PantoneColor, SimilarityEdge, Stock, Variant, Woven};
use ahash::{AHashMap, AHashSet};

/// The read-only entity store.
///
/// Holds the four entity collections and their precomputed edges, built once
/// at startup and never mutated afterwards. Handlers share it by reference
/// (`Arc<Catalog>`); no locking is required because nothing writes to it.
///
/// Canonical order is ascending id for wovens, variants and stock, and
/// ascending name for Pantone colors. List queries slice these orders, which
/// keeps pagination deterministic.
#[derive(Debug)]
pub struct Catalog {
    wovens: Vec<Woven>,
    variants: Vec<Variant>,
    stocks: Vec<Stock>,
    pantone: Vec<PantoneColor>,

    woven_index: AHashMap<u32, usize>,
    variant_index: AHashMap<u32, usize>,
    pantone_index: AHashMap<String, usize>,

    // woven id -> variant positions, ordered by variant_ref
    variants_of: AHashMap<u32, Vec<usize>>,
    // variant id -> stock positions, in id order
    stocks_of: AHashMap<u32, Vec<usize>>,
    // variant ids with at least one stock row, regardless of quantity
    stocked: AHashSet<u32>,
    // variant id -> ranked similarity edges, best first
    similarity: AHashMap<u32, Vec<SimilarityEdge>>,

    colors: Vec<String>,
    categories: Vec<String>,
    references: Vec<String>,
    draws: Vec<String>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn wovens(&self) -> &[Woven] {
        &self.wovens
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn stocks(&self) -> &[Stock] {
        &self.stocks
    }

    pub fn pantone_colors(&self) -> &[PantoneColor] {
        &self.pantone
    }

    pub fn woven(&self, id: u32) -> Option<&Woven> {
        self.woven_index.get(&id).map(|&i| &self.wovens[i])
    }

    pub fn variant(&self, id: u32) -> Option<&Variant> {
        self.variant_index.get(&id).map(|&i| &self.variants[i])
    }

    /// Exact, case-sensitive name lookup.
    pub fn pantone(&self, name: &str) -> Option<&PantoneColor> {
        self.pantone_index.get(name).map(|&i| &self.pantone[i])
    }

    /// Variants of a woven, ordered by variant_ref.
    pub fn variants_of(&self, woven_id: u32) -> impl Iterator<Item = &Variant> {
        self.variants_of
            .get(&woven_id)
            .into_iter()
            .flatten()
            .map(|&i| &self.variants[i])
    }

    /// Stock rows referencing a variant, in id order.
    pub fn stocks_of(&self, variant_id: u32) -> impl Iterator<Item = &Stock> {
        self.stocks_of
            .get(&variant_id)
            .into_iter()
            .flatten()
            .map(|&i| &self.stocks[i])
    }

    /// Existence-based availability: true iff at least one stock row
    /// references the variant, independent of quantity.
    pub fn has_stock(&self, variant_id: u32) -> bool {
        self.stocked.contains(&variant_id)
    }

    /// Ranked similarity edges for a variant, best first.
    pub fn similar_to(&self, variant_id: u32) -> &[SimilarityEdge] {
        self.similarity
            .get(&variant_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Distinct lowercased color names observed across all variants, sorted.
    pub fn color_vocab(&self) -> &[String] {
        &self.colors
    }

    /// Distinct variant categories, sorted.
    pub fn category_vocab(&self) -> &[String] {
        &self.categories
    }

    /// Distinct woven references, sorted.
    pub fn reference_vocab(&self) -> &[String] {
        &self.references
    }

    /// Distinct draw patterns, sorted.
    pub fn draw_vocab(&self) -> &[String] {
        &self.draws
    }
}

/// Accumulates loaded entities and edges, then freezes them into a
/// [`Catalog`]. Input order does not matter; `build` establishes the
/// canonical orders and indexes.
///
/// The builder indexes whatever it is given. Referential validation (rows
/// and edges pointing at entities that were never loaded) is the loader's
/// job; a dangling edge that slips through resolves to nothing at
/// projection time rather than a panic.
#[derive(Default)]
pub struct CatalogBuilder {
    wovens: Vec<Woven>,
    variants: Vec<Variant>,
    stocks: Vec<Stock>,
    pantone: Vec<PantoneColor>,
    similarity: AHashMap<u32, Vec<SimilarityEdge>>,
}

impl CatalogBuilder {
    pub fn wovens(mut self, wovens: Vec<Woven>) -> Self {
        self.wovens = wovens;
        self
    }

    pub fn variants(mut self, variants: Vec<Variant>) -> Self {
        self.variants = variants;
        self
    }

    pub fn stocks(mut self, stocks: Vec<Stock>) -> Self {
        self.stocks = stocks;
        self
    }

    pub fn pantone_colors(mut self, pantone: Vec<PantoneColor>) -> Self {
        self.pantone = pantone;
        self
    }

    /// Similarity edges keyed by source variant id. `build` ranks each list
    /// by descending score.
    pub fn similarity<I>(mut self, edges: I) -> Self
    where
        I: IntoIterator<Item = (u32, Vec<SimilarityEdge>)>,
    {
        self.similarity = edges.into_iter().collect();
        self
    }

    pub fn build(self) -> Catalog {
        let Self {
            mut wovens,
            mut variants,
            mut stocks,
            mut pantone,
            mut similarity,
        } = self;

        wovens.sort_by_key(|w| w.id);
        variants.sort_by_key(|v| v.id);
        stocks.sort_by_key(|s| s.id);
        pantone.sort_by(|a, b| a.name.cmp(&b.name));

        let woven_index = wovens.iter().enumerate().map(|(i, w)| (w.id, i)).collect();
        let variant_index: AHashMap<u32, usize> =
            variants.iter().enumerate().map(|(i, v)| (v.id, i)).collect();
        let pantone_index = pantone
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();

        let mut variants_of: AHashMap<u32, Vec<usize>> = AHashMap::new();
        for (i, v) in variants.iter().enumerate() {
            variants_of.entry(v.woven_id).or_default().push(i);
        }
        for positions in variants_of.values_mut() {
            positions.sort_by(|&a, &b| variants[a].variant_ref.cmp(&variants[b].variant_ref));
        }

        let mut stocks_of: AHashMap<u32, Vec<usize>> = AHashMap::new();
        let mut stocked = AHashSet::new();
        for (i, s) in stocks.iter().enumerate() {
            stocks_of.entry(s.variant_id).or_default().push(i);
            stocked.insert(s.variant_id);
        }

        for edges in similarity.values_mut() {
            edges.sort_by(|a, b| {
                b.score_percent
                    .partial_cmp(&a.score_percent)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        let mut colors: Vec<String> = variants
            .iter()
            .flat_map(|v| v.color_set().iter().cloned())
            .collect::<AHashSet<_>>()
            .into_iter()
            .collect();
        colors.sort();

        let mut categories: Vec<String> = variants
            .iter()
            .filter_map(|v| v.category.clone())
            .collect::<AHashSet<_>>()
            .into_iter()
            .collect();
        categories.sort();

        let mut references: Vec<String> = wovens
            .iter()
            .map(|w| w.reference.clone())
            .filter(|r| !r.is_empty())
            .collect::<AHashSet<_>>()
            .into_iter()
            .collect();
        references.sort();

        let mut draws: Vec<String> = wovens
            .iter()
            .map(|w| w.draw.clone())
            .filter(|d| !d.is_empty())
            .collect::<AHashSet<_>>()
            .into_iter()
            .collect();
        draws.sort();

        Catalog {
            wovens,
            variants,
            stocks,
            pantone,
            woven_index,
            variant_index,
            pantone_index,
            variants_of,
            stocks_of,
            stocked,
            similarity,
            colors,
            categories,
            references,
            draws,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Variant, Woven};

    fn woven(id: u32, reference: &str, draw: &str) -> Woven {
        Woven {
            id,
            reference: reference.to_string(),
            draw: draw.to_string(),
            composition: "100% CO".to_string(),
            date: None,
            finishing: None,
            category: None,
            yarns: vec![],
        }
    }

    fn variant(id: u32, woven_id: u32, variant_ref: &str, colors: &[&str]) -> Variant {
        Variant::new(
            id,
            woven_id,
            variant_ref.to_string(),
            Some("Jacquard".to_string()),
            colors.iter().map(|c| c.to_string()).collect(),
            vec![],
            format!("{id}.jpg"),
            None,
        )
    }

    fn stock(id: u32, variant_id: u32, quantity: f64) -> Stock {
        Stock {
            id,
            variant_id,
            description: "lot".to_string(),
            quantity,
            perfect_match: false,
        }
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = Catalog::builder()
            .wovens(vec![woven(2, "4612", "D1"), woven(1, "9999", "D2")])
            .build();

        assert_eq!(catalog.woven(1).unwrap().reference, "9999");
        assert_eq!(catalog.woven(2).unwrap().reference, "4612");
        assert!(catalog.woven(3).is_none());
        // canonical order is ascending id regardless of input order
        assert_eq!(catalog.wovens()[0].id, 1);
    }

    #[test]
    fn test_variants_of_ordered_by_ref() {
        let catalog = Catalog::builder()
            .wovens(vec![woven(1, "4612", "D1")])
            .variants(vec![
                variant(10, 1, "003", &[]),
                variant(11, 1, "001", &[]),
                variant(12, 1, "002", &[]),
            ])
            .build();

        let refs: Vec<&str> = catalog
            .variants_of(1)
            .map(|v| v.variant_ref.as_str())
            .collect();
        assert_eq!(refs, ["001", "002", "003"]);
    }

    #[test]
    fn test_has_stock_is_existence_based() {
        let catalog = Catalog::builder()
            .wovens(vec![woven(1, "4612", "D1")])
            .variants(vec![variant(10, 1, "001", &[]), variant(11, 1, "002", &[])])
            .stocks(vec![stock(1, 10, 0.0)])
            .build();

        // a zero-quantity row still counts as stock
        assert!(catalog.has_stock(10));
        assert!(!catalog.has_stock(11));
    }

    #[test]
    fn test_similarity_sorted_descending() {
        let mut edges = AHashMap::new();
        edges.insert(
            10,
            vec![
                SimilarityEdge {
                    variant_id: 11,
                    score_percent: 55.0,
                },
                SimilarityEdge {
                    variant_id: 12,
                    score_percent: 91.5,
                },
            ],
        );
        let catalog = Catalog::builder()
            .wovens(vec![woven(1, "4612", "D1")])
            .variants(vec![
                variant(10, 1, "001", &[]),
                variant(11, 1, "002", &[]),
                variant(12, 1, "003", &[]),
            ])
            .similarity(edges)
            .build();

        let scores: Vec<f32> = catalog
            .similar_to(10)
            .iter()
            .map(|e| e.score_percent)
            .collect();
        assert_eq!(scores, [91.5, 55.0]);
        assert!(catalog.similar_to(99).is_empty());
    }

    #[test]
    fn test_vocab_derivation() {
        let catalog = Catalog::builder()
            .wovens(vec![woven(1, "4612", "Plain"), woven(2, "9999", "Twill")])
            .variants(vec![
                variant(10, 1, "001", &["White", "blue"]),
                variant(11, 2, "001", &["Blue", "red"]),
            ])
            .build();

        assert_eq!(catalog.color_vocab(), ["blue", "red", "white"]);
        assert_eq!(catalog.category_vocab(), ["Jacquard"]);
        assert_eq!(catalog.reference_vocab(), ["4612", "9999"]);
        assert_eq!(catalog.draw_vocab(), ["Plain", "Twill"]);
    }
}
