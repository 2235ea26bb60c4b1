use ahash::AHashSet;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A yarn record owned by a woven.
///
/// Yarns are tagged with the variant they belong to; an untagged yarn
/// (`variant_ref: None`) applies to every variant of the woven.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Yarn {
    pub variant_ref: Option<String>,
    pub name: Option<String>,
    pub ne: Option<String>,
    pub composition: Option<String>,
    pub colors: Option<Vec<String>>,
}

impl Yarn {
    /// Whether this yarn belongs to the given variant reference.
    pub fn belongs_to(&self, variant_ref: &str) -> bool {
        match self.variant_ref.as_deref() {
            None => true,
            Some(r) => r == variant_ref,
        }
    }
}

/// A woven fabric design with its technical specification.
#[derive(Debug, Clone)]
pub struct Woven {
    pub id: u32,
    pub reference: String,
    pub draw: String,
    pub composition: String,
    pub date: Option<NaiveDate>,
    pub finishing: Option<String>,
    pub category: Option<String>,
    pub yarns: Vec<Yarn>,
}

/// One color rendition of a woven.
#[derive(Debug, Clone)]
pub struct Variant {
    pub id: u32,
    pub woven_id: u32,
    pub variant_ref: String,
    pub category: Option<String>,
    pub color_name: Vec<String>,
    pub color_hex: Vec<String>,
    pub thumbnail: String,
    pub filename: Option<String>,
    color_set: AHashSet<String>,
}

impl Variant {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u32,
        woven_id: u32,
        variant_ref: String,
        category: Option<String>,
        color_name: Vec<String>,
        color_hex: Vec<String>,
        thumbnail: String,
        filename: Option<String>,
    ) -> Self {
        // Materialized once so the multi-valued color filter is a set
        // containment check rather than a scan per request.
        let color_set = color_name.iter().map(|c| c.to_lowercase()).collect();
        Self {
            id,
            woven_id,
            variant_ref,
            category,
            color_name,
            color_hex,
            thumbnail,
            filename,
            color_set,
        }
    }

    /// True iff every name in `wanted` appears in this variant's colors.
    /// Matching is case-insensitive; an empty `wanted` always passes.
    pub fn has_all_colors<S: AsRef<str>>(&self, wanted: &[S]) -> bool {
        wanted
            .iter()
            .all(|c| self.color_set.contains(&c.as_ref().to_lowercase()))
    }

    /// Lowercased color names of this variant.
    pub fn color_set(&self) -> &AHashSet<String> {
        &self.color_set
    }
}

/// An inventory lot referencing a variant.
#[derive(Debug, Clone)]
pub struct Stock {
    pub id: u32,
    pub variant_id: u32,
    pub description: String,
    pub quantity: f64,
    pub perfect_match: bool,
}

/// A named color standard with a precomputed nearest-variant list.
///
/// `nearests` holds variant ids in upstream rank order (closest first);
/// the ranking itself is computed offline and never re-derived here.
#[derive(Debug, Clone)]
pub struct PantoneColor {
    pub name: String,
    pub hex: String,
    pub nearests: Vec<u32>,
}

impl PantoneColor {
    pub fn nearest_count(&self) -> usize {
        self.nearests.len()
    }
}

/// A precomputed similarity edge from one variant to another.
/// Scores are percentages, 0-100, higher meaning closer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityEdge {
    pub variant_id: u32,
    pub score_percent: f32,
}
