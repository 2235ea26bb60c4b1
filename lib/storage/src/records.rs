//! Raw shapes of the offline-computed JSON artifacts.
//!
//! Deserialization is deliberately tolerant: upstream exports leave fields
//! out, write nulls, and encode quantities as strings. Normalization happens
//! in the loader, not here.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct WovenRecord {
    pub id: u32,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub draw: Option<String>,
    #[serde(default)]
    pub composition: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub finishing: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub yarns: Vec<YarnRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YarnRecord {
    #[serde(default)]
    pub variant_ref: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ne: Option<String>,
    #[serde(default)]
    pub composition: Option<String>,
    #[serde(default)]
    pub colors: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariantRecord {
    pub id: u32,
    pub woven_id: u32,
    #[serde(default)]
    pub variant_ref: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub color_name: Vec<String>,
    #[serde(default)]
    pub color_hex: Vec<String>,
    #[serde(default)]
    pub similarity: Vec<SimilarityRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimilarityRecord {
    pub id: u32,
    #[serde(default)]
    pub score_percent: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PantoneRecord {
    pub name: String,
    pub hex: String,
    #[serde(default)]
    pub nearests: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockRecord {
    pub variant_id: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<RawQuantity>,
    #[serde(default)]
    pub perfect_match: bool,
}

/// Quantity as the artifacts carry it: a number or a (possibly empty)
/// numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawQuantity {
    Number(f64),
    Text(String),
}

impl RawQuantity {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawQuantity::Number(n) => Some(*n),
            RawQuantity::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    None
                } else {
                    s.parse().ok()
                }
            }
        }
    }
}
