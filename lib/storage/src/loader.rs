use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use wovenx_core::{
    Catalog, Error, PantoneColor, Result, SimilarityEdge, Stock, Variant, Woven, Yarn,
};

use crate::records::{PantoneRecord, StockRecord, VariantRecord, WovenRecord};

pub const WOVENS_FILE: &str = "wovens.json";
pub const VARIANTS_FILE: &str = "variants.json";
pub const PANTONE_FILE: &str = "pantone_colors.json";
pub const STOCK_FILE: &str = "stock.json";

/// Fallback variant reference for records that carry none.
const DEFAULT_VARIANT_REF: &str = "000";

/// Read the four offline-computed artifacts from `dir` and build the
/// immutable catalog.
///
/// Referential validation happens here, once: variants referencing an
/// unknown woven and stock rows referencing an unknown variant are dropped,
/// as are similarity and Pantone-nearest edges aimed at variants that did
/// not survive. Each drop category is counted and logged. After this
/// function returns, every foreign reference in the catalog resolves.
pub fn load_catalog<P: AsRef<Path>>(dir: P) -> Result<Catalog> {
    let dir = dir.as_ref();
    let woven_records: Vec<WovenRecord> = read_artifact(&dir.join(WOVENS_FILE))?;
    let variant_records: Vec<VariantRecord> = read_artifact(&dir.join(VARIANTS_FILE))?;
    let pantone_records: Vec<PantoneRecord> = read_artifact(&dir.join(PANTONE_FILE))?;
    let stock_records: Vec<StockRecord> = read_artifact(&dir.join(STOCK_FILE))?;

    info!(
        wovens = woven_records.len(),
        variants = variant_records.len(),
        pantone = pantone_records.len(),
        stock = stock_records.len(),
        "artifacts read"
    );

    let wovens: Vec<Woven> = woven_records.into_iter().map(woven_from).collect();
    let woven_ids: HashSet<u32> = wovens.iter().map(|w| w.id).collect();

    let mut variants = Vec::new();
    let mut raw_similarity = Vec::new();
    let mut orphan_variants = 0usize;
    for record in variant_records {
        if !woven_ids.contains(&record.woven_id) {
            orphan_variants += 1;
            continue;
        }
        let edges = record.similarity.clone();
        raw_similarity.push((record.id, edges));
        variants.push(variant_from(record));
    }
    if orphan_variants > 0 {
        warn!(skipped = orphan_variants, "variants dropped: unknown woven");
    }

    let variant_ids: HashSet<u32> = variants.iter().map(|v| v.id).collect();

    let mut dangling_edges = 0usize;
    let similarity: Vec<(u32, Vec<SimilarityEdge>)> = raw_similarity
        .into_iter()
        .map(|(source, edges)| {
            let kept: Vec<SimilarityEdge> = edges
                .into_iter()
                .filter_map(|e| {
                    if variant_ids.contains(&e.id) {
                        Some(SimilarityEdge {
                            variant_id: e.id,
                            score_percent: e.score_percent,
                        })
                    } else {
                        dangling_edges += 1;
                        None
                    }
                })
                .collect();
            (source, kept)
        })
        .collect();
    if dangling_edges > 0 {
        warn!(
            dropped = dangling_edges,
            "similarity edges dropped: unknown target variant"
        );
    }

    let mut stocks = Vec::new();
    let mut orphan_stock = 0usize;
    let mut clamped = 0usize;
    for record in stock_records {
        if !variant_ids.contains(&record.variant_id) {
            orphan_stock += 1;
            continue;
        }
        let quantity = record
            .quantity
            .as_ref()
            .and_then(|q| q.as_f64())
            .unwrap_or(0.0);
        let quantity = if quantity < 0.0 {
            clamped += 1;
            0.0
        } else {
            quantity
        };
        stocks.push(Stock {
            // artifact rows carry no id of their own
            id: stocks.len() as u32 + 1,
            variant_id: record.variant_id,
            description: record.description.unwrap_or_default(),
            quantity,
            perfect_match: record.perfect_match,
        });
    }
    if orphan_stock > 0 {
        warn!(skipped = orphan_stock, "stock rows dropped: unknown variant");
    }
    if clamped > 0 {
        warn!(clamped, "negative stock quantities clamped to zero");
    }

    let mut dangling_nearest = 0usize;
    let pantone: Vec<PantoneColor> = pantone_records
        .into_iter()
        .map(|p| {
            let nearests = p
                .nearests
                .into_iter()
                .filter(|id| {
                    let keep = variant_ids.contains(id);
                    if !keep {
                        dangling_nearest += 1;
                    }
                    keep
                })
                .collect();
            PantoneColor {
                name: p.name,
                hex: p.hex,
                nearests,
            }
        })
        .collect();
    if dangling_nearest > 0 {
        warn!(
            dropped = dangling_nearest,
            "pantone nearest entries dropped: unknown variant"
        );
    }

    let catalog = Catalog::builder()
        .wovens(wovens)
        .variants(variants)
        .stocks(stocks)
        .pantone_colors(pantone)
        .similarity(similarity)
        .build();

    info!(
        wovens = catalog.wovens().len(),
        variants = catalog.variants().len(),
        stock = catalog.stocks().len(),
        pantone = catalog.pantone_colors().len(),
        "catalog built"
    );

    Ok(catalog)
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| Error::Parse(format!("{}: {e}", path.display())))
}

fn woven_from(record: WovenRecord) -> Woven {
    let date = match record.date.as_deref() {
        None | Some("") => None,
        Some(s) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(d) => Some(d),
            Err(_) => {
                warn!(woven = record.id, date = s, "unparsable production date");
                None
            }
        },
    };
    Woven {
        id: record.id,
        reference: record.reference.unwrap_or_default(),
        draw: record.draw.unwrap_or_default(),
        composition: record.composition.unwrap_or_default(),
        date,
        finishing: record.finishing,
        category: record.category,
        yarns: record
            .yarns
            .into_iter()
            .map(|y| Yarn {
                variant_ref: y.variant_ref,
                name: y.name,
                ne: y.ne,
                composition: y.composition,
                colors: y.colors,
            })
            .collect(),
    }
}

fn variant_from(record: VariantRecord) -> Variant {
    Variant::new(
        record.id,
        record.woven_id,
        record
            .variant_ref
            .unwrap_or_else(|| DEFAULT_VARIANT_REF.to_string()),
        record.category,
        record.color_name,
        record.color_hex,
        record.thumbnail.unwrap_or_default(),
        record.filename,
    )
}
