//! Landed cost allocation for an import.
//!
//! The logistics cost of an import (SLI) is spread over its products in
//! proportion to their FOB value:
//!
//! ```text
//! factor      = sli / sum(total_fob)
//! unit_landed = unit_fob * (1 + factor)
//! ```
use crate::core::normalize::{cell_text, parse_amount};
use crate::core::record::{RawRecord, is_blank, resolve_field};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

const QTY_ALIASES: &[&str] = &["Cantidad", "Qty", "Cant", "CANTIDAD"];
const UNIT_FOB_ALIASES: &[&str] = &[
    "Precio Unitario",
    "Unit Price",
    "FOB Unit",
    "PRECIO_UNITARIO",
];
const TOTAL_FOB_ALIASES: &[&str] = &["Total", "Amount", "PRECIO_TOTAL", "TOTAL"];
const NAME_ALIASES: &[&str] = &[
    "Producto",
    "Product",
    "PRODUCTO",
    "Name",
    "Item",
    "Description",
];

/// A product line with its allocated landed cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandedItem {
    pub name: String,
    pub qty: f64,
    pub unit_fob: f64,
    pub total_fob: f64,
    pub unit_landed: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfitAnalysis {
    pub sli: f64,
    pub total_fob: f64,
    pub factor: f64,
    pub products: Vec<LandedItem>,
}

impl ProfitAnalysis {
    /// Landed value of the whole import, `unit_landed * qty` summed over products.
    pub fn total_landed(&self) -> f64 {
        self.products
            .iter()
            .map(|item| item.unit_landed * item.qty)
            .sum()
    }
}

/// Reads a product line. Lines without a positive quantity and unit price
/// are not products and yield `None`.
fn read_item(row: &RawRecord) -> Option<LandedItem> {
    let qty = resolve_field(row, QTY_ALIASES).map_or(0.0, parse_amount);
    let unit_fob = resolve_field(row, UNIT_FOB_ALIASES).map_or(0.0, parse_amount);
    if qty <= 0.0 || unit_fob <= 0.0 {
        return None;
    }

    let total_fob = match resolve_field(row, TOTAL_FOB_ALIASES) {
        Some(total) if !is_blank(total) => parse_amount(total),
        _ => qty * unit_fob,
    };

    let name = match resolve_field(row, NAME_ALIASES) {
        Some(name) if !is_blank(name) => cell_text(name),
        _ => row.values().next().map(cell_text).unwrap_or_default(),
    };

    Some(LandedItem {
        name,
        qty,
        unit_fob,
        total_fob,
        unit_landed: unit_fob,
    })
}

/// Allocates `sli` over the product lines in `raw_items`, keeping their order.
pub fn compute_profit_analysis(sli: f64, raw_items: &[Value]) -> ProfitAnalysis {
    let mut products: Vec<LandedItem> = raw_items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(read_item)
        .collect();

    let total_fob: f64 = products.iter().map(|item| item.total_fob).sum();
    let factor = if total_fob > 0.0 { sli / total_fob } else { 0.0 };

    for item in &mut products {
        item.unit_landed = item.unit_fob * (1.0 + factor);
    }

    debug!(
        rows = raw_items.len(),
        products = products.len(),
        total_fob,
        factor,
        "Computed landed costs"
    );

    ProfitAnalysis {
        sli,
        total_fob,
        factor,
        products,
    }
}
