//! Sheet data source abstractions and core types

use crate::core::dashboard::{self, Dashboard};
use crate::core::normalize::parse_amount;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

/// Sheet names returned by the source, plus the spreadsheet link if known.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SheetListing {
    pub sheets: Vec<String>,
    pub url: Option<String>,
}

/// Raw contents of an import sheet.
#[derive(Debug, Clone, Default)]
pub struct ProfitSheet {
    pub sli: f64,
    pub items: Vec<Value>,
}

/// A row appended to the transactions sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub fecha_ingreso: String,
    pub empresa: String,
    pub concepto_pago: String,
    pub moneda: String,
    pub monto: f64,
    pub nro_operacion: Option<String>,
    pub detalle: Option<String>,
}

#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Rows of the transactions sheet.
    async fn fetch_transactions(&self) -> Result<Vec<Value>>;

    async fn list_sheets(&self) -> Result<SheetListing>;

    async fn fetch_profit_sheet(&self, sheet: &str) -> Result<ProfitSheet>;

    async fn append_transaction(&self, transaction: &NewTransaction) -> Result<()>;
}

/// Outcome of reaching the source for a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum SourceStatus {
    Success,
    Error(String),
}

impl SourceStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, SourceStatus::Success)
    }
}

/// Transaction rows from a payload that is either a bare list or a
/// `{"data": [...]}` wrapper. Any other shape has no rows.
pub fn transaction_rows(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(rows) => rows,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(rows)) => rows,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Sheet listing from either a bare list of names or a
/// `{"sheets": [...], "url": "..."}` object. `hidden` names are left out.
pub fn sheet_listing(payload: Value, hidden: &[String]) -> SheetListing {
    let (names, url) = match payload {
        Value::Array(names) => (names, None),
        Value::Object(mut map) => {
            let names = match map.remove("sheets") {
                Some(Value::Array(names)) => names,
                _ => Vec::new(),
            };
            let url = match map.remove("url") {
                Some(Value::String(url)) if !url.is_empty() => Some(url),
                _ => None,
            };
            (names, url)
        }
        _ => (Vec::new(), None),
    };

    let sheets = names
        .into_iter()
        .filter_map(|name| match name {
            Value::String(name) => Some(name),
            _ => None,
        })
        .filter(|name| !hidden.contains(name))
        .collect();

    SheetListing { sheets, url }
}

/// Import sheet from a `{"sli": ..., "data": [...]}` payload.
pub fn profit_sheet(payload: Value) -> ProfitSheet {
    let Value::Object(mut map) = payload else {
        return ProfitSheet::default();
    };
    let sli = map.get("sli").map_or(0.0, parse_amount);
    let items = match map.remove("data") {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    ProfitSheet { sli, items }
}

/// Fetches and aggregates the transactions sheet. Source failures are
/// reported through the status and leave the dashboard empty.
pub async fn load_dashboard(source: &(dyn SheetSource + Send + Sync)) -> (Dashboard, SourceStatus) {
    match source.fetch_transactions().await {
        Ok(rows) => {
            info!(rows = rows.len(), "Fetched transactions");
            (dashboard::aggregate(&rows), SourceStatus::Success)
        }
        Err(e) => {
            error!(error = %e, "Could not fetch transactions");
            (Dashboard::default(), SourceStatus::Error(format!("{e:#}")))
        }
    }
}
