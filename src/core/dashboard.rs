//! Folds sheet transactions into per-currency totals and monthly series.
use crate::core::currency::{Currency, PerCurrency};
use crate::core::normalize::{self, UNKNOWN_MONTH};
use crate::core::record::RawRecord;
use anyhow::{Result, anyhow};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Column holding the signed amount.
pub const AMOUNT_FIELD: &str = "MONTO";
/// Column holding the currency label.
pub const CURRENCY_FIELD: &str = "MONEDA";
/// Column holding the transaction date.
pub const DATE_FIELD: &str = "FECHA_INGRESO";

/// Canonical values derived from one sheet row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTransaction {
    /// Positive for income, negative for expenses.
    pub amount: f64,
    pub currency: Currency,
    pub iso_date: String,
    pub month_key: String,
}

impl NormalizedTransaction {
    pub fn is_income(&self) -> bool {
        self.amount >= 0.0
    }

    pub fn has_known_month(&self) -> bool {
        self.month_key != UNKNOWN_MONTH
    }
}

/// A sheet row along with its normalized values.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub fields: RawRecord,
    pub normalized: NormalizedTransaction,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CurrencyTotals {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

/// Income and expense per month, ready to chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlySeries {
    pub labels: Vec<String>,
    pub income: Vec<f64>,
    pub expense: Vec<f64>,
}

impl MonthlySeries {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `(month, income, expense)` rows in chronological order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, f64, f64)> {
        self.labels
            .iter()
            .zip(&self.income)
            .zip(&self.expense)
            .map(|((label, income), expense)| (label.as_str(), *income, *expense))
    }
}

/// Everything the operations view shows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dashboard {
    pub totals: PerCurrency<CurrencyTotals>,
    pub charts: PerCurrency<MonthlySeries>,
    pub transactions: Vec<Transaction>,
    /// Rows that could not be normalized and were left out.
    pub skipped: usize,
}

#[derive(Debug, Default)]
struct MonthBucket {
    income: f64,
    expense: f64,
}

/// Normalizes a single row. Rows that are not objects, or whose amount is
/// not a finite number, are rejected.
pub fn normalize_record(raw: &Value) -> Result<(RawRecord, NormalizedTransaction)> {
    let fields = raw
        .as_object()
        .ok_or_else(|| anyhow!("Row is not an object: {raw}"))?;

    let amount = fields
        .get(AMOUNT_FIELD)
        .map_or(0.0, normalize::parse_amount);
    if !amount.is_finite() {
        return Err(anyhow!("Amount is not a finite number: {amount}"));
    }

    let currency = fields
        .get(CURRENCY_FIELD)
        .map_or(Currency::default(), normalize::parse_currency);

    let raw_date = fields
        .get(DATE_FIELD)
        .map(normalize::cell_text)
        .unwrap_or_default();
    let (iso_date, month_key) = normalize::date_keys(&raw_date);

    Ok((
        fields.clone(),
        NormalizedTransaction {
            amount,
            currency,
            iso_date,
            month_key,
        },
    ))
}

/// Builds the dashboard for a batch of sheet rows.
pub fn aggregate(records: &[Value]) -> Dashboard {
    let mut dashboard = Dashboard::default();
    let mut months: PerCurrency<BTreeMap<String, MonthBucket>> = PerCurrency::default();

    for (index, raw) in records.iter().enumerate() {
        let (fields, normalized) = match normalize_record(raw) {
            Ok(result) => result,
            Err(e) => {
                warn!(row = index, error = %e, "Skipping transaction row");
                dashboard.skipped += 1;
                continue;
            }
        };

        if !normalized.has_known_month() {
            debug!(
                row = index,
                date = ?fields.get(DATE_FIELD),
                "Unparseable transaction date"
            );
        }

        let totals = dashboard.totals.get_mut(normalized.currency);
        let bucket = if normalized.has_known_month() {
            Some(
                months
                    .get_mut(normalized.currency)
                    .entry(normalized.month_key.clone())
                    .or_default(),
            )
        } else {
            None
        };

        if normalized.is_income() {
            totals.income += normalized.amount;
            if let Some(bucket) = bucket {
                bucket.income += normalized.amount;
            }
        } else {
            totals.expense += normalized.amount.abs();
            if let Some(bucket) = bucket {
                bucket.expense += normalized.amount.abs();
            }
        }

        dashboard.transactions.push(Transaction { fields, normalized });
    }

    for currency in Currency::ALL {
        let totals = dashboard.totals.get_mut(currency);
        totals.balance = totals.income - totals.expense;

        let chart = dashboard.charts.get_mut(currency);
        for (month, bucket) in std::mem::take(months.get_mut(currency)) {
            chart.labels.push(month);
            chart.income.push(bucket.income);
            chart.expense.push(bucket.expense);
        }
    }

    debug!(
        rows = records.len(),
        skipped = dashboard.skipped,
        "Aggregated transactions"
    );
    dashboard
}
