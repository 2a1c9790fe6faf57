use super::{OutputFormat, print_json, ui};
use crate::core::dashboard::{AMOUNT_FIELD, CurrencyTotals, Dashboard, MonthlySeries, Transaction};
use crate::core::normalize::cell_text;
use crate::core::record::resolve_field;
use crate::core::source::{SheetSource, SourceStatus, load_dashboard};
use crate::core::{Currency, PerCurrency};
use anyhow::Result;
use comfy_table::Cell;
use serde::Serialize;

/// JSON shape of the operations view.
#[derive(Debug, Serialize)]
pub struct OperationsReport<'a> {
    pub source: &'a SourceStatus,
    pub totals: &'a PerCurrency<CurrencyTotals>,
    pub charts: &'a PerCurrency<MonthlySeries>,
    pub transactions: &'a [Transaction],
    pub skipped: usize,
}

impl<'a> OperationsReport<'a> {
    pub fn new(dashboard: &'a Dashboard, status: &'a SourceStatus) -> Self {
        Self {
            source: status,
            totals: &dashboard.totals,
            charts: &dashboard.charts,
            transactions: &dashboard.transactions,
            skipped: dashboard.skipped,
        }
    }
}

fn totals_table(totals: &PerCurrency<CurrencyTotals>) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Income"),
        ui::header_cell("Expense"),
        ui::header_cell("Balance"),
    ]);

    for (currency, total) in totals.iter() {
        table.add_row(vec![
            Cell::new(currency.code()),
            ui::number_cell(ui::format_money(total.income, currency)),
            ui::number_cell(ui::format_money(total.expense, currency)),
            ui::amount_cell(total.balance, currency),
        ]);
    }
    table.to_string()
}

fn monthly_table(series: &MonthlySeries, currency: Currency) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Month"),
        ui::header_cell("Income"),
        ui::header_cell("Expense"),
        ui::header_cell("Net"),
    ]);

    for (month, income, expense) in series.rows() {
        table.add_row(vec![
            Cell::new(month),
            ui::number_cell(ui::format_money(income, currency)),
            ui::number_cell(ui::format_money(expense, currency)),
            ui::amount_cell(income - expense, currency),
        ]);
    }
    table.to_string()
}

fn text_cell(transaction: &Transaction, column: &str) -> Cell {
    match resolve_field(&transaction.fields, &[column]).map(cell_text) {
        Some(text) if !text.is_empty() => Cell::new(text),
        _ => ui::na_cell(),
    }
}

fn transactions_table(transactions: &[Transaction]) -> String {
    let mut rows: Vec<&Transaction> = transactions.iter().collect();
    // Newest first; dates that could not be parsed keep their raw text
    rows.sort_by(|a, b| b.normalized.iso_date.cmp(&a.normalized.iso_date));

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Company"),
        ui::header_cell("Concept"),
        ui::header_cell("Operation"),
        ui::header_cell("Amount"),
    ]);

    for transaction in rows {
        let normalized = &transaction.normalized;
        let amount = if transaction.fields.contains_key(AMOUNT_FIELD) {
            ui::amount_cell(normalized.amount, normalized.currency)
        } else {
            ui::na_cell()
        };
        table.add_row(vec![
            Cell::new(&normalized.iso_date),
            text_cell(transaction, "EMPRESA"),
            text_cell(transaction, "CONCEPTO_PAGO"),
            text_cell(transaction, "NRO_OPERACION"),
            amount,
        ]);
    }
    table.to_string()
}

impl Dashboard {
    pub fn display_as_text(&self, status: &SourceStatus) -> String {
        let mut output = format!("{}\n\n", ui::style_text("Operations", ui::StyleType::Title));

        if let SourceStatus::Error(message) = status {
            output.push_str(&ui::style_text(
                &format!("Could not reach the spreadsheet: {message}"),
                ui::StyleType::Error,
            ));
            output.push_str("\n\n");
        }

        output.push_str(&totals_table(&self.totals));

        if status.is_success() && self.transactions.is_empty() {
            output.push_str(&format!(
                "\n\n{}",
                ui::style_text("The transactions sheet has no rows", ui::StyleType::Subtle)
            ));
        }

        for (currency, series) in self.charts.iter() {
            if series.is_empty() {
                continue;
            }
            output.push_str(&format!(
                "\n\n{}\n",
                ui::style_text(
                    &format!("Monthly income and expense ({currency})"),
                    ui::StyleType::TotalLabel
                )
            ));
            output.push_str(&monthly_table(series, currency));
        }

        if !self.transactions.is_empty() {
            output.push_str(&format!(
                "\n\n{}\n",
                ui::style_text("Transactions", ui::StyleType::TotalLabel)
            ));
            output.push_str(&transactions_table(&self.transactions));
        }

        if self.skipped > 0 {
            output.push_str(&format!(
                "\n\n{}",
                ui::style_text(
                    &format!("{} row(s) could not be read and were skipped", self.skipped),
                    ui::StyleType::Subtle
                )
            ));
        }

        output
    }
}

pub async fn run(source: &(dyn SheetSource + Send + Sync), format: OutputFormat) -> Result<()> {
    let pb = ui::new_spinner("Fetching transactions...");
    let (dashboard, status) = load_dashboard(source).await;
    pb.finish_and_clear();

    match format {
        OutputFormat::Table => println!("{}", dashboard.display_as_text(&status)),
        OutputFormat::Json => print_json(&OperationsReport::new(&dashboard, &status))?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dashboard::aggregate;
    use serde_json::json;

    fn sample_dashboard() -> Dashboard {
        aggregate(&[
            json!({"FECHA_INGRESO": "2026-01-05", "EMPRESA": "Acme SAC", "MONEDA": "PEN", "MONTO": 500}),
            json!({"FECHA_INGRESO": "2026-02-01", "EMPRESA": "", "MONEDA": "USD", "MONTO": -40}),
        ])
    }

    #[test]
    fn test_display_includes_totals_and_months() {
        let text = sample_dashboard().display_as_text(&SourceStatus::Success);

        assert!(text.contains("S/ 500.00"));
        assert!(text.contains("$ 40.00"));
        assert!(text.contains("2026-01"));
        assert!(text.contains("2026-02"));
        assert!(text.contains("Acme SAC"));
        assert!(!text.contains("Could not reach"));
    }

    #[test]
    fn test_display_reports_source_error() {
        let status = SourceStatus::Error("HTTP 500".to_string());
        let text = Dashboard::default().display_as_text(&status);

        assert!(text.contains("Could not reach the spreadsheet: HTTP 500"));
        assert!(text.contains("S/ 0.00"));
        assert!(!text.contains("Transactions"));
        assert!(!text.contains("has no rows"));
    }

    #[test]
    fn test_display_notes_empty_sheet() {
        let text = Dashboard::default().display_as_text(&SourceStatus::Success);
        assert!(text.contains("The transactions sheet has no rows"));

        let text = sample_dashboard().display_as_text(&SourceStatus::Success);
        assert!(!text.contains("has no rows"));
    }

    #[test]
    fn test_json_report_shape() {
        let dashboard = sample_dashboard();
        let status = SourceStatus::Success;
        let report = serde_json::to_value(OperationsReport::new(&dashboard, &status)).unwrap();

        assert_eq!(report["source"]["status"], "success");
        assert_eq!(report["totals"]["PEN"]["income"], 500.0);
        assert_eq!(report["totals"]["USD"]["balance"], -40.0);
        assert_eq!(report["charts"]["USD"]["labels"], json!(["2026-02"]));
        assert_eq!(report["transactions"][0]["normalized"]["currency"], "PEN");
        assert_eq!(report["transactions"][0]["normalized"]["month_key"], "2026-01");
    }
}
