use super::{OutputFormat, print_json, ui};
use crate::core::profit::{ProfitAnalysis, compute_profit_analysis};
use crate::core::SheetSource;
use anyhow::{Context, Result, bail};
use comfy_table::Cell;
use tracing::info;

impl ProfitAnalysis {
    pub fn display_as_table(&self, sheet: &str) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Product"),
            ui::header_cell("Qty"),
            ui::header_cell("Unit FOB"),
            ui::header_cell("Total FOB"),
            ui::header_cell("Unit Landed"),
        ]);

        for item in &self.products {
            table.add_row(vec![
                Cell::new(&item.name),
                ui::number_cell(format!("{:.2}", item.qty)),
                ui::number_cell(format!("{:.2}", item.unit_fob)),
                ui::number_cell(format!("{:.2}", item.total_fob)),
                ui::number_cell(format!("{:.4}", item.unit_landed)),
            ]);
        }

        let mut output = format!(
            "Landed cost: {}\n\n",
            ui::style_text(sheet, ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\n{} {:.2}\n{} {:.2}\n{} {}\n{} {:.2}",
            ui::style_text("Total FOB:", ui::StyleType::TotalLabel),
            self.total_fob,
            ui::style_text("SLI:", ui::StyleType::TotalLabel),
            self.sli,
            ui::style_text("Factor:", ui::StyleType::TotalLabel),
            ui::style_text(&format!("{:.4}", self.factor), ui::StyleType::TotalValue),
            ui::style_text("Total landed:", ui::StyleType::TotalLabel),
            self.total_landed(),
        ));
        output
    }
}

/// Fetches an import sheet and computes its landed costs.
pub async fn analyze_sheet(
    source: &(dyn SheetSource + Send + Sync),
    sheet: &str,
) -> Result<ProfitAnalysis> {
    let sheet = sheet.trim();
    if sheet.is_empty() {
        bail!("A sheet name is required");
    }

    let data = source
        .fetch_profit_sheet(sheet)
        .await
        .with_context(|| format!("Could not read sheet '{sheet}'"))?;
    info!(sheet, items = data.items.len(), sli = data.sli, "Fetched import sheet");

    Ok(compute_profit_analysis(data.sli, &data.items))
}

pub async fn run(
    source: &(dyn SheetSource + Send + Sync),
    sheet: &str,
    format: OutputFormat,
) -> Result<()> {
    let pb = ui::new_spinner("Fetching import sheet...");
    let analysis = analyze_sheet(source, sheet).await;
    pb.finish_and_clear();

    let analysis = analysis?;
    match format {
        OutputFormat::Table => println!("{}", analysis.display_as_table(sheet)),
        OutputFormat::Json => print_json(&analysis)?,
    }
    Ok(())
}
