use super::ui;
use crate::core::SheetSource;
use crate::core::source::SheetListing;
use anyhow::{Context, Result};
use comfy_table::Cell;

impl SheetListing {
    pub fn display_as_table(&self) -> String {
        let mut output = format!(
            "{}\n\n",
            ui::style_text("Import sheets", ui::StyleType::Title)
        );

        if self.sheets.is_empty() {
            output.push_str(&ui::style_text(
                "No import sheets found in the spreadsheet",
                ui::StyleType::Subtle,
            ));
        } else {
            let mut table = ui::new_styled_table();
            table.set_header(vec![ui::header_cell("#"), ui::header_cell("Sheet")]);
            for (i, sheet) in self.sheets.iter().enumerate() {
                table.add_row(vec![Cell::new(i + 1), Cell::new(sheet)]);
            }
            output.push_str(&table.to_string());
        }

        if let Some(url) = &self.url {
            output.push_str(&format!(
                "\n\nSpreadsheet: {}",
                ui::style_text(url, ui::StyleType::Subtle)
            ));
        }
        output
    }
}

pub async fn run(source: &(dyn SheetSource + Send + Sync)) -> Result<()> {
    let pb = ui::new_spinner("Listing sheets...");
    let listing = source.list_sheets().await;
    pb.finish_and_clear();

    let listing = listing.context("Could not get the list of sheets")?;
    println!("{}", listing.display_as_table());
    Ok(())
}
