use super::ui;
use crate::core::SheetSource;
use crate::core::normalize::parse_date;
use crate::core::source::NewTransaction;
use anyhow::{Result, bail};
use tracing::warn;

/// Checks a transaction before it is sent. The sheet accepts anything, so
/// only what would make the row useless is rejected.
pub fn validate(transaction: &NewTransaction) -> Result<()> {
    if !transaction.monto.is_finite() {
        bail!("Amount must be a number");
    }
    if transaction.empresa.trim().is_empty() {
        bail!("Company is required");
    }
    if transaction.moneda.trim().is_empty() {
        bail!("Currency is required");
    }
    if parse_date(&transaction.fecha_ingreso).is_none() {
        // Still sent; the dashboard will list it under an unknown month
        warn!(
            date = %transaction.fecha_ingreso,
            "Date is not in a recognized format"
        );
    }
    Ok(())
}

pub async fn run(
    source: &(dyn SheetSource + Send + Sync),
    transaction: &NewTransaction,
) -> Result<()> {
    validate(transaction)?;

    let pb = ui::new_spinner("Registering transaction...");
    let result = source.append_transaction(transaction).await;
    pb.finish_and_clear();

    result?;
    println!(
        "{}",
        ui::style_text("Transaction registered successfully.", ui::StyleType::TotalValue)
    );
    Ok(())
}
