use crate::core::config::SourceConfig;
use crate::core::source::{self, NewTransaction, ProfitSheet, SheetListing, SheetSource};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// A spreadsheet published as an Apps Script web app.
///
/// `GET` returns the transactions sheet, `?action=listSheets` the sheet names,
/// `?sheet=<name>` an import sheet, and `POST` appends a transaction.
pub struct AppsScriptProvider {
    webapp_url: String,
    timeout: Duration,
    sheet_timeout: Duration,
    hidden_sheets: Vec<String>,
    client: reqwest::Client,
}

impl AppsScriptProvider {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("sheetdash/1.0")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            webapp_url: config.webapp_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            sheet_timeout: Duration::from_secs(config.sheet_timeout_secs),
            hidden_sheets: config.hidden_sheets.clone(),
            client,
        })
    }

    /// Sends the request and decodes the JSON body. Anything other than
    /// `200 OK` is an error.
    async fn get_json(&self, request: RequestBuilder, what: &str) -> Result<Value> {
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send request for {what}"))?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(%status, "Unexpected status for {}", what);
            return Err(anyhow!("Spreadsheet returned HTTP {status} for {what}"));
        }

        let response_text = response
            .text()
            .await
            .with_context(|| format!("Failed to get response text for {what}"))?;

        serde_json::from_str(&response_text).map_err(|e| {
            error!(
                error = ?e,
                response = %response_text,
                "Failed to parse spreadsheet response"
            );
            anyhow!("Failed to parse spreadsheet response for {what}: {e}")
        })
    }
}

#[async_trait]
impl SheetSource for AppsScriptProvider {
    #[instrument(name = "FetchTransactions", skip(self))]
    async fn fetch_transactions(&self) -> Result<Vec<Value>> {
        let request = self.client.get(&self.webapp_url).timeout(self.timeout);
        let payload = self.get_json(request, "transactions").await?;
        let rows = source::transaction_rows(payload);
        if let Some(first) = rows.first() {
            debug!(?first, "First transaction row");
        }
        Ok(rows)
    }

    #[instrument(name = "ListSheets", skip(self))]
    async fn list_sheets(&self) -> Result<SheetListing> {
        let request = self
            .client
            .get(&self.webapp_url)
            .query(&[("action", "listSheets")])
            .timeout(self.sheet_timeout);
        let payload = self.get_json(request, "sheet list").await?;
        Ok(source::sheet_listing(payload, &self.hidden_sheets))
    }

    #[instrument(name = "FetchProfitSheet", skip(self), fields(sheet = %sheet))]
    async fn fetch_profit_sheet(&self, sheet: &str) -> Result<ProfitSheet> {
        let request = self
            .client
            .get(&self.webapp_url)
            .query(&[("sheet", sheet)])
            .timeout(self.sheet_timeout);
        let payload = self
            .get_json(request, &format!("sheet '{sheet}'"))
            .await?;
        Ok(source::profit_sheet(payload))
    }

    #[instrument(name = "AppendTransaction", skip(self, transaction))]
    async fn append_transaction(&self, transaction: &NewTransaction) -> Result<()> {
        let response = self
            .client
            .post(&self.webapp_url)
            .json(transaction)
            .timeout(self.sheet_timeout)
            .send()
            .await
            .context("Failed to send transaction")?;

        let status = response.status();
        if status == StatusCode::OK || status == StatusCode::FOUND {
            debug!(%status, "Transaction appended");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(anyhow!("Failed to register transaction (HTTP {status}): {body}"))
    }
}
