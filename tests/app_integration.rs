use serde_json::json;
use std::fs;
use tracing::info;

const EXEC_PATH: &str = "/macros/s/demo/exec";

// Adds automatic logging to test
mod test_utils {
    use super::EXEC_PATH;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(response: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(EXEC_PATH))
            .respond_with(response)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub async fn create_sheet_mock_server(
        sheet: &str,
        response: ResponseTemplate,
    ) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(EXEC_PATH))
            .and(query_param("sheet", sheet))
            .respond_with(response)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(dir: &tempfile::TempDir, base_url: Option<&str>) -> std::path::PathBuf {
        let config_path = dir.path().join("config.yaml");
        let config_content = match base_url {
            Some(base_url) => format!(
                r#"
user:
  email: "ana@example.com"
  name: "Ana"
source:
  webapp_url: "{base_url}{EXEC_PATH}"
  timeout_secs: 2
  sheet_timeout_secs: 2
"#
            ),
            None => r#"
user:
  email: "ana@example.com"
"#
            .to_string(),
        };
        std::fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path
    }
}

#[test_log::test(tokio::test)]
async fn test_operations_flow_with_mock() {
    let mock_response = wiremock::ResponseTemplate::new(200).set_body_json(json!({
        "data": [
            {"FECHA_INGRESO": "2025-12-31T05:00:00.000Z", "EMPRESA": "Acme SAC", "MONEDA": "Soles", "MONTO": "1.234,56"},
            {"FECHA_INGRESO": "15/01/2026", "EMPRESA": "Importadora", "MONEDA": "USD", "MONTO": -300},
            {"FECHA_INGRESO": "15/1/2026", "EMPRESA": "Sin fecha", "MONEDA": "PEN", "MONTO": "12,50"}
        ]
    }));
    let mock_server = test_utils::create_mock_server(mock_response).await;

    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&temp_dir, Some(&mock_server.uri()));

    for format in [
        sheetdash::cli::OutputFormat::Table,
        sheetdash::cli::OutputFormat::Json,
    ] {
        let result = sheetdash::run_command(
            sheetdash::AppCommand::Operations { format },
            Some(config_path.to_str().unwrap()),
        )
        .await;
        assert!(
            result.is_ok(),
            "Operations failed with: {:?}",
            result.err()
        );
    }

    let config = sheetdash::core::config::AppConfig::load_from_path(&config_path).unwrap();
    let provider =
        sheetdash::providers::AppsScriptProvider::new(config.require_source().unwrap()).unwrap();
    let (dashboard, status) = sheetdash::core::source::load_dashboard(&provider).await;
    info!(?status, "Dashboard status after fetch");

    assert_eq!(status, sheetdash::core::SourceStatus::Success);
    let pen = dashboard.totals.get(sheetdash::core::Currency::Pen);
    assert!((pen.income - 1247.06).abs() < 1e-9);
    assert_eq!(pen.expense, 0.0);
    assert!((pen.balance - 1247.06).abs() < 1e-9);
    let usd = dashboard.totals.get(sheetdash::core::Currency::Usd);
    assert_eq!(usd.income, 0.0);
    assert_eq!(usd.expense, 300.0);
    assert_eq!(usd.balance, -300.0);

    // The undated row counts in the totals but not in the monthly series
    assert_eq!(dashboard.transactions.len(), 3);
    assert_eq!(dashboard.charts.get(sheetdash::core::Currency::Pen).labels, vec!["2025-12"]);
    assert_eq!(dashboard.charts.get(sheetdash::core::Currency::Usd).labels, vec!["2026-01"]);
}

#[test_log::test(tokio::test)]
async fn test_operations_survives_server_error() {
    use sheetdash::core::source::{SourceStatus, load_dashboard};
    use sheetdash::core::{Currency, config::AppConfig};
    use sheetdash::providers::AppsScriptProvider;

    let mock_server =
        test_utils::create_mock_server(wiremock::ResponseTemplate::new(500)).await;

    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&temp_dir, Some(&mock_server.uri()));

    let result = sheetdash::run_command(
        sheetdash::AppCommand::Operations {
            format: sheetdash::cli::OutputFormat::Table,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Operations should degrade, got: {:?}", result.err());

    let config = AppConfig::load_from_path(&config_path).unwrap();
    let provider = AppsScriptProvider::new(config.require_source().unwrap()).unwrap();
    let (dashboard, status) = load_dashboard(&provider).await;
    info!(?status, "Dashboard status after server error");

    assert!(matches!(status, SourceStatus::Error(_)));
    for currency in Currency::ALL {
        assert_eq!(dashboard.totals.get(currency).income, 0.0);
        assert_eq!(dashboard.totals.get(currency).expense, 0.0);
        assert_eq!(dashboard.totals.get(currency).balance, 0.0);
    }
}

#[test_log::test(tokio::test)]
async fn test_profit_flow_with_mock() {
    let mock_response = wiremock::ResponseTemplate::new(200).set_body_json(json!({
        "sli": 100,
        "data": [
            {"Producto": "Cables", "Cantidad": 10, "Precio Unitario": 5},
            {"Producto": "Notas", "Cantidad": "", "Precio Unitario": ""}
        ]
    }));
    let mock_server = test_utils::create_sheet_mock_server("Import 01", mock_response).await;

    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&temp_dir, Some(&mock_server.uri()));

    let result = sheetdash::run_command(
        sheetdash::AppCommand::Profit {
            sheet: "Import 01".to_string(),
            format: sheetdash::cli::OutputFormat::Table,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Profit failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_profit_reports_server_error() {
    let mock_server = test_utils::create_sheet_mock_server(
        "Import 01",
        wiremock::ResponseTemplate::new(500),
    )
    .await;

    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&temp_dir, Some(&mock_server.uri()));

    let result = sheetdash::run_command(
        sheetdash::AppCommand::Profit {
            sheet: "Import 01".to_string(),
            format: sheetdash::cli::OutputFormat::Json,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    let err = result.expect_err("Profit should fail when the sheet is unavailable");
    assert!(format!("{err:#}").contains("Import 01"));
}

#[test_log::test(tokio::test)]
async fn test_missing_source_requires_setup() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&temp_dir, None);

    let result = sheetdash::run_command(
        sheetdash::AppCommand::Sheets,
        Some(config_path.to_str().unwrap()),
    )
    .await;
    let err = result.expect_err("Commands need a linked spreadsheet");
    assert!(err.to_string().contains("setup"));
}

#[test_log::test(tokio::test)]
async fn test_setup_then_sheets() {
    let mock_server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .and(wiremock::matchers::path(EXEC_PATH))
        .and(wiremock::matchers::query_param("action", "listSheets"))
        .respond_with(
            wiremock::ResponseTemplate::new(200)
                .set_body_json(json!(["Transacciones", "Config", "Import 01"])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.yaml");

    let options = sheetdash::cli::setup::SetupOptions {
        webapp_url: format!("{}{}", mock_server.uri(), EXEC_PATH),
        ..Default::default()
    };
    sheetdash::cli::setup::setup_at_path(&config_path, &options).expect("Setup failed");
    assert!(fs::read_to_string(&config_path).unwrap().contains(EXEC_PATH));

    let result = sheetdash::run_command(
        sheetdash::AppCommand::Sheets,
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Sheets failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_add_transaction_flow() {
    let mock_server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .and(wiremock::matchers::path(EXEC_PATH))
        .and(wiremock::matchers::body_partial_json(
            json!({"empresa": "Acme SAC", "monto": -99.9, "moneda": "USD"}),
        ))
        .respond_with(
            wiremock::ResponseTemplate::new(200).set_body_json(json!({"status": "success"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&temp_dir, Some(&mock_server.uri()));

    let transaction = sheetdash::core::source::NewTransaction {
        fecha_ingreso: "2026-01-15".to_string(),
        empresa: "Acme SAC".to_string(),
        concepto_pago: "Flete".to_string(),
        moneda: "USD".to_string(),
        monto: -99.9,
        nro_operacion: Some("000123".to_string()),
        detalle: None,
    };
    let result = sheetdash::run_command(
        sheetdash::AppCommand::Add(transaction),
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Add failed with: {:?}", result.err());
}
