use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use sheetdash::cli::OutputFormat;
use sheetdash::cli::setup::SetupOptions;
use sheetdash::core::config::UserProfile;
use sheetdash::core::log::init_logging;
use sheetdash::core::source::NewTransaction;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Link your spreadsheet web app
    Setup {
        /// Deployed Apps Script web app URL
        #[arg(long)]
        url: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
        /// Avatar image URL
        #[arg(long)]
        picture: Option<String>,
    },
    /// Display totals, monthly income/expense and transactions
    Operations {
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// List the import sheets available for profit analysis
    Sheets,
    /// Display landed costs for an import sheet
    Profit {
        /// Name of the import sheet
        sheet: String,
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Register a transaction in the spreadsheet
    Add {
        /// Date of the transaction, e.g. 2026-01-15
        #[arg(long)]
        date: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        concept: String,
        /// PEN or USD
        #[arg(long, default_value = "PEN")]
        currency: String,
        /// Signed amount; negative for expenses
        #[arg(long, allow_hyphen_values = true)]
        amount: f64,
        /// Bank operation number
        #[arg(long)]
        operation: Option<String>,
        #[arg(long)]
        detail: Option<String>,
    },
}

impl From<Commands> for sheetdash::AppCommand {
    fn from(cmd: Commands) -> sheetdash::AppCommand {
        match cmd {
            Commands::Setup { .. } => unreachable!("Setup command should be handled separately"),
            Commands::Operations { format } => sheetdash::AppCommand::Operations { format },
            Commands::Sheets => sheetdash::AppCommand::Sheets,
            Commands::Profit { sheet, format } => sheetdash::AppCommand::Profit { sheet, format },
            Commands::Add {
                date,
                company,
                concept,
                currency,
                amount,
                operation,
                detail,
            } => sheetdash::AppCommand::Add(NewTransaction {
                fecha_ingreso: date,
                empresa: company,
                concepto_pago: concept,
                moneda: currency,
                monto: amount,
                nro_operacion: operation,
                detalle: detail,
            }),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup {
            url,
            email,
            name,
            picture,
        }) => setup(
            cli.config_path.as_deref(),
            url,
            UserProfile {
                email,
                name,
                picture,
            },
        ),
        Some(cmd) => sheetdash::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup(config_path: Option<&str>, webapp_url: String, profile: UserProfile) -> Result<()> {
    let options = SetupOptions {
        webapp_url,
        profile,
    };
    match config_path {
        Some(path) => sheetdash::cli::setup::setup_at_path(path, &options),
        None => sheetdash::cli::setup::setup(&options),
    }
}
