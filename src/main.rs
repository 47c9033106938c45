use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use payroll_disburser::application::balance::{BalanceQuery, BalanceReport};
use payroll_disburser::application::disburser::Disburser;
use payroll_disburser::application::resolver::AccountResolver;
use payroll_disburser::config::{Credentials, Settings};
use payroll_disburser::domain::address::Address;
use payroll_disburser::domain::employee::select_employees;
use payroll_disburser::domain::payment::PayrollSummary;
use payroll_disburser::domain::ports::WalletServiceRef;
use payroll_disburser::error::PayrollError;
use payroll_disburser::infrastructure::http::HttpWalletService;
use payroll_disburser::infrastructure::in_memory::InMemoryWallet;
use payroll_disburser::interfaces::csv::result_writer::ResultWriter;
use payroll_disburser::interfaces::csv::roster_reader::RosterReader;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Use an in-memory wallet instead of the wallet service. Nothing is sent.
    #[arg(long, global = true)]
    dry_run: bool,

    /// Pause between two submissions, in milliseconds. Overrides PAYROLL_PACING_MS.
    #[arg(long, global = true)]
    pacing_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pay the employees of a roster CSV file and print the report as CSV
    Pay {
        /// Roster CSV file (id,name,address,salary,department,position)
        roster: PathBuf,

        /// Only pay these employee ids (comma separated)
        #[arg(long, value_delimiter = ',')]
        ids: Option<Vec<u32>>,
    },
    /// Print the token balance of the payroll account
    Balance {
        /// Query this address instead of the payroll account
        #[arg(long)]
        address: Option<String>,
    },
    /// Resolve the payroll account and print its address
    Account,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn build_wallet(
    dry_run: bool,
    settings: &Settings,
    credentials: Option<Credentials>,
) -> payroll_disburser::error::Result<WalletServiceRef> {
    if dry_run {
        warn!("Dry run: payments go to an in-memory wallet");
        return Ok(Arc::new(InMemoryWallet::new()));
    }
    let credentials = credentials.ok_or_else(|| {
        PayrollError::Configuration(
            "CDP_API_KEY_ID and CDP_API_KEY_SECRET must be set".to_string(),
        )
    })?;
    Ok(Arc::new(HttpWalletService::new(
        settings.api_url()?,
        credentials,
        settings.request_timeout(),
    )?))
}

fn build_resolver(
    settings: &Settings,
    wallet: WalletServiceRef,
) -> payroll_disburser::error::Result<AccountResolver> {
    Ok(AccountResolver::new(
        wallet,
        settings.account_name.clone(),
        settings.expected_address()?,
    ))
}

async fn balance_report(
    dry_run: bool,
    settings: &Settings,
    credentials: Option<Credentials>,
    address: Option<String>,
) -> payroll_disburser::error::Result<BalanceReport> {
    let wallet = build_wallet(dry_run, settings, credentials.clone())?;
    let address: Address = match address {
        Some(raw) => raw.parse()?,
        None => {
            let resolver = build_resolver(settings, Arc::clone(&wallet))?;
            resolver.resolve().await?.address
        }
    };
    let query = BalanceQuery::new(wallet, credentials);
    Ok(query
        .report(&address, &settings.network(), &settings.token_symbol)
        .await)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    let settings = Settings::from_env().into_diagnostic()?;
    let credentials = Credentials::from_env();

    match cli.command {
        Command::Pay { roster, ids } => {
            let file = File::open(&roster).into_diagnostic()?;
            let mut employees = RosterReader::new(file).read_all().into_diagnostic()?;
            if let Some(ids) = ids {
                employees = select_employees(&employees, &ids);
            }

            let wallet = build_wallet(cli.dry_run, &settings, credentials).into_diagnostic()?;
            let resolver = build_resolver(&settings, Arc::clone(&wallet)).into_diagnostic()?;
            let pacing = cli
                .pacing_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| settings.pacing());
            let disburser = Disburser::new(
                wallet,
                resolver,
                settings.token().into_diagnostic()?,
                settings.network(),
            )
            .with_pacing(pacing);

            let results = disburser.pay_all(&employees).await.into_diagnostic()?;
            let summary = PayrollSummary::from_results(&employees, &results);
            info!(
                processed = summary.processed,
                successful = summary.successful,
                failed = summary.failed,
                total = %summary.total_amount,
                "Payroll processed"
            );

            let stdout = io::stdout();
            ResultWriter::new(stdout.lock())
                .write_results(&results)
                .into_diagnostic()?;
        }
        Command::Balance { address } => {
            let report = balance_report(cli.dry_run, &settings, credentials, address)
                .await
                .unwrap_or_else(|e| BalanceReport::Unavailable {
                    reason: e.to_string(),
                });
            println!("{}", report.display_value());
            if let BalanceReport::Unavailable { reason } = report {
                return Err(miette!("balance unavailable: {reason}"));
            }
        }
        Command::Account => {
            let wallet = build_wallet(cli.dry_run, &settings, credentials).into_diagnostic()?;
            let resolver = build_resolver(&settings, wallet).into_diagnostic()?;
            let account = resolver.resolve().await.into_diagnostic()?;
            println!("{}", account.address);
        }
    }

    Ok(())
}
