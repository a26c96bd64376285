use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use savings_planner::config::{Config, StorageBackend};
use savings_planner::handlers::{
    self, DailyEntryRequest, ExpenseRequest, LumpSumRequest, MonthlyEntryRequest,
    UpdateSettingsRequest, UpdateSourcesRequest,
};
use savings_planner::models::ids::parse_user_id;
use savings_planner::models::{FinancialDocument, GuestSession, Identity, UserId};
use savings_planner::services::ledger::LedgerView;
use savings_planner::utils::date::format_timestamp;
use savings_planner::AppState;

#[derive(Parser)]
#[command(name = "savings-planner", version, about = "Capital, savings and loan planner")]
struct Cli {
    /// User whose document to read or change
    #[arg(long, global = true, conflicts_with = "guest", value_parser = parse_user_id)]
    user: Option<UserId>,

    /// Work on a throwaway guest document; changes are printed, never stored
    #[arg(long, global = true)]
    guest: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExpenseKind {
    Capital,
    Savings,
}

#[derive(Subcommand)]
enum Command {
    /// Print the derived totals
    Summary {
        #[arg(long)]
        json: bool,
    },
    /// Connect to the configured backend and create tables if needed
    InitDb,
    /// Record a day of work: DATE is YYYY-MM-DD
    AddDaily { date: String, hours: f64, gross: f64 },
    /// Add a monthly cash-flow entry: MONTH is YYYY-MM
    AddMonthly { month: String, income: f64, repayment: f64 },
    /// Add a month from gross income, applying tax and the default repayment
    AddLumpSum { year: i32, month: u32, gross: f64 },
    /// Move a month of daily income into the monthly cash flow
    ProcessMonth { month: String },
    AddExpense { kind: ExpenseKind, name: String, amount: f64 },
    /// Set a capital source's base-currency amount by name
    SetSource { name: String, amount: f64 },
    /// Mark the source at INDEX as the loan
    SetLoan { index: usize },
    /// Delete an entry from a list: capital_expenses, capital_sources, monthly_cash_flow,
    /// expenses_from_savings or daily_income_tracker
    Delete { list: String, index: usize },
    SetTax { rate: f64 },
    SetCurrency { code: String },
    SetRepayment { amount: f64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "savings_planner=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    info!("Configuration loaded");
    let state = AppState::from_config(config).await?;

    let identity = match (cli.user, cli.guest) {
        (_, true) => Identity::Guest(GuestSession::new()),
        (Some(user_id), false) => Identity::User(user_id),
        (None, false) => anyhow::bail!("pass --user <ID> or --guest"),
    };

    let updated = match cli.command {
        Command::Summary { json } => {
            let view = handlers::get_financial_view(&state, &identity).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                let data = state.store.load(&identity).await?;
                print_summary(&view, &data);
            }
            return Ok(());
        }
        Command::InitDb => {
            match &state.config.storage {
                StorageBackend::Json { data_dir } => {
                    println!("JSON storage at {} (no tables to create)", data_dir.display())
                }
                StorageBackend::Postgres { .. } => println!("financial_data table is ready"),
            }
            return Ok(());
        }
        Command::AddDaily { date, hours, gross } => {
            handlers::add_daily_entry(
                &state,
                &identity,
                DailyEntryRequest {
                    date,
                    hours_worked: hours,
                    gross_income: gross,
                },
            )
            .await?
        }
        Command::AddMonthly {
            month,
            income,
            repayment,
        } => {
            handlers::add_monthly_entry(
                &state,
                &identity,
                MonthlyEntryRequest {
                    month,
                    income,
                    loan_repayment: repayment,
                },
            )
            .await?
        }
        Command::AddLumpSum { year, month, gross } => {
            handlers::add_lump_sum_month(
                &state,
                &identity,
                LumpSumRequest {
                    year,
                    month,
                    gross_income: gross,
                },
            )
            .await?
        }
        Command::ProcessMonth { month } => {
            handlers::process_month(&state, &identity, &month).await?
        }
        Command::AddExpense { kind, name, amount } => {
            let payload = ExpenseRequest { name, amount };
            match kind {
                ExpenseKind::Capital => {
                    handlers::add_capital_expense(&state, &identity, payload).await?
                }
                ExpenseKind::Savings => {
                    handlers::add_savings_expense(&state, &identity, payload).await?
                }
            }
        }
        Command::SetSource { name, amount } => {
            let mut payload = UpdateSourcesRequest::default();
            payload.amounts.insert(name, amount);
            handlers::update_sources(&state, &identity, payload).await?
        }
        Command::SetLoan { index } => handlers::set_loan_source(&state, &identity, index).await?,
        Command::Delete { list, index } => {
            handlers::delete_item(&state, &identity, &list, index).await?
        }
        Command::SetTax { rate } => handlers::update_tax_rate(&state, &identity, rate).await?,
        Command::SetCurrency { code } => {
            let payload = UpdateSettingsRequest {
                target_currency: Some(code),
                ..UpdateSettingsRequest::default()
            };
            handlers::update_settings(&state, &identity, payload).await?
        }
        Command::SetRepayment { amount } => {
            let payload = UpdateSettingsRequest {
                default_loan_repayment: Some(amount),
                ..UpdateSettingsRequest::default()
            };
            handlers::update_settings(&state, &identity, payload).await?
        }
    };

    if identity.is_guest() {
        println!("{}", serde_json::to_string_pretty(&updated)?);
    } else {
        println!("Saved.");
    }
    Ok(())
}

fn print_summary(view: &LedgerView, data: &FinancialDocument) {
    let c = view.currency;
    println!("{} - {}", data.profile.name, data.profile.goal);
    match &data.settings.exchange_rate_updated_at {
        Some(ts) => println!(
            "Rate: 1 BDT = {} {} (updated {})",
            view.rate,
            c,
            format_timestamp(ts)
        ),
        None => println!("Rate: 1 BDT = {} {}", view.rate, c),
    }
    println!();
    for source in &view.converted_sources {
        println!(
            "  {:<20} {:>14.2} BDT  {:>12.2} {}",
            source.name, source.amount_bdt, source.amount_converted, c
        );
    }
    println!("Total capital:           {:>12.2} {}", view.total_capital, c);
    println!("Capital expenses:        {:>12.2} {}", view.total_capital_expenses, c);
    println!("Remaining capital:       {:>12.2} {}", view.remaining_capital, c);
    println!();
    for month in &view.monthly_savings {
        println!("  {}  {:>12.2} {}", month.month, month.savings, c);
    }
    println!("Total savings:           {:>12.2} {}", view.total_savings, c);
    println!("Savings expenses:        {:>12.2} {}", view.total_expenses_from_savings, c);
    println!("Net savings:             {:>12.2} {}", view.net_savings, c);
    println!();
    println!("Loan principal:          {:>12.2} {}", view.loan.principal, c);
    println!(
        "Loan paid:               {:>12.2} {} ({} payments)",
        view.loan.total_paid, c, view.loan.payment_count
    );
    println!("Loan remaining:          {:>12.2} {}", view.loan.remaining_balance, c);
    println!("Loan progress:           {:>11.1}%", view.loan.progress_percent);
    println!("Months remaining:        {:>12}", view.loan.months_remaining);
    println!();
    for bucket in &view.daily_income_by_month {
        let processed = if view.processed_months.contains(&bucket.month_key) {
            " (processed)"
        } else {
            ""
        };
        println!(
            "  {}  {:>3} days  {:>12.2} net{}",
            bucket.month_key,
            bucket.entries.len(),
            bucket.total_net,
            processed
        );
    }
    println!("Total net daily income:  {:>12.2}", view.total_net_daily_income);
}
