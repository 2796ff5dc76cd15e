use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use client::{Client, Session};

mod commands;
mod config;
mod prompt;

#[derive(Parser, Debug)]
#[command(name = "monedero")]
#[command(about = "Cliente de finanzas personales: movimientos, recordatorios y alertas")]
struct Cli {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:8000/api).
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Override timezone (IANA name, e.g. America/Lima).
    #[arg(long, global = true)]
    timezone: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session (password is prompted, never argv).
    Login {
        #[arg(long)]
        email: String,
    },
    /// Clear the stored session.
    Logout,
    /// Create an account.
    Register(RegisterArgs),
    /// Current balance plus the recent movement list.
    Dashboard,
    /// Full movement list with search and date-range filters.
    Movements {
        /// Case-insensitive text filter over title, place and comment.
        #[arg(long, default_value = "")]
        search: String,
        /// One of: today, 7, 15, 30, 90, all.
        #[arg(long, default_value = "all")]
        range: String,
        /// How many pages to load (the dashboard counts as the first).
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Register an expense.
    AddExpense(AddExpenseArgs),
    /// Register an income.
    AddIncome(AddIncomeArgs),
    /// Delete a movement by kind and id.
    Delete {
        /// `expense` or `income`.
        kind: String,
        id: i64,
    },
    /// Update the configured monthly income.
    SetIncome {
        /// Decimal amount, e.g. 2500.00.
        #[arg(long)]
        total: String,
    },
    /// Recurring payment reminders.
    Recurring(Recurring),
    /// Budget alerts.
    Alerts(Alerts),
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    birth_date: Option<NaiveDate>,
    #[arg(long)]
    gender: Option<String>,
}

#[derive(Args, Debug)]
struct AddExpenseArgs {
    /// Store, company or location.
    #[arg(long)]
    place: String,
    /// Decimal amount, e.g. 120.50.
    #[arg(long)]
    total: String,
    /// Spending category (wire name or label, e.g. alimentacion).
    #[arg(long)]
    category: String,
    /// Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
    /// HH:MM, defaults to now.
    #[arg(long)]
    time: Option<String>,
    #[arg(long)]
    comment: Option<String>,
}

#[derive(Args, Debug)]
struct AddIncomeArgs {
    #[arg(long)]
    title: String,
    /// Decimal amount, e.g. 800.00.
    #[arg(long)]
    total: String,
    /// Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
    /// HH:MM, defaults to now.
    #[arg(long)]
    time: Option<String>,
    #[arg(long)]
    comment: Option<String>,
}

#[derive(Args, Debug)]
struct Recurring {
    #[command(subcommand)]
    command: Option<RecurringCommand>,
}

#[derive(Subcommand, Debug)]
enum RecurringCommand {
    /// List reminders with urgency markers (default).
    List,
    /// Create a reminder.
    Add(RecurringAddArgs),
    /// Delete a reminder.
    Remove { id: i64 },
}

#[derive(Args, Debug)]
struct RecurringAddArgs {
    /// E.g. "Netflix Premium".
    #[arg(long)]
    name: String,
    /// Decimal amount charged each period.
    #[arg(long)]
    total: String,
    #[arg(long)]
    category: String,
    /// Day of month the payment is due (1-31).
    #[arg(long)]
    payment_day: u8,
    /// Defaults to today.
    #[arg(long)]
    start_date: Option<NaiveDate>,
    #[arg(long)]
    end_date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct Alerts {
    #[command(subcommand)]
    command: Option<AlertsCommand>,
}

#[derive(Subcommand, Debug)]
enum AlertsCommand {
    /// List alerts with the unread count (default).
    List {
        /// Only alerts not yet seen.
        #[arg(long)]
        unseen: bool,
    },
    /// Mark one alert as seen.
    Seen { id: i64 },
    /// Mark every risk-level alert as seen.
    RiskSeen,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let settings = config::load(&config::Overrides {
        config: cli.config.clone(),
        base_url: cli.base_url.clone(),
        timezone: cli.timezone.clone(),
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "monedero={level},client={level},ledger={level}",
            level = settings.log
        ))
        .with_writer(std::io::stderr)
        .init();

    let tz: chrono_tz::Tz = settings
        .timezone
        .parse()
        .map_err(|_| format!("timezone inválida: {}", settings.timezone))?;

    let session = Session::load(&settings.session_path)?;
    let client = Client::new(&settings.base_url)?.with_token(session.token.clone());

    let mut ctx = commands::Context {
        client,
        session,
        settings,
        tz,
    };

    match cli.command {
        Command::Login { email } => commands::login(&mut ctx, &email).await,
        Command::Logout => commands::logout(&mut ctx).await,
        Command::Register(args) => {
            commands::register(
                &ctx,
                &args.email,
                &args.first_name,
                &args.last_name,
                args.birth_date,
                args.gender,
            )
            .await
        }
        Command::Dashboard => commands::dashboard(&ctx).await,
        Command::Movements {
            search,
            range,
            pages,
        } => commands::movements(&ctx, &search, &range, pages).await,
        Command::AddExpense(args) => {
            commands::add_expense(
                &ctx,
                &args.place,
                &args.total,
                &args.category,
                args.date,
                args.time,
                args.comment,
            )
            .await
        }
        Command::AddIncome(args) => {
            commands::add_income(
                &ctx,
                &args.title,
                &args.total,
                args.date,
                args.time,
                args.comment,
            )
            .await
        }
        Command::Delete { kind, id } => commands::delete(&ctx, &kind, id).await,
        Command::SetIncome { total } => commands::set_monthly_income(&ctx, &total).await,
        Command::Recurring(Recurring { command }) => match command {
            None | Some(RecurringCommand::List) => commands::recurring_list(&ctx).await,
            Some(RecurringCommand::Add(args)) => {
                commands::recurring_add(
                    &ctx,
                    &args.name,
                    &args.total,
                    &args.category,
                    args.payment_day,
                    args.start_date,
                    args.end_date,
                )
                .await
            }
            Some(RecurringCommand::Remove { id }) => commands::recurring_remove(&ctx, id).await,
        },
        Command::Alerts(Alerts { command }) => match command {
            None => commands::alerts(&ctx, false).await,
            Some(AlertsCommand::List { unseen }) => commands::alerts(&ctx, unseen).await,
            Some(AlertsCommand::Seen { id }) => commands::alerts_mark_seen(&ctx, id).await,
            Some(AlertsCommand::RiskSeen) => commands::alerts_mark_all_risk_seen(&ctx).await,
        },
    }
}
