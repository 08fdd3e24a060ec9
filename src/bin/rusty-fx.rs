//! rusty-fx CLI - currency conversion from the command line
//!
//! ## Example Usage
//!
//! ```bash
//! # Log in locally
//! rusty-fx login --username ana --email ana@example.com
//!
//! # Convert 100 USD to EUR
//! rusty-fx convert 100 --from USD --to EUR
//!
//! # Show and clear the history
//! rusty-fx history list --limit 10
//! rusty-fx history clear --force
//! ```

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rusty_fx::app::{ConversionRequest, CurrencyApp};
use rusty_fx::config::{Config, StorageBackend};
use rusty_fx::currency::{symbol_for, Currency};
use rusty_fx::error::FxError;
use rusty_fx::format::{conversion_summary, format_amount, format_date, format_rate, rate_summary};
use rusty_fx::rates::{ExchangeRateApiProvider, RateProvider};
use rusty_fx::storage::{FileStore, KeyValueStore};
use rusty_fx::types::{Conversion, User};
use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

/// rusty-fx: currency converter with live rates and history
#[derive(Parser)]
#[command(name = "rusty-fx")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Currency converter with live exchange rates and history", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in locally
    Login {
        /// User name
        #[arg(short, long)]
        username: String,

        /// E-mail address
        #[arg(short, long)]
        email: String,
    },

    /// Log out (history is kept)
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Convert an amount between two currencies
    Convert {
        /// Amount in the source currency
        #[arg(value_name = "AMOUNT", allow_negative_numbers = true)]
        amount: f64,

        /// Source currency (default from config)
        #[arg(short, long)]
        from: Option<String>,

        /// Target currency (default from config)
        #[arg(short, long)]
        to: Option<String>,

        /// Swap source and target before converting
        #[arg(long)]
        swap: bool,
    },

    /// Show current rates for a base currency
    Rates {
        /// Base currency (default from config)
        #[arg(value_name = "BASE")]
        base: Option<String>,

        /// Only show these codes (comma separated)
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,
    },

    /// List the popular currencies
    Currencies,

    /// Show, clear or export the conversion history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Show configuration and storage information
    Info,
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List past conversions, newest first
    List {
        /// Show at most N entries
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Delete all past conversions
    Clear {
        /// Clear without confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Write the history to a .json or .csv file
    Export {
        /// Output file
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref());
    if let Err(e) = config.ensure_dirs() {
        eprintln!(
            "{} Failed to create directories: {}",
            "Error:".red().bold(),
            e
        );
        process::exit(1);
    }

    if cli.verbose {
        println!(
            "{} v{}",
            "rusty-fx".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
        println!(
            "Data dir: {}",
            config.data_dir.display().to_string().dimmed()
        );
    }

    if let Err(e) = dispatch(cli, config).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn dispatch(cli: Cli, config: Config) -> anyhow::Result<()> {
    let provider =
        ExchangeRateApiProvider::with_base_url(&config.rates_url, config.request_timeout())?;

    match config.storage {
        StorageBackend::File => {
            let store = FileStore::open(config.store_dir())
                .with_context(|| format!("opening {}", config.store_dir().display()))?;
            run(cli, &config, CurrencyApp::new(provider, store)).await
        }
        #[cfg(feature = "rusqlite-support")]
        StorageBackend::Sqlite => {
            let store = rusty_fx::storage::SqliteStore::open(config.database_path())
                .with_context(|| format!("opening {}", config.database_path().display()))?;
            run(cli, &config, CurrencyApp::new(provider, store)).await
        }
        #[cfg(not(feature = "rusqlite-support"))]
        StorageBackend::Sqlite => Err(anyhow!(
            "sqlite storage requested but this build has no rusqlite-support"
        )),
    }
}

async fn run<P: RateProvider, S: KeyValueStore>(
    cli: Cli,
    config: &Config,
    app: CurrencyApp<P, S>,
) -> anyhow::Result<()> {
    match cli.command {
        Commands::Login { username, email } => {
            let user = app.login(&username, &email).await?;
            println!(
                "{} Logged in as {} <{}>",
                "✓".green().bold(),
                user.username.bright_green(),
                user.email
            );
            Ok(())
        }

        Commands::Logout => {
            app.logout().await?;
            println!("{} Logged out", "✓".green().bold());
            Ok(())
        }

        Commands::Whoami => {
            match app.current_user().await {
                Some(user) => println!("{} <{}>", user.username.bright_green(), user.email),
                None => println!("{}", "Not logged in.".dimmed()),
            }
            Ok(())
        }

        Commands::Convert {
            amount,
            from,
            to,
            swap,
        } => {
            require_user(&app).await?;
            let mut request = ConversionRequest::new(
                from.as_deref().unwrap_or(&config.default_from),
                to.as_deref().unwrap_or(&config.default_to),
                amount,
            );
            if swap {
                request.swap();
            }
            convert(&app, &request, cli.verbose).await
        }

        Commands::Rates { base, only } => {
            let base = base.unwrap_or_else(|| config.default_from.clone()).to_uppercase();
            show_rates(&app, &base, &only).await
        }

        Commands::Currencies => {
            show_currencies();
            Ok(())
        }

        Commands::History { action } => {
            require_user(&app).await?;
            handle_history_action(&app, action).await
        }

        Commands::Info => {
            show_info(&app, config).await;
            Ok(())
        }
    }
}

async fn require_user<P: RateProvider, S: KeyValueStore>(
    app: &CurrencyApp<P, S>,
) -> anyhow::Result<User> {
    app.current_user()
        .await
        .ok_or(FxError::NotLoggedIn)
        .context("run 'rusty-fx login' first")
}

fn spinner(message: String) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")?
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

async fn convert<P: RateProvider, S: KeyValueStore>(
    app: &CurrencyApp<P, S>,
    request: &ConversionRequest,
    verbose: bool,
) -> anyhow::Result<()> {
    request.validate()?;

    let pb = spinner(format!("Fetching {} rates...", request.from))?;
    let outcome = app.convert(request).await;
    pb.finish_and_clear();

    let conversion = outcome.context("conversion failed, check your connection")?;

    println!(
        "  {}",
        format!(
            "{}{} {}",
            symbol_for(&conversion.to),
            format_amount(conversion.result),
            conversion.to
        )
        .bright_green()
        .bold()
    );
    println!("  {}", conversion_summary(&conversion));
    println!("  {}", rate_summary(&conversion).dimmed());
    if verbose {
        println!("  {} {}", "Id:".bold(), conversion.id);
        println!("  {} {}", "Provider:".bold(), app.engine().provider().name());
    }
    Ok(())
}

async fn show_rates<P: RateProvider, S: KeyValueStore>(
    app: &CurrencyApp<P, S>,
    base: &str,
    only: &[String],
) -> anyhow::Result<()> {
    let pb = spinner(format!("Fetching {} rates...", base))?;
    let snapshot = app.engine().rates(base).await;
    pb.finish_and_clear();
    let snapshot = snapshot?;

    println!("{}", format!("Rates for 1 {}", snapshot.base).cyan().bold());
    println!(
        "{}",
        format!(
            "Last updated {}",
            format_date(&snapshot.last_updated.with_timezone(&chrono::Local))
        )
        .dimmed()
    );
    println!();

    let wanted: Vec<String> = only.iter().map(|c| c.trim().to_uppercase()).collect();
    for code in snapshot.codes() {
        if !wanted.is_empty() && !wanted.iter().any(|w| w == code) {
            continue;
        }
        if let Some(rate) = snapshot.rate(code) {
            println!("  {:<5} {:>16}", code.bold(), format_rate(rate));
        }
    }
    println!();
    Ok(())
}

fn show_currencies() {
    println!("{}", "Popular Currencies".cyan().bold());
    println!("{}", "==================".cyan());
    for currency in Currency::all() {
        println!(
            "  {} {:<4} {}",
            currency.code().bright_green().bold(),
            currency.symbol(),
            currency.name().dimmed()
        );
    }
    println!();
}

async fn handle_history_action<P: RateProvider, S: KeyValueStore>(
    app: &CurrencyApp<P, S>,
    action: HistoryAction,
) -> anyhow::Result<()> {
    match action {
        HistoryAction::List { limit } => {
            let conversions = app.history().await;
            println!("{}", "Conversion History".cyan().bold());
            println!("{}", "==================".cyan());
            println!();

            if conversions.is_empty() {
                println!("{}", "  No conversions yet.".dimmed());
                println!();
                return Ok(());
            }

            let shown = limit.unwrap_or(conversions.len());
            for conversion in conversions.iter().take(shown) {
                print_history_entry(conversion);
            }
            if shown < conversions.len() {
                println!(
                    "{}",
                    format!("  ... {} more", conversions.len() - shown).dimmed()
                );
                println!();
            }
            Ok(())
        }

        HistoryAction::Clear { force } => {
            if !force {
                println!("{}", "This will delete the whole conversion history.".yellow());
                println!("Use {} to confirm.", "--force".bright_yellow());
                return Ok(());
            }
            app.clear_history()
                .await
                .context("could not clear the history")?;
            println!("{} History cleared", "✓".green().bold());
            Ok(())
        }

        HistoryAction::Export { path } => {
            let conversions = app.history().await;
            let extension = path
                .extension()
                .and_then(|s| s.to_str())
                .unwrap_or("json");

            match extension {
                "csv" => {
                    let mut wtr = csv::Writer::from_path(&path)?;
                    for conversion in &conversions {
                        wtr.serialize(conversion)?;
                    }
                    wtr.flush()?;
                }
                "json" => {
                    fs::write(&path, serde_json::to_string_pretty(&conversions)?)?;
                }
                other => {
                    return Err(anyhow!("unknown export format '{}', use .json or .csv", other));
                }
            }

            println!(
                "{} {} conversions saved to: {}",
                "✓".green().bold(),
                conversions.len(),
                path.display()
            );
            Ok(())
        }
    }
}

fn print_history_entry(conversion: &Conversion) {
    println!(
        "  {} {} {}",
        format!("{} {}", format_amount(conversion.amount), conversion.from).bold(),
        "→".dimmed(),
        format!("{} {}", format_amount(conversion.result), conversion.to)
            .bright_green()
            .bold()
    );
    println!("    {}", rate_summary(conversion).dimmed());
    println!(
        "    {}",
        format_date(&conversion.date.with_timezone(&chrono::Local)).dimmed()
    );
    println!();
}

async fn show_info<P: RateProvider, S: KeyValueStore>(app: &CurrencyApp<P, S>, config: &Config) {
    println!(
        "{} {}",
        "rusty-fx".cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
    println!();

    println!("{}", "Configuration".bold());
    println!("{}", "=============".dimmed());
    println!("  {} {}", "Data directory:".bold(), config.data_dir.display());
    println!("  {} {:?}", "Storage:".bold(), config.storage);
    println!("  {} {}", "Rate service:".bold(), config.rates_url);
    println!(
        "  {} {} → {}",
        "Default pair:".bold(),
        config.default_from,
        config.default_to
    );
    println!();

    println!("{}", "Session".bold());
    println!("{}", "=======".dimmed());
    match app.current_user().await {
        Some(user) => println!("  {} {} <{}>", "User:".bold(), user.username, user.email),
        None => println!("  {} {}", "User:".bold(), "not logged in".dimmed()),
    }
    match app.history_store().load_conversions().await {
        Ok(conversions) => println!("  {} {}", "Conversions:".bold(), conversions.len()),
        Err(e) => println!("  {} {}", "Conversions:".bold(), e.to_string().red()),
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = vec!["rusty-fx", "info"];
        let _cli = Cli::try_parse_from(args).unwrap();
    }

    #[test]
    fn test_convert_command() {
        let args = vec!["rusty-fx", "convert", "100", "--from", "usd", "--to", "eur"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Convert {
                amount,
                from,
                to,
                swap,
            } => {
                assert_eq!(amount, 100.0);
                assert_eq!(from.as_deref(), Some("usd"));
                assert_eq!(to.as_deref(), Some("eur"));
                assert!(!swap);
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_convert_accepts_negative_amount_for_validation() {
        let args = vec!["rusty-fx", "convert", "-5"];
        assert!(Cli::try_parse_from(args).is_ok());
    }

    #[test]
    fn test_history_commands() {
        assert!(Cli::try_parse_from(["rusty-fx", "history", "list", "-n", "5"]).is_ok());
        assert!(Cli::try_parse_from(["rusty-fx", "history", "clear", "--force"]).is_ok());
        assert!(Cli::try_parse_from(["rusty-fx", "history", "export", "out.csv"]).is_ok());
    }

    #[test]
    fn test_rates_only_list() {
        let cli = Cli::try_parse_from(["rusty-fx", "rates", "USD", "--only", "EUR,PYG"]).unwrap();
        match cli.command {
            Commands::Rates { base, only } => {
                assert_eq!(base.as_deref(), Some("USD"));
                assert_eq!(only, vec!["EUR".to_string(), "PYG".to_string()]);
            }
            _ => panic!("expected rates"),
        }
    }

    #[test]
    fn test_login_requires_fields() {
        assert!(Cli::try_parse_from(["rusty-fx", "login", "--username", "ana"]).is_err());
    }
}
