use anyhow::Result;
use clap::{Parser, Subcommand};

use finbook::cli::{
    handle_account_command, handle_audit_command, handle_backup_command, handle_category_command,
    handle_goal_command, handle_import_command, handle_rule_command, handle_transaction_command,
};
use finbook::config::{FinbookPaths, Settings};
use finbook::store::BudgetBook;

#[derive(Parser)]
#[command(
    name = "finbook",
    version,
    about = "Personal finance bookkeeping from the command line",
    long_about = "FinBook keeps a budget book of accounts, transactions, categories, \
                  automation rules, and savings goals. Bank statements are imported \
                  through a staging pipeline with duplicate detection; keyword rules \
                  categorize transactions automatically."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,

    /// Account management commands
    #[command(subcommand)]
    Account(finbook::cli::AccountCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(finbook::cli::CategoryCommands),

    /// Transaction management commands
    #[command(subcommand, name = "txn", alias = "transaction")]
    Transaction(finbook::cli::TransactionCommands),

    /// Automation rule commands
    #[command(subcommand)]
    Rule(finbook::cli::RuleCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Goal(finbook::cli::GoalCommands),

    /// Statement import commands
    #[command(subcommand)]
    Import(finbook::cli::ImportCommands),

    /// Backup and restore commands
    #[command(subcommand)]
    Backup(finbook::cli::BackupCommands),

    /// Audit log commands
    #[command(subcommand)]
    Audit(finbook::cli::AuditCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = FinbookPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Commands::Init => {
            paths.ensure_directories()?;
            let book = BudgetBook::open(paths.clone())?;
            let mut settings = settings;
            settings.setup_completed = true;
            settings.save(&paths)?;
            println!("Initialized FinBook at {}", paths.base_dir().display());
            println!(
                "{} categories ready, data file at {}",
                book.categories().len(),
                paths.book_file().display()
            );
        }

        Commands::Config => {
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data file:       {}", paths.book_file().display());
            println!("Backup dir:      {}", paths.backup_dir().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!("Currency symbol: {}", settings.currency_symbol);
            println!("Date format:     {}", settings.date_format);
            println!(
                "Retention:       {} daily, {} monthly",
                settings.backup_retention.daily_count, settings.backup_retention.monthly_count
            );
        }

        Commands::Account(cmd) => {
            let mut book = BudgetBook::open(paths)?;
            handle_account_command(&mut book, cmd)?;
        }

        Commands::Category(cmd) => {
            let mut book = BudgetBook::open(paths)?;
            handle_category_command(&mut book, cmd)?;
        }

        Commands::Transaction(cmd) => {
            let mut book = BudgetBook::open(paths)?;
            handle_transaction_command(&mut book, &settings, cmd)?;
        }

        Commands::Rule(cmd) => {
            let mut book = BudgetBook::open(paths)?;
            handle_rule_command(&mut book, cmd)?;
        }

        Commands::Goal(cmd) => {
            let mut book = BudgetBook::open(paths)?;
            handle_goal_command(&mut book, &settings, cmd)?;
        }

        Commands::Import(cmd) => {
            let mut book = BudgetBook::open(paths)?;
            handle_import_command(&mut book, cmd)?;
        }

        Commands::Backup(cmd) => {
            let mut book = BudgetBook::open(paths)?;
            handle_backup_command(&mut book, &settings, cmd)?;
        }

        Commands::Audit(cmd) => {
            let book = BudgetBook::open(paths)?;
            handle_audit_command(&book, cmd)?;
        }
    }

    Ok(())
}
