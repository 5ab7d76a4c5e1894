use std::{error::Error, io::Write, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Engine, JsonFileStore, Ledger, money};

#[derive(Parser, Debug)]
#[command(name = "kyfh_admin")]
#[command(about = "Admin utilities for the KYFH ledger file")]
struct Cli {
    /// Ledger document (also read from `KYFH_STORE`).
    #[arg(long, env = "KYFH_STORE", default_value = "app/db/data.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the budget summary.
    Show,
    /// Replace the ledger with a fresh budget.
    CreateBudget(CreateBudgetArgs),
    Wallet(Wallet),
}

#[derive(Args, Debug)]
struct CreateBudgetArgs {
    /// Total budget, e.g. `1000` or `1000,50`.
    #[arg(long)]
    total: String,
    /// Carry the current wallet over.
    #[arg(long)]
    keep_wallet: bool,
    /// Do not ask before replacing an existing budget.
    #[arg(long, short)]
    yes: bool,
}

#[derive(Args, Debug)]
struct Wallet {
    #[command(subcommand)]
    command: WalletCommand,
}

#[derive(Subcommand, Debug)]
enum WalletCommand {
    AddFunds(AddFundsArgs),
    Stats,
}

#[derive(Args, Debug)]
struct AddFundsArgs {
    #[arg(long)]
    amount: String,
    #[arg(long, default_value = "interac_debit")]
    method: String,
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Single-key yes/no prompt. Anything but `y` is a no.
fn confirm(prompt: &str) -> Result<bool, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt),
        Print(" [y/N] ")
    )?;
    out.flush()?;

    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        let answer = match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => true,
            KeyCode::Char(_) | KeyCode::Enter | KeyCode::Esc => false,
            _ => continue,
        };
        execute!(out, Print(if answer { "y\r\n" } else { "n\r\n" }))?;
        out.flush()?;
        return Ok(answer);
    }
}

fn print_summary(ledger: &Ledger) {
    println!("total budget: {}", money::format_amount(ledger.total_budget));
    println!("remaining:    {}", money::format_amount(ledger.remaining));
    for (category, balance) in &ledger.categories {
        println!("  {category:<8} {}", money::format_amount(*balance));
    }
    println!("expenses:     {}", ledger.expenses.len());
    println!("wallet:       {}", money::format_amount(ledger.wallet_balance()));
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let engine = Engine::builder()
        .store(JsonFileStore::new(&cli.store))
        .build()?;

    match cli.command {
        Command::Show => match engine.ledger() {
            Some(ledger) => print_summary(&ledger),
            None => {
                eprintln!("no ledger at {}", cli.store.display());
                std::process::exit(1);
            }
        },
        Command::CreateBudget(args) => {
            let total = money::parse_amount(&args.total)?;
            let replaces = engine.ledger().is_some_and(|l| l.has_budget());
            if replaces && !args.yes && !confirm("Replace the existing budget?")? {
                eprintln!("aborted");
                std::process::exit(1);
            }

            let ledger = engine.create_budget(total, args.keep_wallet)?;
            print_summary(&ledger);
        }
        Command::Wallet(Wallet {
            command: WalletCommand::AddFunds(args),
        }) => {
            let amount = money::parse_amount(&args.amount)?;
            let added = engine.add_funds(amount, &args.method)?;
            println!(
                "added {} (balance {})",
                money::format_amount(amount),
                money::format_amount(added.new_balance)
            );
        }
        Command::Wallet(Wallet {
            command: WalletCommand::Stats,
        }) => {
            let stats = engine.wallet_stats();
            println!("balance:      {}", money::format_amount(stats.current_balance));
            println!("total added:  {}", money::format_amount(stats.total_added));
            println!("total spent:  {}", money::format_amount(stats.total_spent));
            println!("transactions: {}", stats.transaction_count);
        }
    }

    Ok(())
}
