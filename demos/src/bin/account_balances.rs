//! Demo 2: Account Balances
//!
//! Showcases: macaroon authentication, balances, deposit history,
//! partial data on exchange errors
//!
//! Run: BITLUM_URL=... BITLUM_MACAROON=... cargo run --bin account_balances

use bitlum_client::{Account, BitlumClient, ClientError};
use colored::*;
use tracing_subscriber::EnvFilter;

const ASSETS: [&str; 5] = ["BTC", "BCH", "ETH", "LTC", "DASH"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  BITLUM ACCOUNT BALANCES".cyan().bold());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let client = BitlumClient::from_env()?;

    let me = client.me().await?;
    println!("{} Logged in as {} ({})", "✓".green(), me.email, me.id);
    println!();

    // Some assets may be unavailable; show what the exchange did return
    let accounts = match client.accounts(&ASSETS).await {
        Ok(accounts) => accounts,
        Err(err @ ClientError::Exchange { .. }) => {
            println!("{} {}", "!".yellow(), err);
            err.partial_data::<Vec<Account>>().unwrap_or_default()
        }
        Err(err) => return Err(err.into()),
    };

    println!(
        "  {:>5}  {:>14}  {:>14}  {:>14}",
        "ASSET".white().bold(),
        "AVAILABLE".white().bold(),
        "FROZEN".white().bold(),
        "PENDING".white().bold()
    );
    println!("  {}", "─".repeat(53));

    for account in &accounts {
        println!(
            "  {:>5}  {:>14}  {:>14}  {:>14}",
            account.asset, account.available, account.freezed, account.pending.amount
        );
    }
    println!();

    for account in accounts.iter().filter(|a| !a.available.is_zero()) {
        let deposits = client.deposits(&account.asset, 0, 3).await?;
        println!("{} {} recent deposits", "✓".green(), account.asset.cyan());
        for deposit in deposits {
            println!(
                "  {:>12}  {}  {}",
                deposit.change,
                deposit.payment_type.dimmed(),
                deposit.payment_id
            );
        }
    }

    Ok(())
}
