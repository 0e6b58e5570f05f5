//! Demo 1: Market Overview
//!
//! Showcases: public market data, tickers, depth, latest deals
//!
//! Run: BITLUM_URL=... BITLUM_JWT=... cargo run --bin market_overview

use bitlum_client::{BitlumClient, Decimal};
use colored::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  BITLUM MARKET OVERVIEW".cyan().bold());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let client = BitlumClient::from_env()?;
    let markets = client.supported_markets();
    let markets: Vec<&str> = markets.iter().map(String::as_str).collect();

    let info = client.info().await?;
    println!("{} Connected to {} ({})", "✓".green(), info.network, info.time);
    if let Some(node) = &info.lightning {
        println!(
            "{} Lightning node {} with {} active channels",
            "✓".green(),
            node.alias,
            node.num_active_channels
        );
    }
    println!();

    println!(
        "  {:>8}  {:>14}  {:>10}",
        "MARKET".white().bold(),
        "LAST".white().bold(),
        "CHANGE".white().bold()
    );
    println!("  {}", "─".repeat(36));

    for ticker in client.tickers(&markets).await? {
        let change = if ticker.change_last >= Decimal::ZERO {
            format!("{:+.2}%", ticker.change_last).green()
        } else {
            format!("{:+.2}%", ticker.change_last).red()
        };
        println!("  {:>8}  {:>14}  {:>10}", ticker.market, ticker.last, change);
    }
    println!();

    for market in &markets {
        let depth = client.depth(market, 10, 0.00000001).await?;
        match (depth.best_bid(), depth.best_ask()) {
            (Some(bid), Some(ask)) => println!(
                "  {} {}  {} {}  {} {} {}",
                market.cyan(),
                "BID:".yellow(),
                bid.price,
                "ASK:".yellow(),
                ask.price,
                "SPREAD:".green(),
                ask.price - bid.price
            ),
            _ => println!("  {} {}", market.cyan(), "empty book".dimmed()),
        }
    }
    println!();

    let deals = client.deals(&markets, 5).await?;
    println!("{} Latest {} deals", "✓".green(), deals.len());
    for deal in deals {
        println!(
            "  {:>8}  {:>4}  {} @ {}",
            deal.market,
            deal.deal_type,
            deal.amount,
            deal.price
        );
    }

    Ok(())
}
