/*
[INPUT]:  Market id (e.g., 1) and order side
[OUTPUT]: Currencies, markets, order book and recent trades
[POS]:    Examples - public market data queries
[UPDATE]: When adding new market data endpoints
*/

use bitpin_client::*;
use tracing_subscriber::EnvFilter;

/// Example: Query market data (no authentication required)
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("=== Bitpin Market Data Example ===\n");

    let client = match BitpinClient::new(ClientConfig::default(), Credentials::default()).await {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    println!("✓ HTTP client created (no auth required for public endpoints)\n");

    let market_id = 1;

    println!("Querying markets (page 1)...");
    match client.get_markets_info(1).await {
        Ok(markets) => match pick(markets, "id", &serde_json::json!(market_id)) {
            Ok(market) => println!("✓ Market {}: {}", market_id, market["results"]["code"]),
            Err(e) => println!("✗ {}", e),
        },
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\nQuerying currencies (page 1)...");
    match client.get_currencies_info(1).await {
        Ok(currencies) => println!("✓ Currencies: {}", currencies["count"]),
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\nQuerying buy-side order book for market {}...", market_id);
    match client.get_orderbook(market_id, OrderType::Buy).await {
        Ok(book) => {
            for entry in book.orders.iter().take(5) {
                println!("  {} @ {}", entry.remain, entry.price);
            }
            println!("✓ Volume: {}", book.volume);
        }
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\nQuerying recent trades for market {}...", market_id);
    match client.get_recent_trades(market_id).await {
        Ok(trades) => println!("✓ {} recent trades", trades.0.len()),
        Err(e) => println!("✗ Error: {}", e),
    }

    client.close_connection();
    println!("\n✓ Market data example complete");
}
