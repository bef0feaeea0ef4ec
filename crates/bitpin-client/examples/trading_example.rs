/*
[INPUT]:  BITPIN_API_KEY / BITPIN_API_SECRET environment variables
[OUTPUT]: Placed and cancelled order, open order listing
[POS]:    Examples - authenticated trading flow with background token refresh
[UPDATE]: When trading endpoints or session options change
*/

use std::time::Duration;

use bitpin_client::*;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

/// Example: Log in, place a limit order far from the market, then cancel it
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("=== Bitpin Trading Example ===\n");

    let credentials = Credentials::from_env();
    if !credentials.can_login() {
        eprintln!("Set BITPIN_API_KEY and BITPIN_API_SECRET to run this example");
        return Ok(());
    }

    let config = ClientConfig::default()
        .with_background_refresh_token(Duration::from_secs(10 * 60))
        .with_renewal_observer(RenewalObserver::new(|kind, err| {
            eprintln!("✗ background {} failed: {}", kind, err);
        }));
    let client = BitpinClient::new(config, credentials).await?;
    println!("✓ Logged in\n");

    let wallets = client.get_wallets().await?;
    println!("✓ Wallets: {}", wallets);

    let order = CreateOrderRequest::new(
        1,
        Decimal::new(1, 4),
        Decimal::new(1000, 0),
        OrderMode::Limit,
        OrderType::Buy,
    )
    .identifier("example-order");

    let created = client.create_order(&order).await?;
    println!("✓ Created order {} ({})", created.id, created.state);

    let open = client
        .get_user_orders(&UserOrdersQuery {
            market_id: Some(1),
            state: Some(OrderState::Active),
            ..Default::default()
        })
        .await?;
    println!("✓ {} active orders", open.results.len());

    let cancelled = client.cancel_order(&created.id.to_string()).await?;
    println!("✓ Cancel {}: {}", cancelled.id, cancelled.status);

    client.close_connection();
    Ok(())
}
