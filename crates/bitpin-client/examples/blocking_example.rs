/*
[INPUT]:  Optional BITPIN_* credentials from the environment
[OUTPUT]: Market listing and, when logged in, account info
[POS]:    Examples - blocking client usage without an async runtime
[UPDATE]: When the blocking client surface changes
*/

use bitpin_client::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("=== Bitpin Blocking Client Example ===\n");

    let credentials = Credentials::from_env();
    let logged_in = credentials.can_login();
    let client = BlockingClient::new(ClientConfig::default(), credentials)?;

    let markets = client.get_markets_info(1)?;
    println!("✓ Markets: {}", markets["count"]);

    if logged_in {
        let info = client.get_user_info()?;
        println!("✓ User info: {}", info);

        let trades = client.get_user_trades(&UserTradesQuery {
            market_id: Some(1),
            order_type: Some(OrderType::Sell),
        })?;
        println!("✓ Sell trades: {}", trades);
    }

    client.close_connection();
    Ok(())
}
