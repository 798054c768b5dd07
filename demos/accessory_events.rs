//! Example: Print platform events while refreshing remote state periodically.

use std::sync::Arc;

use yale_sync_bridge::{BridgeConfig, BridgeEvent, LocalHost, YaleClient, YaleSyncPlatform};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = BridgeConfig::builder()
        .username("user@example.com")
        .password("secret")
        .client_token("client-token")
        .refresh_interval_secs(15)
        .build();

    let host = Arc::new(LocalHost::with_cache_file("accessories.json"));
    let client = Arc::new(YaleClient::new(&config)?);
    let platform = YaleSyncPlatform::new(config, client, host.clone());
    let mut events = platform.subscribe();

    for handle in host.restore_cached().await? {
        platform.configure_accessory(handle).await;
    }
    platform.did_finish_launching().await?;

    let mut ticker =
        tokio::time::interval(tokio::time::Duration::from_secs(platform.config().refresh_interval_secs));
    ticker.tick().await;

    println!("Listening for accessory events (Ctrl+C to stop)...\n");

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(BridgeEvent::CharacteristicUpdated { identity, characteristic, value }) => {
                        println!("{} {} = {}", identity, characteristic, value);
                    }
                    Ok(BridgeEvent::AccessoryRemoved { identity }) => {
                        println!("Accessory {} removed", identity);
                    }
                    Ok(event) => {
                        println!("Event: {:?}", event);
                    }
                    Err(e) => {
                        println!("Event channel error: {}", e);
                        break;
                    }
                }
            }
            _ = ticker.tick() => {
                if let Err(e) = platform.refresh().await {
                    println!("Refresh failed: {}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\nSaving accessory cache...");
                host.persist().await?;
                break;
            }
        }
    }

    Ok(())
}
