//! Example: Log in to Yale Sync, run discovery and print every accessory.

use std::sync::Arc;

use yale_sync_bridge::{BridgeConfig, LocalHost, YaleClient, YaleSyncPlatform};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = BridgeConfig::builder()
        .username("user@example.com")
        .password("secret")
        .client_token("client-token")
        .build();

    let host = Arc::new(LocalHost::in_memory());
    let client = Arc::new(YaleClient::new(&config)?);
    let platform = YaleSyncPlatform::new(config, client, host);

    println!("Discovering devices...");
    let report = platform.did_finish_launching().await?;
    println!(
        "registered={} restored={} removed={} failed={:?}",
        report.registered, report.restored, report.removed, report.failed_groups
    );

    let accessories = platform.accessories().await;
    println!("\n--- Accessories ({}) ---", accessories.len());
    for handle in &accessories {
        let accessory = handle.read().await;
        let Some(device) = accessory.device() else {
            continue;
        };
        println!(
            "  {:20} id={:12} kind={:14} state={:?}",
            device.name, device.identifier, device.kind, device.state
        );
        for service in accessory.services() {
            for c in service.characteristics() {
                if let Some(value) = c.value() {
                    println!("      {}.{} = {}", service.kind(), c.kind(), value);
                }
            }
        }
    }

    Ok(())
}
