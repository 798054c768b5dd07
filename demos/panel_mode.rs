//! Example: Read the panel mode, arm in home mode, then disarm.

use yale_sync_bridge::{AlarmService, BridgeConfig, RemoteAlarmState, YaleClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = BridgeConfig::builder()
        .username("user@example.com")
        .password("secret")
        .client_token("client-token")
        .build();

    let client = YaleClient::new(&config)?;
    client.authenticate(&config.username, &config.password).await?;
    client.refresh_session_state().await?;

    println!("Panel mode: {}", client.query_panel_state().await?);

    println!("\nArming panel in home mode...");
    match client.command_panel_state(RemoteAlarmState::Home).await {
        Ok(()) => println!("Panel mode: {}", client.query_panel_state().await?),
        Err(e) => println!("Error arming panel: {}", e),
    }

    // Wait a bit then disarm
    tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;

    println!("\nDisarming panel...");
    match client.command_panel_state(RemoteAlarmState::Disarmed).await {
        Ok(()) => println!("Panel mode: {}", client.query_panel_state().await?),
        Err(e) => println!("Error disarming panel: {}", e),
    }

    Ok(())
}
