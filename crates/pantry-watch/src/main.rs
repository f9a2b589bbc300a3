//! Console tail for the push channel: loads the first page of everything,
//! then prints one line per push event with the badge totals.

use std::sync::Arc;

use tracing::{info, warn};

use pantry_client::{Client, ClientConfig, Gateway, Rest};

// The sync state is single-threaded on purpose; one thread is all we need.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pantry=debug".into()),
        )
        .init();

    // Config
    let config = ClientConfig::from_env();
    info!("watching {} (push: {})", config.api_url, config.gateway_url);

    let backend = Arc::new(Rest::new(&config)?);
    let mut client = Client::new(backend);

    // First pages up front, so pushes have loaded state to land in.
    let groups = client.chats.load_groups().await?;
    let unread = client.notifications.refresh_unread().await?;
    let notifications = client.notifications.load_more().await?;
    let posts = client.feed.load_posts().await?;
    if let Err(e) = client.feed.load_flags().await {
        warn!("flag sets unavailable: {}", e);
    }
    info!(
        "loaded {} groups, {} notifications ({} unread), {} posts",
        groups, notifications, unread, posts
    );

    let mut gateway = Gateway::connect(&config.gateway_url, &config.token).await?;
    while let Some(event) = gateway.next_event().await {
        let name = event.name();
        client.apply(event);
        info!(
            "{} | unread notifications {}, chat badges {}, fresh uploads {}",
            name,
            client.notifications.unread(),
            client.chats.unread_total(),
            client.feed.fresh_uploads()
        );
    }

    info!("gateway closed, exiting");
    Ok(())
}
