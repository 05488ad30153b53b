//! Roster Node binary
//!
//! Serves the roster HTTP API over a JSON document.

use roster_node::{NodeConfig, RosterNode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_node=info,roster_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Roster Node");

    let config = NodeConfig::from_env()?;

    let node = RosterNode::new(config).await?;
    node.run().await?;

    Ok(())
}
