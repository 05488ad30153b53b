//! Roster Node - the main application entry point.
//!
//! Architecture:
//! - Single daemon process holding the roster document in memory
//! - HTTP API for the roster front-end (members, categories, eligibility)
//! - Unix admin socket for local admin ops (roster-admin CLI)

use crate::admin_socket::AdminSocket;
use crate::api;
use crate::error::{Error, Result};
use crate::storage::Storage;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Default HTTP port when neither `ROSTER_API_ADDR` nor `PORT` is set.
const DEFAULT_PORT: u16 = 3000;

/// Configuration for a roster node.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// JSON document holding the roster
    pub data_file: PathBuf,

    /// HTTP API listen address
    pub api_addr: SocketAddr,

    /// Admin socket path (for roster-admin CLI)
    pub admin_socket: PathBuf,

    /// Static front-end served for unmatched routes
    pub static_dir: Option<PathBuf>,
}

impl NodeConfig {
    /// Create config from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_file = PathBuf::from(
            var("ROSTER_DATA_FILE").unwrap_or_else(|| "./roster-data/db.json".to_string()),
        );

        let api_addr = match var("ROSTER_API_ADDR") {
            Some(addr) => addr
                .parse()
                .map_err(|e| Error::Config(format!("invalid ROSTER_API_ADDR {:?}: {}", addr, e)))?,
            None => {
                let port = match var("PORT") {
                    Some(port) => port
                        .parse()
                        .map_err(|e| Error::Config(format!("invalid PORT {:?}: {}", port, e)))?,
                    None => DEFAULT_PORT,
                };
                SocketAddr::from(([0, 0, 0, 0], port))
            }
        };

        let admin_socket = var("ROSTER_ADMIN_SOCKET")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                data_file
                    .parent()
                    .unwrap_or_else(|| std::path::Path::new("."))
                    .join("admin.sock")
            });

        let static_dir = var("ROSTER_STATIC_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            data_file,
            api_addr,
            admin_socket,
            static_dir,
        })
    }
}

/// Shared state for the node - single storage instance shared by all components.
pub struct NodeState {
    pub storage: Arc<Storage>,
    pub config: NodeConfig,
}

/// A roster node instance.
pub struct RosterNode {
    state: Arc<NodeState>,
}

impl RosterNode {
    /// Create a new node, loading (or initializing) the roster document.
    pub async fn new(config: NodeConfig) -> Result<Self> {
        let storage = Arc::new(Storage::open(&config.data_file).await?);
        Ok(Self {
            state: Arc::new(NodeState { storage, config }),
        })
    }

    /// Get the shared state (for API handlers).
    pub fn state(&self) -> Arc<NodeState> {
        Arc::clone(&self.state)
    }

    /// Run the node (starts the admin socket and HTTP server).
    pub async fn run(self) -> Result<()> {
        let config = &self.state.config;
        tracing::info!("Roster node starting");
        tracing::info!("  API: http://{}", config.api_addr);
        tracing::info!("  Admin: {:?}", config.admin_socket);
        tracing::info!("  Data: {:?}", config.data_file);
        if let Some(dir) = &config.static_dir {
            tracing::info!("  Static: {:?}", dir);
        }

        let admin_socket = AdminSocket::new(Arc::clone(&self.state.storage), &config.admin_socket);
        tokio::spawn(async move {
            if let Err(e) = admin_socket.run().await {
                tracing::error!("Admin socket error: {}", e);
            }
        });

        let app = api::build_router(self.state());

        let listener = tokio::net::TcpListener::bind(config.api_addr).await?;
        tracing::info!("HTTP server listening on {}", config.api_addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}
