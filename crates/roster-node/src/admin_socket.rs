//! Unix socket server for admin commands.
//!
//! Provides a local IPC interface for inspecting the roster and running
//! eligibility queries without going through the HTTP API.

use crate::error::Result;
use crate::storage::Storage;
use roster_core::{evaluate, CategorySelector};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

/// Admin command sent over the socket.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum AdminCommand {
    /// Ping (health check)
    Ping,
    /// Summary counts
    Stats,
    /// Member names in display order
    ListMembers,
    /// Eligible member names for an item
    Eligible { selector: String, item_id: String },
    /// Re-read the roster document from disk
    Reload,
}

/// Response from admin command.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdminResponse {
    Ok { message: String },
    Error { error: String },
    List { items: Vec<String> },
    Pong,
}

/// Admin socket server.
pub struct AdminSocket {
    storage: Arc<Storage>,
    socket_path: PathBuf,
}

impl AdminSocket {
    /// Create a new admin socket server.
    pub fn new(storage: Arc<Storage>, socket_path: &Path) -> Self {
        Self {
            storage,
            socket_path: socket_path.to_path_buf(),
        }
    }

    /// Run the admin socket server.
    pub async fn run(&self) -> Result<()> {
        // Remove stale socket file if present
        let _ = std::fs::remove_file(&self.socket_path);

        let listener = UnixListener::bind(&self.socket_path)?;
        tracing::info!("Admin socket listening on {:?}", self.socket_path);

        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    let storage = Arc::clone(&self.storage);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, storage).await {
                            tracing::error!("Admin connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Failed to accept admin connection: {}", e);
                }
            }
        }
    }

    /// Get the socket path.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

async fn handle_connection(stream: UnixStream, storage: Arc<Storage>) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    while reader.read_line(&mut line).await? > 0 {
        let response = match serde_json::from_str::<AdminCommand>(&line) {
            Ok(cmd) => execute_command(cmd, &storage).await,
            Err(e) => AdminResponse::Error {
                error: format!("Invalid command: {}", e),
            },
        };

        let response_json = serde_json::to_string(&response)? + "\n";
        writer.write_all(response_json.as_bytes()).await?;
        line.clear();
    }

    Ok(())
}

async fn execute_command(cmd: AdminCommand, storage: &Storage) -> AdminResponse {
    match cmd {
        AdminCommand::Ping => AdminResponse::Pong,

        AdminCommand::Stats => {
            let message = storage
                .read(|roster| {
                    let items: usize = roster.categories.iter().map(|c| c.items.len()).sum();
                    format!(
                        "{} members, {} categories, {} items, {} dangling assignments",
                        roster.members.len(),
                        roster.categories.len(),
                        items,
                        roster.dangling_assignment_count()
                    )
                })
                .await;
            AdminResponse::Ok { message }
        }

        AdminCommand::ListMembers => {
            let items = storage
                .read(|roster| {
                    roster
                        .members_sorted()
                        .into_iter()
                        .map(|m| format!("{}  {}/8  {}", m.id, m.attendance.count(), m.name))
                        .collect()
                })
                .await;
            AdminResponse::List { items }
        }

        AdminCommand::Eligible { selector, item_id } => {
            let selector = CategorySelector::parse(&selector);
            let items = storage
                .read(|roster| {
                    evaluate(roster, &selector, &item_id)
                        .into_iter()
                        .map(|m| m.name)
                        .collect()
                })
                .await;
            tracing::info!(%selector, %item_id, "Admin eligibility query");
            AdminResponse::List { items }
        }

        AdminCommand::Reload => match storage.reload().await {
            Ok(()) => AdminResponse::Ok {
                message: format!("Reloaded {:?}", storage.path()),
            },
            Err(e) => AdminResponse::Error {
                error: e.to_string(),
            },
        },
    }
}

/// Default socket path.
pub fn default_socket_path() -> PathBuf {
    PathBuf::from("./roster-data/admin.sock")
}
