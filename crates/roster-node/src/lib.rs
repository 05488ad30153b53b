//! Roster Node - HTTP service for the attendance/loot roster
//!
//! Hosts a single roster document and exposes it to the front-end and to
//! local admin tooling.
//!
//! # Architecture
//!
//! - **Storage**: the roster as one JSON document, rewritten on each change
//! - **API**: HTTP endpoints for members, categories, events and eligibility
//! - **Admin Socket**: Unix socket for local admin commands (roster-admin CLI)
//! - **Node**: configuration and process wiring
//!
//! Roster rules and the eligibility engine live in `roster-core`.
//!
//! # Example
//!
//! ```no_run
//! use roster_node::{NodeConfig, RosterNode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = NodeConfig::from_env()?;
//!     let node = RosterNode::new(config).await?;
//!     node.run().await?;
//!     Ok(())
//! }
//! ```

pub mod admin_socket;
pub mod api;
pub mod error;
pub mod node;
pub mod storage;

pub use error::{Error, Result};
pub use node::{NodeConfig, NodeState, RosterNode};
pub use storage::Storage;
