//! Table layer for Roundkeeper.
//!
//! Each table runs one [`Session`](roundkeeper_engine::Session) inside an
//! isolated Tokio task (actor model). Every command reaches the session
//! through the table's channel, so the session always has exactly one
//! writer and each cascade finishes before the next command is read.
//!
//! # Key types
//!
//! - [`TableManager`]: creates, looks up, and destroys tables
//! - [`TableHandle`]: send commands to a running table actor
//! - [`TableSnapshot`]: a copy of a table's state for display
//! - [`Collaborators`]: the game-specific hooks a table calls into
//! - [`TableConfig`]: channel sizing and engine settings

mod config;
mod error;
mod manager;
mod table;

pub use config::TableConfig;
pub use error::TableError;
pub use manager::TableManager;
pub use table::{Collaborators, SnapshotSender, TableHandle, TableSnapshot};
