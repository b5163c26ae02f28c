//! IPC message types for manager ↔ config service communication

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Requests sent from the manager to the config service
#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum ConfigRequest {
    /// Fetch every configuration document
    FetchAll,

    /// Upsert one document wholesale (no partial-field merge)
    Upsert { key: String, value: Value },

    /// Health check
    Ping,

    /// Request graceful shutdown
    Shutdown,
}

/// Responses sent from the config service to the manager
#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum ConfigResponse {
    /// The full document set (response to FetchAll)
    Documents(HashMap<String, Value>),

    /// Acknowledgment that an upsert was persisted
    Updated,

    /// Health check response
    Pong,

    /// Service is shutting down
    ShuttingDown,

    /// Error occurred
    Error(String),
}
