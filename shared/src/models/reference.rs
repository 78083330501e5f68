//! Command / Unit Model

use serde::{Deserialize, Serialize};

/// Command (top-level organizational grouping)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub created_at: i64,
}

/// Unit under a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: u64,
    pub name: String,
    pub command_id: u64,
    pub description: String,
    pub created_at: i64,
}

/// Create command payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandCreate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Create unit payload (command addressed by name)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitCreate {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Command with its units, used by the reference listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandWithUnits {
    #[serde(flatten)]
    pub command: Command,
    pub units: Vec<Unit>,
}
