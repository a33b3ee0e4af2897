//! Application-wide constants
//!
//! Centralized location for magic strings and default values that are
//! used across multiple modules.

use std::time::Duration;

/// File name (inside the config directory) holding the persisted read-status map
pub const READ_STATUS_FILE: &str = "messages.json";

/// Client configuration file name, resolved relative to the home directory
pub const CLIENT_CONFIG_FILE: &str = ".carrier.json";

/// Directory name (inside the home directory) for client data
pub const CLIENT_DATA_DIR: &str = ".carrier";

/// Delay between consecutive inbound polling cycles
pub const DEFAULT_POLL_BACKOFF_SECS: u64 = 5;

pub const DEFAULT_SERVER_HOST: &str = "localhost";
pub const DEFAULT_SERVER_PORT: u16 = 1234;

/// Fixed per-call deadline every transport implementation is expected to
/// apply to its RPCs. Calls that outlive it count as transport failures.
pub const RPC_DEADLINE: Duration = Duration::from_secs(2);
