pub mod config;
pub mod constants;
pub mod models;
pub mod parser;
pub mod runtime;
pub mod stats;
pub mod store;
pub mod sync;
pub mod transport;

// Re-export the main entry points at crate root for convenience
pub use config::ClientConfig;
pub use models::Message;
pub use runtime::ClientRuntime;
pub use stats::{SharedSyncStats, SyncStats};
pub use store::MessageStore;
pub use sync::SpinLock;
pub use transport::{Transport, TransportError};
