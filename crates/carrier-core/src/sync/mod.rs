pub mod spin_lock;
pub mod worker;

pub use spin_lock::SpinLock;
pub use worker::SyncWorkers;
