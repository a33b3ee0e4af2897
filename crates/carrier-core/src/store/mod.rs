pub mod message_store;
pub mod read_status;

pub use message_store::MessageStore;
pub use read_status::{PersistError, ReadStatusMap};
