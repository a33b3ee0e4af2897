pub mod recipients;
pub mod send_time;

pub use recipients::{parse_recipients, RecipientError};
pub use send_time::{parse_send_time, SendTimeError};
