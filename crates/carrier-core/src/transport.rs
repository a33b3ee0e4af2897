//! Interface to the remote message store.
//!
//! The wire protocol lives behind this trait; the core only sees the three
//! RPCs and a status. Implementations are expected to apply the fixed
//! [`crate::constants::RPC_DEADLINE`] to every call; a call that outlives
//! it fails with [`TransportError::Timeout`].

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::models::Message;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("server returned error status")]
    Status,
}

/// The remote procedure calls the sync workers drive. Object-safe so the
/// runtime can hold an `Arc<dyn Transport>`.
pub trait Transport: Send + Sync {
    /// Deliver one outgoing message. No content is echoed back.
    fn send_message<'a>(&'a self, message: &'a Message) -> BoxFuture<'a, Result<(), TransportError>>;

    /// Full current inbox for `user`.
    fn receive_messages<'a>(&'a self, user: &'a str)
        -> BoxFuture<'a, Result<Vec<Message>, TransportError>>;

    /// Full current sent list for `user`; used once at startup to seed the
    /// local sent cache.
    fn list_sent<'a>(&'a self, user: &'a str) -> BoxFuture<'a, Result<Vec<Message>, TransportError>>;
}

/// Scripted in-memory transport for worker and runtime tests.
#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    pub struct MockTransport {
        pub remote_inbox: Mutex<Vec<Message>>,
        pub remote_sent: Mutex<Vec<Message>>,
        pub delivered: Mutex<Vec<Message>>,
        pub fail_sends: AtomicBool,
        pub fail_receives: AtomicBool,
        pub send_calls: AtomicUsize,
        pub receive_calls: AtomicUsize,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl Transport for MockTransport {
        fn send_message<'a>(
            &'a self,
            message: &'a Message,
        ) -> BoxFuture<'a, Result<(), TransportError>> {
            Box::pin(async move {
                self.send_calls.fetch_add(1, Ordering::SeqCst);
                if self.fail_sends.load(Ordering::SeqCst) {
                    return Err(TransportError::Status);
                }
                self.delivered.lock().push(message.clone());
                Ok(())
            })
        }

        fn receive_messages<'a>(
            &'a self,
            _user: &'a str,
        ) -> BoxFuture<'a, Result<Vec<Message>, TransportError>> {
            Box::pin(async move {
                self.receive_calls.fetch_add(1, Ordering::SeqCst);
                if self.fail_receives.load(Ordering::SeqCst) {
                    return Err(TransportError::Connection("refused".to_string()));
                }
                Ok(self.remote_inbox.lock().clone())
            })
        }

        fn list_sent<'a>(
            &'a self,
            _user: &'a str,
        ) -> BoxFuture<'a, Result<Vec<Message>, TransportError>> {
            Box::pin(async move { Ok(self.remote_sent.lock().clone()) })
        }
    }
}
