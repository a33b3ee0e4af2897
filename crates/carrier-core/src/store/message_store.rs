//! The shared mailbox.
//!
//! One instance per running client. The interactive surface reads snapshots
//! and marks messages read; the inbound worker replaces the inbox wholesale;
//! the outbound worker appends to the sent list and drains the outgoing
//! hand-off. All sequence/map access is serialized behind a single mutex, so
//! a snapshot never observes a half-written sequence. None of the operations
//! error: they complete or block.

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::models::Message;
use crate::store::read_status::ReadStatusMap;

struct Mailbox {
    /// Wholesale-replaced by each successful inbound poll
    inbox: Vec<Message>,
    /// Append-only, one entry per confirmed delivery
    sent: Vec<Message>,
    read_status: ReadStatusMap,
}

pub struct MessageStore {
    mailbox: Mutex<Mailbox>,
    // Capacity-1 hand-off: at most one pending outgoing message; a second
    // `offer` waits until the outbound worker has taken the first. Both ends
    // live here, so the channel can never close while the store is alive.
    outgoing_tx: mpsc::Sender<Message>,
    outgoing_rx: tokio::sync::Mutex<mpsc::Receiver<Message>>,
}

impl MessageStore {
    /// Build the store from the persisted read-status map and the sent list
    /// synchronized at startup.
    pub fn new(read_status: ReadStatusMap, sent: Vec<Message>) -> Self {
        let (outgoing_tx, outgoing_rx) = mpsc::channel(1);
        Self {
            mailbox: Mutex::new(Mailbox {
                inbox: Vec::new(),
                sent,
                read_status,
            }),
            outgoing_tx,
            outgoing_rx: tokio::sync::Mutex::new(outgoing_rx),
        }
    }

    /// Swap the entire inbox. Called only by the inbound sync worker.
    pub fn replace_inbox(&self, messages: Vec<Message>) {
        self.mailbox.lock().inbox = messages;
    }

    /// Append a confirmed-delivered message to the sent list. Called only by
    /// the outbound sync worker.
    pub fn append_sent(&self, message: Message) {
        self.mailbox.lock().sent.push(message);
    }

    /// Consistent point-in-time copy of the inbox for rendering.
    pub fn snapshot_inbox(&self) -> Vec<Message> {
        self.mailbox.lock().inbox.clone()
    }

    /// Consistent point-in-time copy of the sent list for rendering.
    pub fn snapshot_sent(&self) -> Vec<Message> {
        self.mailbox.lock().sent.clone()
    }

    /// Idempotent.
    pub fn mark_read(&self, uid: u64) {
        self.mailbox.lock().read_status.mark_read(uid);
    }

    /// Absence in the map is "unread", never an error.
    pub fn is_read(&self, message: &Message) -> bool {
        self.mailbox.lock().read_status.was_read(message.uid)
    }

    /// Copy of the read-status map, taken at shutdown for persistence.
    pub fn read_status(&self) -> ReadStatusMap {
        self.mailbox.lock().read_status.clone()
    }

    /// Producer side of the hand-off. Waits until the previous pending
    /// outgoing message (if any) has been taken, then installs `message` as
    /// pending. The interactive surface calls this from a detached task so
    /// its event loop never blocks here.
    pub async fn offer(&self, message: Message) {
        self.outgoing_tx
            .send(message)
            .await
            .expect("store holds its own receiver");
    }

    /// Consumer side of the hand-off. Waits until a message has been
    /// offered, then returns and clears it. Single consumer by contract
    /// (the outbound sync worker).
    pub async fn take(&self) -> Message {
        self.outgoing_rx
            .lock()
            .await
            .recv()
            .await
            .expect("store holds its own sender")
    }
}
