use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::parser::{parse_send_time, SendTimeError};

/// A single chat message as mirrored from the remote store.
///
/// Messages are immutable once constructed. `uid` is assigned by the server;
/// a locally composed message carries `uid = 0` until the server echoes it
/// back through the sent list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub uid: u64,
    pub from: String,
    /// Ordered recipient list. Group recipients carry a leading `@`.
    pub to: Vec<String>,
    pub body: String,
    /// Scheduled delivery instant, unix seconds
    pub send_ts: u64,
    /// Quoted body of the message being replied to, at most one level deep
    pub reply: Option<String>,
}

impl Message {
    /// Build an outgoing message scheduled for `send_at`.
    pub fn compose(
        from: impl Into<String>,
        to: Vec<String>,
        body: impl Into<String>,
        send_at: DateTime<Local>,
        reply: Option<String>,
    ) -> Self {
        Self {
            uid: 0,
            from: from.into(),
            to,
            body: body.into(),
            send_ts: send_at.timestamp().max(0) as u64,
            reply: reply.map(|r| truncate_quoting(&r)),
        }
    }

    /// Build an outgoing message from the compose form's scheduling text.
    /// Malformed text fails here, before anything reaches the hand-off slot.
    pub fn compose_scheduled(
        from: impl Into<String>,
        to: Vec<String>,
        body: impl Into<String>,
        schedule: &str,
        reply: Option<String>,
    ) -> Result<Self, SendTimeError> {
        let send_at = parse_send_time(schedule)?;
        Ok(Self::compose(from, to, body, send_at, reply))
    }

    /// Body text with the quoted reply appended, as shown to recipients.
    pub fn rendered_body(&self) -> String {
        match &self.reply {
            Some(reply) => join_with_reply(&self.body, reply),
            None => self.body.clone(),
        }
    }
}

/// Append `reply` to `body` as a `>`-quoted block under an "In Reply To" banner.
pub fn join_with_reply(body: &str, reply: &str) -> String {
    let quoted: Vec<String> = reply.lines().map(|line| format!("> {line}")).collect();
    format!("{}\n\nIn Reply To:\n{}", body, quoted.join("\n"))
}

/// Keep at most one level of quoting: when replying to a message that itself
/// quotes an older one, the older quote is cut off.
fn truncate_quoting(reply: &str) -> String {
    match reply.find("\n\nIn Reply To:\n") {
        Some(pos) => reply[..pos].to_string(),
        None => reply.to_string(),
    }
}
