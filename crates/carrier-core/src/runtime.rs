//! Client lifecycle: seed the mailbox, run the sync workers, flush on
//! shutdown. The interactive surface talks to the [`MessageStore`] handle
//! this hands out and never touches the workers directly.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::constants;
use crate::stats::SharedSyncStats;
use crate::store::{MessageStore, ReadStatusMap};
use crate::sync::SyncWorkers;
use crate::transport::Transport;

pub struct ClientRuntime {
    store: Arc<MessageStore>,
    workers: Option<SyncWorkers>,
    stats: SharedSyncStats,
    read_status_path: PathBuf,
}

impl ClientRuntime {
    /// Bring the client up: load the persisted read-status map, seed the
    /// sent list from the remote store, run one synchronous inbound poll so
    /// the first render has data, then start the workers.
    pub async fn start(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
        user: String,
    ) -> Result<Self> {
        std::fs::create_dir_all(&config.config_dir).with_context(|| {
            format!("creating config directory {}", config.config_dir.display())
        })?;
        let read_status_path = config.config_dir.join(constants::READ_STATUS_FILE);
        let read_status = ReadStatusMap::load(&read_status_path);

        let sent = match transport.list_sent(&user).await {
            Ok(sent) => sent,
            Err(err) => {
                debug!(%err, "sent-list seed failed, starting with an empty sent cache");
                Vec::new()
            }
        };
        let store = Arc::new(MessageStore::new(read_status, sent));

        match transport.receive_messages(&user).await {
            Ok(messages) => store.replace_inbox(messages),
            Err(err) => debug!(%err, "initial inbox poll failed, starting with an empty inbox"),
        }

        let workers = SyncWorkers::spawn(
            store.clone(),
            transport,
            user,
            config.poll_backoff(),
        );
        info!("client runtime started");

        let stats = workers.stats();
        Ok(Self {
            store,
            workers: Some(workers),
            stats,
            read_status_path,
        })
    }

    /// Shared mailbox handle for the interactive surface.
    pub fn store(&self) -> Arc<MessageStore> {
        self.store.clone()
    }

    /// Sync-cycle counters for the diagnostics view.
    pub fn stats(&self) -> SharedSyncStats {
        self.stats.clone()
    }

    /// Stop the workers and flush the read-status map. A failed flush aborts
    /// shutdown with the error.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(workers) = self.workers.take() {
            workers.shutdown().await;
        }
        self.store
            .read_status()
            .save(&self.read_status_path)
            .context("flushing read-status map")?;
        info!("client runtime stopped");
        Ok(())
    }
}
