//! Chat flush loop
//!
//! Periodically drains the output queue and relays the batch to the chat
//! transport as one payload. Batches over the transport's inline size
//! limit are sent as a file-like attachment instead.

use crate::queue::MessageQueue;
use craftbridge_core::ChatTransport;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Flush loop configuration
#[derive(Debug, Clone)]
pub struct FlushConfig {
    /// Interval between drain cycles
    pub interval: Duration,
    /// Transport's single-message size limit, in characters
    pub message_limit: usize,
    /// Header line prepended to every batch
    pub header: String,
}

impl Default for FlushConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            message_limit: 2000,
            header: "Messages from server:".into(),
        }
    }
}

/// Concatenate queued lines in order, stripping the single trailing line
/// terminator from the end of the batch.
pub fn batch_lines(lines: &[String]) -> String {
    let joined = lines.concat();
    joined
        .strip_suffix("\r\n")
        .or_else(|| joined.strip_suffix('\n'))
        .map(str::to_owned)
        .unwrap_or(joined)
}

/// Drain the queue once and relay a non-empty batch. Returns the number
/// of lines relayed.
pub async fn flush_once(
    queue: &MessageQueue,
    transport: &Arc<dyn ChatTransport>,
    config: &FlushConfig,
) -> usize {
    let lines = queue.drain_all().await;
    if lines.is_empty() {
        return 0;
    }
    let batch = batch_lines(&lines);
    let inline = format!("{}\n```{batch}```", config.header);
    let result = if inline.len() <= config.message_limit {
        transport.send(&inline).await
    } else {
        // Attachment body must not nest code fences
        transport
            .send_file(&config.header, &batch.replace("```", ""))
            .await
    };
    if let Err(e) = result {
        // Best-effort delivery; the batch is dropped, the loop lives on
        warn!(error = %e, lines = lines.len(), "failed to relay server output");
    } else {
        debug!(lines = lines.len(), "relayed server output");
    }
    lines.len()
}

/// Background flush loop; runs until the task is cancelled
pub async fn flush_task(
    queue: MessageQueue,
    transport: Arc<dyn ChatTransport>,
    config: FlushConfig,
) {
    let mut ticker = tokio::time::interval(config.interval);
    loop {
        ticker.tick().await;
        flush_once(&queue, &transport, &config).await;
    }
}
