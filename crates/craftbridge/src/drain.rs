//! Server output drain loop
//!
//! Polls the process output on a fixed interval. Each tick drains every
//! line currently buffered (one burst), drops noise lines, and appends
//! survivors to the shared queue in arrival order. Yields between reads
//! so a chatty server cannot starve the other loops.

use crate::process::{ReadChunk, ServerProcess};
use crate::queue::MessageQueue;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, trace};

/// Drain loop configuration
#[derive(Debug, Clone)]
pub struct DrainConfig {
    /// Idle interval between poll bursts
    pub poll_interval: Duration,
    /// Substrings marking output lines to discard rather than relay,
    /// e.g. Bedrock's periodic auto-compaction notices
    pub noise_patterns: Vec<String>,
}

impl Default for DrainConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            noise_patterns: vec!["Running AutoCompaction".into()],
        }
    }
}

/// True if the line matches any configured noise pattern
pub fn is_noise(line: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| line.contains(p.as_str()))
}

/// Drain everything currently buffered on the process output.
///
/// Returns the number of lines enqueued. Liveness is checked once at
/// burst entry; a process exiting mid-burst still gets its buffered
/// final lines drained through to pipe EOF.
pub async fn drain_burst(
    process: &Arc<Mutex<ServerProcess>>,
    queue: &MessageQueue,
    patterns: &[String],
) -> usize {
    if !process.lock().await.is_running() {
        return 0;
    }
    let mut enqueued = 0;
    loop {
        let chunk = process.lock().await.read_chunk().await;
        match chunk {
            ReadChunk::EndOfStream => return enqueued,
            ReadChunk::Line(line) => {
                if is_noise(&line, patterns) {
                    trace!(line = line.trim_end(), "discarded noise line");
                } else {
                    queue.append(line).await;
                    enqueued += 1;
                }
            }
        }
        // Release the scheduler between reads inside a long burst
        tokio::task::yield_now().await;
    }
}

/// Background drain loop; runs until the task is cancelled
pub async fn drain_task(
    process: Arc<Mutex<ServerProcess>>,
    queue: MessageQueue,
    config: DrainConfig,
) {
    let mut ticker = tokio::time::interval(config.poll_interval);
    loop {
        ticker.tick().await;
        let enqueued = drain_burst(&process, &queue, &config.noise_patterns).await;
        if enqueued > 0 {
            debug!(lines = enqueued, "drained server output");
        }
    }
}
