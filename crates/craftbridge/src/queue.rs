//! Shared FIFO of server output lines
//!
//! Bridges the drain loop (producer) and the chat flush loop (consumer).
//! Append and drain are atomic with respect to each other: no line is
//! lost or duplicated between the two.

use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Unbounded FIFO of raw output lines, cheap to clone and share
#[derive(Clone, Default)]
pub struct MessageQueue {
    inner: Arc<Mutex<VecDeque<String>>>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line, preserving arrival order
    pub async fn append(&self, line: String) {
        self.inner.lock().await.push_back(line);
    }

    /// Atomically remove and return every queued line (possibly empty)
    pub async fn drain_all(&self) -> Vec<String> {
        self.inner.lock().await.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_drain_empty() {
        let queue = MessageQueue::new();
        assert!(queue.drain_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_drain_preserves_order() {
        let queue = MessageQueue::new();
        for line in ["a\n", "b\n", "c\n"] {
            queue.append(line.into()).await;
        }
        assert_eq!(queue.drain_all().await, vec!["a\n", "b\n", "c\n"]);
        assert!(queue.drain_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_append_and_drain_loses_nothing() {
        let queue = MessageQueue::new();
        let producer = {
            let queue = queue.clone();
            tokio::spawn(async move {
                for i in 0..500 {
                    queue.append(format!("line {i}\n")).await;
                }
            })
        };
        let mut drained = Vec::new();
        while !producer.is_finished() {
            drained.extend(queue.drain_all().await);
            tokio::task::yield_now().await;
        }
        producer.await.unwrap();
        drained.extend(queue.drain_all().await);
        assert_eq!(drained.len(), 500);
        // Order preserved across drain batches
        for (i, line) in drained.iter().enumerate() {
            assert_eq!(line, &format!("line {i}\n"));
        }
    }
}
