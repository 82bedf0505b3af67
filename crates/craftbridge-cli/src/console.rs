//! Console chat transport
//!
//! A local stand-in for a real chat backend: outbound messages go to
//! stdout, attachments are printed with a divider. Lets the bridge be
//! driven end-to-end from a terminal.

use async_trait::async_trait;
use craftbridge_core::{BridgeError, ChatTransport, Result};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub struct ConsoleTransport {
    stdout: Mutex<tokio::io::Stdout>,
}

impl ConsoleTransport {
    pub fn new() -> Self {
        Self {
            stdout: Mutex::new(tokio::io::stdout()),
        }
    }

    async fn write(&self, text: &str) -> Result<()> {
        let mut out = self.stdout.lock().await;
        out.write_all(text.as_bytes())
            .await
            .map_err(|e| BridgeError::Transport(e.to_string()))?;
        out.write_all(b"\n")
            .await
            .map_err(|e| BridgeError::Transport(e.to_string()))?;
        out.flush()
            .await
            .map_err(|e| BridgeError::Transport(e.to_string()))
    }
}

impl Default for ConsoleTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatTransport for ConsoleTransport {
    async fn send(&self, text: &str) -> Result<()> {
        self.write(text).await
    }

    async fn send_file(&self, header: &str, body: &str) -> Result<()> {
        self.write(&format!("{header}\n--- attachment.txt ---\n{body}\n---"))
            .await
    }
}
