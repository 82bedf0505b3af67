//! Chat transport seam
//!
//! The bridge never talks to a chat backend directly; it hands outbound
//! text to whatever implements [`ChatTransport`]. Inbound messages reach
//! the dispatcher through the host's own delivery path, already filtered
//! to the configured channel and excluding the bridge's own messages.

use crate::error::Result;
use async_trait::async_trait;

/// Outbound chat capability
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Deliver one inline message to the configured channel
    async fn send(&self, text: &str) -> Result<()>;

    /// Deliver a message too large for inline text as a file-like
    /// attachment with a short inline header
    async fn send_file(&self, header: &str, body: &str) -> Result<()>;
}
