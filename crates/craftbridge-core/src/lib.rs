//! # craftbridge-core
//!
//! Core types for the CraftBridge chat-to-server bridge.
//!
//! This crate provides the foundational types used across the bridge:
//! - Error taxonomy
//! - Server flavor descriptions (command vocabulary, launch spec, terminators)
//! - Administrative command table
//! - The chat transport trait

pub mod command;
pub mod error;
pub mod flavor;
pub mod transport;

pub use command::{ADMIN_COMMANDS, AdminCommandSpec, CMD_PREFIX};
pub use error::{BridgeError, Result};
pub use flavor::{LaunchSpec, MemoryRange, ServerFlavor};
pub use transport::ChatTransport;
