//! # craftbridge
//!
//! Command and process bridge between a chat channel and a managed
//! Minecraft server child process.
//!
//! This crate provides:
//! - `ServerProcess`: child process lifecycle, stdin writer, bounded stdout reads
//! - `MessageQueue`: atomic FIFO between the drain and flush loops
//! - `Dispatcher`: command validation and routing
//! - Background drain and flush loops
//! - `Bridge`: the assembled system with two-phase shutdown

pub mod dispatch;
pub mod drain;
pub mod flush;
pub mod process;
pub mod queue;
pub mod registry;
pub mod settings;

pub use dispatch::Dispatcher;
pub use drain::DrainConfig;
pub use flush::FlushConfig;
pub use process::{ReadChunk, ServerProcess};
pub use queue::MessageQueue;
pub use registry::{AdminCommand, CommandKind, CommandRegistry};
pub use settings::SettingsStore;

use craftbridge_core::{ChatTransport, MemoryRange, Result, ServerFlavor};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Bridge configuration
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Server install directory; must exist
    pub server_dir: PathBuf,
    /// Server flavor being managed
    pub flavor: ServerFlavor,
    /// JVM memory bounds (Java flavor only)
    pub memory: MemoryRange,
    /// Drain loop settings
    pub drain: DrainConfig,
    /// Flush loop interval
    pub flush_interval: Duration,
    /// Transport single-message size limit
    pub message_limit: usize,
    /// How long a graceful stop may take before escalating to kill
    pub grace_window: Duration,
}

impl BridgeConfig {
    pub fn new(server_dir: impl Into<PathBuf>, flavor: ServerFlavor) -> Self {
        Self {
            server_dir: server_dir.into(),
            flavor,
            memory: MemoryRange::default(),
            drain: DrainConfig::default(),
            flush_interval: Duration::from_secs(5),
            message_limit: 2000,
            grace_window: Duration::from_secs(5),
        }
    }
}

/// The assembled command and process bridge
pub struct Bridge {
    process: Arc<Mutex<ServerProcess>>,
    queue: MessageQueue,
    dispatcher: Dispatcher,
    config: BridgeConfig,
    tasks: Vec<JoinHandle<()>>,
}

impl Bridge {
    /// Assemble the bridge. Fails fast on a missing server directory or
    /// an incomplete command registry.
    pub fn new(config: BridgeConfig) -> Result<Self> {
        let settings = SettingsStore::new(&config.server_dir, config.flavor)?;
        let registry = CommandRegistry::new(config.flavor)?;
        let launch = config.flavor.launch_spec(&config.server_dir, config.memory);
        let process = Arc::new(Mutex::new(ServerProcess::new(
            config.flavor.line_terminator(),
        )));
        let queue = MessageQueue::new();
        let dispatcher = Dispatcher::new(process.clone(), registry, settings, launch);
        Ok(Self {
            process,
            queue,
            dispatcher,
            config,
            tasks: Vec::new(),
        })
    }

    /// Spawn the background drain and flush loops
    pub fn start_loops(&mut self, transport: Arc<dyn ChatTransport>) {
        let flush_config = FlushConfig {
            interval: self.config.flush_interval,
            message_limit: self.config.message_limit,
            header: format!(
                "Messages from {} server:",
                self.config.flavor.display_name()
            ),
        };
        self.tasks.push(tokio::spawn(drain::drain_task(
            self.process.clone(),
            self.queue.clone(),
            self.config.drain.clone(),
        )));
        self.tasks.push(tokio::spawn(flush::flush_task(
            self.queue.clone(),
            transport,
            flush_config,
        )));
        info!(flavor = %self.config.flavor, "bridge loops started");
    }

    /// Dispatch one inbound chat command
    pub async fn dispatch(&self, raw: &str, user: &str) -> Option<String> {
        self.dispatcher.dispatch(raw, user).await
    }

    /// Stop the bridge: cancel the loops, then run the mandatory
    /// two-phase shutdown of the child process.
    pub async fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        stop_with_grace(
            &self.process,
            self.config.flavor.stop_command(),
            self.config.grace_window,
        )
        .await;
    }
}

/// Two-phase shutdown: forward the native stop command, poll liveness
/// over the grace window, and kill only if the process is still alive
/// when the window elapses.
pub async fn stop_with_grace(
    process: &Arc<Mutex<ServerProcess>>,
    stop_command: &str,
    grace_window: Duration,
) {
    {
        let mut proc = process.lock().await;
        if !proc.is_running() {
            return;
        }
        if let Err(e) = proc.write_line(stop_command).await {
            warn!(error = %e, "failed to send graceful stop");
        }
    }

    info!(
        grace_secs = grace_window.as_secs_f64(),
        "waiting for server to stop gracefully"
    );
    let deadline = tokio::time::Instant::now() + grace_window;
    loop {
        if !process.lock().await.is_running() {
            info!("server stopped gracefully");
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    warn!("server did not stop within the grace window, killing it");
    process.lock().await.kill().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftbridge_core::LaunchSpec;
    use std::time::Instant;

    fn shell(script: &str) -> LaunchSpec {
        LaunchSpec {
            program: "sh".into(),
            args: vec!["-c".into(), script.into()],
            working_dir: PathBuf::from("/tmp"),
            env: vec![],
        }
    }

    #[tokio::test]
    async fn test_graceful_stop_skips_kill() {
        // Child exits as soon as it reads the stop command
        let mut proc = ServerProcess::new("\n");
        proc.start(&shell("read line; exit 0")).unwrap();
        let process = Arc::new(Mutex::new(proc));

        let started = Instant::now();
        stop_with_grace(&process, "stop", Duration::from_secs(10)).await;

        // Exited well before the window elapsed, so kill never fired
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!process.lock().await.is_running());
    }

    #[tokio::test]
    async fn test_stubborn_server_is_killed_after_grace() {
        // Child ignores the stop command
        let mut proc = ServerProcess::new("\n");
        proc.start(&shell("sleep 30")).unwrap();
        let process = Arc::new(Mutex::new(proc));

        stop_with_grace(&process, "stop", Duration::from_millis(300)).await;
        assert!(!process.lock().await.is_running());
    }

    #[tokio::test]
    async fn test_stop_with_grace_noop_when_dead() {
        let process = Arc::new(Mutex::new(ServerProcess::new("\n")));
        stop_with_grace(&process, "stop", Duration::from_millis(100)).await;
        assert!(!process.lock().await.is_running());
    }

    #[tokio::test]
    async fn test_bridge_assembly_fails_fast_on_bad_dir() {
        let config = BridgeConfig::new("/does/not/exist", ServerFlavor::Bedrock);
        assert!(Bridge::new(config).is_err());
    }
}
