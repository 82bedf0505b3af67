//! Server child process handle
//!
//! Owns the child process and both of its pipes exclusively. Liveness is
//! recomputed from the handle's exit status on every query, never cached,
//! so a check performed right after a stop attempt sees the real state.

use craftbridge_core::{BridgeError, LaunchSpec, Result};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// How long one `read_chunk` attempt waits for a terminator before
/// reporting `EndOfStream` so the caller can back off.
const DEFAULT_ATTEMPT_WINDOW: Duration = Duration::from_millis(50);

/// Result of a single bounded read attempt on the server's output
#[derive(Debug, PartialEq, Eq)]
pub enum ReadChunk {
    /// One complete line, terminator included
    Line(String),
    /// No terminated line available this attempt (idle pipe, process
    /// exit, or pipe EOF); caller should back off
    EndOfStream,
}

/// Handle to the managed server child process
pub struct ServerProcess {
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout: Option<BufReader<ChildStdout>>,
    /// Partial output carried between read attempts; a cancelled attempt
    /// never loses bytes because they land here first
    carry: Vec<u8>,
    terminator: &'static str,
    attempt_window: Duration,
}

impl ServerProcess {
    /// Create an empty handle for a server emitting the given line
    /// terminator. No process exists until [`start`](Self::start).
    pub fn new(terminator: &'static str) -> Self {
        Self {
            child: None,
            stdin: None,
            stdout: None,
            carry: Vec::new(),
            terminator,
            attempt_window: DEFAULT_ATTEMPT_WINDOW,
        }
    }

    /// Override the read attempt window (mainly for tests)
    pub fn with_attempt_window(mut self, window: Duration) -> Self {
        self.attempt_window = window;
        self
    }

    /// Spawn the server process with piped stdin/stdout.
    ///
    /// At most one instance exists at a time: starting while one is live
    /// is rejected, not replaced.
    pub fn start(&mut self, launch: &LaunchSpec) -> Result<()> {
        if self.is_running() {
            return Err(BridgeError::AlreadyRunning);
        }

        let mut command = Command::new(&launch.program);
        command
            .args(&launch.args)
            .current_dir(&launch.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        for (key, value) in &launch.env {
            command.env(key, value);
        }

        let mut child = command
            .spawn()
            .map_err(|e| BridgeError::Spawn(format!("{}: {e}", launch.program)))?;

        self.stdin = child.stdin.take();
        self.stdout = child.stdout.take().map(BufReader::new);
        self.carry.clear();
        info!(program = %launch.program, pid = ?child.id(), "server process started");
        self.child = Some(child);
        Ok(())
    }

    /// True iff a handle exists and its exit status is still unset
    pub fn is_running(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// Write one command line to the server's stdin, appending the
    /// flavor line terminator. Best-effort: a short window of
    /// false-negative liveness is acceptable.
    pub async fn write_line(&mut self, text: &str) -> Result<()> {
        if !self.is_running() {
            return Err(BridgeError::NotRunning);
        }
        let stdin = self.stdin.as_mut().ok_or(BridgeError::NotRunning)?;
        stdin.write_all(text.as_bytes()).await?;
        stdin.write_all(self.terminator.as_bytes()).await?;
        stdin.flush().await?;
        debug!(command = text, "wrote line to server stdin");
        Ok(())
    }

    /// One bounded read attempt up to the next line terminator.
    ///
    /// Never blocks past the attempt window; partial bytes stay in the
    /// carry buffer until the terminator arrives on a later attempt.
    pub async fn read_chunk(&mut self) -> ReadChunk {
        if let Some(line) = self.take_carried_line() {
            return ReadChunk::Line(line);
        }
        let Some(reader) = self.stdout.as_mut() else {
            return ReadChunk::EndOfStream;
        };
        match timeout(self.attempt_window, reader.read_until(b'\n', &mut self.carry)).await {
            // Attempt window elapsed with no terminator
            Err(_) => ReadChunk::EndOfStream,
            // Pipe EOF
            Ok(Ok(0)) => ReadChunk::EndOfStream,
            Ok(Ok(_)) => match self.take_carried_line() {
                Some(line) => ReadChunk::Line(line),
                None => ReadChunk::EndOfStream,
            },
            Ok(Err(e)) => {
                warn!(error = %e, "server stdout read failed");
                ReadChunk::EndOfStream
            }
        }
    }

    /// Unconditionally attempt forceful termination. Idempotent: errors
    /// from an absent or already-dead process are swallowed by contract.
    pub async fn kill(&mut self) {
        if let Some(child) = self.child.as_mut() {
            let _ = child.start_kill();
            // Reap so a later liveness check sees the exit status
            let _ = child.wait().await;
            info!("server process killed");
        }
    }

    /// Split one complete line off the carry buffer, if present
    fn take_carried_line(&mut self) -> Option<String> {
        let end = self.carry.iter().position(|&b| b == b'\n')?;
        let line: Vec<u8> = self.carry.drain(..=end).collect();
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn launch(program: &str, args: &[&str]) -> LaunchSpec {
        LaunchSpec {
            program: program.into(),
            args: args.iter().map(|s| s.to_string()).collect(),
            working_dir: PathBuf::from("/tmp"),
            env: vec![],
        }
    }

    #[tokio::test]
    async fn test_start_and_liveness() {
        let mut proc = ServerProcess::new("\n");
        assert!(!proc.is_running());
        proc.start(&launch("cat", &[])).unwrap();
        assert!(proc.is_running());
        proc.kill().await;
        assert!(!proc.is_running());
    }

    #[tokio::test]
    async fn test_double_start_rejected() {
        let mut proc = ServerProcess::new("\n");
        proc.start(&launch("cat", &[])).unwrap();
        let err = proc.start(&launch("cat", &[])).unwrap_err();
        assert!(matches!(err, BridgeError::AlreadyRunning));
        // The original handle is unchanged and still live
        assert!(proc.is_running());
        proc.kill().await;
    }

    #[tokio::test]
    async fn test_spawn_error() {
        let mut proc = ServerProcess::new("\n");
        let err = proc
            .start(&launch("definitely-not-a-real-binary", &[]))
            .unwrap_err();
        assert!(matches!(err, BridgeError::Spawn(_)));
        assert!(!proc.is_running());
    }

    #[tokio::test]
    async fn test_write_requires_running() {
        let mut proc = ServerProcess::new("\n");
        let err = proc.write_line("say hello").await.unwrap_err();
        assert!(matches!(err, BridgeError::NotRunning));
    }

    #[tokio::test]
    async fn test_write_and_read_roundtrip() {
        // cat echoes stdin back on stdout
        let mut proc = ServerProcess::new("\n").with_attempt_window(Duration::from_millis(500));
        proc.start(&launch("cat", &[])).unwrap();
        proc.write_line("hello").await.unwrap();
        assert_eq!(proc.read_chunk().await, ReadChunk::Line("hello\n".into()));
        // Nothing further pending: the next attempt backs off
        assert_eq!(proc.read_chunk().await, ReadChunk::EndOfStream);
        proc.kill().await;
    }

    #[tokio::test]
    async fn test_read_chunk_idle_backs_off() {
        let mut proc = ServerProcess::new("\n");
        proc.start(&launch("sleep", &["5"])).unwrap();
        assert_eq!(proc.read_chunk().await, ReadChunk::EndOfStream);
        proc.kill().await;
    }

    #[tokio::test]
    async fn test_kill_idempotent() {
        let mut proc = ServerProcess::new("\n");
        // No process at all: still a no-op
        proc.kill().await;
        proc.start(&launch("cat", &[])).unwrap();
        proc.kill().await;
        proc.kill().await;
        assert!(!proc.is_running());
    }
}
