//! Command dispatch
//!
//! Parses incoming chat commands, validates them against the registry,
//! and routes them to an administrative handler or to raw passthrough on
//! the server's stdin. No failure on this path is allowed to escape: a
//! handler fault is logged with the raw command and converted to a
//! generic user-facing message.

use crate::process::ServerProcess;
use crate::registry::{AdminCommand, CommandKind, CommandRegistry};
use crate::settings::SettingsStore;
use craftbridge_core::command::{admin_commands_message, native_commands_message};
use craftbridge_core::{BridgeError, CMD_PREFIX, LaunchSpec, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Routes chat commands to handlers or server passthrough
pub struct Dispatcher {
    process: Arc<Mutex<ServerProcess>>,
    registry: CommandRegistry,
    settings: SettingsStore,
    launch: LaunchSpec,
}

/// Splice the chat identity tag into a say-style command, right after
/// the command token, so in-game chat attributes the sender:
/// `say hello` from `alice` becomes `say (alice@chat)hello`.
pub fn tag_say_command(raw: &str, user: &str) -> String {
    let rest = raw[3..].trim_start();
    format!("{} ({user}@chat){rest}", &raw[..3])
}

impl Dispatcher {
    pub fn new(
        process: Arc<Mutex<ServerProcess>>,
        registry: CommandRegistry,
        settings: SettingsStore,
        launch: LaunchSpec,
    ) -> Self {
        Self {
            process,
            registry,
            settings,
            launch,
        }
    }

    /// Dispatch one raw chat command from the given user.
    ///
    /// Returns the reply text, or `None` for passthrough commands whose
    /// only reply, if any, arrives later through the output queue.
    pub async fn dispatch(&self, raw: &str, user: &str) -> Option<String> {
        let raw = raw.trim();
        let mut tokens = raw.split_whitespace();
        let name = tokens.next()?;
        let args: Vec<&str> = tokens.collect();

        match self.registry.lookup(name) {
            Err(e) => {
                debug!(error = %e, "rejected command");
                Some(format!(
                    "Command `{name}` is not a valid command. \
                     Run `{CMD_PREFIX}listcommands` to list all commands."
                ))
            }
            Ok(CommandKind::Native) => self.forward_native(raw, name, user).await,
            Ok(CommandKind::Admin(command)) => {
                match self.run_admin(command, &args).await {
                    Ok(reply) => Some(reply),
                    Err(e) => {
                        error!(command = raw, error = %e, "admin command failed");
                        Some(
                            "Something went wrong... verify the command's syntax and \
                             try again. The error has been logged."
                                .into(),
                        )
                    }
                }
            }
        }
    }

    async fn forward_native(&self, raw: &str, name: &str, user: &str) -> Option<String> {
        let mut proc = self.process.lock().await;
        if !proc.is_running() {
            return Some(self.not_running_message());
        }
        let line = if name == "say" {
            tag_say_command(raw, user)
        } else {
            raw.to_string()
        };
        match proc.write_line(&line).await {
            // The server's own asynchronous reply, if any, arrives later
            // via the drain loop
            Ok(()) => None,
            Err(BridgeError::NotRunning) => Some(self.not_running_message()),
            Err(e) => {
                warn!(command = raw, error = %e, "failed to forward command");
                Some("Failed to forward the command to the server. The error has been logged.".into())
            }
        }
    }

    async fn run_admin(&self, command: AdminCommand, args: &[&str]) -> Result<String> {
        let flavor = self.registry.flavor();
        match command {
            AdminCommand::ListCommands => {
                let reply = match args.first().copied() {
                    Some("admin") => admin_commands_message(),
                    Some("server") => native_commands_message(flavor),
                    _ => format!(
                        "{}\n\n{}",
                        admin_commands_message(),
                        native_commands_message(flavor)
                    ),
                };
                Ok(reply)
            }
            AdminCommand::AddUser => {
                let [name, id] = args[..] else {
                    return Err(BridgeError::HandlerFault(
                        "adduser expects: user_name user_xuid_or_uuid".into(),
                    ));
                };
                self.settings.add_user(name, id).await
            }
            AdminCommand::RemoveUser => {
                let [name] = args[..] else {
                    return Err(BridgeError::HandlerFault("rmuser expects: user_name".into()));
                };
                self.settings.remove_user(name).await
            }
            AdminCommand::UserRole | AdminCommand::ChangeProp => Ok("Not yet implemented.".into()),
            AdminCommand::ShowSettings => {
                let target = args.first().ok_or_else(|| {
                    BridgeError::HandlerFault(
                        "showsettings expects: allowlist, permissions, or properties".into(),
                    )
                })?;
                self.settings.show(target).await
            }
            AdminCommand::StartServer => {
                let mut proc = self.process.lock().await;
                match proc.start(&self.launch) {
                    Ok(()) => Ok(format!("Started {} server.", flavor.display_name())),
                    Err(BridgeError::AlreadyRunning) => Ok(format!(
                        "The {} server is already running.",
                        flavor.display_name()
                    )),
                    // A failed launch leaves the process not-running;
                    // surface the cause as user text
                    Err(e) => Ok(format!(
                        "Failed to start the {} server: {e}",
                        flavor.display_name()
                    )),
                }
            }
            AdminCommand::StopServer => {
                let mut proc = self.process.lock().await;
                if !proc.is_running() {
                    return Ok(format!(
                        "The {} server is already shutdown.",
                        flavor.display_name()
                    ));
                }
                proc.write_line(flavor.stop_command()).await?;
                info!("graceful stop requested");
                Ok(format!(
                    "Shutdown {} server gracefully.",
                    flavor.display_name()
                ))
            }
            AdminCommand::KillServer => {
                self.process.lock().await.kill().await;
                Ok(format!(
                    "Shutdown {} server forcefully.",
                    flavor.display_name()
                ))
            }
        }
    }

    fn not_running_message(&self) -> String {
        format!(
            "{} server not running... start it with the \
             `{CMD_PREFIX}startserver` command and try again.",
            self.registry.flavor().display_name()
        )
    }
}
