//! Command registry
//!
//! Combines the static administrative table with the flavor's native
//! vocabulary. The admin-name-to-handler mapping is explicit and checked
//! for completeness at construction, so a table entry without a handler
//! fails at startup rather than at first use.

use craftbridge_core::{ADMIN_COMMANDS, BridgeError, Result, ServerFlavor};
use std::collections::{HashMap, HashSet};

/// Handler references for the administrative commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    ListCommands,
    AddUser,
    RemoveUser,
    UserRole,
    ChangeProp,
    ShowSettings,
    StartServer,
    StopServer,
    KillServer,
}

impl AdminCommand {
    /// Resolve a table name to its handler reference
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "listcommands" => Some(Self::ListCommands),
            "adduser" => Some(Self::AddUser),
            "rmuser" => Some(Self::RemoveUser),
            "userrole" => Some(Self::UserRole),
            "changeprop" => Some(Self::ChangeProp),
            "showsettings" => Some(Self::ShowSettings),
            "startserver" => Some(Self::StartServer),
            "stopserver" => Some(Self::StopServer),
            "killserver" => Some(Self::KillServer),
            _ => None,
        }
    }
}

/// How a recognized command name is routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Handled by the bridge itself
    Admin(AdminCommand),
    /// Forwarded verbatim to the server console
    Native,
}

/// Registry of every command name the bridge recognizes
pub struct CommandRegistry {
    flavor: ServerFlavor,
    admin: HashMap<&'static str, AdminCommand>,
    native: HashSet<&'static str>,
}

impl CommandRegistry {
    /// Build the registry for a flavor, validating eagerly that every
    /// administrative table entry resolves to a handler.
    pub fn new(flavor: ServerFlavor) -> Result<Self> {
        let mut admin = HashMap::with_capacity(ADMIN_COMMANDS.len());
        for spec in ADMIN_COMMANDS {
            let handler = AdminCommand::from_name(spec.name).ok_or_else(|| {
                BridgeError::HandlerFault(format!(
                    "admin command `{}` has no handler",
                    spec.name
                ))
            })?;
            admin.insert(spec.name, handler);
        }
        let native = flavor.native_commands().iter().copied().collect();
        Ok(Self {
            flavor,
            admin,
            native,
        })
    }

    /// Route a command name, or fail with `InvalidCommand` when the
    /// name is absent from both registries. The admin and native name
    /// sets are disjoint, so lookup order is not observable.
    pub fn lookup(&self, name: &str) -> Result<CommandKind> {
        if let Some(&handler) = self.admin.get(name) {
            return Ok(CommandKind::Admin(handler));
        }
        if self.native.contains(name) {
            return Ok(CommandKind::Native);
        }
        Err(BridgeError::InvalidCommand(name.into()))
    }

    pub fn flavor(&self) -> ServerFlavor {
        self.flavor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completeness_both_flavors() {
        assert!(CommandRegistry::new(ServerFlavor::Bedrock).is_ok());
        assert!(CommandRegistry::new(ServerFlavor::Java).is_ok());
    }

    #[test]
    fn test_lookup_routes() {
        let registry = CommandRegistry::new(ServerFlavor::Bedrock).unwrap();
        assert_eq!(
            registry.lookup("startserver").unwrap(),
            CommandKind::Admin(AdminCommand::StartServer)
        );
        assert_eq!(registry.lookup("say").unwrap(), CommandKind::Native);
        assert!(matches!(
            registry.lookup("frobnicate"),
            Err(BridgeError::InvalidCommand(name)) if name == "frobnicate"
        ));
    }

    #[test]
    fn test_flavor_vocabulary_is_registered() {
        let bedrock = CommandRegistry::new(ServerFlavor::Bedrock).unwrap();
        assert_eq!(bedrock.lookup("wsserver").unwrap(), CommandKind::Native);
        assert!(bedrock.lookup("seed").is_err());

        let java = CommandRegistry::new(ServerFlavor::Java).unwrap();
        assert_eq!(java.lookup("seed").unwrap(), CommandKind::Native);
        assert!(java.lookup("wsserver").is_err());
    }
}
