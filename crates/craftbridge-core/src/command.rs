//! Administrative command table
//!
//! These commands control the bridge and the server lifecycle rather than
//! being forwarded to the server console. The table is static per
//! deployment; the registry validates at startup that every entry has a
//! handler.

use crate::flavor::ServerFlavor;

/// Prefix marking a chat message as a command for the bridge
pub const CMD_PREFIX: &str = "!";

/// One administrative command: name, argument shape, help text
#[derive(Debug, Clone, Copy)]
pub struct AdminCommandSpec {
    pub name: &'static str,
    pub args: &'static str,
    pub help: &'static str,
}

/// Administrative or maintenance commands, handled by the bridge itself
pub const ADMIN_COMMANDS: &[AdminCommandSpec] = &[
    AdminCommandSpec {
        name: "adduser",
        args: "user_name user_xuid_or_uuid",
        help: "Add a user to the server's allowlist. It's recommended to \
               instead use the server-level command for allowlist control, \
               it does not require a (x/u)uid.",
    },
    AdminCommandSpec {
        name: "changeprop",
        args: "property_name property_value",
        help: "Change a server property (server.properties).",
    },
    AdminCommandSpec {
        name: "killserver",
        args: "",
        help: "Force shutdown the Minecraft server.",
    },
    AdminCommandSpec {
        name: "listcommands",
        args: "[type (\"admin\", \"server\")]",
        help: "Lists commands accepted by this bridge.",
    },
    AdminCommandSpec {
        name: "rmuser",
        args: "user_name",
        help: "Remove a user from the server's allowlist.",
    },
    AdminCommandSpec {
        name: "showsettings",
        args: "[file (\"allowlist\", \"permissions\", \"properties\")]",
        help: "View a server settings file.",
    },
    AdminCommandSpec {
        name: "startserver",
        args: "",
        help: "Start the Minecraft server.",
    },
    AdminCommandSpec {
        name: "stopserver",
        args: "",
        help: "Gracefully shutdown the Minecraft server.",
    },
    AdminCommandSpec {
        name: "userrole",
        args: "user_xuid permission_name",
        help: "Change user permissions (permissions.json).",
    },
];

/// Render the administrative command help block
pub fn admin_commands_message() -> String {
    let entries: Vec<String> = ADMIN_COMMANDS
        .iter()
        .map(|spec| {
            let space = if spec.args.is_empty() { "" } else { " " };
            format!(
                "- `{CMD_PREFIX}{}{space}{}`\n  - {}",
                spec.name, spec.args, spec.help
            )
        })
        .collect();
    format!("**Administrative Commands**\n{}", entries.join("\n"))
}

/// Render the native command help block for a flavor
pub fn native_commands_message(flavor: ServerFlavor) -> String {
    let names: Vec<String> = flavor
        .native_commands()
        .iter()
        .map(|name| format!("`{CMD_PREFIX}{name}`"))
        .collect();
    format!(
        "**{} Server Commands**\n- {}",
        flavor.display_name(),
        names.join("\n- ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_table_names_unique() {
        let mut names: Vec<&str> = ADMIN_COMMANDS.iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ADMIN_COMMANDS.len());
    }

    #[test]
    fn test_admin_help_rendering() {
        let message = admin_commands_message();
        assert!(message.starts_with("**Administrative Commands**"));
        assert!(message.contains("`!adduser user_name user_xuid_or_uuid`"));
        // No trailing space for zero-arg commands
        assert!(message.contains("`!startserver`"));
    }

    #[test]
    fn test_native_help_rendering() {
        let message = native_commands_message(ServerFlavor::Bedrock);
        assert!(message.starts_with("**Bedrock Server Commands**"));
        assert!(message.contains("`!say`"));
    }
}
