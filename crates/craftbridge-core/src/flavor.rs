//! Server flavor descriptions
//!
//! Bedrock and Java servers differ in binary name, launch arguments, line
//! terminator, native command vocabulary, and the identity field used by
//! their allow-list files. Everything flavor-specific lives here so the
//! bridge itself stays flavor-agnostic.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Native command names accepted by a Bedrock server's console.
///
/// Names only; the in-game `help` command documents each one.
pub const BEDROCK_COMMAND_NAMES: &[&str] = &[
    "?",
    "allowlist",
    "alwaysday",
    "camerashake",
    "changesetting",
    "clear",
    "clearspawnpoint",
    "clone",
    "connect",
    "damage",
    "daylock",
    "deop",
    "dialogue",
    "difficulty",
    "effect",
    "enchant",
    "event",
    "execute",
    "fill",
    "fog",
    "function",
    "gamemode",
    "gamerule",
    "gametest",
    "give",
    "help",
    "inputpermission",
    "kick",
    "kill",
    "list",
    "locate",
    "loot",
    "me",
    "mobevent",
    "msg",
    "music",
    "op",
    "ops",
    "particle",
    "permission",
    "playanimation",
    "playsound",
    "reload",
    "reloadconfig",
    "replaceitem",
    "ride",
    "save",
    "say",
    "schedule",
    "scoreboard",
    "script",
    "setblock",
    "setmaxplayers",
    "setworldspawn",
    "spawnpoint",
    "spreadplayers",
    "stop",
    "stopsound",
    "structure",
    "summon",
    "tag",
    "teleport",
    "tell",
    "tellraw",
    "testfor",
    "testforblock",
    "testforblocks",
    "tickingarea",
    "time",
    "title",
    "titleraw",
    "toggledownfall",
    "tp",
    "w",
    "weather",
    "whitelist",
    "wsserver",
    "xp",
];

/// Native command names accepted by a Java server's console.
pub const JAVA_COMMAND_NAMES: &[&str] = &[
    "advancement",
    "attribute",
    "execute",
    "bossbar",
    "clear",
    "clone",
    "damage",
    "data",
    "datapack",
    "debug",
    "defaultgamemode",
    "difficulty",
    "effect",
    "me",
    "enchant",
    "experience",
    "xp",
    "fill",
    "fillbiome",
    "forceload",
    "function",
    "gamemode",
    "gamerule",
    "give",
    "help",
    "item",
    "kick",
    "kill",
    "list",
    "locate",
    "loot",
    "msg",
    "tell",
    "w",
    "particle",
    "place",
    "playsound",
    "reload",
    "recipe",
    "return",
    "ride",
    "say",
    "schedule",
    "scoreboard",
    "seed",
    "setblock",
    "spawnpoint",
    "setworldspawn",
    "spectate",
    "spreadplayers",
    "stopsound",
    "summon",
    "tag",
    "team",
    "teammsg",
    "tm",
    "teleport",
    "tp",
    "tellraw",
    "time",
    "title",
    "trigger",
    "weather",
    "worldborder",
    "jfr",
    "ban-ip",
    "banlist",
    "ban",
    "deop",
    "op",
    "pardon",
    "pardon-ip",
    "perf",
    "save-all",
    "save-off",
    "save-on",
    "setidletimeout",
    "stop",
    "whitelist",
];

/// Memory bounds for the Java server's JVM, in megabytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRange {
    pub min_mb: u32,
    pub max_mb: u32,
}

impl Default for MemoryRange {
    fn default() -> Self {
        Self {
            min_mb: 1024,
            max_mb: 1024,
        }
    }
}

/// Everything needed to spawn the server process, assembled per flavor
/// and passed to the process handle as opaque data.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    /// Program to execute
    pub program: String,
    /// Argument vector
    pub args: Vec<String>,
    /// Working directory, the server install directory
    pub working_dir: PathBuf,
    /// Environment overrides applied on top of the inherited environment
    pub env: Vec<(String, String)>,
}

/// Supported server flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerFlavor {
    Bedrock,
    Java,
}

impl ServerFlavor {
    /// Human-readable flavor name, used in chat-facing messages
    pub fn display_name(self) -> &'static str {
        match self {
            ServerFlavor::Bedrock => "Bedrock",
            ServerFlavor::Java => "Java",
        }
    }

    /// Native command vocabulary for this flavor
    pub fn native_commands(self) -> &'static [&'static str] {
        match self {
            ServerFlavor::Bedrock => BEDROCK_COMMAND_NAMES,
            ServerFlavor::Java => JAVA_COMMAND_NAMES,
        }
    }

    /// Line terminator the server emits on its output stream
    pub fn line_terminator(self) -> &'static str {
        match self {
            ServerFlavor::Bedrock => "\r\n",
            ServerFlavor::Java => "\n",
        }
    }

    /// Native command that initiates a graceful shutdown
    pub fn stop_command(self) -> &'static str {
        "stop"
    }

    /// Identity field name in the allow-list records (xuid vs uuid)
    pub fn identity_field(self) -> &'static str {
        match self {
            ServerFlavor::Bedrock => "xuid",
            ServerFlavor::Java => "uuid",
        }
    }

    /// Allow-list file name inside the server install directory
    pub fn allowlist_file(self) -> &'static str {
        match self {
            ServerFlavor::Bedrock => "allowlist.json",
            ServerFlavor::Java => "whitelist.json",
        }
    }

    /// Build a new allow-list record in this flavor's schema
    pub fn allowlist_entry(self, name: &str, id: &str) -> serde_json::Value {
        match self {
            ServerFlavor::Bedrock => json!({
                "ignoresPlayerLimit": false,
                "name": name,
                "xuid": id,
            }),
            ServerFlavor::Java => json!({
                "uuid": id,
                "name": name,
            }),
        }
    }

    /// Assemble the launch command for this flavor.
    ///
    /// Bedrock ships its own shared libraries next to the binary, so the
    /// loader path must include the install directory.
    pub fn launch_spec(self, server_dir: &Path, memory: MemoryRange) -> LaunchSpec {
        match self {
            ServerFlavor::Bedrock => LaunchSpec {
                program: server_dir.join("bedrock_server").display().to_string(),
                args: vec![],
                working_dir: server_dir.to_path_buf(),
                env: vec![("LD_LIBRARY_PATH".into(), ".".into())],
            },
            ServerFlavor::Java => LaunchSpec {
                program: "java".into(),
                args: vec![
                    format!("-Xms{}M", memory.min_mb),
                    format!("-Xmx{}M", memory.max_mb),
                    "-jar".into(),
                    "server.jar".into(),
                    "nogui".into(),
                ],
                working_dir: server_dir.to_path_buf(),
                env: vec![],
            },
        }
    }
}

impl fmt::Display for ServerFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerFlavor::Bedrock => write!(f, "bedrock"),
            ServerFlavor::Java => write!(f, "java"),
        }
    }
}

impl FromStr for ServerFlavor {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bedrock" => Ok(ServerFlavor::Bedrock),
            "java" => Ok(ServerFlavor::Java),
            other => Err(format!("unknown server flavor: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabularies_overlap() {
        // Both flavors define these with flavor-local semantics
        for name in ["say", "stop", "execute", "kill"] {
            assert!(ServerFlavor::Bedrock.native_commands().contains(&name));
            assert!(ServerFlavor::Java.native_commands().contains(&name));
        }
    }

    #[test]
    fn test_terminators() {
        assert_eq!(ServerFlavor::Bedrock.line_terminator(), "\r\n");
        assert_eq!(ServerFlavor::Java.line_terminator(), "\n");
    }

    #[test]
    fn test_identity_fields() {
        assert_eq!(ServerFlavor::Bedrock.identity_field(), "xuid");
        assert_eq!(ServerFlavor::Java.identity_field(), "uuid");
    }

    #[test]
    fn test_java_launch_spec() {
        let memory = MemoryRange {
            min_mb: 2048,
            max_mb: 4096,
        };
        let spec = ServerFlavor::Java.launch_spec(Path::new("/srv/mc"), memory);
        assert_eq!(spec.program, "java");
        assert!(spec.args.contains(&"-Xms2048M".to_string()));
        assert!(spec.args.contains(&"-Xmx4096M".to_string()));
        assert!(spec.env.is_empty());
    }

    #[test]
    fn test_bedrock_launch_spec_env() {
        let spec = ServerFlavor::Bedrock.launch_spec(Path::new("/srv/mc"), MemoryRange::default());
        assert!(spec.program.ends_with("bedrock_server"));
        assert_eq!(spec.env, vec![("LD_LIBRARY_PATH".to_string(), ".".to_string())]);
    }

    #[test]
    fn test_allowlist_entry_schema() {
        let bedrock = ServerFlavor::Bedrock.allowlist_entry("alice", "123");
        assert_eq!(bedrock["xuid"], "123");
        assert_eq!(bedrock["ignoresPlayerLimit"], false);

        let java = ServerFlavor::Java.allowlist_entry("alice", "abc-def");
        assert_eq!(java["uuid"], "abc-def");
        assert!(java.get("ignoresPlayerLimit").is_none());
    }

    #[test]
    fn test_flavor_from_str() {
        assert_eq!("bedrock".parse::<ServerFlavor>().unwrap(), ServerFlavor::Bedrock);
        assert_eq!("Java".parse::<ServerFlavor>().unwrap(), ServerFlavor::Java);
        assert!("forge".parse::<ServerFlavor>().is_err());
    }
}
