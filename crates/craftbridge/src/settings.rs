//! Settings-file collaborator
//!
//! Whole-file text access to the server's allow-list, permissions, and
//! properties files. Everything is treated as an opaque blob except the
//! allow-list add/remove operations, which parse the JSON array. Records
//! are kept as JSON objects so per-flavor identity fields and unknown
//! keys round-trip untouched.

use craftbridge_core::{BridgeError, Result, ServerFlavor};
use std::path::{Path, PathBuf};
use tracing::info;

/// Read/write access to the server's settings files
#[derive(Debug)]
pub struct SettingsStore {
    server_dir: PathBuf,
    flavor: ServerFlavor,
}

impl SettingsStore {
    /// Create a store rooted at the server install directory.
    /// Fails fast if the directory does not exist.
    pub fn new(server_dir: impl Into<PathBuf>, flavor: ServerFlavor) -> Result<Self> {
        let server_dir = server_dir.into();
        if !server_dir.is_dir() {
            return Err(BridgeError::Settings(format!(
                "server directory does not exist: {}",
                server_dir.display()
            )));
        }
        Ok(Self { server_dir, flavor })
    }

    fn allowlist_path(&self) -> PathBuf {
        self.server_dir.join(self.flavor.allowlist_file())
    }

    /// Add a user to the allow-list. Duplicate names or identities are
    /// rejected and the file is left untouched.
    pub async fn add_user(&self, name: &str, id: &str) -> Result<String> {
        let path = self.allowlist_path();
        let mut entries = read_allowlist(&path).await?;
        let identity_field = self.flavor.identity_field();
        let duplicate = entries.iter().any(|entry| {
            entry.get("name").and_then(|v| v.as_str()) == Some(name)
                || entry.get(identity_field).and_then(|v| v.as_str()) == Some(id)
        });
        if duplicate {
            return Ok("New user appears to be a duplicate user.".into());
        }
        entries.push(self.flavor.allowlist_entry(name, id));
        tokio::fs::write(&path, serde_json::to_string(&entries)?).await?;
        info!(user = name, "added user to allowlist");
        Ok(format!("Added user {name} ({id}) to allowlist."))
    }

    /// Remove a user from the allow-list by name. When the user is
    /// absent the file's contents are left byte-for-byte unchanged.
    pub async fn remove_user(&self, name: &str) -> Result<String> {
        let path = self.allowlist_path();
        let entries = read_allowlist(&path).await?;
        let (kept, removed): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .partition(|entry| entry.get("name").and_then(|v| v.as_str()) != Some(name));
        if removed.is_empty() {
            return Ok(format!("User *\"{name}\"* does not appear in allowlist."));
        }
        tokio::fs::write(&path, serde_json::to_string(&kept)?).await?;
        info!(user = name, "removed user from allowlist");
        Ok(format!("Removed user {name} from allowlist."))
    }

    /// Render a named settings artifact's contents for chat
    pub async fn show(&self, target: &str) -> Result<String> {
        let path = match target {
            "allowlist" => self.allowlist_path(),
            "permissions" => self.server_dir.join("permissions.json"),
            "properties" => self.server_dir.join("server.properties"),
            other => {
                return Ok(format!("Unrecognised file identifier *\"{other}\"*."));
            }
        };
        let contents = tokio::fs::read_to_string(&path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(format!("**{file_name}**\n```{contents}```"))
    }
}

async fn read_allowlist(path: &Path) -> Result<Vec<serde_json::Value>> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&text)?)
}
