use serde::Deserialize;

use crate::constants::MAX_PORT_PILLS;

/// One process as reported by the server in a single snapshot.
/// Immutable once received; the next snapshot replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct ProcessRecord {
    pub pid: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cpu_percent: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub memory_rss: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub ports: Vec<PortBinding>,
    #[serde(deserialize_with = "null_as_default")]
    pub cmdline: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub nice: i32,

    // ── Detail fields (shown in the detail popup only) ────────
    pub ppid: Option<u32>,
    pub exe: Option<String>,
    pub status: Option<String>,
    pub create_time_iso: Option<String>,
    pub open_files_count: Option<u32>,
}

/// A network endpoint bound by a process.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct PortBinding {
    /// `ip:port` of the local side. The server may send null for sockets
    /// without a local address; that deserializes to an empty string.
    #[serde(deserialize_with = "null_as_default")]
    pub local: String,
    pub remote: Option<String>,
    pub status: Option<String>,
}

/// Servers send `null` where a value is unknown; treat it like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The body of one successful read: the complete ordered process list.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Snapshot {
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<ProcessRecord>,
    /// Server-reported count (informational, `items.len()` is authoritative).
    pub count: Option<usize>,
}

impl ProcessRecord {
    /// Command line joined with single spaces, as typed on a shell.
    pub fn command_line(&self) -> String {
        crate::utils::join_cmdline(&self.cmdline)
    }

    /// Bindings shown inline, at most [`MAX_PORT_PILLS`].
    pub fn visible_ports(&self) -> &[PortBinding] {
        &self.ports[..self.ports.len().min(MAX_PORT_PILLS)]
    }

    /// Number of bindings hidden behind the overflow badge.
    pub fn hidden_port_count(&self) -> usize {
        self.ports.len().saturating_sub(MAX_PORT_PILLS)
    }
}
