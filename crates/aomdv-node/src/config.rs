//! TOML-based configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use aomdv_core::{Address, InterfaceAddress, InterfaceId};
use aomdv_routing::constants::{ACTIVE_ROUTE_TIMEOUT, BLACKLIST_TIMEOUT, DELETE_PERIOD};

use crate::error::NodeError;

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct NodeConfig {
    #[serde(default)]
    pub routing: RoutingSection,
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub interfaces: Vec<InterfaceEntry>,
}

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("failed to read config file: {e}")))?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s)
            .map_err(|e| NodeError::Config(format!("failed to parse config: {e}")))?;
        for iface in &config.interfaces {
            iface.address()?;
        }
        Ok(config)
    }

    /// Look up a configured interface by name.
    pub fn interface(&self, name: &str) -> Result<(InterfaceId, InterfaceAddress), NodeError> {
        let entry = self
            .interfaces
            .iter()
            .find(|i| i.name == name)
            .ok_or_else(|| NodeError::Config(format!("unknown interface: {name}")))?;
        Ok((InterfaceId(entry.id), entry.address()?))
    }
}

/// The `[routing]` section.
#[derive(Debug, Deserialize)]
pub struct RoutingSection {
    /// Grace window after a route is invalidated, in milliseconds.
    #[serde(default = "default_bad_link_lifetime_ms")]
    pub bad_link_lifetime_ms: u64,
    /// How long a unidirectional neighbor stays blacklisted, in milliseconds.
    #[serde(default = "default_blacklist_timeout_ms")]
    pub blacklist_timeout_ms: u64,
    /// Lifetime given to routes added without an explicit one, in milliseconds.
    #[serde(default = "default_active_route_timeout_ms")]
    pub active_route_timeout_ms: u64,
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn default_bad_link_lifetime_ms() -> u64 {
    duration_ms(DELETE_PERIOD)
}

fn default_blacklist_timeout_ms() -> u64 {
    duration_ms(BLACKLIST_TIMEOUT)
}

fn default_active_route_timeout_ms() -> u64 {
    duration_ms(ACTIVE_ROUTE_TIMEOUT)
}

impl RoutingSection {
    pub fn bad_link_lifetime(&self) -> Duration {
        Duration::from_millis(self.bad_link_lifetime_ms)
    }

    pub fn blacklist_timeout(&self) -> Duration {
        Duration::from_millis(self.blacklist_timeout_ms)
    }

    pub fn active_route_timeout(&self) -> Duration {
        Duration::from_millis(self.active_route_timeout_ms)
    }
}

impl Default for RoutingSection {
    fn default() -> Self {
        Self {
            bad_link_lifetime_ms: default_bad_link_lifetime_ms(),
            blacklist_timeout_ms: default_blacklist_timeout_ms(),
            active_route_timeout_ms: default_active_route_timeout_ms(),
        }
    }
}

/// The `[logging]` section.
#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// A `[[interfaces]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct InterfaceEntry {
    pub name: String,
    pub id: u64,
    pub local: String,
    #[serde(default = "default_mask")]
    pub mask: String,
}

fn default_mask() -> String {
    "255.255.255.0".to_string()
}

impl InterfaceEntry {
    /// Parse the local address and mask.
    pub fn address(&self) -> Result<InterfaceAddress, NodeError> {
        let parse = |s: &str| {
            s.parse::<Address>()
                .map_err(|e| NodeError::Config(format!("interface {}: {e}", self.name)))
        };
        Ok(InterfaceAddress::new(parse(&self.local)?, parse(&self.mask)?))
    }
}
