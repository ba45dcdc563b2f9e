//! Timed scenario replay against a route table.
//!
//! A scenario is a TOML list of `[[steps]]`, each stamped with an absolute
//! time in milliseconds. The runner advances a [`ManualClock`] to each
//! step's time and applies the operation, so expiry behaves exactly as it
//! would under a discrete-event scheduler.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use aomdv_core::{Address, AddressParseError, Clock, ManualClock, Timestamp};
use aomdv_routing::{RouteEntry, RouteError, RouteFlag, RoutingTable};

use crate::config::NodeConfig;
use crate::error::NodeError;

/// A parsed scenario file.
#[derive(Debug, Default, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Scenario(format!("failed to read scenario file: {e}")))?;
        Self::parse(&content)
    }

    pub fn parse(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Scenario(format!("failed to parse scenario: {e}")))
    }
}

/// One `[[steps]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// Absolute time of the step, in milliseconds.
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

/// Operation applied by a step, selected by its `op` key.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
    AddRoute {
        destination: String,
        next_hop: String,
        interface: String,
        #[serde(default = "default_hops")]
        hops: u16,
        seq_no: Option<u32>,
        lifetime_ms: Option<u64>,
        #[serde(default)]
        in_search: bool,
    },
    InsertPath {
        destination: String,
        next_hop: String,
        last_hop: String,
        #[serde(default = "default_hops")]
        hops: u16,
        lifetime_ms: Option<u64>,
        /// Only admit the path if it shares no endpoint with existing ones.
        #[serde(default = "default_true")]
        disjoint_only: bool,
    },
    UpdateHops {
        destination: String,
        hops: u16,
    },
    SetState {
        destination: String,
        state: StateName,
    },
    DeleteRoute {
        destination: String,
    },
    RemoveNextHop {
        next_hop: String,
    },
    InterfaceDown {
        interface: String,
    },
    MarkUnidirectional {
        neighbor: String,
        timeout_ms: Option<u64>,
    },
    Purge,
    Lookup {
        destination: String,
    },
    Print,
}

fn default_hops() -> u16 {
    1
}

fn default_true() -> bool {
    true
}

/// Route state as written in scenario files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateName {
    Valid,
    Invalid,
    InSearch,
}

impl From<StateName> for RouteFlag {
    fn from(state: StateName) -> Self {
        match state {
            StateName::Valid => RouteFlag::Valid,
            StateName::Invalid => RouteFlag::Invalid,
            StateName::InSearch => RouteFlag::InSearch,
        }
    }
}

fn parse_addr(s: &str) -> Result<Address, NodeError> {
    s.parse()
        .map_err(|e: AddressParseError| NodeError::Scenario(e.to_string()))
}

/// Replays scenarios against a single route table.
pub struct ScenarioRunner<'a> {
    config: &'a NodeConfig,
    clock: ManualClock,
    table: RoutingTable,
}

impl<'a> ScenarioRunner<'a> {
    pub fn new(config: &'a NodeConfig) -> Self {
        Self {
            config,
            clock: ManualClock::new(Timestamp::ZERO),
            table: RoutingTable::new(config.routing.bad_link_lifetime()),
        }
    }

    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Apply every step in order, writing results to `out`.
    ///
    /// Stops at the first failing step.
    pub fn run<W: Write>(&mut self, scenario: &Scenario, out: &mut W) -> Result<(), NodeError> {
        tracing::info!(steps = scenario.steps.len(), "replaying scenario");
        for (i, step) in scenario.steps.iter().enumerate() {
            let at = Timestamp::from_millis(step.at_ms);
            if at < self.clock.now() {
                return Err(NodeError::Scenario(format!(
                    "step {i}: time {at} is before previous step at {}",
                    self.clock.now()
                )));
            }
            self.clock.set(at);
            self.apply(&step.action, out)?;
        }
        tracing::info!(routes = self.table.len(), "scenario finished");
        Ok(())
    }

    fn apply<W: Write>(&mut self, action: &Action, out: &mut W) -> Result<(), NodeError> {
        let now = self.clock.now();
        match action {
            Action::AddRoute {
                destination,
                next_hop,
                interface,
                hops,
                seq_no,
                lifetime_ms,
                in_search,
            } => {
                let dst = parse_addr(destination)?;
                let (device, iface) = self.config.interface(interface)?;
                let lifetime = lifetime_ms
                    .map(Duration::from_millis)
                    .unwrap_or(self.config.routing.active_route_timeout());
                let mut entry = RouteEntry::new(
                    device,
                    dst,
                    seq_no.is_some(),
                    seq_no.unwrap_or(0),
                    iface,
                    *hops,
                    parse_addr(next_hop)?,
                    lifetime,
                    now,
                );
                if *in_search {
                    entry.set_flag(RouteFlag::InSearch);
                }
                if self.table.add_route(entry, now) {
                    writeln!(out, "[{now}] added route to {dst}")?;
                } else {
                    tracing::warn!(%dst, "route already exists, add ignored");
                    writeln!(out, "[{now}] route to {dst} already exists")?;
                }
            }
            Action::InsertPath {
                destination,
                next_hop,
                last_hop,
                hops,
                lifetime_ms,
                disjoint_only,
            } => {
                let dst = parse_addr(destination)?;
                let (next_hop, last_hop) = (parse_addr(next_hop)?, parse_addr(last_hop)?);
                let mut entry = self
                    .table
                    .lookup(dst, now)
                    .ok_or(RouteError::NoRoute(dst))?;
                if *disjoint_only && !entry.paths().is_new_disjoint(next_hop, last_hop) {
                    writeln!(
                        out,
                        "[{now}] path to {dst} via {next_hop}/{last_hop} rejected: not disjoint"
                    )?;
                    return Ok(());
                }
                let lifetime = lifetime_ms
                    .map(Duration::from_millis)
                    .unwrap_or(self.config.routing.active_route_timeout());
                let expires = now + lifetime;
                entry.paths_mut().insert(next_hop, *hops, expires, last_hop);
                // A route lives at least as long as any of its paths.
                if expires > entry.lifetime() {
                    entry.set_lifetime(lifetime, now);
                }
                let count = entry.path_count();
                self.table.update(entry)?;
                writeln!(out, "[{now}] path to {dst} via {next_hop} added ({count} paths)")?;
            }
            Action::UpdateHops { destination, hops } => {
                let dst = parse_addr(destination)?;
                let mut entry = self
                    .table
                    .lookup(dst, now)
                    .ok_or(RouteError::NoRoute(dst))?;
                entry.set_hops(*hops);
                self.table.update(entry)?;
                writeln!(out, "[{now}] route to {dst} now {hops} hops")?;
            }
            Action::SetState { destination, state } => {
                let dst = parse_addr(destination)?;
                let flag = RouteFlag::from(*state);
                self.table.set_entry_state(dst, flag)?;
                writeln!(out, "[{now}] route to {dst} set {flag}")?;
            }
            Action::DeleteRoute { destination } => {
                let dst = parse_addr(destination)?;
                if self.table.delete_route(dst, now) {
                    writeln!(out, "[{now}] deleted route to {dst}")?;
                } else {
                    writeln!(out, "[{now}] no route to {dst} to delete")?;
                }
            }
            Action::RemoveNextHop { next_hop } => {
                let next_hop = parse_addr(next_hop)?;
                let report = self.table.remove_next_hop(next_hop, now);
                writeln!(
                    out,
                    "[{now}] neighbor {next_hop} lost: {} destinations affected",
                    report.len()
                )?;
                for pruned in &report {
                    writeln!(
                        out,
                        "  {} removed={} remaining={} seq={}",
                        pruned.destination, pruned.removed, pruned.remaining, pruned.seq_no
                    )?;
                }
            }
            Action::InterfaceDown { interface } => {
                let (_, iface) = self.config.interface(interface)?;
                let removed = self.table.delete_all_routes_from_interface(&iface);
                writeln!(out, "[{now}] interface {interface} down: {removed} routes removed")?;
            }
            Action::MarkUnidirectional {
                neighbor,
                timeout_ms,
            } => {
                let neighbor = parse_addr(neighbor)?;
                let timeout = timeout_ms
                    .map(Duration::from_millis)
                    .unwrap_or(self.config.routing.blacklist_timeout());
                let until = now + timeout;
                self.table.mark_link_as_unidirectional(neighbor, until)?;
                writeln!(out, "[{now}] {neighbor} blacklisted until {until}")?;
            }
            Action::Purge => {
                let removed = self.table.purge(now);
                writeln!(out, "[{now}] purge: {removed} routes removed")?;
            }
            Action::Lookup { destination } => {
                let dst = parse_addr(destination)?;
                let Some(entry) = self.table.lookup(dst, now) else {
                    writeln!(out, "[{now}] {dst}: no route")?;
                    return Ok(());
                };
                writeln!(
                    out,
                    "[{now}] {dst}: {} via {} hops={} paths={}",
                    entry.flag(),
                    entry.next_hop(),
                    entry.hops(),
                    entry.path_count()
                )?;
                for path in entry.paths() {
                    writeln!(
                        out,
                        "  {}/{}/{} expires {}",
                        path.next_hop, path.hop_count, path.last_hop, path.expires
                    )?;
                }
            }
            Action::Print => {
                write!(out, "{}", self.table.render(now))?;
            }
        }
        Ok(())
    }
}
