//! Addressing and time primitives for the AOMDV multipath routing core.
//!
//! This crate defines the network address newtype used as route-table key,
//! path endpoint and precursor identity, the opaque interface handles that
//! route entries carry, and the explicit time source the routing layer is
//! driven by.

pub mod error;
pub mod time;
pub mod types;

pub use error::AddressParseError;
pub use time::{Clock, ManualClock, MonotonicClock, Timestamp};
pub use types::{Address, InterfaceAddress, InterfaceId, InvalidLength};
