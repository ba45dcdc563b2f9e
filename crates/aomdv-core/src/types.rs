//! Newtype wrappers for addresses and interface handles.
//!
//! Routes, paths and precursors all identify nodes by the same fixed-width
//! address; the wrapper keeps them from being mixed up with other 4-byte
//! values such as netmasks or sequence numbers.

use core::fmt;
use core::str::FromStr;
use std::net::Ipv4Addr;

use crate::error::AddressParseError;

/// Byte slice of the wrong length for a fixed-width type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid length: expected {expected} bytes, got {actual}")]
pub struct InvalidLength {
    pub expected: usize,
    pub actual: usize,
}

/// A 4-byte IPv4 node address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[must_use]
pub struct Address(pub(crate) [u8; 4]);

impl Address {
    /// The unspecified address `0.0.0.0`.
    pub const ANY: Address = Address([0, 0, 0, 0]);
    /// `127.0.0.1`.
    pub const LOOPBACK: Address = Address([127, 0, 0, 1]);
    /// The limited broadcast address `255.255.255.255`.
    pub const BROADCAST: Address = Address([255, 255, 255, 255]);

    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub const fn octets(&self) -> [u8; 4] {
        self.0
    }

    pub const fn to_bits(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits.to_be_bytes())
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = InvalidLength;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; 4] = bytes.try_into().map_err(|_| InvalidLength {
            expected: 4,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }
}

impl From<Ipv4Addr> for Address {
    fn from(addr: Ipv4Addr) -> Self {
        Self(addr.octets())
    }
}

impl From<Address> for Ipv4Addr {
    fn from(addr: Address) -> Self {
        Ipv4Addr::from(addr.0)
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Ipv4Addr>()
            .map(Address::from)
            .map_err(|_| AddressParseError(s.to_string()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        // Padding and alignment flags apply to the whole dotted quad.
        f.pad(&format!("{a}.{b}.{c}.{d}"))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

/// Lightweight output-device identifier.
///
/// Never interpreted by the routing layer; only stored and compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InterfaceId(pub u64);

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "if{}", self.0)
    }
}

/// Address assignment of a local interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterfaceAddress {
    /// Address of this node on the interface.
    pub local: Address,
    /// Network mask of the attached subnet.
    pub mask: Address,
}

impl InterfaceAddress {
    pub const fn new(local: Address, mask: Address) -> Self {
        Self { local, mask }
    }

    /// Directed broadcast address of the attached subnet.
    pub const fn broadcast(&self) -> Address {
        Address::from_bits(self.local.to_bits() | !self.mask.to_bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display_dotted_quad() {
        assert_eq!(Address::new([10, 0, 0, 1]).to_string(), "10.0.0.1");
        assert_eq!(Address::BROADCAST.to_string(), "255.255.255.255");
    }

    #[test]
    fn test_address_display_honours_width() {
        assert_eq!(format!("{:<10}|", Address::new([1, 2, 3, 4])), "1.2.3.4   |");
    }

    #[test]
    fn test_address_debug() {
        assert_eq!(format!("{:?}", Address::LOOPBACK), "Address(127.0.0.1)");
    }

    #[test]
    fn test_address_from_str() {
        let addr: Address = "192.168.1.7".parse().unwrap();
        assert_eq!(addr.octets(), [192, 168, 1, 7]);

        let err = "192.168.1".parse::<Address>().unwrap_err();
        assert_eq!(err, AddressParseError("192.168.1".to_string()));
    }

    #[test]
    fn test_address_try_from_slice() {
        let addr = Address::try_from(&[10u8, 1, 2, 3][..]).unwrap();
        assert_eq!(addr, Address::new([10, 1, 2, 3]));

        let err = Address::try_from(&[1u8, 2, 3][..]).unwrap_err();
        assert_eq!(
            err,
            InvalidLength {
                expected: 4,
                actual: 3
            }
        );
        assert_eq!(err.to_string(), "invalid length: expected 4 bytes, got 3");
    }

    #[test]
    fn test_address_ipv4_conversion() {
        let ip = Ipv4Addr::new(172, 16, 0, 9);
        let addr = Address::from(ip);
        assert_eq!(Ipv4Addr::from(addr), ip);
    }

    #[test]
    fn test_address_ordering_follows_numeric_value() {
        let a = Address::new([10, 0, 0, 2]);
        let b = Address::new([10, 0, 1, 1]);
        assert!(a < b);
        assert_eq!(Address::from_bits(a.to_bits()), a);
    }

    #[test]
    fn test_interface_broadcast() {
        let iface = InterfaceAddress::new(
            Address::new([10, 1, 1, 5]),
            Address::new([255, 255, 255, 0]),
        );
        assert_eq!(iface.broadcast(), Address::new([10, 1, 1, 255]));
    }

    #[test]
    fn test_interface_id_display() {
        assert_eq!(InterfaceId(3).to_string(), "if3");
    }
}
