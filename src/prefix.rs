// bgpctl: a simplified BGP-like interdomain routing control plane
// Copyright 2026 The bgpctl Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Pure arithmetic over IPv4 prefixes: dotted-quad <-> 32-bit integer
// conversions, CIDR mask handling, numeric ordering, and the adjacency
// test used by the RIB's coalescing pass.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A malformed dotted-quad address or prefix-length string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrefixParseError {
    #[error("malformed dotted-quad address: {0}")]
    BadAddress(String),
    #[error("mask length {0} out of range 0..=32")]
    BadMaskLength(u32),
    #[error("mask {0:#010x} is not a contiguous high-order mask")]
    NonCanonicalMask(u32),
}

/// Parses a dotted-quad IPv4 address ("10.0.0.1") into its 32-bit
/// big-endian numeric form.
pub fn parse_dotted(s: &str) -> Result<u32, PrefixParseError> {
    let mut octets = [0u8; 4];
    let mut parts = s.split('.');
    for octet in &mut octets {
        let part = parts
            .next()
            .ok_or_else(|| PrefixParseError::BadAddress(s.to_string()))?;
        *octet = part
            .parse::<u8>()
            .map_err(|_| PrefixParseError::BadAddress(s.to_string()))?;
    }
    if parts.next().is_some() {
        return Err(PrefixParseError::BadAddress(s.to_string()));
    }
    Ok(u32::from_be_bytes(octets))
}

/// Formats a 32-bit address back into dotted-quad notation.
pub fn format_dotted(addr: u32) -> String {
    let [a, b, c, d] = addr.to_be_bytes();
    format!("{a}.{b}.{c}.{d}")
}

/// Converts a canonical (contiguous high-order bits) dotted-quad netmask
/// into a CIDR length. Masks are expected to already be canonical; this is
/// not meant to validate attacker-controlled input, only well-formed
/// configuration and wire data.
pub fn mask_to_length(mask: u32) -> Result<u8, PrefixParseError> {
    let ones = mask.leading_ones();
    let reconstructed = length_to_mask(ones as u8);
    if reconstructed != mask {
        return Err(PrefixParseError::NonCanonicalMask(mask));
    }
    Ok(ones as u8)
}

/// Converts a CIDR length into its dotted-quad netmask form.
pub fn length_to_mask(len: u8) -> u32 {
    if len == 0 {
        0
    } else {
        u32::MAX << (32 - len as u32)
    }
}

/// Strict numeric ordering of two addresses in their 32-bit form.
pub fn lt(a: u32, b: u32) -> bool {
    a < b
}

/// The address this router presents to `neighbor`: the neighbor's address
/// with its last octet replaced by `1`, the convention the simulated
/// point-to-point links use for the local side.
pub fn local_facing_address(neighbor: &str) -> Result<String, PrefixParseError> {
    let addr = parse_dotted(neighbor)?;
    let local = (addr & 0xFFFF_FF00) | 1;
    Ok(format_dotted(local))
}

/// An IPv4 network prefix in canonical form: every bit below the mask
/// length is zero.
#[derive(Debug, Clone, Copy, Eq, Hash)]
pub struct IPv4Prefix {
    network: u32,
    length: u8,
}

impl IPv4Prefix {
    /// Builds a prefix from a raw network address and length, clearing any
    /// bits below the mask to bring it into canonical form.
    pub fn new(network: u32, length: u8) -> Result<Self, PrefixParseError> {
        if length > 32 {
            return Err(PrefixParseError::BadMaskLength(length as u32));
        }
        let mask = length_to_mask(length);
        Ok(Self {
            network: network & mask,
            length,
        })
    }

    /// Parses `(network, netmask)` dotted-quad strings as carried on the
    /// wire.
    pub fn from_dotted(network: &str, netmask: &str) -> Result<Self, PrefixParseError> {
        let network = parse_dotted(network)?;
        let mask = parse_dotted(netmask)?;
        let length = mask_to_length(mask)?;
        Self::new(network, length)
    }

    /// Parses CLI-style `a.b.c.d/len` notation.
    pub fn from_cidr(s: &str) -> Result<Self, PrefixParseError> {
        let (addr, len) = s
            .split_once('/')
            .ok_or_else(|| PrefixParseError::BadAddress(s.to_string()))?;
        let network = parse_dotted(addr)?;
        let length: u8 = len
            .parse()
            .map_err(|_| PrefixParseError::BadAddress(s.to_string()))?;
        Self::new(network, length)
    }

    /// The canonical network address, as a 32-bit integer.
    pub fn network(&self) -> u32 {
        self.network
    }

    /// The CIDR mask length, 0..=32.
    pub fn length(&self) -> u8 {
        self.length
    }

    /// The dotted-quad netmask corresponding to this prefix's length.
    pub fn netmask(&self) -> u32 {
        length_to_mask(self.length)
    }

    /// Dotted-quad network address.
    pub fn network_dotted(&self) -> String {
        format_dotted(self.network)
    }

    /// Dotted-quad netmask.
    pub fn netmask_dotted(&self) -> String {
        format_dotted(self.netmask())
    }

    /// True iff this prefix covers the given address.
    pub fn covers(&self, addr: u32) -> bool {
        (addr & self.netmask()) == self.network
    }

    /// True iff `self` and `other` are equal-length siblings that differ in
    /// exactly the single bit their shared parent does not fix -- i.e.
    /// merging them produces one prefix one bit shorter. Computed with
    /// integer XOR over the full 32-bit address, never per-octet.
    pub fn adjacent(&self, other: &Self) -> bool {
        if self.length != other.length || self.length == 0 {
            return false;
        }
        let sibling_bit = 1u32 << (32 - self.length as u32);
        (self.network ^ other.network) == sibling_bit
    }

    /// The single prefix one bit shorter that covers both `self` and
    /// `other`, if the two are adjacent siblings.
    pub fn merge(&self, other: &Self) -> Option<Self> {
        if !self.adjacent(other) {
            return None;
        }
        let parent_len = self.length - 1;
        Self::new(self.network, parent_len).ok()
    }

    /// Splits this prefix into its two one-bit-longer children.
    pub fn split(&self) -> Option<(Self, Self)> {
        if self.length == 32 {
            return None;
        }
        let child_len = self.length + 1;
        let sibling_bit = 1u32 << (32 - child_len as u32);
        let low = Self::new(self.network, child_len).ok()?;
        let high = Self::new(self.network | sibling_bit, child_len).ok()?;
        Some((low, high))
    }
}

impl fmt::Display for IPv4Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network_dotted(), self.length)
    }
}

impl FromStr for IPv4Prefix {
    type Err = PrefixParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_cidr(s)
    }
}

impl PartialEq for IPv4Prefix {
    fn eq(&self, other: &Self) -> bool {
        self.network == other.network && self.length == other.length
    }
}

impl PartialOrd for IPv4Prefix {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IPv4Prefix {
    fn cmp(&self, other: &Self) -> Ordering {
        self.network
            .cmp(&other.network)
            .then_with(|| self.length.cmp(&other.length))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dotted_round_trip() {
        for addr in [0u32, 1, 0xFFFF_FFFF, 0x0A00_0001, 0xC0A8_0001] {
            assert_eq!(parse_dotted(&format_dotted(addr)).unwrap(), addr);
        }
    }

    #[test]
    fn mask_length_round_trip() {
        for len in 0u8..=32 {
            assert_eq!(mask_to_length(length_to_mask(len)).unwrap(), len);
        }
    }

    #[test]
    fn non_canonical_mask_rejected() {
        assert!(mask_to_length(0x0000_00FF).is_err());
    }

    #[test]
    fn boundary_prefixes() {
        let default_route = IPv4Prefix::new(0, 0).unwrap();
        assert!(default_route.covers(parse_dotted("8.8.8.8").unwrap()));
        let host = IPv4Prefix::new(parse_dotted("10.0.0.1").unwrap(), 32).unwrap();
        assert!(host.covers(parse_dotted("10.0.0.1").unwrap()));
        assert!(!host.covers(parse_dotted("10.0.0.2").unwrap()));
    }

    #[test]
    fn adjacency_across_octet_boundary() {
        let a = IPv4Prefix::from_cidr("10.0.255.0/24").unwrap();
        let b = IPv4Prefix::from_cidr("10.1.0.0/24").unwrap();
        assert!(!a.adjacent(&b));

        let c = IPv4Prefix::from_cidr("10.0.0.0/24").unwrap();
        let d = IPv4Prefix::from_cidr("10.0.1.0/24").unwrap();
        assert!(c.adjacent(&d));
        assert_eq!(c.merge(&d).unwrap(), IPv4Prefix::from_cidr("10.0.0.0/23").unwrap());
    }

    #[test]
    fn local_facing_address_replaces_last_octet() {
        assert_eq!(local_facing_address("192.168.0.2").unwrap(), "192.168.0.1");
    }

    #[test]
    fn split_is_inverse_of_merge() {
        let parent = IPv4Prefix::from_cidr("10.0.0.0/23").unwrap();
        let (low, high) = parent.split().unwrap();
        assert_eq!(low, IPv4Prefix::from_cidr("10.0.0.0/24").unwrap());
        assert_eq!(high, IPv4Prefix::from_cidr("10.0.1.0/24").unwrap());
        assert_eq!(low.merge(&high).unwrap(), parent);
    }
}
