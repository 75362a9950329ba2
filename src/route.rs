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

//! The RIB's row type and the attributes a route carries between neighbors.

use serde::{Deserialize, Serialize};

use crate::prefix::IPv4Prefix;

/// How a route entered the routing system.
///
/// Ordered so that `Origin::Igp < Origin::Egp < Origin::Unknown`: the
/// selector keeps the *lowest* surviving class at its origin-type stage,
/// i.e. IGP beats EGP beats UNK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Origin {
    #[serde(rename = "IGP")]
    Igp,
    #[serde(rename = "EGP")]
    Egp,
    #[serde(rename = "UNK")]
    Unknown,
}

/// The commercial relationship a neighbor holds with this router, which
/// governs which routes the exporter will advertise to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeighborRelation {
    Customer,
    Peer,
    Provider,
}

impl NeighborRelation {
    /// Parses the `cust` / `peer` / `prov` tags used in neighbor-spec CLI
    /// arguments.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "cust" => Some(Self::Customer),
            "peer" => Some(Self::Peer),
            "prov" => Some(Self::Provider),
            _ => None,
        }
    }
}

/// A single routing table row: a prefix plus the path attributes it was
/// announced with and the neighbor it was learned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub prefix: IPv4Prefix,
    pub next_hop: String,
    pub local_pref: u32,
    pub self_origin: bool,
    pub as_path: Vec<u32>,
    pub origin: Origin,
}

impl RouteEntry {
    /// True iff two entries carry identical path attributes -- the
    /// condition (together with prefix adjacency and a shared next hop)
    /// under which the RIB may coalesce them into one wider entry.
    pub fn attributes_eq(&self, other: &Self) -> bool {
        self.next_hop == other.next_hop
            && self.local_pref == other.local_pref
            && self.self_origin == other.self_origin
            && self.as_path == other.as_path
            && self.origin == other.origin
    }

    /// Builds a copy of this entry rooted at a different (generally wider
    /// or narrower) prefix, keeping every path attribute. Used both when
    /// coalescing two siblings into their parent and when disaggregating a
    /// parent back into its recorded children.
    pub fn with_prefix(&self, prefix: IPv4Prefix) -> Self {
        Self {
            prefix,
            ..self.clone()
        }
    }
}
