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

//! Parses and validates the CLI invocation into a [`RouterConfig`] before
//! the event loop starts. A malformed invocation is a configuration error:
//! reported on stderr and the process exits nonzero without ever touching
//! a neighbor socket.

use std::collections::HashMap;

use clap::Parser;

use crate::error::ConfigError;
use crate::route::NeighborRelation;

/// `<program> <asn> <neighbor-spec>...`
#[derive(Debug, Parser)]
#[command(name = "bgpctl", about = "A simplified BGP-like interdomain router")]
struct Cli {
    /// This router's autonomous system number.
    asn: String,
    /// One `<endpoint>-<relation>` entry per neighbor, relation in
    /// {cust, peer, prov}.
    neighbors: Vec<String>,
}

/// The parsed, validated router configuration: local ASN plus the map of
/// neighbor endpoint to commercial relation. Immutable once the event loop
/// starts.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub local_asn: u32,
    pub relations: HashMap<String, NeighborRelation>,
}

impl RouterConfig {
    /// Parses `std::env::args()`, matching the CLI's
    /// `<program> <asn> <neighbor-spec>...` shape.
    pub fn from_args() -> Result<Self, ConfigError> {
        let cli = Cli::parse();
        Self::from_parts(&cli.asn, &cli.neighbors)
    }

    /// Validates an already-split ASN and neighbor-spec list. Exposed
    /// separately from [`Self::from_args`] so tests don't need to go
    /// through process argv.
    pub fn from_parts(asn: &str, neighbor_specs: &[String]) -> Result<Self, ConfigError> {
        let local_asn: u32 = asn
            .parse()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ConfigError::InvalidAsn(asn.to_string()))?;

        let mut relations = HashMap::new();
        for spec in neighbor_specs {
            let (endpoint, tag) = spec
                .rsplit_once('-')
                .ok_or_else(|| ConfigError::MalformedNeighborSpec(spec.clone()))?;
            if endpoint.is_empty() {
                return Err(ConfigError::MalformedNeighborSpec(spec.clone()));
            }
            let relation = NeighborRelation::from_tag(tag)
                .ok_or_else(|| ConfigError::UnknownRelation(tag.to_string()))?;
            if relations.insert(endpoint.to_string(), relation).is_some() {
                return Err(ConfigError::DuplicateNeighbor(endpoint.to_string()));
            }
        }
        if relations.is_empty() {
            return Err(ConfigError::NoNeighbors);
        }

        Ok(Self {
            local_asn,
            relations,
        })
    }

    /// The configured neighbor endpoints, in no particular order.
    pub fn endpoints(&self) -> Vec<String> {
        self.relations.keys().cloned().collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn specs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_valid_neighbor_specs() {
        let cfg = RouterConfig::from_parts(
            "65001",
            &specs(&["192.168.0.2-cust", "192.168.0.3-peer", "192.168.0.4-prov"]),
        )
        .unwrap();
        assert_eq!(cfg.local_asn, 65001);
        assert_eq!(
            cfg.relations.get("192.168.0.2"),
            Some(&NeighborRelation::Customer)
        );
        assert_eq!(
            cfg.relations.get("192.168.0.3"),
            Some(&NeighborRelation::Peer)
        );
        assert_eq!(
            cfg.relations.get("192.168.0.4"),
            Some(&NeighborRelation::Provider)
        );
    }

    #[test]
    fn rejects_non_positive_asn() {
        assert_eq!(
            RouterConfig::from_parts("0", &specs(&["192.168.0.2-cust"])).unwrap_err(),
            ConfigError::InvalidAsn("0".to_string())
        );
        assert!(RouterConfig::from_parts("-1", &specs(&["192.168.0.2-cust"])).is_err());
        assert!(RouterConfig::from_parts("abc", &specs(&["192.168.0.2-cust"])).is_err());
    }

    #[test]
    fn rejects_unknown_relation_tag() {
        assert_eq!(
            RouterConfig::from_parts("1", &specs(&["192.168.0.2-enemy"])).unwrap_err(),
            ConfigError::UnknownRelation("enemy".to_string())
        );
    }

    #[test]
    fn rejects_malformed_spec_without_separator() {
        assert!(RouterConfig::from_parts("1", &specs(&["192.168.0.2"])).is_err());
    }

    #[test]
    fn rejects_duplicate_neighbor() {
        assert_eq!(
            RouterConfig::from_parts("1", &specs(&["192.168.0.2-cust", "192.168.0.2-peer"]))
                .unwrap_err(),
            ConfigError::DuplicateNeighbor("192.168.0.2".to_string())
        );
    }

    #[test]
    fn rejects_empty_neighbor_list() {
        assert_eq!(
            RouterConfig::from_parts("1", &specs(&[])).unwrap_err(),
            ConfigError::NoNeighbors
        );
    }
}
