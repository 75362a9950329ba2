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

//! Relationship-based export policy: decides which neighbors should hear
//! about a given announcement or revocation, and rewrites the AS path on
//! the way out.

use std::collections::HashMap;

use crate::route::NeighborRelation;

/// The neighbors that should receive a message learned from `source`,
/// given the configured commercial relationships. A customer route may be
/// re-advertised anywhere; a peer or provider route may only be
/// re-advertised to customers.
pub fn export_targets(
    source: &str,
    neighbors: impl Iterator<Item = String>,
    relations: &HashMap<String, NeighborRelation>,
) -> Vec<String> {
    let from_customer = relations.get(source) == Some(&NeighborRelation::Customer);
    neighbors
        .filter(|n| n != source)
        .filter(|n| from_customer || relations.get(n) == Some(&NeighborRelation::Customer))
        .collect()
}

/// Prepends the local ASN to an AS path, the conventional BGP export
/// direction. Path *length* is unaffected by the choice of end, so the
/// selector's shortest-AS-path tie-break is unaffected by it too.
pub fn prepend_local_asn(as_path: &[u32], local_asn: u32) -> Vec<u32> {
    let mut out = Vec::with_capacity(as_path.len() + 1);
    out.push(local_asn);
    out.extend_from_slice(as_path);
    out
}

#[cfg(test)]
mod test {
    use super::*;

    fn relations(pairs: &[(&str, NeighborRelation)]) -> HashMap<String, NeighborRelation> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn customer_route_goes_everywhere_but_back() {
        let rel = relations(&[
            ("a", NeighborRelation::Customer),
            ("b", NeighborRelation::Peer),
            ("c", NeighborRelation::Provider),
        ]);
        let mut targets = export_targets(
            "a",
            ["a", "b", "c"].into_iter().map(String::from),
            &rel,
        );
        targets.sort();
        assert_eq!(targets, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn peer_route_only_goes_to_customers() {
        let rel = relations(&[
            ("a", NeighborRelation::Peer),
            ("b", NeighborRelation::Customer),
            ("c", NeighborRelation::Peer),
            ("d", NeighborRelation::Provider),
        ]);
        let targets = export_targets(
            "a",
            ["a", "b", "c", "d"].into_iter().map(String::from),
            &rel,
        );
        assert_eq!(targets, vec!["b".to_string()]);
    }

    #[test]
    fn as_path_is_prepended_not_appended() {
        let out = prepend_local_asn(&[65002, 65003], 65001);
        assert_eq!(out, vec![65001, 65002, 65003]);
    }
}
