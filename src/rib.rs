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

//! The routing information base: the live table of routes plus the
//! append-only ledger of aggregations that lets a later withdrawal
//! disaggregate a previously coalesced entry.

use std::collections::HashMap;

use crate::prefix::{length_to_mask, IPv4Prefix};
use crate::route::RouteEntry;

/// Records that two sibling entries were merged into one wider `parent`
/// entry. The ledger never forgets a merge even after it has been undone,
/// matching the append-only history this router keeps for its own process
/// lifetime.
#[derive(Debug, Clone)]
pub struct AggregationRecord {
    /// The numerically lower-addressed constituent.
    pub a: RouteEntry,
    /// The numerically higher-addressed constituent.
    pub b: RouteEntry,
    /// The single prefix, one bit shorter, that replaced both.
    pub parent: IPv4Prefix,
}

/// The routing table. Entries are keyed by `(prefix, next_hop)`: the same
/// prefix may have independent rows from different neighbors, and the
/// selector picks among them.
#[derive(Debug, Default)]
pub struct Rib {
    entries: HashMap<(u32, u8), HashMap<String, RouteEntry>>,
    ledger: Vec<AggregationRecord>,
}

impl Rib {
    /// Builds an empty routing table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites one announcement, then coalesces the table to
    /// a fixed point.
    pub fn insert(&mut self, entry: RouteEntry) {
        self.insert_raw(entry);
        self.coalesce();
    }

    /// Withdraws the route previously announced for `prefix` by
    /// `next_hop`. If that exact row isn't present because it was folded
    /// into a wider aggregate, the aggregate is unwound first.
    pub fn withdraw(&mut self, prefix: IPv4Prefix, next_hop: &str) {
        self.disaggregate_containing(prefix, next_hop);
        self.remove_raw(&prefix, next_hop);
    }

    /// All routes currently covering `addr`, across every next hop.
    pub fn candidates_for(&self, addr: u32) -> Vec<&RouteEntry> {
        self.entries
            .iter()
            .filter(|((network, length), _)| (addr & length_to_mask(*length)) == *network)
            .flat_map(|(_, inner)| inner.values())
            .collect()
    }

    /// A sorted `(prefix, next_hop)` view of the whole table, for `dump`
    /// replies.
    pub fn snapshot(&self) -> Vec<(IPv4Prefix, String)> {
        let mut out: Vec<_> = self
            .entries
            .values()
            .flat_map(|inner| inner.values())
            .map(|e| (e.prefix, e.next_hop.clone()))
            .collect();
        out.sort();
        out
    }

    /// The aggregation ledger, oldest first. Exposed mainly for tests.
    pub fn ledger(&self) -> &[AggregationRecord] {
        &self.ledger
    }

    fn insert_raw(&mut self, entry: RouteEntry) {
        self.entries
            .entry((entry.prefix.network(), entry.prefix.length()))
            .or_default()
            .insert(entry.next_hop.clone(), entry);
    }

    fn remove_raw(&mut self, prefix: &IPv4Prefix, next_hop: &str) {
        let key = (prefix.network(), prefix.length());
        if let Some(inner) = self.entries.get_mut(&key) {
            inner.remove(next_hop);
            if inner.is_empty() {
                self.entries.remove(&key);
            }
        }
    }

    fn contains(&self, prefix: &IPv4Prefix, next_hop: &str) -> bool {
        self.entries
            .get(&(prefix.network(), prefix.length()))
            .map(|inner| inner.contains_key(next_hop))
            .unwrap_or(false)
    }

    /// Coalesces the table to a fixed point: a single pass can miss
    /// higher-order merges that only become possible once a pass below them
    /// completes (four adjacent /24s from the same neighbor must end up as
    /// one /22, not two /23s), so this keeps looping until a full pass
    /// finds nothing left to merge.
    fn coalesce(&mut self) {
        while self.coalesce_pass() {}
    }

    fn coalesce_pass(&mut self) -> bool {
        let mut by_next_hop: HashMap<String, Vec<RouteEntry>> = HashMap::new();
        for inner in self.entries.values() {
            for entry in inner.values() {
                by_next_hop
                    .entry(entry.next_hop.clone())
                    .or_default()
                    .push(entry.clone());
            }
        }
        for candidates in by_next_hop.values() {
            for i in 0..candidates.len() {
                for j in (i + 1)..candidates.len() {
                    let (x, y) = (&candidates[i], &candidates[j]);
                    if !x.prefix.adjacent(&y.prefix) || !x.attributes_eq(y) {
                        continue;
                    }
                    let parent = match x.prefix.merge(&y.prefix) {
                        Some(p) => p,
                        None => continue,
                    };
                    let (a, b) = if x.prefix.network() <= y.prefix.network() {
                        (x.clone(), y.clone())
                    } else {
                        (y.clone(), x.clone())
                    };
                    self.remove_raw(&a.prefix, &a.next_hop);
                    self.remove_raw(&b.prefix, &b.next_hop);
                    let merged = a.with_prefix(parent);
                    self.ledger.push(AggregationRecord { a, b, parent });
                    self.insert_raw(merged);
                    return true;
                }
            }
        }
        false
    }

    /// If `(prefix, next_hop)` isn't a live row, walks up the binary CIDR
    /// tree to find the live ancestor it was folded into, then unwinds the
    /// chain of merges back down to `prefix`.
    fn disaggregate_containing(&mut self, prefix: IPv4Prefix, next_hop: &str) {
        if self.contains(&prefix, next_hop) {
            return;
        }
        for len in (0..prefix.length()).rev() {
            let mask = length_to_mask(len);
            let ancestor = match IPv4Prefix::new(prefix.network() & mask, len) {
                Ok(p) => p,
                Err(_) => continue,
            };
            if self.contains(&ancestor, next_hop) {
                self.unwind_from(ancestor, next_hop, prefix);
                return;
            }
        }
    }

    fn unwind_from(&mut self, mut current: IPv4Prefix, next_hop: &str, target: IPv4Prefix) {
        while current != target {
            let record = self
                .ledger
                .iter()
                .rev()
                .find(|r| r.parent == current && r.a.next_hop == next_hop)
                .cloned();
            let Some(record) = record else { return };
            self.remove_raw(&current, next_hop);
            self.insert_raw(record.a.clone());
            self.insert_raw(record.b.clone());
            current = if record.a.prefix.covers(target.network()) {
                record.a.prefix
            } else {
                record.b.prefix
            };
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::route::Origin;
    use pretty_assertions::assert_eq;

    fn entry(prefix: &str, next_hop: &str) -> RouteEntry {
        RouteEntry {
            prefix: prefix.parse().unwrap(),
            next_hop: next_hop.to_string(),
            local_pref: 100,
            self_origin: false,
            as_path: vec![1],
            origin: Origin::Egp,
        }
    }

    #[test]
    fn coalesces_two_adjacent_siblings() {
        let mut rib = Rib::new();
        rib.insert(entry("10.0.0.0/24", "192.168.0.2"));
        rib.insert(entry("10.0.1.0/24", "192.168.0.2"));
        let snap = rib.snapshot();
        assert_eq!(snap, vec![("10.0.0.0/23".parse().unwrap(), "192.168.0.2".to_string())]);
        assert_eq!(rib.ledger().len(), 1);
    }

    #[test]
    fn coalesces_to_fixed_point_across_four_siblings() {
        let mut rib = Rib::new();
        for net in ["10.0.0.0/24", "10.0.1.0/24", "10.0.2.0/24", "10.0.3.0/24"] {
            rib.insert(entry(net, "192.168.0.2"));
        }
        let snap = rib.snapshot();
        assert_eq!(snap, vec![("10.0.0.0/22".parse().unwrap(), "192.168.0.2".to_string())]);
    }

    #[test]
    fn coalesce_pass_is_idempotent() {
        let mut rib = Rib::new();
        rib.insert(entry("10.0.0.0/24", "192.168.0.2"));
        rib.insert(entry("10.0.1.0/24", "192.168.0.2"));
        let before = rib.snapshot();
        rib.coalesce();
        assert_eq!(before, rib.snapshot());
    }

    #[test]
    fn different_next_hops_do_not_merge() {
        let mut rib = Rib::new();
        rib.insert(entry("10.0.0.0/24", "192.168.0.2"));
        rib.insert(entry("10.0.1.0/24", "192.168.0.3"));
        assert_eq!(rib.snapshot().len(), 2);
        assert!(rib.ledger().is_empty());
    }

    #[test]
    fn withdraw_disaggregates_surviving_sibling() {
        let mut rib = Rib::new();
        rib.insert(entry("10.0.0.0/24", "192.168.0.2"));
        rib.insert(entry("10.0.1.0/24", "192.168.0.2"));
        rib.withdraw("10.0.1.0/24".parse().unwrap(), "192.168.0.2");
        assert_eq!(
            rib.snapshot(),
            vec![("10.0.0.0/24".parse().unwrap(), "192.168.0.2".to_string())]
        );
    }

    #[test]
    fn withdraw_unwinds_multi_level_aggregate() {
        let mut rib = Rib::new();
        for net in ["10.0.0.0/24", "10.0.1.0/24", "10.0.2.0/24", "10.0.3.0/24"] {
            rib.insert(entry(net, "192.168.0.2"));
        }
        rib.withdraw("10.0.2.0/24".parse().unwrap(), "192.168.0.2");
        let mut remaining: Vec<_> = rib.snapshot().into_iter().map(|(p, _)| p.to_string()).collect();
        remaining.sort();
        assert_eq!(remaining, vec!["10.0.0.0/23", "10.0.3.0/24"]);
    }

    #[test]
    fn withdraw_of_unrelated_route_is_a_no_op() {
        let mut rib = Rib::new();
        rib.insert(entry("10.0.0.0/24", "192.168.0.2"));
        rib.withdraw("192.168.0.0/24".parse().unwrap(), "192.168.0.2");
        assert_eq!(rib.snapshot().len(), 1);
    }
}
