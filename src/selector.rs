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

//! The best-route decision cascade: narrows the set of routes covering a
//! destination address down to the single one that wins, through (at most)
//! eight successive tie-break stages.

use std::collections::HashMap;

use crate::prefix::{lt, parse_dotted};
use crate::rib::Rib;
use crate::route::{NeighborRelation, RouteEntry};

/// Selects the best route for `destination`, received on `source`, or
/// `None` if no route survives the relationship filter (including the case
/// where no route matches at all).
pub fn select_route<'a>(
    rib: &'a Rib,
    destination: u32,
    source: &str,
    relations: &HashMap<String, NeighborRelation>,
) -> Option<&'a RouteEntry> {
    let mut candidates = rib.candidates_for(destination);
    if candidates.is_empty() {
        return None;
    }

    // 2. longest prefix match
    keep_max_by(&mut candidates, |e| e.prefix.length());
    // 3. highest local preference
    keep_max_by(&mut candidates, |e| e.local_pref);
    // 4. self-originated routes are preferred over learned ones
    if candidates.iter().any(|e| e.self_origin) {
        candidates.retain(|e| e.self_origin);
    }
    // 5. shortest AS path
    keep_min_by(&mut candidates, |e| e.as_path.len());
    // 6. origin type: IGP beats EGP beats UNK
    keep_min_by(&mut candidates, |e| e.origin);
    // 7. lowest next hop, compared as a full 32-bit integer
    keep_lowest_next_hop(&mut candidates);
    // 8. relationship filter: only customer-sourced or customer-destined
    //    routes may be selected at all.
    let source_is_customer = relations.get(source) == Some(&NeighborRelation::Customer);
    candidates.retain(|e| {
        source_is_customer || relations.get(&e.next_hop) == Some(&NeighborRelation::Customer)
    });

    candidates.into_iter().next()
}

fn keep_max_by<T: Ord>(candidates: &mut Vec<&RouteEntry>, key: impl Fn(&RouteEntry) -> T) {
    if let Some(best) = candidates.iter().map(|e| key(e)).max() {
        candidates.retain(|e| key(e) == best);
    }
}

fn keep_min_by<T: Ord>(candidates: &mut Vec<&RouteEntry>, key: impl Fn(&RouteEntry) -> T) {
    if let Some(best) = candidates.iter().map(|e| key(e)).min() {
        candidates.retain(|e| key(e) == best);
    }
}

/// Stage 7's true numeric minimum over the 32-bit next-hop address, found
/// by a pairwise reduction through [`lt`] rather than relying on `Ord` on a
/// derived key -- this is the one stage the source gets wrong (a
/// short-circuiting first-octet comparison), so it gets its own dedicated
/// reduction instead of going through `keep_min_by`.
fn keep_lowest_next_hop(candidates: &mut Vec<&RouteEntry>) {
    let mut lowest: Option<u32> = None;
    for entry in candidates.iter() {
        let addr = parse_dotted(&entry.next_hop).unwrap_or(u32::MAX);
        if lowest.map_or(true, |current| lt(addr, current)) {
            lowest = Some(addr);
        }
    }
    if let Some(lowest) = lowest {
        candidates.retain(|e| parse_dotted(&e.next_hop).unwrap_or(u32::MAX) == lowest);
    }
}
