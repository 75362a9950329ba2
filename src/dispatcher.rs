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

//! Classifies an inbound frame by message type and drives the RIB,
//! selector, and exporter accordingly, producing the `(neighbor, frame)`
//! pairs that should be sent back out.

use std::collections::HashMap;

use crate::exporter::{export_targets, prepend_local_asn};
use crate::message::{Empty, Frame, Message, RevokeEntry, TableEntry, UpdateBody};
use crate::prefix::{local_facing_address, parse_dotted, IPv4Prefix};
use crate::rib::Rib;
use crate::route::{NeighborRelation, RouteEntry};
use crate::selector::select_route;

/// Owns the routing table and drives message handling for one router
/// process. `update_log` and `revoke_log` record every accepted
/// announcement verbatim, independent of how the RIB later folds or
/// unfolds it -- the append-only history the design notes call for.
pub struct Dispatcher {
    local_asn: u32,
    relations: HashMap<String, NeighborRelation>,
    neighbors: Vec<String>,
    rib: Rib,
    update_log: Vec<(String, UpdateBody)>,
    revoke_log: Vec<(String, Vec<RevokeEntry>)>,
}

impl Dispatcher {
    pub fn new(local_asn: u32, relations: HashMap<String, NeighborRelation>) -> Self {
        let neighbors = relations.keys().cloned().collect();
        Self {
            local_asn,
            relations,
            neighbors,
            rib: Rib::new(),
            update_log: Vec::new(),
            revoke_log: Vec::new(),
        }
    }

    /// Read-only access to the table, for `dump`-equivalent inspection in
    /// tests and tooling.
    pub fn rib(&self) -> &Rib {
        &self.rib
    }

    /// This router's own autonomous system number.
    pub fn local_asn(&self) -> u32 {
        self.local_asn
    }

    /// Handles one inbound frame, returning the frames that must be sent
    /// and which neighbor each goes to.
    pub fn handle_frame(&mut self, frame: Frame) -> Vec<(String, Frame)> {
        let source = frame.src.clone();
        match frame.message {
            Message::Update(body) => self.handle_update(&source, body),
            Message::Revoke(entries) => self.handle_revoke(&source, entries),
            Message::Data(payload) => self.handle_data(&source, &frame.dst, payload),
            Message::Dump(_) => self.handle_dump(&source),
            Message::NoRoute(_) | Message::Table(_) => Vec::new(),
        }
    }

    fn handle_update(&mut self, source: &str, body: UpdateBody) -> Vec<(String, Frame)> {
        let prefix = match IPv4Prefix::from_dotted(&body.network, &body.netmask) {
            Ok(p) => p,
            Err(err) => {
                log::warn!("dropping malformed update from {source}: {err}");
                return Vec::new();
            }
        };
        self.update_log.push((source.to_string(), body.clone()));
        self.rib.insert(RouteEntry {
            prefix,
            next_hop: source.to_string(),
            local_pref: body.localpref,
            self_origin: body.self_origin,
            as_path: body.as_path.clone(),
            origin: body.origin,
        });

        export_targets(source, self.neighbors.iter().cloned(), &self.relations)
            .into_iter()
            .map(|dst| {
                let src = local_facing_address(&dst).unwrap_or_else(|_| dst.clone());
                let out = UpdateBody {
                    as_path: prepend_local_asn(&body.as_path, self.local_asn),
                    ..body.clone()
                };
                (dst.clone(), Frame::new(src, dst, Message::Update(out)))
            })
            .collect()
    }

    fn handle_revoke(&mut self, source: &str, entries: Vec<RevokeEntry>) -> Vec<(String, Frame)> {
        for entry in &entries {
            match IPv4Prefix::from_dotted(&entry.network, &entry.netmask) {
                Ok(prefix) => self.rib.withdraw(prefix, source),
                Err(err) => log::warn!("dropping malformed revoke entry from {source}: {err}"),
            }
        }
        self.revoke_log.push((source.to_string(), entries.clone()));

        export_targets(source, self.neighbors.iter().cloned(), &self.relations)
            .into_iter()
            .map(|dst| {
                let src = local_facing_address(&dst).unwrap_or_else(|_| dst.clone());
                (dst.clone(), Frame::new(src, dst, Message::Revoke(entries.clone())))
            })
            .collect()
    }

    fn handle_data(
        &self,
        source: &str,
        destination: &str,
        payload: serde_json::Value,
    ) -> Vec<(String, Frame)> {
        let addr = match parse_dotted(destination) {
            Ok(addr) => addr,
            Err(_) => return vec![self.no_route_reply(source, destination)],
        };
        match select_route(&self.rib, addr, source, &self.relations) {
            Some(route) => {
                let target = route.next_hop.clone();
                let src = local_facing_address(&target).unwrap_or_else(|_| source.to_string());
                vec![(
                    target,
                    Frame::new(src, destination.to_string(), Message::Data(payload)),
                )]
            }
            None => vec![self.no_route_reply(source, destination)],
        }
    }

    fn handle_dump(&self, source: &str) -> Vec<(String, Frame)> {
        let table = self
            .rib
            .snapshot()
            .into_iter()
            .map(|(prefix, next_hop)| TableEntry {
                network: prefix.network_dotted(),
                netmask: prefix.netmask_dotted(),
                peer: next_hop,
            })
            .collect();
        let src = local_facing_address(source).unwrap_or_else(|_| source.to_string());
        vec![(
            source.to_string(),
            Frame::new(src, source.to_string(), Message::Table(table)),
        )]
    }

    fn no_route_reply(&self, source: &str, original_destination: &str) -> (String, Frame) {
        let src = local_facing_address(source).unwrap_or_else(|_| source.to_string());
        (
            source.to_string(),
            Frame::new(src, original_destination.to_string(), Message::NoRoute(Empty {})),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::route::Origin;
    use maplit::hashmap;
    use pretty_assertions::assert_eq;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(
            65001,
            hashmap! {
                "192.168.0.2".to_string() => NeighborRelation::Customer,
                "192.168.0.3".to_string() => NeighborRelation::Peer,
                "192.168.0.4".to_string() => NeighborRelation::Provider,
            },
        )
    }

    fn update(network: &str, netmask: &str) -> UpdateBody {
        UpdateBody {
            network: network.to_string(),
            netmask: netmask.to_string(),
            localpref: 100,
            as_path: vec![],
            origin: Origin::Egp,
            self_origin: true,
        }
    }

    #[test]
    fn update_from_customer_propagates_to_peer_and_provider() {
        let mut d = dispatcher();
        let out = d.handle_update("192.168.0.2", update("10.0.0.0", "255.255.255.0"));
        let mut dsts: Vec<_> = out.iter().map(|(n, _)| n.clone()).collect();
        dsts.sort();
        assert_eq!(dsts, vec!["192.168.0.3".to_string(), "192.168.0.4".to_string()]);
        for (_, frame) in &out {
            if let Message::Update(body) = &frame.message {
                assert_eq!(body.as_path, vec![65001]);
            } else {
                panic!("expected update frame");
            }
        }
    }

    #[test]
    fn update_from_peer_does_not_propagate_to_another_peer_or_provider() {
        let mut d = dispatcher();
        let out = d.handle_update("192.168.0.3", update("10.0.0.0", "255.255.255.0"));
        assert!(out.is_empty());
    }

    #[test]
    fn data_with_no_route_gets_reply() {
        let d = dispatcher();
        let out = d.handle_data("192.168.0.2", "10.0.0.1", serde_json::json!({}));
        assert_eq!(out.len(), 1);
        assert!(matches!(out[0].1.message, Message::NoRoute(_)));
    }

    #[test]
    fn dump_lists_rib_contents() {
        let mut d = dispatcher();
        d.handle_update("192.168.0.2", update("10.0.0.0", "255.255.255.0"));
        let out = d.handle_dump("192.168.0.2");
        match &out[0].1.message {
            Message::Table(rows) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].network, "10.0.0.0");
            }
            _ => panic!("expected table frame"),
        }
    }
}
