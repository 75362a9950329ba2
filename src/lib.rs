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

//! bgpctl: the control plane of a simplified BGP-like interdomain router.
//!
//! This crate maintains a routing information base (RIB), accepts route
//! announcements and withdrawals from neighboring routers, selects best
//! routes through a deterministic preference cascade, aggregates and
//! disaggregates contiguous prefixes, filters advertisements by commercial
//! relationship (customer / peer / provider), and forwards data packets
//! along the selected route.
//!
//! The crate is organized leaf-first:
//!
//! - [`prefix`] -- pure arithmetic over IPv4 prefixes.
//! - [`route`] -- the RIB row type and its path attributes.
//! - [`rib`] -- the routing table plus its append-only aggregation ledger.
//! - [`selector`] -- the best-route decision cascade.
//! - [`exporter`] -- the relationship-based export policy.
//! - [`message`] -- the wire frame and its tagged message bodies.
//! - [`dispatcher`] -- classifies inbound frames and drives the above.
//! - [`neighbor`] -- the `mio`-backed per-neighbor transport.
//! - [`config`] -- CLI parsing into a validated [`config::RouterConfig`].
//! - [`error`] -- the typed error kinds for each failure class.
//!
//! The binary entry point in `main.rs` wires these together into the
//! single-threaded poll loop described in the crate's design notes.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod exporter;
pub mod message;
pub mod neighbor;
pub mod prefix;
pub mod rib;
pub mod route;
pub mod selector;
