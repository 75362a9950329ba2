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

//! Typed errors for each of the four kinds the control plane distinguishes:
//! configuration errors are fatal and reported before the event loop
//! starts; the rest are handled inline by the loop itself, which is why
//! none of them bubble up to `main`.

use thiserror::Error;

/// A malformed CLI invocation. Fatal: reported on stderr, process exits
/// nonzero, the event loop never starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid autonomous system number {0:?}")]
    InvalidAsn(String),
    #[error("malformed neighbor specification {0:?}, expected <endpoint>-<relation>")]
    MalformedNeighborSpec(String),
    #[error("unknown relation tag {0:?}, expected cust, peer, or prov")]
    UnknownRelation(String),
    #[error("neighbor endpoint {0:?} configured more than once")]
    DuplicateNeighbor(String),
    #[error("no neighbors configured")]
    NoNeighbors,
}

/// A frame that could not be decoded, or decoded to an unrecognized
/// message type. Dropped by the dispatcher, never propagated as a panic.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed frame from {neighbor}: {source}")]
    MalformedFrame {
        neighbor: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A failure of the neighbor transport itself. Unlike protocol errors,
/// these end the event loop: there is no meaningful way to keep serving a
/// neighbor whose channel is gone.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("neighbor {0:?} is not configured")]
    UnknownNeighbor(String),
    #[error("neighbor {0:?} channel closed")]
    Closed(String),
    #[error("I/O error on neighbor {0:?}: {1}")]
    Io(String, #[source] std::io::Error),
}
