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

//! The wire frame: a JSON envelope with a tagged message body. Decoding an
//! unrecognized `type` tag is a protocol error, not a panic -- serde's
//! adjacently-tagged enum gives us that for free.

use serde::{Deserialize, Serialize};

use crate::route::Origin;

/// An empty message body, serialized as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// The body of an `update` message: one announced route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBody {
    pub network: String,
    pub netmask: String,
    pub localpref: u32,
    #[serde(rename = "ASPath")]
    pub as_path: Vec<u32>,
    pub origin: Origin,
    #[serde(rename = "selfOrigin")]
    pub self_origin: bool,
}

/// One prefix being withdrawn, as carried in a `revoke` message's array
/// body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokeEntry {
    pub network: String,
    pub netmask: String,
}

/// One row of a `table` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    pub network: String,
    pub netmask: String,
    pub peer: String,
}

/// The closed set of message kinds this router understands. Tagged by the
/// `type` field and adjacently carried in `msg`, matching the wire schema's
/// `{ "type": ..., "msg": ... }` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "msg")]
pub enum Message {
    #[serde(rename = "update")]
    Update(UpdateBody),
    #[serde(rename = "revoke")]
    Revoke(Vec<RevokeEntry>),
    #[serde(rename = "data")]
    Data(serde_json::Value),
    #[serde(rename = "dump")]
    Dump(Empty),
    #[serde(rename = "no route")]
    NoRoute(Empty),
    #[serde(rename = "table")]
    Table(Vec<TableEntry>),
}

/// The full frame: source and destination addresses plus a tagged
/// message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub src: String,
    pub dst: String,
    #[serde(flatten)]
    pub message: Message,
}

impl Frame {
    pub fn new(src: impl Into<String>, dst: impl Into<String>, message: Message) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            message,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}
