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

//! Entry point: parses the CLI invocation, binds one neighbor channel per
//! configured endpoint, and runs the single-threaded poll loop that drives
//! the dispatcher until a neighbor channel closes or errors.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use bgpctl::config::RouterConfig;
use bgpctl::dispatcher::Dispatcher;
use bgpctl::error::{ProtocolError, TransportError};
use bgpctl::message::Frame;
use bgpctl::neighbor::NeighborIo;

/// How long a single `poll` call waits for a neighbor to become readable
/// before returning control to the loop with nothing ready.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

fn main() -> ExitCode {
    env_logger::init();

    let config = match RouterConfig::from_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("bgpctl: {err}");
            return ExitCode::FAILURE;
        }
    };

    let socket_dir = socket_dir();
    let endpoints = config.endpoints();
    let mut neighbor_io = match NeighborIo::new(&endpoints, &socket_dir) {
        Ok(io) => io,
        Err(err) => {
            eprintln!("bgpctl: failed to bind neighbor sockets: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut dispatcher = Dispatcher::new(config.local_asn, config.relations);

    log::info!(
        "router as{} listening on {} neighbors",
        dispatcher.local_asn(),
        endpoints.len()
    );

    match run(&mut neighbor_io, &mut dispatcher) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::info!("terminating: {err}");
            ExitCode::SUCCESS
        }
    }
}

/// The poll-recv-dispatch-send loop. Returns once a neighbor channel closes
/// or errors on receive -- the only two ways this simulated process exits
/// the loop, per the transport failure semantics in `error.rs`. A clean
/// supervisor-managed process restarts it from scratch.
fn run(neighbor_io: &mut NeighborIo, dispatcher: &mut Dispatcher) -> Result<(), TransportError> {
    loop {
        let ready = neighbor_io
            .poll(POLL_TIMEOUT)
            .map_err(|e| TransportError::Io("<poll>".to_string(), e))?;
        for endpoint in ready {
            let raw = neighbor_io.recv_frame(&endpoint)?;
            let frame = match Frame::from_json(&raw) {
                Ok(frame) => frame,
                Err(source) => {
                    let err = ProtocolError::MalformedFrame {
                        neighbor: endpoint.clone(),
                        source,
                    };
                    log::warn!("{err}");
                    continue;
                }
            };
            for (dst, out_frame) in dispatcher.handle_frame(frame) {
                let payload = match out_frame.to_json() {
                    Ok(payload) => payload,
                    Err(err) => {
                        log::warn!("failed to encode outbound frame to {dst}: {err}");
                        continue;
                    }
                };
                if let Err(err) = neighbor_io.send_frame(&dst, &payload) {
                    log::warn!("failed to send frame to {dst}: {err}");
                }
            }
        }
    }
}

fn socket_dir() -> PathBuf {
    std::env::var_os("BGPCTL_SOCKET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("bgpctl"))
}
