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

//! The transport layer: one named channel per neighbor, polled together
//! with a bounded timeout.
//!
//! The simulated link type is a sequenced-packet datagram channel, which
//! neither `std` nor `mio` expose directly (`SOCK_SEQPACKET` has no safe
//! wrapper in either). A Unix-domain `SOCK_DGRAM` socket gives the same
//! message-boundary guarantee a frame needs -- one `recv` yields exactly
//! one JSON object, no length prefix required -- so that's what backs each
//! neighbor channel here.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mio::net::UnixDatagram;
use mio::{Events, Interest, Poll, Token};

use crate::error::TransportError;

const RECV_BUF_LEN: usize = 64 * 1024;

struct Channel {
    endpoint: String,
    socket: UnixDatagram,
    peer_path: PathBuf,
}

/// The set of configured neighbor channels, plus the `mio` poll instance
/// that watches all of them at once. This is the event loop's only
/// suspension point.
pub struct NeighborIo {
    poll: Poll,
    events: Events,
    channels: HashMap<Token, Channel>,
    tokens: HashMap<String, Token>,
}

impl NeighborIo {
    /// Binds one socket per endpoint under `socket_dir`, at
    /// `<socket_dir>/<endpoint>.sock`. Each channel's peer path,
    /// `<socket_dir>/<endpoint>.peer.sock`, is remembered but not
    /// connected eagerly: the peer side may not have bound its socket yet,
    /// and datagram sends/receives are addressed per-call rather than
    /// relying on a prior `connect`.
    pub fn new(endpoints: &[String], socket_dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(socket_dir)?;
        let poll = Poll::new()?;
        let mut channels = HashMap::new();
        let mut tokens = HashMap::new();
        for (i, endpoint) in endpoints.iter().enumerate() {
            let token = Token(i);
            let local_path = local_socket_path(socket_dir, endpoint);
            if local_path.exists() {
                fs::remove_file(&local_path)?;
            }
            let mut socket = UnixDatagram::bind(&local_path)?;
            poll.registry()
                .register(&mut socket, token, Interest::READABLE)?;
            channels.insert(
                token,
                Channel {
                    endpoint: endpoint.clone(),
                    socket,
                    peer_path: peer_socket_path(socket_dir, endpoint),
                },
            );
            tokens.insert(endpoint.clone(), token);
        }
        let capacity = endpoints.len().max(1) * 2;
        Ok(Self {
            poll,
            events: Events::with_capacity(capacity),
            channels,
            tokens,
        })
    }

    /// Blocks up to `timeout` for any neighbor to become readable,
    /// returning the endpoints with a frame waiting. An elapsed timeout
    /// with nothing ready yields an empty list; it is not an error.
    pub fn poll(&mut self, timeout: Duration) -> io::Result<Vec<String>> {
        self.poll.poll(&mut self.events, Some(timeout))?;
        Ok(self
            .events
            .iter()
            .filter_map(|event| self.channels.get(&event.token()))
            .map(|channel| channel.endpoint.clone())
            .collect())
    }

    /// Receives one frame's worth of bytes from `endpoint`, decoded as
    /// UTF-8. A zero-length datagram means the peer closed its side.
    pub fn recv_frame(&mut self, endpoint: &str) -> Result<String, TransportError> {
        let channel = self.channel_mut(endpoint)?;
        let mut buf = vec![0u8; RECV_BUF_LEN];
        let (n, _from) = channel
            .socket
            .recv_from(&mut buf)
            .map_err(|e| TransportError::Io(endpoint.to_string(), e))?;
        if n == 0 {
            return Err(TransportError::Closed(endpoint.to_string()));
        }
        buf.truncate(n);
        String::from_utf8(buf).map_err(|e| {
            TransportError::Io(
                endpoint.to_string(),
                io::Error::new(io::ErrorKind::InvalidData, e),
            )
        })
    }

    /// Sends one frame's worth of bytes to `endpoint`. Sends are assumed
    /// non-blocking, matching the simulated transport's guarantee.
    pub fn send_frame(&mut self, endpoint: &str, payload: &str) -> Result<(), TransportError> {
        let channel = self.channel_mut(endpoint)?;
        let peer_path = channel.peer_path.clone();
        channel
            .socket
            .send_to(payload.as_bytes(), &peer_path)
            .map_err(|e| TransportError::Io(endpoint.to_string(), e))?;
        Ok(())
    }

    fn channel_mut(&mut self, endpoint: &str) -> Result<&mut Channel, TransportError> {
        let token = *self
            .tokens
            .get(endpoint)
            .ok_or_else(|| TransportError::UnknownNeighbor(endpoint.to_string()))?;
        self.channels
            .get_mut(&token)
            .ok_or_else(|| TransportError::UnknownNeighbor(endpoint.to_string()))
    }
}

fn local_socket_path(dir: &Path, endpoint: &str) -> PathBuf {
    dir.join(format!("{endpoint}.sock"))
}

fn peer_socket_path(dir: &Path, endpoint: &str) -> PathBuf {
    dir.join(format!("{endpoint}.peer.sock"))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;

    #[test]
    fn send_and_receive_a_connected_pair() {
        let dir = std::env::temp_dir().join(format!("bgpctl-test-{}", std::process::id()));
        let endpoint = "192.168.0.2".to_string();

        let mut a = NeighborIo::new(&[endpoint.clone()], &dir).unwrap();
        // The peer side binds at the path `a` expects to connect to, and
        // connects back to `a`'s own path.
        let peer_path = peer_socket_path(&dir, &endpoint);
        let a_path = local_socket_path(&dir, &endpoint);
        let peer_socket = std::os::unix::net::UnixDatagram::bind(&peer_path).unwrap();
        peer_socket.connect(&a_path).unwrap();

        a.send_frame(&endpoint, "ping").unwrap();
        let mut buf = [0u8; 16];
        let n = peer_socket.recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"ping");

        peer_socket.send(b"pong").unwrap();
        let ready = a.poll(Duration::from_millis(200)).unwrap();
        assert_eq!(ready, vec![endpoint.clone()]);
        assert_eq!(a.recv_frame(&endpoint).unwrap(), "pong");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
