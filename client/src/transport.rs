//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


//! Byte transport beneath the connection
//!
//! The connection never blocks on the transport except inside [`Transport::readable`],
//! which is bounded by the configured poll timeout. Sends and receives are single
//! non-blocking attempts.

use crate::{ClientError, Result};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use std::io;
use std::net::Shutdown;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info};

/// Outcome of one non-blocking receive attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    /// Between one and `max_bytes` bytes arrived.
    Data(Bytes),
    /// Nothing is available right now.
    WouldBlock,
    /// The peer performed an orderly shutdown.
    Closed,
}

/// Bidirectional byte channel to a Telnet server.
#[async_trait]
pub trait Transport: Send {
    /// Waits at most `wait` for inbound data. Returns `false` when the wait ran out.
    async fn readable(&mut self, wait: Duration) -> io::Result<bool>;

    /// Reads at most `max_bytes` without waiting.
    fn try_receive(&mut self, max_bytes: usize) -> io::Result<Received>;

    /// Writes without waiting and returns the number of bytes accepted.
    ///
    /// A transport that cannot accept anything right now reports `Ok(0)`.
    fn send(&mut self, bytes: &[u8]) -> io::Result<usize>;

    /// Releases the underlying resources.
    fn close(self)
    where
        Self: Sized;
}

/// TCP transport backed by a tokio socket.
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Resolves `address` and opens a TCP connection, giving up after `connect_timeout`.
    pub async fn connect(address: &str, connect_timeout: Duration) -> Result<Self> {
        let stream = match timeout(connect_timeout, TcpStream::connect(address)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => return Err(ClientError::ConnectionTimeout),
        };
        stream.set_nodelay(true)?;

        info!("Connected to {}", stream.peer_addr()?);
        Ok(Self { stream })
    }

    /// Wraps an already connected stream.
    pub fn from_stream(stream: TcpStream) -> Self {
        Self { stream }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn readable(&mut self, wait: Duration) -> io::Result<bool> {
        match timeout(wait, self.stream.readable()).await {
            Ok(ready) => ready.map(|()| true),
            Err(_) => Ok(false),
        }
    }

    fn try_receive(&mut self, max_bytes: usize) -> io::Result<Received> {
        let mut buffer = BytesMut::zeroed(max_bytes);
        match self.stream.try_read(&mut buffer) {
            Ok(0) => Ok(Received::Closed),
            Ok(n) => {
                buffer.truncate(n);
                Ok(Received::Data(buffer.freeze()))
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(Received::WouldBlock),
            Err(e) => Err(e),
        }
    }

    fn send(&mut self, bytes: &[u8]) -> io::Result<usize> {
        match self.stream.try_write(bytes) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(0),
            Err(e) => Err(e),
        }
    }

    fn close(self) {
        match self.stream.into_std() {
            Ok(stream) => {
                if let Err(e) = stream.shutdown(Shutdown::Both) {
                    debug!("Socket shutdown failed: {}", e);
                }
            }
            Err(e) => debug!("Socket deregistration failed: {}", e),
        }
    }
}
