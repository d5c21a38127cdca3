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


//! Connection lifecycle
//!
//! A [`TelnetConnection`] moves `Disconnected -> Connecting -> Connected -> Disconnected`
//! and never comes back. The caller drives it by calling [`TelnetConnection::process`]
//! in a loop; each call waits at most `poll_timeout` for the socket, handles at most one
//! received chunk, and forwards at most one keystroke.

use crate::config::{Announcement, ClientConfig};
use crate::demux::StreamDemultiplexer;
use crate::io::{InputSource, OutputSink};
use crate::transport::{Received, TcpTransport, Transport};
use crate::{ClientError, Result};
use bytes::BytesMut;
use termlink_telnetcodec::{
    NegotiationPolicy, ParserState, TelnetArgument, TelnetCodec, TelnetFrame, WindowSize,
};
use tokio_util::codec::Encoder;
use tracing::{debug, error, info, warn};

/// Line delivered to the sink when the server closes the connection.
pub const REMOTE_CLOSED_NOTICE: &str = "Connection closed by foreign host.";

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Not connected
    #[default]
    Disconnected,
    /// Transport open, announcement in flight
    Connecting,
    /// Connected and active
    Connected,
}

/// A client connection to one Telnet server.
///
/// Dropping the connection releases the transport if [`close`](Self::close) was not
/// called.
pub struct TelnetConnection<T: Transport, S: OutputSink> {
    config: ClientConfig,
    state: ConnectionState,
    transport: Option<T>,
    demux: StreamDemultiplexer,
    codec: TelnetCodec,
    sink: S,
}

impl<S: OutputSink> TelnetConnection<TcpTransport, S> {
    /// Connects to `config.address()` over TCP and announces the client's capabilities.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidConfig`] when the configuration does not validate
    /// - [`ClientError::ConnectionTimeout`] when the connect outlives `connect_timeout`
    /// - [`ClientError::Io`] when resolving, connecting, or the opening sends fail
    pub async fn connect(config: ClientConfig, mut sink: S) -> Result<Self> {
        config.validate().map_err(ClientError::InvalidConfig)?;

        let address = config.address();
        info!("Connecting to {}...", address);
        if config.status_notices {
            sink.deliver(&format!("Connecting to {}...\r\n", address));
        }

        let transport = match TcpTransport::connect(&address, config.connect_timeout).await {
            Ok(transport) => transport,
            Err(e) => {
                error!("Connection to {} failed: {}", address, e);
                return Err(e);
            }
        };
        Self::establish(config, transport, sink)
    }
}

impl<T: Transport, S: OutputSink> TelnetConnection<T, S> {
    /// Runs the `Connecting` phase over an already open transport.
    ///
    /// Sends the configured announcement followed by an unsolicited window-size report.
    /// On failure the transport is released before the error is returned.
    pub fn establish(config: ClientConfig, transport: T, sink: S) -> Result<Self> {
        config.validate().map_err(ClientError::InvalidConfig)?;

        let window_size = WindowSize::new(config.terminal_width, config.terminal_height);
        let mut connection = Self {
            config,
            state: ConnectionState::Connecting,
            transport: Some(transport),
            demux: StreamDemultiplexer::new(window_size),
            codec: TelnetCodec::new(),
            sink,
        };

        if let Err(e) = connection.announce() {
            error!("Connection setup failed: {}", e);
            connection.release();
            return Err(e);
        }

        connection.state = ConnectionState::Connected;
        connection.notify("Connected");
        Ok(connection)
    }

    fn announce(&mut self) -> Result<()> {
        if self.config.announcement == Announcement::Full {
            let mut buffer = BytesMut::new();
            for frame in NegotiationPolicy::new().announcement() {
                debug!("Announcing {}", frame);
                self.codec.encode(frame, &mut buffer)?;
            }
            self.transmit(&buffer)?;
        }
        self.send_window_size()
    }

    /// Sends the NAWS report for the configured terminal size.
    pub fn send_window_size(&mut self) -> Result<()> {
        let size = self.window_size();
        self.send_frame(TelnetFrame::window_size(size))?;
        self.notify(&format!("REPORTED SIZE: {}", size));
        Ok(())
    }

    /// Sends one keystroke. Enter (CR) goes out as CR LF.
    pub fn send_key(&mut self, key: u8) -> Result<()> {
        let mut buffer = BytesMut::with_capacity(2);
        self.codec.encode(key, &mut buffer)?;
        self.transmit(&buffer)
    }

    /// Performs one bounded round of I/O.
    ///
    /// Waits at most `poll_timeout` for inbound data and handles at most one chunk of up
    /// to `read_chunk_size` bytes: its text goes to the sink and every negotiation reply
    /// is sent as its own write. Then forwards at most one keystroke from `input`.
    ///
    /// A server close is not an error: the notice is delivered, the connection becomes
    /// disconnected, and `Ok(())` is returned.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotConnected`] when called after the connection ended
    /// - [`ClientError::Io`] when the transport fails; the connection is disconnected
    pub async fn process<I>(&mut self, input: &mut I) -> Result<()>
    where
        I: InputSource + ?Sized,
    {
        if self.state != ConnectionState::Connected {
            return Err(ClientError::NotConnected);
        }

        if let Err(e) = self.receive().await {
            return Err(self.fail(e));
        }

        if self.state == ConnectionState::Connected {
            if let Some(key) = input.try_read_one() {
                if let Err(e) = self.send_key(key) {
                    return Err(self.fail(e));
                }
            }
        }
        Ok(())
    }

    async fn receive(&mut self) -> Result<()> {
        let wait = self.config.poll_timeout;
        let max_bytes = self.config.read_chunk_size;
        let received = {
            let transport = self.transport.as_mut().ok_or(ClientError::NotConnected)?;
            if !transport.readable(wait).await? {
                return Ok(());
            }
            transport.try_receive(max_bytes)?
        };

        match received {
            Received::WouldBlock => Ok(()),
            Received::Closed => {
                info!("Server closed connection");
                self.disconnect(REMOTE_CLOSED_NOTICE);
                Ok(())
            }
            Received::Data(chunk) => {
                let demuxed = self.demux.demux(&chunk);
                if let Some(text) = demuxed.text {
                    self.sink.deliver(&text);
                }
                for reply in demuxed.replies {
                    debug!("Replying {}", reply);
                    let reported = match &reply {
                        TelnetFrame::Subnegotiate(TelnetArgument::NAWSWindowSize(size)) => {
                            Some(*size)
                        }
                        _ => None,
                    };
                    self.send_frame(reply)?;
                    if let Some(size) = reported {
                        self.notify(&format!("REPORTED SIZE: {}", size));
                    }
                }
                Ok(())
            }
        }
    }

    fn send_frame(&mut self, frame: TelnetFrame) -> Result<()> {
        let mut buffer = BytesMut::with_capacity(frame.encoded_len());
        self.codec.encode(frame, &mut buffer)?;
        self.transmit(&buffer)
    }

    fn transmit(&mut self, bytes: &[u8]) -> Result<()> {
        let transport = self.transport.as_mut().ok_or(ClientError::NotConnected)?;
        let written = transport.send(bytes)?;
        if written < bytes.len() {
            warn!("Partial write: {} of {} bytes sent", written, bytes.len());
        }
        Ok(())
    }

    fn fail(&mut self, error: ClientError) -> ClientError {
        if self.state != ConnectionState::Disconnected {
            error!("Connection error: {}", error);
            self.disconnect(&format!("Connection lost: {}", error));
        }
        error
    }

    fn disconnect(&mut self, notice: &str) {
        self.release();
        self.sink.deliver(&format!("\r\n{}\r\n", notice));
    }

    fn notify(&mut self, notice: &str) {
        if self.config.status_notices {
            self.sink.deliver(&format!("{}\r\n", notice));
        }
    }

    fn release(&mut self) {
        self.state = ConnectionState::Disconnected;
        if let Some(transport) = self.transport.take() {
            transport.close();
        }
    }

    /// Closes the connection. Later calls do nothing.
    pub fn close(&mut self) {
        if self.transport.is_some() {
            info!("Closing connection to {}", self.config.address());
        }
        self.release();
    }

    /// Returns `true` once the connection has ended for any reason.
    pub fn is_disconnected(&self) -> bool {
        self.state == ConnectionState::Disconnected
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// The size reported through NAWS.
    pub fn window_size(&self) -> WindowSize {
        self.demux.parser().window_size()
    }

    /// Where the protocol parser stands between chunks.
    pub fn parser_state(&self) -> ParserState {
        self.demux.parser().state()
    }

    /// The configuration this connection was opened with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The transport, while the connection holds it.
    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }

    /// The output sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the output sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

impl<T: Transport, S: OutputSink> Drop for TelnetConnection<T, S> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: Transport, S: OutputSink> std::fmt::Debug for TelnetConnection<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelnetConnection")
            .field("address", &self.config.address())
            .field("state", &self.state)
            .field("parser_state", &self.parser_state())
            .finish()
    }
}
