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


//! # Termlink Telnet Client
//!
//! A poll-driven Telnet client connection for interactive terminal sessions.
//!
//! ## Features
//!
//! - **Non-blocking** - every [`TelnetConnection::process`] call is bounded by the poll timeout
//! - **Fast Path** - chunks without Telnet commands bypass the protocol parser
//! - **Automatic Negotiation** - accepts NAWS and SGA, refuses everything else
//! - **Window Size Reporting** - sends the configured geometry proactively and on request
//!
//! ## Quick Start
//!
//! ```no_run
//! use termlink_client::{ClientConfig, NoInput, TelnetConnection};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("telehack.com", 23).with_terminal_size(80, 24);
//!     let sink = |text: &str| print!("{}", text);
//!
//!     let mut connection = TelnetConnection::connect(config, sink).await?;
//!     while !connection.is_disconnected() {
//!         connection.process(&mut NoInput).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Custom Transports
//!
//! [`TelnetConnection::establish`] accepts anything implementing [`Transport`], which
//! is how the connection is driven without a socket.

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::option_if_let_else,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate
)]

mod config;
mod connection;
mod demux;
mod error;
mod io;
mod transport;

pub use config::{Announcement, ClientConfig};
pub use connection::{ConnectionState, REMOTE_CLOSED_NOTICE, TelnetConnection};
pub use demux::{Demuxed, Route, StreamDemultiplexer};
pub use error::{ClientError, Result};
pub use io::{InputSource, NoInput, OutputSink};
pub use transport::{Received, TcpTransport, Transport};

pub use termlink_telnetcodec::{ParserState, WindowSize};
