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


//! # Termlink Telnet Protocol Codec
//!
//! A sans-IO implementation of the client side of the Telnet protocol (RFC 854) for
//! small terminals: it strips command framing out of an inbound byte stream, decides the
//! replies to option negotiation, and serialises those replies together with the client's
//! window-size reports (RFC 1073) and forwarded keystrokes.
//!
//! ## Core Components
//!
//! ### [`TelnetParser`]
//!
//! A byte-at-a-time automaton ([`ParserState`]) that removes `IAC` sequences from the
//! stream, collecting clean text, policy replies and completed sub-negotiations into a
//! [`ParseOutput`]. It also implements [`Decoder`](tokio_util::codec::Decoder), consuming
//! whatever is buffered as one chunk.
//!
//! ### [`NegotiationPolicy`]
//!
//! The fixed reply table:
//!
//! | Received | Reply |
//! |---|---|
//! | `DO NAWS` | `WILL NAWS` followed by the window-size report |
//! | `DO SGA` | `WILL SGA` |
//! | `DO <other>` | `WONT <other>` |
//! | `WILL <any>` | `DONT <any>` |
//! | `WONT`/`DONT` | nothing |
//!
//! ### [`TelnetCodec`]
//!
//! A stateless [`Encoder`](tokio_util::codec::Encoder) for [`TelnetFrame`]s and for
//! keystrokes (Enter is sent as CR LF).
//!
//! ## Usage Example
//!
//! ```rust
//! use bytes::BytesMut;
//! use termlink_telnetcodec::{TelnetCodec, TelnetParser, WindowSize};
//! use tokio_util::codec::Encoder;
//!
//! let mut parser = TelnetParser::new(WindowSize::new(80, 24));
//! let mut codec = TelnetCodec::new();
//!
//! let output = parser.parse(b"Login: \xFF\xFD\x1F");
//! assert_eq!(output.text().as_deref(), Some("Login: "));
//!
//! let mut wire = BytesMut::new();
//! for reply in output.replies {
//!     codec.encode(reply, &mut wire).unwrap();
//! }
//! assert_eq!(&wire[..], b"\xFF\xFB\x1F\xFF\xFA\x1F\x00\x50\x00\x18\xFF\xF0");
//! ```
//!
//! ## Limitations
//!
//! - Only NAWS and Suppress-Go-Ahead are ever accepted; there is no Q-method option
//!   tracking, binary mode, or line mode.
//! - Inside a sub-negotiation every IAC not followed by SE is dropped, so `IAC IAC` does
//!   not yield a literal 0xFF in the payload.
//!
//! ## Related RFCs
//!
//! - RFC 854: Telnet Protocol Specification
//! - RFC 855: Telnet Option Specifications
//! - RFC 858: Telnet Suppress Go Ahead Option
//! - RFC 1073: Telnet Window Size Option

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
    clippy::missing_errors_doc
)]

mod codec;
pub mod consts;
mod frame;
mod naws;
mod options;
mod parser;
pub mod policy;
mod result;

pub use self::codec::TelnetCodec;
pub use self::frame::{NegotiationCommand, TelnetArgument, TelnetFrame};
pub use self::naws::WindowSize;
pub use self::options::TelnetOption;
pub use self::parser::{ParseOutput, ParserState, TelnetParser};
pub use self::policy::{FollowUp, NegotiationPolicy, Response};
pub use self::result::{CodecError, CodecResult};
