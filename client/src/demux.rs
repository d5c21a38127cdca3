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


//! Inbound stream demultiplexing
//!
//! Most chunks from a Telnet server are plain text. Those skip the protocol parser and
//! are decoded straight to text. A chunk carrying any `IAC` byte, or arriving while the
//! parser is partway through a command, is handed to the parser whole so state carried
//! over from the previous chunk is honored.

use termlink_telnetcodec::consts::IAC;
use termlink_telnetcodec::{ParserState, TelnetFrame, TelnetParser, WindowSize};
use tracing::{debug, trace};

/// Which path a chunk took through the demultiplexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    /// Clean text, decoded without the parser.
    #[default]
    Fast,
    /// Fed to the protocol parser.
    Slow,
}

/// Result of demultiplexing one chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Demuxed {
    /// Decoded text, if the chunk carried any.
    pub text: Option<String>,
    /// Replies to send, in the order they were decided.
    pub replies: Vec<TelnetFrame>,
    /// Path the chunk took.
    pub route: Route,
}

/// Splits received chunks into display text and protocol replies.
#[derive(Debug, Default)]
pub struct StreamDemultiplexer {
    parser: TelnetParser,
}

impl StreamDemultiplexer {
    /// Creates a demultiplexer reporting `window_size` when NAWS is requested.
    pub fn new(window_size: WindowSize) -> Self {
        Self {
            parser: TelnetParser::new(window_size),
        }
    }

    /// The protocol parser behind the slow path.
    pub fn parser(&self) -> &TelnetParser {
        &self.parser
    }

    /// Picks the path for `chunk` given the current parser state.
    pub fn route(&self, chunk: &[u8]) -> Route {
        if self.parser.state() == ParserState::Normal && !chunk.contains(&IAC) {
            Route::Fast
        } else {
            Route::Slow
        }
    }

    /// Demultiplexes one chunk.
    pub fn demux(&mut self, chunk: &[u8]) -> Demuxed {
        if chunk.is_empty() {
            return Demuxed::default();
        }

        match self.route(chunk) {
            Route::Fast => {
                trace!("Fast path: {} bytes", chunk.len());
                Demuxed {
                    text: Some(String::from_utf8_lossy(chunk).into_owned()),
                    replies: Vec::new(),
                    route: Route::Fast,
                }
            }
            Route::Slow => {
                let output = self.parser.parse(chunk);
                for argument in &output.subnegotiations {
                    debug!(
                        "Ignoring sub-negotiation for {} ({} bytes)",
                        argument.option(),
                        argument.len()
                    );
                }
                Demuxed {
                    text: output.text(),
                    replies: output.replies,
                    route: Route::Slow,
                }
            }
        }
    }
}
